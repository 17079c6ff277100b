use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Blob store backend types
///
/// Defined in core because it is selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    Azure,
    Local,
}

impl FromStr for BlobBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "azure" => Ok(BlobBackend::Azure),
            "local" => Ok(BlobBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid blob backend: {}", s)),
        }
    }
}

impl Display for BlobBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BlobBackend::Azure => write!(f, "azure"),
            BlobBackend::Local => write!(f, "local"),
        }
    }
}
