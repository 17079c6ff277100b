//! Built-in encoder preset catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named built-in encoder presets accepted by `create_transform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncoderNamedPreset {
    AdaptiveStreaming,
    H264MultipleBitrate1080p,
    H264MultipleBitrate720p,
    H264MultipleBitrateSD,
    AACGoodQualityAudio,
}

/// Preset used when the selector omits `presetName`.
pub const DEFAULT_PRESET: EncoderNamedPreset = EncoderNamedPreset::AdaptiveStreaming;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown preset '{name}'. Supported presets: {}", EncoderNamedPreset::ALL_NAMES.join(", "))]
pub struct PresetNotFound {
    pub name: String,
}

impl EncoderNamedPreset {
    pub const ALL: [EncoderNamedPreset; 5] = [
        EncoderNamedPreset::AdaptiveStreaming,
        EncoderNamedPreset::H264MultipleBitrate1080p,
        EncoderNamedPreset::H264MultipleBitrate720p,
        EncoderNamedPreset::H264MultipleBitrateSD,
        EncoderNamedPreset::AACGoodQualityAudio,
    ];

    pub const ALL_NAMES: [&'static str; 5] = [
        "AdaptiveStreaming",
        "H264MultipleBitrate1080p",
        "H264MultipleBitrate720p",
        "H264MultipleBitrateSD",
        "AACGoodQualityAudio",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderNamedPreset::AdaptiveStreaming => "AdaptiveStreaming",
            EncoderNamedPreset::H264MultipleBitrate1080p => "H264MultipleBitrate1080p",
            EncoderNamedPreset::H264MultipleBitrate720p => "H264MultipleBitrate720p",
            EncoderNamedPreset::H264MultipleBitrateSD => "H264MultipleBitrateSD",
            EncoderNamedPreset::AACGoodQualityAudio => "AACGoodQualityAudio",
        }
    }
}

/// Look up a preset by its exact, case-sensitive name.
pub fn resolve(name: &str) -> Result<EncoderNamedPreset, PresetNotFound> {
    EncoderNamedPreset::ALL
        .iter()
        .copied()
        .find(|preset| preset.as_str() == name)
        .ok_or_else(|| PresetNotFound {
            name: name.to_string(),
        })
}

impl FromStr for EncoderNamedPreset {
    type Err = PresetNotFound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

impl fmt::Display for EncoderNamedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
