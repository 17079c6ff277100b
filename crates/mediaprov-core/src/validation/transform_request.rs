//! `create_transform` input validation
//!
//! Turns the raw JSON body into a [`TransformRequest`] before any external
//! call is made.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::AppError;
use crate::models::CreateTransformRequest;
use crate::presets::{self, EncoderNamedPreset, DEFAULT_PRESET};

/// Languages accepted for audio analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    EnUs,
    EnGb,
    EsEs,
    EsMx,
    FrFr,
    ItIt,
    JaJp,
    PtBr,
    ZhCn,
}

impl SupportedLanguage {
    pub const ALL_TAGS: [&'static str; 9] = [
        "en-US", "en-GB", "es-ES", "es-MX", "fr-FR", "it-IT", "ja-JP", "pt-BR", "zh-CN",
    ];

    pub fn as_tag(&self) -> &'static str {
        match self {
            SupportedLanguage::EnUs => "en-US",
            SupportedLanguage::EnGb => "en-GB",
            SupportedLanguage::EsEs => "es-ES",
            SupportedLanguage::EsMx => "es-MX",
            SupportedLanguage::FrFr => "fr-FR",
            SupportedLanguage::ItIt => "it-IT",
            SupportedLanguage::JaJp => "ja-JP",
            SupportedLanguage::PtBr => "pt-BR",
            SupportedLanguage::ZhCn => "zh-CN",
        }
    }
}

impl FromStr for SupportedLanguage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = match s {
            "en-US" => SupportedLanguage::EnUs,
            "en-GB" => SupportedLanguage::EnGb,
            "es-ES" => SupportedLanguage::EsEs,
            "es-MX" => SupportedLanguage::EsMx,
            "fr-FR" => SupportedLanguage::FrFr,
            "it-IT" => SupportedLanguage::ItIt,
            "ja-JP" => SupportedLanguage::JaJp,
            "pt-BR" => SupportedLanguage::PtBr,
            "zh-CN" => SupportedLanguage::ZhCn,
            other => {
                return Err(AppError::Validation(format!(
                    "Unsupported audioLanguage '{}'. Supported languages: {}",
                    other,
                    SupportedLanguage::ALL_TAGS.join(", ")
                )))
            }
        };
        Ok(language)
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Which recipe the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformSelector {
    Preset(EncoderNamedPreset),
    Analysis {
        audio_insights_only: bool,
        audio_language: Option<SupportedLanguage>,
    },
}

/// A validated `create_transform` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub transform_name: String,
    pub selector: TransformSelector,
}

impl TransformRequest {
    pub fn new(transform_name: impl Into<String>, selector: TransformSelector) -> Self {
        Self {
            transform_name: transform_name.into(),
            selector,
        }
    }
}

/// Validate a raw `create_transform` body.
pub fn validate(raw: &Value) -> Result<TransformRequest, AppError> {
    if !raw.is_object() {
        return Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    }

    let payload: CreateTransformRequest = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::Validation(format!("Invalid input object: {}", e)))?;

    TransformRequest::try_from(payload)
}

impl TryFrom<CreateTransformRequest> for TransformRequest {
    type Error = AppError;

    fn try_from(payload: CreateTransformRequest) -> Result<Self, Self::Error> {
        // The name is used verbatim; only a blank one is rejected here
        let transform_name = payload
            .transform_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                AppError::Validation("Please pass transformName in the input object".to_string())
            })?;

        let selector = match (
            payload.built_in_standard_encoder_preset,
            payload.video_analyzer_preset,
        ) {
            (None, None) => {
                return Err(AppError::Validation(
                    "Please pass preset in the input object".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "Pass either builtInStandardEncoderPreset or videoAnalyzerPreset, not both"
                        .to_string(),
                ))
            }
            (Some(preset), None) => {
                let preset = match preset.preset_name.as_deref() {
                    Some(name) => presets::resolve(name)
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                    None => DEFAULT_PRESET,
                };
                TransformSelector::Preset(preset)
            }
            (None, Some(analyzer)) => TransformSelector::Analysis {
                audio_insights_only: analyzer.audio_insights_only,
                audio_language: analyzer
                    .audio_language
                    .as_deref()
                    .map(SupportedLanguage::from_str)
                    .transpose()?,
            },
        };

        Ok(TransformRequest {
            transform_name,
            selector,
        })
    }
}
