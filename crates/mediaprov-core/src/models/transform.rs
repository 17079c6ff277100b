//! Transform resource wire types
//!
//! These mirror the control-plane JSON for transforms. Presets, codecs,
//! layers and formats are polymorphic and carry their concrete type in the
//! `@odata.type` discriminator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A transform as returned by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: TransformProperties,
}

/// Identity of an existing transform.
///
/// Existence checks only need the resource id, so the outputs are left
/// unparsed. A transform created elsewhere may use presets or layer fields
/// this crate never submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRef {
    pub id: String,
    pub name: String,
}

impl From<&Transform> for TransformRef {
    fn from(transform: &Transform) -> Self {
        Self {
            id: transform.id.clone(),
            name: transform.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub outputs: Vec<TransformOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Body of a create-or-update request.
#[derive(Debug, Clone, Serialize)]
pub struct TransformCreateBody<'a> {
    pub properties: TransformCreateProperties<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformCreateProperties<'a> {
    pub description: &'a str,
    pub outputs: &'a [TransformOutput],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    #[serde(default)]
    pub on_error: OnErrorType,
    #[serde(default)]
    pub relative_priority: Priority,
    pub preset: Preset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnErrorType {
    #[default]
    StopProcessingJob,
    ContinueJob,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum Preset {
    #[serde(rename = "#Microsoft.Media.StandardEncoderPreset")]
    StandardEncoder(StandardEncoderPreset),
    #[serde(rename = "#Microsoft.Media.BuiltInStandardEncoderPreset")]
    BuiltInStandardEncoder(BuiltInStandardEncoderPreset),
    #[serde(rename = "#Microsoft.Media.VideoAnalyzerPreset")]
    VideoAnalyzer(VideoAnalyzerPreset),
    /// Any preset type this service never creates.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardEncoderPreset {
    pub codecs: Vec<Codec>,
    pub formats: Vec<Format>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltInStandardEncoderPreset {
    pub preset_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalyzerPreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_language: Option<String>,
    pub insights_to_extract: InsightsType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightsType {
    AudioInsightsOnly,
    VideoInsightsOnly,
    AllInsights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum Codec {
    #[serde(rename = "#Microsoft.Media.AacAudio")]
    AacAudio(AacAudio),
    #[serde(rename = "#Microsoft.Media.H264Video")]
    H264Video(H264Video),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AacAudio {
    pub channels: u32,
    pub sampling_rate: u32,
    pub bitrate: u32,
    pub profile: AacAudioProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AacAudioProfile {
    AacLc,
    HeAacV1,
    HeAacV2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H264Video {
    #[serde(with = "iso_duration")]
    pub key_frame_interval: Duration,
    pub stretch_mode: StretchMode,
    pub layers: Vec<H264Layer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StretchMode {
    None,
    AutoSize,
    AutoFit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@odata.type", rename = "#Microsoft.Media.H264Layer")]
#[serde(rename_all = "camelCase")]
pub struct H264Layer {
    pub bitrate: u32,
    pub max_bitrate: u32,
    pub label: String,
    #[serde(with = "iso_duration")]
    pub buffer_window: Duration,
    pub width: String,
    pub height: String,
    pub reference_frames: u32,
    pub entropy_mode: EntropyMode,
    pub adaptive_b_frame: bool,
    pub frame_rate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntropyMode {
    Cabac,
    Cavlc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum Format {
    #[serde(rename = "#Microsoft.Media.Mp4Format", rename_all = "camelCase")]
    Mp4 { filename_pattern: String },
    #[serde(rename = "#Microsoft.Media.PngFormat", rename_all = "camelCase")]
    Png { filename_pattern: String },
    #[serde(other)]
    Other,
}

/// ISO-8601 durations in the `PT{h}H{m}M{s}S` subset used by the control plane.
pub mod iso_duration {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn format(duration: &Duration) -> String {
        let total = duration.as_secs();
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
        let millis = duration.subsec_millis();

        let mut out = String::from("PT");
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if millis > 0 {
            out.push_str(&format!("{}.{:03}S", seconds, millis));
        } else if seconds > 0 || out == "PT" {
            out.push_str(&format!("{}S", seconds));
        }
        out
    }

    pub fn parse(value: &str) -> Option<Duration> {
        let rest = value.strip_prefix("PT")?;
        if rest.is_empty() {
            return None;
        }

        let mut total = 0f64;
        let mut number = String::new();
        for c in rest.chars() {
            match c {
                '0'..='9' | '.' => number.push(c),
                'H' | 'M' | 'S' => {
                    let n: f64 = number.parse().ok()?;
                    number.clear();
                    total += match c {
                        'H' => n * 3600.0,
                        'M' => n * 60.0,
                        _ => n,
                    };
                }
                _ => return None,
            }
        }
        if !number.is_empty() {
            return None;
        }
        Duration::try_from_secs_f64(total).ok()
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 duration: {}", raw)))
    }
}
