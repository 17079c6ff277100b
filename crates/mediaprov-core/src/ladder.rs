//! Encoding ladder builder
//!
//! Maps a validated selector to a transform recipe. Every built-in preset
//! currently routes to the same reference ladder; the preset name only
//! selects the encoding branch.

use std::time::Duration;

use crate::models::{
    AacAudio, AacAudioProfile, Codec, EntropyMode, Format, H264Layer, H264Video, InsightsType,
    OnErrorType, Preset, Priority, StandardEncoderPreset, StretchMode, TransformOutput,
    VideoAnalyzerPreset,
};
use crate::presets::EncoderNamedPreset;
use crate::validation::{SupportedLanguage, TransformSelector};

pub const ENCODING_DESCRIPTION: &str = "A simple custom encoding transform with 2 MP4 bitrates";
pub const ANALYSIS_DESCRIPTION: &str = "Video analyzer transform";
pub const MP4_FILENAME_PATTERN: &str = "Video-{Basename}-{Label}-{Bitrate}{Extension}";

const KEY_FRAME_INTERVAL: Duration = Duration::from_secs(2);
const BUFFER_WINDOW: Duration = Duration::from_secs(5);
const REFERENCE_FRAMES: u32 = 3;
const MATCH_SOURCE_FRAME_RATE: &str = "0/1";

/// (bitrate, width, height, label), highest first
const REFERENCE_LAYERS: [(u32, &str, &str, &str); 4] = [
    (1_000_000, "1080", "720", "HD"),
    (750_000, "720", "480", "SD"),
    (500_000, "540", "360", "HD"),
    (200_000, "360", "240", "HD"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSpec {
    pub channels: u32,
    pub sampling_rate_hz: u32,
    pub bitrate: u32,
    pub profile: AacAudioProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingLayer {
    pub bitrate: u32,
    pub max_bitrate: u32,
    pub label: String,
    pub buffer_window: Duration,
    pub width: String,
    pub height: String,
    pub reference_frames: u32,
    pub entropy_mode: EntropyMode,
    pub adaptive_b_frame: bool,
    pub frame_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    pub filename_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingLadder {
    pub audio: AudioSpec,
    pub key_frame_interval: Duration,
    pub stretch_mode: StretchMode,
    pub video_layers: Vec<EncodingLayer>,
    pub output_formats: Vec<FormatTemplate>,
    pub on_error: OnErrorType,
    pub relative_priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRecipe {
    pub audio_language: Option<SupportedLanguage>,
    pub audio_insights_only: bool,
    pub on_error: OnErrorType,
    pub relative_priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformRecipe {
    Encoding(EncodingLadder),
    Analysis(AnalysisRecipe),
}

pub fn build(selector: &TransformSelector) -> TransformRecipe {
    match selector {
        TransformSelector::Preset(preset) => TransformRecipe::Encoding(reference_ladder(*preset)),
        TransformSelector::Analysis {
            audio_insights_only,
            audio_language,
        } => TransformRecipe::Analysis(AnalysisRecipe {
            audio_language: *audio_language,
            audio_insights_only: *audio_insights_only,
            on_error: OnErrorType::StopProcessingJob,
            relative_priority: Priority::Normal,
        }),
    }
}

fn reference_ladder(_preset: EncoderNamedPreset) -> EncodingLadder {
    let video_layers = REFERENCE_LAYERS
        .iter()
        .map(|(bitrate, width, height, label)| EncodingLayer {
            bitrate: *bitrate,
            max_bitrate: *bitrate,
            label: label.to_string(),
            buffer_window: BUFFER_WINDOW,
            width: width.to_string(),
            height: height.to_string(),
            reference_frames: REFERENCE_FRAMES,
            entropy_mode: EntropyMode::Cabac,
            adaptive_b_frame: true,
            frame_rate: MATCH_SOURCE_FRAME_RATE.to_string(),
        })
        .collect();

    EncodingLadder {
        audio: AudioSpec {
            channels: 1,
            sampling_rate_hz: 48_000,
            bitrate: 64_000,
            profile: AacAudioProfile::AacLc,
        },
        key_frame_interval: KEY_FRAME_INTERVAL,
        stretch_mode: StretchMode::None,
        video_layers,
        output_formats: vec![FormatTemplate {
            filename_pattern: MP4_FILENAME_PATTERN.to_string(),
        }],
        on_error: OnErrorType::StopProcessingJob,
        relative_priority: Priority::Normal,
    }
}

impl TransformRecipe {
    pub fn description(&self) -> &'static str {
        match self {
            TransformRecipe::Encoding(_) => ENCODING_DESCRIPTION,
            TransformRecipe::Analysis(_) => ANALYSIS_DESCRIPTION,
        }
    }

    /// Convert into the control-plane output definition.
    pub fn into_output(self) -> TransformOutput {
        match self {
            TransformRecipe::Encoding(ladder) => {
                let layers = ladder
                    .video_layers
                    .into_iter()
                    .map(|layer| H264Layer {
                        bitrate: layer.bitrate,
                        max_bitrate: layer.max_bitrate,
                        label: layer.label,
                        buffer_window: layer.buffer_window,
                        width: layer.width,
                        height: layer.height,
                        reference_frames: layer.reference_frames,
                        entropy_mode: layer.entropy_mode,
                        adaptive_b_frame: layer.adaptive_b_frame,
                        frame_rate: layer.frame_rate,
                    })
                    .collect();

                let codecs = vec![
                    Codec::AacAudio(AacAudio {
                        channels: ladder.audio.channels,
                        sampling_rate: ladder.audio.sampling_rate_hz,
                        bitrate: ladder.audio.bitrate,
                        profile: ladder.audio.profile,
                    }),
                    Codec::H264Video(H264Video {
                        key_frame_interval: ladder.key_frame_interval,
                        stretch_mode: ladder.stretch_mode,
                        layers,
                    }),
                ];

                let formats = ladder
                    .output_formats
                    .into_iter()
                    .map(|f| Format::Mp4 {
                        filename_pattern: f.filename_pattern,
                    })
                    .collect();

                TransformOutput {
                    on_error: ladder.on_error,
                    relative_priority: ladder.relative_priority,
                    preset: Preset::StandardEncoder(StandardEncoderPreset { codecs, formats }),
                }
            }
            TransformRecipe::Analysis(recipe) => TransformOutput {
                on_error: recipe.on_error,
                relative_priority: recipe.relative_priority,
                preset: Preset::VideoAnalyzer(VideoAnalyzerPreset {
                    audio_language: recipe.audio_language.map(|l| l.as_tag().to_string()),
                    insights_to_extract: if recipe.audio_insights_only {
                        InsightsType::AudioInsightsOnly
                    } else {
                        InsightsType::AllInsights
                    },
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoding(preset: EncoderNamedPreset) -> EncodingLadder {
        match build(&TransformSelector::Preset(preset)) {
            TransformRecipe::Encoding(ladder) => ladder,
            other => panic!("expected encoding recipe, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_ladder_shape() {
        let ladder = encoding(EncoderNamedPreset::AdaptiveStreaming);
        let bitrates: Vec<u32> = ladder.video_layers.iter().map(|l| l.bitrate).collect();
        assert_eq!(bitrates, vec![1_000_000, 750_000, 500_000, 200_000]);
        let labels: Vec<&str> = ladder.video_layers.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["HD", "SD", "HD", "HD"]);
        assert!(ladder.video_layers.iter().all(|l| l.max_bitrate == l.bitrate));
        assert_eq!(ladder.output_formats.len(), 1);
        assert_eq!(ladder.output_formats[0].filename_pattern, MP4_FILENAME_PATTERN);
        assert_eq!(ladder.audio.channels, 1);
        assert_eq!(ladder.on_error, OnErrorType::StopProcessingJob);
    }

    #[test]
    fn test_build_is_deterministic_across_presets() {
        let first = encoding(EncoderNamedPreset::AdaptiveStreaming);
        for preset in EncoderNamedPreset::ALL {
            assert_eq!(encoding(preset), first);
        }
    }

    #[test]
    fn test_encoding_output_wire_shape() {
        let recipe = build(&TransformSelector::Preset(EncoderNamedPreset::H264MultipleBitrate720p));
        assert_eq!(recipe.description(), ENCODING_DESCRIPTION);
        let value = serde_json::to_value(recipe.into_output()).unwrap();

        assert_eq!(value["onError"], "StopProcessingJob");
        assert_eq!(value["relativePriority"], "Normal");
        assert_eq!(
            value["preset"]["@odata.type"],
            "#Microsoft.Media.StandardEncoderPreset"
        );
        let codecs = value["preset"]["codecs"].as_array().unwrap();
        assert_eq!(codecs.len(), 2);
        assert_eq!(
            codecs
                .iter()
                .filter(|c| c["@odata.type"] == "#Microsoft.Media.AacAudio")
                .count(),
            1
        );
        assert_eq!(
            value["preset"]["codecs"][0],
            json!({
                "@odata.type": "#Microsoft.Media.AacAudio",
                "channels": 1,
                "samplingRate": 48000,
                "bitrate": 64000,
                "profile": "AacLc"
            })
        );
        let video = &value["preset"]["codecs"][1];
        assert_eq!(video["@odata.type"], "#Microsoft.Media.H264Video");
        assert_eq!(video["keyFrameInterval"], "PT2S");
        assert_eq!(video["stretchMode"], "None");
        assert_eq!(video["layers"].as_array().unwrap().len(), 4);
        assert_eq!(video["layers"][1]["width"], "720");
        assert_eq!(video["layers"][1]["entropyMode"], "Cabac");
        assert_eq!(video["layers"][1]["frameRate"], "0/1");
        assert_eq!(
            value["preset"]["formats"],
            json!([{
                "@odata.type": "#Microsoft.Media.Mp4Format",
                "filenamePattern": "Video-{Basename}-{Label}-{Bitrate}{Extension}"
            }])
        );
    }

    #[test]
    fn test_analysis_output_wire_shape() {
        let recipe = build(&TransformSelector::Analysis {
            audio_insights_only: true,
            audio_language: Some(SupportedLanguage::FrFr),
        });
        assert_eq!(recipe.description(), ANALYSIS_DESCRIPTION);
        let value = serde_json::to_value(recipe.into_output()).unwrap();
        assert_eq!(
            value["preset"],
            json!({
                "@odata.type": "#Microsoft.Media.VideoAnalyzerPreset",
                "audioLanguage": "fr-FR",
                "insightsToExtract": "AudioInsightsOnly"
            })
        );
    }

    #[test]
    fn test_encoding_output_deserializes_back() {
        let output = build(&TransformSelector::Preset(EncoderNamedPreset::AdaptiveStreaming))
            .into_output();
        let json = serde_json::to_string(&output).unwrap();
        let parsed: TransformOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, output);
    }
}
