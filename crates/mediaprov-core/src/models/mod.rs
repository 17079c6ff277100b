//! Data models for the application
//!
//! Control-plane wire types, request/response bodies and the account scope.

mod asset;
mod requests;
mod scope;
pub mod transform;

pub use asset::*;
pub use requests::*;
pub use scope::*;
pub use transform::{
    AacAudio, AacAudioProfile, BuiltInStandardEncoderPreset, Codec, EntropyMode, Format,
    H264Layer, H264Video, InsightsType, OnErrorType, Preset, Priority, StandardEncoderPreset,
    StretchMode, Transform, TransformCreateBody, TransformCreateProperties, TransformOutput,
    TransformProperties, TransformRef, VideoAnalyzerPreset,
};
