//! Animation Module
//!
//! Keyframe playback and blending for skinned characters:
//! - [`KeyframeTrack`]: typed keyframe data with cursor-accelerated sampling
//! - [`AnimationClip`]: a named set of tracks addressing nodes by name
//! - [`AnimationAction`]: per-clip playback state (time, weight, loop mode)
//! - [`AnimationMixer`]: blends active actions and runs crossfades

pub mod action;
pub mod binder;
pub mod clip;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode};
pub use binder::{bind_clip, PropertyBinding};
pub use clip::{AnimationClip, TargetPath, Track, TrackData};
pub use mixer::AnimationMixer;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
