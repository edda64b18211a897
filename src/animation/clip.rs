use glam::{Quat, Vec3};

use crate::animation::tracks::KeyframeTrack;

/// Node property a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(t) => t.end_time(),
            TrackData::Quaternion(t) => t.end_time(),
        }
    }
}

/// A single animation channel: keyframe data plus the name of the node it
/// animates and which property it drives.
#[derive(Debug, Clone)]
pub struct Track {
    pub target_node: String,
    pub path: TargetPath,
    pub data: TrackData,
}

/// A named, loopable set of tracks. Immutable after creation; playback state
/// lives in [`AnimationAction`](crate::animation::AnimationAction).
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Builds a clip, deriving its duration from the longest track.
    #[must_use]
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            tracks,
        }
    }
}
