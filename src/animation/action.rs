use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binder::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Repeat,
    PingPong,
}

/// A scheduled linear ramp, advanced on unscaled mixer time.
///
/// Used both for weight fades and time-scale warps during crossfades.
#[derive(Debug, Clone, Copy)]
struct Ramp {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Ramp {
    fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    /// Advances and reports whether the ramp just finished.
    fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }
}

/// Playback state for one clip.
///
/// Actions stay registered with the mixer for the whole session; enabling,
/// weights and fades decide what actually contributes to a frame.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    /// Base weight; the effective weight also folds in a running fade.
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,
    pub(crate) track_cursors: Vec<KeyframeCursor>,

    fade: Option<Ramp>,
    warp: Option<Ramp>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Repeat,
            paused: false,
            enabled: true,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
            fade: None,
            warp: None,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Weight actually applied when blending this frame.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        match &self.fade {
            Some(fade) => self.weight * fade.value(),
            None => self.weight,
        }
    }

    /// Time scale actually applied when advancing this frame.
    #[must_use]
    pub fn effective_time_scale(&self) -> f32 {
        match &self.warp {
            Some(warp) => warp.value(),
            None => self.time_scale,
        }
    }

    /// Sets the time scale directly, cancelling any running warp.
    pub fn set_effective_time_scale(&mut self, time_scale: f32) {
        self.warp = None;
        self.time_scale = time_scale;
    }

    /// Sets the base weight directly, cancelling any running fade.
    pub fn set_effective_weight(&mut self, weight: f32) {
        self.fade = None;
        self.weight = weight;
    }

    /// Ramps the contribution of this action up to full weight.
    ///
    /// Starts from the current effective level, so a fade scheduled mid-fade
    /// continues from the blended value instead of jumping.
    pub fn fade_in(&mut self, duration: f32) {
        let from = if self.enabled { self.effective_weight() } else { 0.0 };
        self.enabled = true;
        self.weight = 1.0;
        self.fade = Some(Ramp::new(from, 1.0, duration));
    }

    /// Ramps the contribution of this action down to zero; the action is
    /// disabled once the ramp completes.
    pub fn fade_out(&mut self, duration: f32) {
        let from = self.effective_weight();
        self.weight = 1.0;
        self.fade = Some(Ramp::new(from, 0.0, duration));
    }

    /// Ramps the time scale from `start` to `end` over `duration`, leaving
    /// the time scale at `end` afterwards.
    pub fn warp(&mut self, start: f32, end: f32, duration: f32) {
        self.warp = Some(Ramp::new(start, end, duration));
    }

    /// Advances fades, warps and playback time by one mixer step.
    ///
    /// `dt` is unscaled wall time; the clip time moves by
    /// `dt * effective_time_scale`.
    pub fn advance(&mut self, dt: f32) {
        if let Some(warp) = &mut self.warp
            && warp.advance(dt)
        {
            self.time_scale = warp.to;
            self.warp = None;
        }

        if let Some(fade) = &mut self.fade
            && fade.advance(dt)
        {
            let faded_out = fade.to <= 0.0;
            self.fade = None;
            if faded_out {
                self.enabled = false;
            }
        }

        if self.paused || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.effective_time_scale();

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Repeat => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                let double = duration * 2.0;
                let mut t = self.time % double;
                if t < 0.0 {
                    t += double;
                }
                if t > duration {
                    t = double - t;
                }
                self.time = t;
            }
        }
    }

    /// Samples one track at the current playback time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        Some(match &track.data {
            TrackData::Vector3(t) => TrackValue::Vector3(t.sample_with_cursor(self.time, cursor)),
            TrackData::Quaternion(t) => {
                TrackValue::Quaternion(t.sample_with_cursor(self.time, cursor))
            }
        })
    }

    /// Whether a fade is currently running.
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }
}

pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
