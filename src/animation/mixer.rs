use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::action::{AnimationAction, LoopMode, TrackValue};
use crate::animation::binder::PropertyBinding;
use crate::animation::clip::{AnimationClip, TargetPath};
use crate::scene::{NodeHandle, Scene};

/// Length of the weight blend between two animation states, in seconds.
pub const CROSSFADE_SECONDS: f32 = 0.25;

/// Advances and blends the actions registered for one character.
///
/// Exactly one action is the "current" animation state; transitions happen
/// only through [`crossfade_to`](AnimationMixer::crossfade_to). During a fade
/// two actions contribute and their samples are combined by effective weight
/// (lerp for vectors, slerp for rotations, progressively accumulated).
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    index: FxHashMap<String, usize>,
    current: Option<usize>,

    // Per-frame blend accumulator, reused across frames
    accum: FxHashMap<(NodeHandle, TargetPath), f32>,
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            index: FxHashMap::default(),
            current: None,
            accum: FxHashMap::default(),
        }
    }

    /// Registers a clip under its own name. The action starts disabled; use
    /// [`play`](Self::play) or [`crossfade_to`](Self::crossfade_to) to make
    /// it contribute.
    pub fn add_clip(&mut self, clip: Arc<AnimationClip>, bindings: Vec<PropertyBinding>) {
        let name = clip.name.clone();
        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;
        action.enabled = false;

        let slot = self.actions.len();
        self.actions.push(action);
        self.index.insert(name, slot);
    }

    #[must_use]
    pub fn has_clip(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Starts a clip at full weight with no transition.
    pub fn play(&mut self, name: &str) -> bool {
        let Some(&slot) = self.index.get(name) else {
            return false;
        };
        let action = &mut self.actions[slot];
        action.enabled = true;
        action.paused = false;
        action.loop_mode = LoopMode::Repeat;
        action.set_effective_weight(1.0);
        action.set_effective_time_scale(1.0);
        self.current = Some(slot);
        true
    }

    /// Name of the current animation state, if any.
    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.current.map(|slot| self.actions[slot].clip().name.as_str())
    }

    /// Read access to an action by clip name.
    #[must_use]
    pub fn action(&self, name: &str) -> Option<&AnimationAction> {
        self.index.get(name).map(|&slot| &self.actions[slot])
    }

    /// Blends from the current animation state to `name` over `duration`
    /// seconds.
    ///
    /// A no-op when `name` is already current. With `warp`, the timelines of
    /// both clips are proportionally stretched towards each other during the
    /// blend so cycle phases stay aligned. Invoking a crossfade while another
    /// is in flight starts the new blend from the current blended weights.
    /// Returns `false` when no clip of that name is registered.
    pub fn crossfade_to(&mut self, name: &str, duration: f32, warp: bool) -> bool {
        let Some(&next) = self.index.get(name) else {
            return false;
        };
        if self.current == Some(next) {
            return true;
        }

        {
            let action = &mut self.actions[next];
            action.set_effective_time_scale(1.0);
            action.loop_mode = LoopMode::Repeat;
            action.paused = false;
        }

        if let Some(prev) = self.current {
            let dur_out = self.actions[prev].clip().duration;
            let dur_in = self.actions[next].clip().duration;

            self.actions[prev].fade_out(duration);
            self.actions[next].fade_in(duration);

            if warp && dur_out > 0.0 && dur_in > 0.0 {
                self.actions[prev].warp(1.0, dur_out / dur_in, duration);
                self.actions[next].warp(dur_in / dur_out, 1.0, duration);
            }
        } else {
            let action = &mut self.actions[next];
            action.enabled = true;
            action.set_effective_weight(1.0);
        }

        self.current = Some(next);
        true
    }

    /// Advances every action by `dt` and writes the blended pose into the
    /// scene graph.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in &mut self.actions {
            action.advance(dt);
        }

        self.accum.clear();
        for action in &mut self.actions {
            let w = action.effective_weight();
            if action.paused || w <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let binding: PropertyBinding = action.bindings[i].clone();
                let Some(value) = action.sample_track(binding.track_index) else {
                    continue;
                };
                let Some(node) = scene.get_node_mut(binding.node) else {
                    continue;
                };

                let key = (binding.node, binding.path);
                let prior = self.accum.get(&key).copied().unwrap_or(0.0);
                let t = w / (prior + w);

                match (value, binding.path) {
                    (TrackValue::Vector3(v), TargetPath::Translation) => {
                        node.transform.position = if prior <= 0.0 {
                            v
                        } else {
                            node.transform.position.lerp(v, t)
                        };
                    }
                    (TrackValue::Vector3(v), TargetPath::Scale) => {
                        node.transform.scale = if prior <= 0.0 {
                            v
                        } else {
                            node.transform.scale.lerp(v, t)
                        };
                    }
                    (TrackValue::Quaternion(q), TargetPath::Rotation) => {
                        node.transform.rotation = if prior <= 0.0 {
                            q
                        } else {
                            node.transform.rotation.slerp(q, t)
                        };
                    }
                    _ => continue,
                }
                node.transform.mark_dirty();
                self.accum.insert(key, prior + w);
            }
        }
    }
}
