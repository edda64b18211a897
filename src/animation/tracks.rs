use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// Keyframe lookups are usually a tiny step past the previous one, so each
/// sampler remembers its last interval and scans forward a few slots before
/// giving up and binary-searching.
const MAX_SCAN_OFFSET: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// A typed keyframe track: sorted sample times plus values.
///
/// For `CubicSpline` the values array stores `in_tangent, value, out_tangent`
/// triplets per keyframe, as in glTF.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// End time of the track (0 when empty).
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples without cursor state (cold path, used by tests and one-off
    /// lookups).
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        let mut cursor = KeyframeCursor::default();
        self.sample_with_cursor(time, &mut cursor)
    }

    /// Samples with a cursor that caches the last keyframe interval.
    ///
    /// Sequential playback hits the short forward scan; loop resets and
    /// scrubbing fall back to a binary search. Sampling outside the keyframe
    /// range clamps to the first/last value.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> T {
        let len = self.times.len();
        assert!(len > 0, "keyframe track has no keyframes");

        if len == 1 {
            return *self.value_at(0);
        }

        // Cursor may be stale if the track changed under it
        let start = cursor.last_index.min(len - 1);
        let found = if time >= self.times[start] {
            let mut found = None;
            for idx in start..(start + MAX_SCAN_OFFSET + 1).min(len) {
                if idx + 1 >= len {
                    if time >= self.times[len - 1] {
                        found = Some(len - 1);
                    }
                    break;
                }
                if time < self.times[idx + 1] {
                    found = Some(idx);
                    break;
                }
            }
            found
        } else {
            None
        };

        let index = found.unwrap_or_else(|| {
            // partition_point yields the first keyframe strictly after `time`
            let next = self.times.partition_point(|&t| t <= time);
            next.saturating_sub(1)
        });
        cursor.last_index = index;

        self.sample_interval(index, time)
    }

    /// Value accessor that hides the cubic-spline triplet layout.
    fn value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    fn sample_interval(&self, index: usize, time: f32) -> T {
        let len = self.times.len();
        if index >= len - 1 {
            return *self.value_at(len - 1);
        }

        let next = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next];
        let dt = t1 - t0;
        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => *self.value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(*self.value_at(index), *self.value_at(next), t)
            }
            InterpolationMode::CubicSpline => {
                let i0 = index * 3;
                let i1 = next * 3;
                T::interpolate_cubic(
                    self.values[i0 + 1],
                    self.values[i0 + 2],
                    self.values[i1],
                    self.values[i1 + 1],
                    t,
                    dt,
                )
            }
        }
    }
}
