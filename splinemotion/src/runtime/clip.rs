use crate::ClipData;

/// Clamps to `[0, 1]`, mapping NaN to 0.
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

pub(crate) fn lerp(from: f32, to: f32, alpha: f32) -> f32 {
    from + (to - from) * alpha
}

/// `clamp01(local_time / duration)`; a non-positive duration or a NaN local time yields 0.
pub fn normalized_time(local_time: f64, duration: f64) -> f32 {
    if !(duration > 0.0) || local_time.is_nan() {
        return 0.0;
    }
    clamp01((local_time / duration) as f32)
}

/// Runtime view of one clip on the track.
///
/// `start_param` is owned by the chain propagation pass; everything else is copied from the
/// authored [`ClipData`] at `clip_index`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipSpan {
    pub clip_index: usize,
    pub start_param: f32,
    /// Authored start that replaces the chained one, clamped to `[0, 1]`.
    pub start_override: Option<f32>,
    pub end_param: f32,
    pub duration: f64,
}

impl ClipSpan {
    pub fn new(clip_index: usize, clip: &ClipData) -> Self {
        Self {
            clip_index,
            start_param: 0.0,
            start_override: clip.start_param.map(clamp01),
            end_param: clamp01(clip.end_param),
            duration: clip.duration,
        }
    }

    pub fn normalized_time(&self, local_time: f64) -> f32 {
        normalized_time(local_time, self.duration)
    }

    /// Evaluates the clip at its own local time. Pure: no clip or track state changes.
    pub fn sample(&self, clip: &ClipData, local_time: f64, weight: f32) -> ActiveClipSample {
        let t = self.normalized_time(local_time);
        let progress = clip
            .progress
            .as_ref()
            .map(|curve| lerp(self.start_param, self.end_param, curve.evaluate(t)));
        let speed = clip
            .speed
            .as_ref()
            .map(|speed| speed.base_speed * speed.curve.evaluate(t));

        ActiveClipSample {
            clip_index: self.clip_index,
            weight,
            local_normalized_time: t,
            progress,
            speed,
            drive_speed: clip.drive_speed,
        }
    }
}

/// Per-frame evaluation of one weighted clip. Never stored across frames.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActiveClipSample {
    pub clip_index: usize,
    pub weight: f32,
    pub local_normalized_time: f32,
    /// Unclamped `lerp(start, end, curve(t))`, when the clip places the subject.
    pub progress: Option<f32>,
    pub speed: Option<f32>,
    pub drive_speed: bool,
}

impl ActiveClipSample {
    pub fn is_active(&self) -> bool {
        self.weight > 0.0
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ActivationPhase {
    #[default]
    Inactive,
    /// First frame with non-zero weight.
    JustActivated,
    Active,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActivationChange {
    Unchanged,
    Activated,
    Deactivated,
}

/// Activation state machine of one clip, driven by its per-tick weight.
///
/// Every transition out of `Inactive` starts a new generation. The path switch latch remembers
/// the generation it fired in, so scrubbing back and forth over the clip start never fires twice
/// within one activation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipActivation {
    phase: ActivationPhase,
    generation: u32,
    switched_generation: Option<u32>,
}

impl ClipActivation {
    pub fn phase(&self) -> ActivationPhase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn step(&mut self, weight: f32) -> ActivationChange {
        let weighted = weight > 0.0;
        match (self.phase, weighted) {
            (ActivationPhase::Inactive, true) => {
                self.generation = self.generation.wrapping_add(1);
                self.phase = ActivationPhase::JustActivated;
                ActivationChange::Activated
            }
            (ActivationPhase::JustActivated, true) => {
                self.phase = ActivationPhase::Active;
                ActivationChange::Unchanged
            }
            (ActivationPhase::Active, true) | (ActivationPhase::Inactive, false) => {
                ActivationChange::Unchanged
            }
            (_, false) => {
                self.phase = ActivationPhase::Inactive;
                ActivationChange::Deactivated
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = ActivationPhase::Inactive;
        self.switched_generation = None;
    }

    /// True at most once per activation: on the first active frame whose local time is below
    /// `epsilon`.
    pub fn take_path_switch(&mut self, local_time: f64, epsilon: f64) -> bool {
        if self.phase == ActivationPhase::Inactive || !(local_time < epsilon) {
            return false;
        }
        if self.switched_generation == Some(self.generation) {
            return false;
        }
        self.switched_generation = Some(self.generation);
        true
    }
}
