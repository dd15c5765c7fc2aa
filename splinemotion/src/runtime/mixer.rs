use super::clip::clamp01;
use super::navigator::derived_speed;
use crate::{ActiveClipSample, PlaybackMode};

/// Inputs of one mixer tick that do not come from the clips themselves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameInfo {
    pub mode: PlaybackMode,
    /// Timeline seconds since the previous sample. Zero or negative on pauses and backward seeks.
    pub elapsed: f64,
    /// Progress resolved on the previous tick.
    pub previous_progress: f32,
    /// Cached length of the path being followed.
    pub path_length: f32,
}

/// Where the resolved progress came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProgressSource {
    /// Placed by the highest-weighted progress clip.
    Clip(usize),
    /// Integrated from the blended speed; no progress clip was active.
    Integrated,
    /// Previous progress kept.
    Held,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlendResult {
    pub progress: f32,
    /// Speed readout. Exactly 0 while scrubbing or when no time elapsed.
    pub speed: f32,
    pub source: ProgressSource,
    /// Number of samples with non-zero weight.
    pub active: usize,
    /// Whether any active clip feeds the speed readout.
    pub drive_speed: bool,
}

impl BlendResult {
    pub fn held(progress: f32) -> Self {
        Self {
            progress: clamp01(progress),
            speed: 0.0,
            source: ProgressSource::Held,
            active: 0,
            drive_speed: false,
        }
    }
}

/// Combines the weighted clip samples of one tick into one progress/speed pair.
///
/// Position is leader-take-all: the progress clip with the highest weight wins outright, later
/// samples winning ties. Speed is the weight-normalized average of every active speed clip.
#[derive(Clone, Debug, Default)]
pub struct Mixer {
    last: Option<BlendResult>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_result(&self) -> Option<BlendResult> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn resolve(&mut self, samples: &[ActiveClipSample], frame: &FrameInfo) -> BlendResult {
        let mut leader: Option<(f32, usize, f32)> = None;
        let mut speed_sum = 0.0f32;
        let mut speed_weight = 0.0f32;
        let mut active = 0usize;
        let mut drive_speed = false;

        for sample in samples.iter().filter(|s| s.is_active()) {
            let weight = sample.weight;
            active += 1;
            drive_speed |= sample.drive_speed;

            if let Some(speed) = sample.speed {
                speed_sum += speed * weight;
                speed_weight += weight;
            }
            if let Some(progress) = sample.progress {
                if leader.is_none_or(|(best, _, _)| weight >= best) {
                    leader = Some((weight, sample.clip_index, progress));
                }
            }
        }

        let blended_speed = (speed_weight > 0.0).then(|| speed_sum / speed_weight);
        let previous = clamp01(frame.previous_progress);

        let (progress, source, locomotion_speed) = match leader {
            Some((_, clip_index, progress)) => {
                let progress = clamp01(progress);
                let speed = blended_speed.unwrap_or_else(|| {
                    derived_speed(progress - previous, frame.path_length, frame.elapsed)
                });
                (progress, ProgressSource::Clip(clip_index), speed)
            }
            None => match blended_speed {
                Some(speed)
                    if frame.mode == PlaybackMode::Playing
                        && frame.elapsed > 0.0
                        && frame.path_length > 0.0
                        && speed.is_finite() =>
                {
                    let delta = speed * frame.elapsed as f32 / frame.path_length;
                    (
                        clamp01(previous + delta),
                        ProgressSource::Integrated,
                        speed,
                    )
                }
                Some(speed) => (previous, ProgressSource::Held, speed),
                None => (previous, ProgressSource::Held, 0.0),
            },
        };

        let scrubbing = frame.mode == PlaybackMode::Scrubbing || !(frame.elapsed > 0.0);
        let speed = if scrubbing || !locomotion_speed.is_finite() {
            0.0
        } else {
            locomotion_speed
        };

        let result = BlendResult {
            progress,
            speed,
            source,
            active,
            drive_speed,
        };
        log::trace!("mixer resolved {result:?} from {} samples", samples.len());
        self.last = Some(result);
        result
    }
}
