use super::clip::clamp01;
use crate::{Error, NavigatorConfig, PathEvaluator, PathId, PlaybackMode, Subject, UpVector};
use glam::{Mat3, Quat, Vec3};

const MIN_TANGENT_LENGTH_SQUARED: f32 = 1.0e-4;

/// Per-frame history of the locomotion target. Written once per tick, by the navigator only.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LocomotionState {
    pub progress: f32,
    pub previous_progress: f32,
    pub previous_sample_time: f64,
}

/// How the facing rotation follows the path on a given update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Orientation {
    /// Jump straight to the path direction.
    Snap,
    /// Turn toward the path direction at the configured turn speed for `elapsed` seconds.
    Smooth { elapsed: f64 },
}

impl Orientation {
    pub fn for_mode(mode: PlaybackMode, elapsed: f64) -> Self {
        match mode {
            PlaybackMode::Playing => Self::Smooth { elapsed },
            PlaybackMode::Scrubbing => Self::Snap,
        }
    }
}

/// Locomotion target: keeps the subject on one path of a [`PathEvaluator`] at a normalized
/// progress and reports a locomotion rate.
#[derive(Clone, Debug)]
pub struct SplineNavigator {
    config: NavigatorConfig,
    path_index: PathId,
    path_length: f32,
    bound: bool,
    state: LocomotionState,
    speed: f32,
}

impl SplineNavigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            path_index: 0,
            path_length: 0.0,
            bound: false,
            state: LocomotionState::default(),
            speed: 0.0,
        }
    }

    pub fn with_path_index(mut self, path_index: PathId) -> Self {
        self.path_index = path_index;
        self.bound = false;
        self
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut NavigatorConfig {
        &mut self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn progress(&self) -> f32 {
        self.state.progress
    }

    pub fn path_index(&self) -> PathId {
        self.path_index
    }

    /// Cached world length of the current path.
    pub fn path_length(&self) -> f32 {
        self.path_length
    }

    /// Last value written to the speed readout.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Validates the current path index against `paths` and caches the path length.
    pub fn bind<P: PathEvaluator + ?Sized>(&mut self, paths: &P) -> Result<(), Error> {
        let count = paths.path_count();
        if self.path_index >= count {
            self.bound = false;
            log::warn!(
                "navigator path index {} is out of range ({count} paths)",
                self.path_index
            );
            return Err(Error::InvalidPathIndex {
                index: self.path_index,
                count,
            });
        }
        self.path_length = finite_or_zero(paths.length(self.path_index)).max(0.0);
        self.bound = true;
        Ok(())
    }

    /// Switches to another path. An out-of-range index is rejected and the current path kept.
    pub fn set_path_index<P: PathEvaluator + ?Sized>(
        &mut self,
        paths: &P,
        path_index: PathId,
    ) -> Result<(), Error> {
        let count = paths.path_count();
        if path_index >= count {
            return Err(Error::InvalidPathIndex {
                index: path_index,
                count,
            });
        }
        self.path_index = path_index;
        self.bind(paths)
    }

    /// Moves the subject to `progress` (clamped to `[0, 1]`) and orients it along the path.
    pub fn apply_progress<P, S>(
        &mut self,
        paths: &P,
        subject: &mut S,
        progress: f32,
        orientation: Orientation,
    ) -> Result<(), Error>
    where
        P: PathEvaluator + ?Sized,
        S: Subject + ?Sized,
    {
        if !self.bound || self.path_index >= paths.path_count() {
            return Err(Error::UnboundPath);
        }

        let progress = clamp01(progress);
        self.state.progress = progress;

        let position = paths.position(self.path_index, progress);
        if self.config.orient_to_path {
            let tangent = paths.tangent(self.path_index, progress);
            let up = match self.config.up {
                UpVector::Fixed(up) => up,
                UpVector::Path => paths.up_vector(self.path_index, progress),
            };
            if tangent.length_squared() > MIN_TANGENT_LENGTH_SQUARED {
                if let Some(target) = look_rotation(tangent, up) {
                    let rotation = match orientation {
                        Orientation::Snap => target,
                        Orientation::Smooth { elapsed } => {
                            let max_degrees = self.config.turn_speed * elapsed.max(0.0) as f32;
                            rotate_towards(subject.world_rotation(), target, max_degrees)
                        }
                    };
                    subject.set_world_rotation(rotation);
                }
            }
        }
        subject.set_world_position(position);
        Ok(())
    }

    /// Integrates `speed` (world units per second) over `elapsed` seconds along the path.
    ///
    /// Returns the new progress. Non-positive elapsed time or a zero-length path leaves the
    /// progress unchanged.
    pub fn advance<P, S>(
        &mut self,
        paths: &P,
        subject: &mut S,
        speed: f32,
        elapsed: f64,
        orientation: Orientation,
    ) -> Result<f32, Error>
    where
        P: PathEvaluator + ?Sized,
        S: Subject + ?Sized,
    {
        if !self.bound {
            return Err(Error::UnboundPath);
        }
        if !(elapsed > 0.0) || self.path_length <= 0.0 || !speed.is_finite() {
            return Ok(self.state.progress);
        }
        let delta = speed * elapsed as f32 / self.path_length;
        let progress = clamp01(self.state.progress + delta);
        self.apply_progress(paths, subject, progress, orientation)?;
        Ok(progress)
    }

    pub fn apply_speed_display<S: Subject + ?Sized>(&mut self, subject: &mut S, speed: f32) {
        let speed = finite_or_zero(speed);
        self.speed = speed;
        if let Some(name) = self.config.speed_parameter.as_deref() {
            subject.set_named_float_parameter(name, speed);
        }
    }

    /// World-space rate implied by a progress change: `delta * length / elapsed`.
    pub fn derived_speed(&self, delta_progress: f32, elapsed: f64) -> f32 {
        derived_speed(delta_progress, self.path_length, elapsed)
    }

    pub fn record_sample(&mut self, time: f64) {
        self.state.previous_progress = self.state.progress;
        self.state.previous_sample_time = time;
    }

    /// Forgets the sampling history, keeping the current progress.
    pub fn reset_history(&mut self, time: f64) {
        self.record_sample(time);
        self.speed = 0.0;
    }
}

pub(crate) fn derived_speed(delta_progress: f32, path_length: f32, elapsed: f64) -> f32 {
    if !(elapsed > 0.0) {
        return 0.0;
    }
    finite_or_zero(delta_progress * path_length / elapsed as f32)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// Rotation whose +Z axis points along `forward` and whose +Y axis leans toward `up`.
pub(crate) fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let right = up.cross(forward).try_normalize()?;
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Rotates `from` toward `to` by at most `max_degrees`.
pub(crate) fn rotate_towards(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= 1.0e-6 {
        return to;
    }
    let step = max_degrees.max(0.0).to_radians();
    if step >= angle {
        return to;
    }
    from.slerp(to, step / angle).normalize()
}
