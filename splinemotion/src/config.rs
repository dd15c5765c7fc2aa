use crate::Error;
use glam::Vec3;

pub const DEFAULT_TURN_SPEED: f32 = 360.0;
pub const DEFAULT_SPEED_PARAMETER: &str = "speed";
pub const DEFAULT_SWITCH_EPSILON: f64 = 0.01;

/// Settings of the locomotion target.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigatorConfig {
    /// Maximum degrees per second the subject turns toward the path while playing.
    pub turn_speed: f32,
    pub orient_to_path: bool,
    /// Float parameter receiving the speed readout. `None` disables the readout.
    pub speed_parameter: Option<String>,
    pub up: UpVector,
}

/// Up direction used when building the facing rotation from the path tangent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UpVector {
    Fixed(Vec3),
    /// Ask the path for its up vector at the current parameter.
    Path,
}

impl Default for UpVector {
    fn default() -> Self {
        Self::Fixed(Vec3::Y)
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            turn_speed: DEFAULT_TURN_SPEED,
            orient_to_path: true,
            speed_parameter: Some(DEFAULT_SPEED_PARAMETER.to_string()),
            up: UpVector::default(),
        }
    }
}

impl NavigatorConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.turn_speed.is_finite() || self.turn_speed < 0.0 {
            return Err(Error::InvalidValue {
                message: "turn speed must be finite and >= 0".to_string(),
            });
        }
        if let UpVector::Fixed(up) = self.up {
            if !up.is_finite() || up.length_squared() <= f32::EPSILON {
                return Err(Error::InvalidValue {
                    message: "up vector must be finite and non-zero".to_string(),
                });
            }
        }
        if self.speed_parameter.as_deref() == Some("") {
            return Err(Error::InvalidValue {
                message: "speed parameter name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings of the clip chain and mixer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixerConfig {
    /// Start parameter of the first clip.
    pub origin: f32,
    /// A clip whose local time is below this many seconds counts as just started.
    pub switch_epsilon: f64,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            origin: 0.0,
            switch_epsilon: DEFAULT_SWITCH_EPSILON,
        }
    }
}

impl MixerConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.origin) {
            return Err(Error::InvalidValue {
                message: "chain origin must be within [0, 1]".to_string(),
            });
        }
        if !self.switch_epsilon.is_finite() || self.switch_epsilon < 0.0 {
            return Err(Error::InvalidValue {
                message: "switch epsilon must be finite and >= 0".to_string(),
            });
        }
        Ok(())
    }
}
