use crate::Error;

/// Interpolation from one curve key to the next.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Curve {
    Linear,
    Stepped,
    /// Control points are in absolute (time, value) space, between the two keys.
    Bezier {
        cx1: f32,
        cy1: f32,
        cx2: f32,
        cy2: f32,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
    pub curve: Curve,
}

/// Authored mapping from normalized clip time to a raw factor.
///
/// Keys must be sorted by time. The range is not restricted: a progress curve may overshoot
/// `[0, 1]`, the resolved progress is clamped later.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseCurve {
    pub keys: Vec<CurveKey>,
}

impl ResponseCurve {
    pub fn linear(from: f32, to: f32) -> Self {
        Self {
            keys: vec![
                CurveKey {
                    time: 0.0,
                    value: from,
                    curve: Curve::Linear,
                },
                CurveKey {
                    time: 1.0,
                    value: to,
                    curve: Curve::Linear,
                },
            ],
        }
    }

    /// Identity mapping, `t -> t`.
    pub fn identity() -> Self {
        Self::linear(0.0, 1.0)
    }

    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey {
                time: 0.0,
                value,
                curve: Curve::Stepped,
            }],
        }
    }

    pub fn validate(&self, context: &str) -> Result<(), Error> {
        let mut last = f32::NEG_INFINITY;
        for key in &self.keys {
            if !key.time.is_finite() || !key.value.is_finite() {
                return Err(Error::InvalidValue {
                    message: format!("{context}: curve keys must be finite"),
                });
            }
            if key.time < last {
                return Err(Error::InvalidValue {
                    message: format!("{context}: curve keys must be sorted by time"),
                });
            }
            last = key.time;
        }
        Ok(())
    }
}

/// Locomotion rate contributed by a clip: `base_speed * curve(t)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedCurve {
    pub base_speed: f32,
    pub curve: ResponseCurve,
}

impl SpeedCurve {
    pub fn constant(base_speed: f32) -> Self {
        Self {
            base_speed,
            curve: ResponseCurve::constant(1.0),
        }
    }
}

/// One authored timeline segment.
///
/// The start of the covered path interval is normally chained from the previous clip's
/// `end_param` when the track starts playing or is edited; `start_param` pins it instead.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipData {
    pub name: String,
    pub duration: f64,
    /// Overrides the chained start, e.g. for a clip that enters a new path at its beginning.
    pub start_param: Option<f32>,
    pub end_param: f32,
    /// Places the subject: `lerp(start, end, curve(t))`. `None` makes a speed-only clip.
    pub progress: Option<ResponseCurve>,
    pub speed: Option<SpeedCurve>,
    /// Path to follow from the first frame of this clip on.
    pub switch_path: Option<usize>,
    /// Whether this clip feeds the speed readout parameter.
    pub drive_speed: bool,
}

impl ClipData {
    pub fn new(name: impl Into<String>, duration: f64, end_param: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            start_param: None,
            end_param,
            progress: Some(ResponseCurve::identity()),
            speed: None,
            switch_path: None,
            drive_speed: true,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.duration.is_nan() {
            return Err(Error::InvalidValue {
                message: format!("clip '{}': duration must not be NaN", self.name),
            });
        }
        if !self.end_param.is_finite() {
            return Err(Error::InvalidValue {
                message: format!("clip '{}': end must be finite", self.name),
            });
        }
        if self.start_param.is_some_and(|start| !start.is_finite()) {
            return Err(Error::InvalidValue {
                message: format!("clip '{}': start must be finite", self.name),
            });
        }
        if let Some(curve) = self.progress.as_ref() {
            curve.validate(&format!("clip '{}' progress", self.name))?;
        }
        if let Some(speed) = self.speed.as_ref() {
            if !speed.base_speed.is_finite() {
                return Err(Error::InvalidValue {
                    message: format!("clip '{}': base speed must be finite", self.name),
                });
            }
            speed
                .curve
                .validate(&format!("clip '{}' speed", self.name))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovementTrackData {
    pub name: String,
    /// Clips in timeline order.
    pub clips: Vec<ClipData>,
}

impl MovementTrackData {
    pub fn new(name: impl Into<String>, clips: Vec<ClipData>) -> Self {
        Self {
            name: name.into(),
            clips,
        }
    }

    pub fn clip(&self, name: &str) -> Option<(usize, &ClipData)> {
        self.clips.iter().enumerate().find(|(_, c)| c.name == name)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.clips.iter().try_for_each(ClipData::validate)
    }
}
