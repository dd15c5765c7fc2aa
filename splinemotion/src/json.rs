//! JSON track documents.
//!
//! ```json
//! {
//!   "format": "1.0",
//!   "name": "walk-to-door",
//!   "mixer": { "origin": 0.0, "switchEpsilon": 0.01 },
//!   "navigator": { "turnSpeed": 360, "speedParameter": "speed", "up": [0, 1, 0] },
//!   "clips": [
//!     { "name": "approach", "duration": 2.0, "end": 0.5 },
//!     { "name": "turn", "duration": 1.0, "start": 0.0, "end": 0.2, "switchPath": 1 },
//!     { "name": "stroll", "duration": 4.0, "end": 1.0, "progress": "none",
//!       "speed": { "base": 1.5, "curve": [{ "time": 0, "value": 0 }, { "time": 1, "value": 1 }] } }
//!   ]
//! }
//! ```

use crate::{
    ClipData, Curve, CurveKey, DEFAULT_SPEED_PARAMETER, DEFAULT_SWITCH_EPSILON,
    DEFAULT_TURN_SPEED, Error, MixerConfig, MovementTrackData, NavigatorConfig, ResponseCurve,
    SpeedCurve, TRACK_FORMAT_MAJOR, UpVector,
};
use glam::Vec3;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Root {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mixer: Option<MixerDef>,
    #[serde(default)]
    navigator: Option<NavigatorDef>,
    #[serde(default)]
    clips: Vec<ClipDef>,
}

fn default_switch_epsilon() -> f64 {
    DEFAULT_SWITCH_EPSILON
}

#[derive(Debug, Deserialize)]
struct MixerDef {
    #[serde(default)]
    origin: f32,
    #[serde(default = "default_switch_epsilon", rename = "switchEpsilon")]
    switch_epsilon: f64,
}

fn default_turn_speed() -> f32 {
    DEFAULT_TURN_SPEED
}

fn default_true() -> bool {
    true
}

fn default_speed_parameter() -> serde_json::Value {
    serde_json::Value::String(DEFAULT_SPEED_PARAMETER.to_string())
}

#[derive(Debug, Deserialize)]
struct NavigatorDef {
    #[serde(default = "default_turn_speed", rename = "turnSpeed")]
    turn_speed: f32,
    #[serde(default = "default_true", rename = "orientToPath")]
    orient_to_path: bool,
    /// `null` disables the readout.
    #[serde(default = "default_speed_parameter", rename = "speedParameter")]
    speed_parameter: serde_json::Value,
    #[serde(default)]
    up: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ClipDef {
    name: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    start: Option<f32>,
    #[serde(default = "default_end")]
    end: f32,
    #[serde(default)]
    progress: Option<serde_json::Value>,
    #[serde(default)]
    speed: Option<SpeedDef>,
    #[serde(default, rename = "switchPath")]
    switch_path: Option<usize>,
    #[serde(default = "default_true", rename = "driveSpeed")]
    drive_speed: bool,
}

fn default_end() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct SpeedDef {
    #[serde(default = "default_base_speed")]
    base: f32,
    #[serde(default)]
    curve: Option<serde_json::Value>,
}

fn default_base_speed() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct CurveKeyDef {
    time: f32,
    value: f32,
    #[serde(default)]
    curve: Option<serde_json::Value>,
}

/// Everything a host needs to set up one movement track.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackDocument {
    pub track: Arc<MovementTrackData>,
    pub mixer: MixerConfig,
    pub navigator: NavigatorConfig,
}

impl TrackDocument {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let root: Root = serde_json::from_str(input).map_err(|e| Error::JsonParse {
            message: e.to_string(),
        })?;

        if let Some(format) = root.format.as_deref() {
            validate_format_version(format)?;
        }

        let mixer = match root.mixer {
            Some(def) => MixerConfig {
                origin: def.origin,
                switch_epsilon: def.switch_epsilon,
            },
            None => MixerConfig::default(),
        };
        mixer.validate()?;

        let navigator = match root.navigator {
            Some(def) => parse_navigator(def)?,
            None => NavigatorConfig::default(),
        };
        navigator.validate()?;

        let clips = root
            .clips
            .into_iter()
            .map(parse_clip)
            .collect::<Result<Vec<_>, Error>>()?;
        let track = MovementTrackData::new(root.name, clips);
        track.validate()?;

        Ok(Self {
            track: Arc::new(track),
            mixer,
            navigator,
        })
    }
}

impl MovementTrackData {
    pub fn from_json_str(input: &str) -> Result<Arc<Self>, Error> {
        Ok(TrackDocument::from_json_str(input)?.track)
    }
}

fn parse_navigator(def: NavigatorDef) -> Result<NavigatorConfig, Error> {
    let speed_parameter = match def.speed_parameter {
        serde_json::Value::Null => None,
        serde_json::Value::String(name) => Some(name),
        other => {
            return Err(Error::JsonParse {
                message: format!("navigator.speedParameter must be a string or null, got {other}"),
            });
        }
    };

    let up = match def.up.as_ref() {
        None => UpVector::default(),
        Some(serde_json::Value::String(s)) if s == "path" => UpVector::Path,
        Some(value) => {
            let axis: [f32; 3] =
                serde_json::from_value(value.clone()).map_err(|e| Error::JsonParse {
                    message: format!("navigator.up must be \"path\" or [x, y, z]: {e}"),
                })?;
            UpVector::Fixed(Vec3::from_array(axis))
        }
    };

    Ok(NavigatorConfig {
        turn_speed: def.turn_speed,
        orient_to_path: def.orient_to_path,
        speed_parameter,
        up,
    })
}

fn parse_clip(def: ClipDef) -> Result<ClipData, Error> {
    let progress = match def.progress.as_ref() {
        None => Some(ResponseCurve::identity()),
        Some(serde_json::Value::String(s)) if s == "none" => None,
        Some(value) => Some(parse_curve(
            value,
            &format!("clip '{}' progress", def.name),
        )?),
    };

    let speed = match def.speed {
        None => None,
        Some(speed) => {
            let curve = match speed.curve.as_ref() {
                None => ResponseCurve::constant(1.0),
                Some(value) => parse_curve(value, &format!("clip '{}' speed", def.name))?,
            };
            Some(SpeedCurve {
                base_speed: speed.base,
                curve,
            })
        }
    };

    Ok(ClipData {
        name: def.name,
        duration: def.duration,
        start_param: def.start,
        end_param: def.end,
        progress,
        speed,
        switch_path: def.switch_path,
        drive_speed: def.drive_speed,
    })
}

fn parse_curve(value: &serde_json::Value, context: &str) -> Result<ResponseCurve, Error> {
    if let Some(s) = value.as_str() {
        return match s {
            "linear" => Ok(ResponseCurve::identity()),
            other => Err(Error::JsonInvalidCurve {
                context: context.to_string(),
                message: format!("unknown curve preset '{other}'"),
            }),
        };
    }
    if let Some(constant) = value.as_f64() {
        return Ok(ResponseCurve::constant(constant as f32));
    }

    let defs: Vec<CurveKeyDef> =
        serde_json::from_value(value.clone()).map_err(|e| Error::JsonInvalidCurve {
            context: context.to_string(),
            message: e.to_string(),
        })?;

    let mut keys = Vec::with_capacity(defs.len());
    for (index, def) in defs.into_iter().enumerate() {
        let curve = parse_key_curve(
            def.curve.as_ref(),
            &format!("{context}, key {index}"),
        )?;
        keys.push(CurveKey {
            time: def.time,
            value: def.value,
            curve,
        });
    }
    Ok(ResponseCurve { keys })
}

fn parse_key_curve(value: Option<&serde_json::Value>, context: &str) -> Result<Curve, Error> {
    let Some(value) = value else {
        return Ok(Curve::Linear);
    };

    if let Some(s) = value.as_str() {
        return match s {
            "linear" => Ok(Curve::Linear),
            "stepped" => Ok(Curve::Stepped),
            other => Err(Error::JsonInvalidCurve {
                context: context.to_string(),
                message: format!("unknown interpolation '{other}'"),
            }),
        };
    }

    let Some(arr) = value.as_array() else {
        return Err(Error::JsonInvalidCurve {
            context: context.to_string(),
            message: "expected \"linear\", \"stepped\" or 4 numbers".to_string(),
        });
    };
    if arr.len() != 4 {
        return Err(Error::JsonInvalidCurve {
            context: context.to_string(),
            message: format!("expected 4 numbers, got {}", arr.len()),
        });
    }

    let mut numbers = [0.0f32; 4];
    for (i, item) in arr.iter().enumerate() {
        numbers[i] = item.as_f64().ok_or_else(|| Error::JsonInvalidCurve {
            context: context.to_string(),
            message: format!("curve[{i}] must be a number"),
        })? as f32;
    }
    let [cx1, cy1, cx2, cy2] = numbers;
    Ok(Curve::Bezier { cx1, cy1, cx2, cy2 })
}

fn validate_format_version(value: &str) -> Result<(), Error> {
    let major = value
        .split('.')
        .next()
        .and_then(|major| major.parse::<u32>().ok())
        .ok_or_else(|| Error::JsonFormatVersion {
            value: value.to_string(),
        })?;
    if major != TRACK_FORMAT_MAJOR {
        return Err(Error::JsonFormatVersion {
            value: value.to_string(),
        });
    }
    Ok(())
}
