use super::clip::lerp;
use crate::{Curve, CurveKey, ResponseCurve};

impl ResponseCurve {
    /// Evaluates the curve at normalized time `t`.
    ///
    /// Outside the keyed range the first/last key value is held. An empty curve yields 0.
    pub fn evaluate(&self, t: f32) -> f32 {
        sample_keys(&self.keys, t)
    }
}

pub(crate) fn sample_keys(keys: &[CurveKey], time: f32) -> f32 {
    let Some(first) = keys.first() else {
        return 0.0;
    };
    if time.is_nan() {
        return first.value;
    }

    let index = keys.partition_point(|k| k.time <= time);
    if index == 0 {
        return first.value;
    }
    if index >= keys.len() {
        return keys[keys.len() - 1].value;
    }
    segment_value(&keys[index - 1], &keys[index], time)
}

/// Value between two bracketing keys, shaped by the interpolation of the earlier one.
fn segment_value(from: &CurveKey, to: &CurveKey, time: f32) -> f32 {
    let span = to.time - from.time;
    if span <= 1.0e-12 {
        return to.value;
    }

    match from.curve {
        Curve::Stepped => from.value,
        Curve::Linear => lerp(from.value, to.value, (time - from.time) / span),
        Curve::Bezier { cx1, cy1, cx2, cy2 } => bezier_value(
            time, from.time, from.value, cx1, cy1, cx2, cy2, to.time, to.value,
        ),
    }
}

/// Cubic bezier segment from `(time1, value1)` to `(time2, value2)` with absolute-space handles.
///
/// The handle times are clamped into the segment so the curve stays a function of time; the
/// curve parameter for `time` is then found by bisection.
#[allow(clippy::too_many_arguments)]
fn bezier_value(
    time: f32,
    time1: f32,
    value1: f32,
    cx1: f32,
    cy1: f32,
    cx2: f32,
    cy2: f32,
    time2: f32,
    value2: f32,
) -> f32 {
    const BISECTION_STEPS: usize = 32;

    let (lo, hi) = (time1.min(time2), time1.max(time2));
    let cx1 = cx1.clamp(lo, hi);
    let cx2 = cx2.clamp(lo, hi);
    let time = time.clamp(lo, hi);

    let mut low = 0.0f32;
    let mut high = 1.0f32;
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (low + high);
        if cubic(time1, cx1, cx2, time2, mid) < time {
            low = mid;
        } else {
            high = mid;
        }
    }
    cubic(value1, cy1, cy2, value2, 0.5 * (low + high))
}

fn cubic(p0: f32, p1: f32, p2: f32, p3: f32, u: f32) -> f32 {
    let v = 1.0 - u;
    v * v * v * p0 + 3.0 * v * v * u * p1 + 3.0 * v * u * u * p2 + u * u * u * p3
}
