use super::clip::clamp01;
use crate::ClipSpan;

/// Chains clip start parameters: the first clip starts at `origin`, every later clip starts
/// where the previous one ends. A span with a `start_override` starts there instead, and the
/// chain continues from its end as usual.
///
/// Runs on play and after structural edits, not per frame. An empty slice is a no-op.
pub fn propagate(spans: &mut [ClipSpan], origin: f32) {
    let origin = clamp01(origin);
    let mut running_end = origin;
    for span in spans.iter_mut() {
        span.start_param = span.start_override.unwrap_or(running_end);
        running_end = span.end_param;
    }
    log::debug!(
        "propagated start parameters across {} clips from origin {origin}",
        spans.len()
    );
}
