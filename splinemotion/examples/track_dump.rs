use glam::Vec3;
use serde_json::json;
use splinemotion::json::TrackDocument;
use splinemotion::{
    ClipInput, MovementEvent, MovementTrack, PathContainer, PolylinePath, SplineNavigator,
    SubjectTransform, TimelineClock, TrackBinding,
};
use std::path::PathBuf;

/// Plays the clips of a track document back to back and prints one JSON line per frame.
///
/// Usage: `track_dump <track.json> [fps] [--length N] [--scrub]`
///
/// Path 0 runs along +Z and path 1 along +X, both `--length` units long, so documents with
/// `switchPath` entries have something to switch to.
fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut length = 10.0f32;
    let mut scrub = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--length" => {
                length = args
                    .get(i + 1)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(length);
                i += 2;
            }
            "--scrub" => {
                scrub = true;
                i += 1;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let json_path = positional
        .first()
        .map(PathBuf::from)
        .expect("usage: track_dump <track.json> [fps] [--length N] [--scrub]");
    let fps: f64 = positional
        .get(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or(30.0);

    let json = std::fs::read_to_string(&json_path).expect("read json");
    let doc = TrackDocument::from_json_str(&json).expect("parse json");

    let mut paths = PathContainer::from_points(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, length)])
        .expect("path 0");
    paths.push(PolylinePath::new(vec![Vec3::ZERO, Vec3::new(length, 0.0, 0.0)]).expect("path 1"));

    let mut navigator = SplineNavigator::new(doc.navigator.clone());
    let mut subject = SubjectTransform::default();
    let mut clock = TimelineClock::new(0.0, !scrub);
    let mut track = MovementTrack::new(doc.track.clone(), doc.mixer);
    track.set_listener(|event: &MovementEvent| {
        println!("{}", json!({ "event": format!("{event:?}") }));
    });
    track.play();

    let starts: Vec<f64> = doc
        .track
        .clips
        .iter()
        .scan(0.0, |start, clip| {
            let this = *start;
            *start += clip.duration.max(0.0);
            Some(this)
        })
        .collect();
    let total: f64 = doc.track.clips.iter().map(|c| c.duration.max(0.0)).sum();
    let frames = (total * fps).ceil() as usize;

    for frame in 0..=frames {
        let time = (frame as f64 / fps).min(total);
        clock.set_time(time);

        let last = doc.track.clips.len().saturating_sub(1);
        let inputs: Vec<ClipInput> = doc
            .track
            .clips
            .iter()
            .zip(&starts)
            .enumerate()
            .map(|(index, (clip, start))| {
                let local = time - start;
                let inside = local >= 0.0
                    && (local < clip.duration || (index == last && local <= clip.duration));
                ClipInput::new(if inside { 1.0 } else { 0.0 }, local.max(0.0))
            })
            .collect();

        let result = track.evaluate(
            &inputs,
            &clock,
            Some(TrackBinding::new(&paths, &mut navigator, &mut subject)),
        );
        let forward = subject.forward();
        println!(
            "{}",
            json!({
                "time": time,
                "progress": result.progress,
                "speed": result.speed,
                "source": format!("{:?}", result.source),
                "path": navigator.path_index(),
                "position": subject.position.to_array(),
                "forward": forward.to_array(),
            })
        );
    }
}
