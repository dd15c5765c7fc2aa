use super::chain::propagate;
use super::clip::clamp01;
use crate::{
    ActivationChange, ActiveClipSample, BlendResult, ClipActivation, ClipData, ClipSpan, Error,
    FrameInfo, HostClock, Mixer, MixerConfig, MovementTrackData, Orientation, PathEvaluator,
    PathId, PlaybackMode, SplineNavigator, Subject,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Host feed for one clip on one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ClipInput {
    pub weight: f32,
    /// Seconds since the clip start. May jump backward while scrubbing.
    pub local_time: f64,
}

impl ClipInput {
    pub fn new(weight: f32, local_time: f64) -> Self {
        Self { weight, local_time }
    }
}

/// What the track drives on a tick. A missing binding freezes the track.
pub struct TrackBinding<'a, P: ?Sized, S: ?Sized> {
    pub paths: &'a P,
    pub navigator: &'a mut SplineNavigator,
    pub subject: &'a mut S,
}

impl<'a, P: ?Sized, S: ?Sized> TrackBinding<'a, P, S> {
    pub fn new(paths: &'a P, navigator: &'a mut SplineNavigator, subject: &'a mut S) -> Self {
        Self {
            paths,
            navigator,
            subject,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MovementEvent {
    ClipActivated {
        clip: usize,
        generation: u32,
    },
    ClipDeactivated {
        clip: usize,
    },
    PathSwitched {
        clip: usize,
        from: PathId,
        to: PathId,
    },
    /// The requested path does not exist; the navigator stays on its current path.
    PathSwitchRejected {
        clip: usize,
        requested: PathId,
        available: usize,
    },
}

pub trait MovementTrackListener {
    fn on_event(&mut self, event: &MovementEvent);
}

impl<F: FnMut(&MovementEvent)> MovementTrackListener for F {
    fn on_event(&mut self, event: &MovementEvent) {
        self(event)
    }
}

/// Runtime state of one movement track: chained clip spans, per-clip activation and the mixer.
pub struct MovementTrack {
    data: Arc<MovementTrackData>,
    config: MixerConfig,
    spans: Vec<ClipSpan>,
    activations: Vec<ClipActivation>,
    mixer: Mixer,
    samples: Vec<ActiveClipSample>,
    event_queue: VecDeque<MovementEvent>,
    listener: Option<Box<dyn MovementTrackListener>>,
}

impl MovementTrack {
    pub fn new(data: Arc<MovementTrackData>, config: MixerConfig) -> Self {
        let clip_count = data.clips.len();
        let mut track = Self {
            data,
            config,
            spans: Vec::with_capacity(clip_count),
            activations: vec![ClipActivation::default(); clip_count],
            mixer: Mixer::new(),
            samples: Vec::with_capacity(clip_count),
            event_queue: VecDeque::new(),
            listener: None,
        };
        track.rebuild_spans();
        track
    }

    pub fn data(&self) -> &MovementTrackData {
        &self.data
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Changing the origin takes effect on the next propagation.
    pub fn config_mut(&mut self) -> &mut MixerConfig {
        &mut self.config
    }

    pub fn spans(&self) -> &[ClipSpan] {
        &self.spans
    }

    pub fn activation(&self, clip: usize) -> Option<&ClipActivation> {
        self.activations.get(clip)
    }

    pub fn last_result(&self) -> Option<BlendResult> {
        self.mixer.last_result()
    }

    pub fn set_listener<L: MovementTrackListener + 'static>(&mut self, listener: L) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Playback (re)start: re-chains the clips and starts every clip's activation afresh.
    pub fn play(&mut self) {
        self.rebuild_spans();
        for activation in &mut self.activations {
            activation.reset();
        }
        self.mixer.reset();
        self.event_queue.clear();
        log::debug!(
            "movement track '{}' started with {} clips",
            self.data.name,
            self.spans.len()
        );
    }

    fn rebuild_spans(&mut self) {
        self.spans.clear();
        self.spans.extend(
            self.data
                .clips
                .iter()
                .enumerate()
                .map(|(index, clip)| ClipSpan::new(index, clip)),
        );
        propagate(&mut self.spans, self.config.origin);
    }

    fn check_clip_index(&self, index: usize, count: usize) -> Result<(), Error> {
        if index >= count {
            return Err(Error::InvalidClipIndex { index, count });
        }
        Ok(())
    }

    pub fn set_clip_end(&mut self, clip: usize, end_param: f32) -> Result<(), Error> {
        self.check_clip_index(clip, self.data.clips.len())?;
        if !end_param.is_finite() {
            return Err(Error::InvalidValue {
                message: "clip end must be finite".to_string(),
            });
        }
        Arc::make_mut(&mut self.data).clips[clip].end_param = end_param;
        self.rebuild_spans();
        Ok(())
    }

    /// `None` goes back to chaining from the previous clip.
    pub fn set_clip_start(&mut self, clip: usize, start_param: Option<f32>) -> Result<(), Error> {
        self.check_clip_index(clip, self.data.clips.len())?;
        if start_param.is_some_and(|start| !start.is_finite()) {
            return Err(Error::InvalidValue {
                message: "clip start must be finite".to_string(),
            });
        }
        Arc::make_mut(&mut self.data).clips[clip].start_param = start_param;
        self.rebuild_spans();
        Ok(())
    }

    pub fn insert_clip(&mut self, index: usize, clip: ClipData) -> Result<(), Error> {
        self.check_clip_index(index, self.data.clips.len() + 1)?;
        clip.validate()?;
        Arc::make_mut(&mut self.data).clips.insert(index, clip);
        self.activations.insert(index, ClipActivation::default());
        self.rebuild_spans();
        Ok(())
    }

    pub fn remove_clip(&mut self, index: usize) -> Result<ClipData, Error> {
        self.check_clip_index(index, self.data.clips.len())?;
        let clip = Arc::make_mut(&mut self.data).clips.remove(index);
        self.activations.remove(index);
        self.rebuild_spans();
        Ok(clip)
    }

    pub fn move_clip(&mut self, from: usize, to: usize) -> Result<(), Error> {
        let count = self.data.clips.len();
        self.check_clip_index(from, count)?;
        self.check_clip_index(to, count)?;
        if from != to {
            let clips = &mut Arc::make_mut(&mut self.data).clips;
            let clip = clips.remove(from);
            clips.insert(to, clip);
            let activation = self.activations.remove(from);
            self.activations.insert(to, activation);
            self.rebuild_spans();
        }
        Ok(())
    }

    /// One tick: `inputs[i]` feeds clip `i`; missing entries count as weight 0.
    ///
    /// Without a binding, or with a navigator that cannot bind to its path, nothing is mutated
    /// and the previous result is returned.
    pub fn evaluate<P, S, C>(
        &mut self,
        inputs: &[ClipInput],
        clock: &C,
        binding: Option<TrackBinding<'_, P, S>>,
    ) -> BlendResult
    where
        P: PathEvaluator + ?Sized,
        S: Subject + ?Sized,
        C: HostClock + ?Sized,
    {
        let Some(TrackBinding {
            paths,
            navigator,
            subject,
        }) = binding
        else {
            return self.held_result();
        };
        let needs_bind = !navigator.is_bound() || navigator.path_index() >= paths.path_count();
        if needs_bind && navigator.bind(paths).is_err() {
            return self.held_result();
        }

        let time = clock.time();
        let elapsed = clock.elapsed_real_seconds(navigator.state().previous_sample_time);
        let mode = PlaybackMode::from_clock(clock);

        let data = Arc::clone(&self.data);
        self.samples.clear();
        for (index, span) in self.spans.iter().enumerate() {
            let input = inputs.get(index).copied().unwrap_or_default();
            let weight = clamp01(input.weight);
            let activation = &mut self.activations[index];

            match activation.step(weight) {
                ActivationChange::Activated => {
                    self.event_queue.push_back(MovementEvent::ClipActivated {
                        clip: index,
                        generation: activation.generation(),
                    })
                }
                ActivationChange::Deactivated => self
                    .event_queue
                    .push_back(MovementEvent::ClipDeactivated { clip: index }),
                ActivationChange::Unchanged => {}
            }
            if weight <= 0.0 {
                continue;
            }

            let clip = &data.clips[span.clip_index];
            if let Some(requested) = clip.switch_path {
                if activation.take_path_switch(input.local_time, self.config.switch_epsilon) {
                    let from = navigator.path_index();
                    match navigator.set_path_index(paths, requested) {
                        Ok(()) => self.event_queue.push_back(MovementEvent::PathSwitched {
                            clip: index,
                            from,
                            to: requested,
                        }),
                        Err(e) => {
                            log::warn!("clip '{}' path switch rejected: {e}", clip.name);
                            self.event_queue
                                .push_back(MovementEvent::PathSwitchRejected {
                                    clip: index,
                                    requested,
                                    available: paths.path_count(),
                                });
                        }
                    }
                }
            }

            self.samples
                .push(span.sample(clip, input.local_time, weight));
        }

        let frame = FrameInfo {
            mode,
            elapsed,
            previous_progress: navigator.progress(),
            path_length: navigator.path_length(),
        };
        let result = self.mixer.resolve(&self.samples, &frame);

        // No active clip: the subject keeps its last placement.
        if result.active > 0 {
            let orientation = Orientation::for_mode(mode, elapsed);
            if let Err(e) = navigator.apply_progress(paths, subject, result.progress, orientation)
            {
                log::warn!("movement track '{}': {e}", data.name);
            }
            if result.drive_speed {
                navigator.apply_speed_display(subject, result.speed);
            }
        }
        navigator.record_sample(time);

        self.drain_events();
        result
    }

    fn held_result(&self) -> BlendResult {
        self.mixer
            .last_result()
            .unwrap_or_else(|| BlendResult::held(self.config.origin))
    }

    fn drain_events(&mut self) {
        let Some(mut listener) = self.listener.take() else {
            self.event_queue.clear();
            return;
        };
        while let Some(event) = self.event_queue.pop_front() {
            listener.on_event(&event);
        }
        if self.listener.is_none() {
            self.listener = Some(listener);
        }
    }
}
