/// Timeline time source supplied by the host.
pub trait HostClock {
    /// Current timeline time in seconds.
    fn time(&self) -> f64;

    /// Whether the timeline is advancing in real time, as opposed to being scrubbed or seeked.
    fn is_playing(&self) -> bool;

    fn elapsed_real_seconds(&self, since: f64) -> f64 {
        self.time() - since
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlaybackMode {
    /// Real-time forward playback: smooth turning, speed integrated against elapsed time.
    Playing,
    /// Arbitrary time jumps: orientation snaps, speed readout forced to zero.
    Scrubbing,
}

impl PlaybackMode {
    pub fn from_clock<C: HostClock + ?Sized>(clock: &C) -> Self {
        if clock.is_playing() {
            Self::Playing
        } else {
            Self::Scrubbing
        }
    }
}

/// Minimal [`HostClock`] for hosts that drive time themselves.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TimelineClock {
    time: f64,
    playing: bool,
}

impl TimelineClock {
    pub fn new(time: f64, playing: bool) -> Self {
        Self { time, playing }
    }

    pub fn playing() -> Self {
        Self::new(0.0, true)
    }

    pub fn scrubbing() -> Self {
        Self::new(0.0, false)
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn advance(&mut self, delta: f64) {
        self.time += delta;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }
}

impl HostClock for TimelineClock {
    fn time(&self) -> f64 {
        self.time
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
