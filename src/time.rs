//! Local time resolution for effectors.
//!
//! An effector normally follows the host's playback clock. A timeline host
//! can take over through [`TimeControl`], after which the effector uses
//! whatever time the timeline last pushed until it lets go again.

use web_time::Instant;

/// Host playback clock.
pub trait PlaybackClock {
    /// Whether playback is currently running.
    fn is_running(&self) -> bool;

    /// Seconds since playback started.
    fn time(&self) -> f32;
}

/// A clock that is never running (editor, not in play mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct StoppedClock;

impl PlaybackClock for StoppedClock {
    fn is_running(&self) -> bool {
        false
    }

    fn time(&self) -> f32 {
        0.0
    }
}

/// Wall-clock playback timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock {
    started: Option<Instant>,
}

impl WallClock {
    /// Stopped clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that starts running immediately.
    #[must_use]
    pub fn running() -> Self {
        Self {
            started: Some(Instant::now()),
        }
    }

    /// Begin (or restart) playback from zero.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// End playback. [`PlaybackClock::time`] reads zero afterwards.
    pub fn stop(&mut self) {
        self.started = None;
    }
}

impl PlaybackClock for WallClock {
    fn is_running(&self) -> bool {
        self.started.is_some()
    }

    fn time(&self) -> f32 {
        self.started
            .map_or(0.0, |start| start.elapsed().as_secs_f32())
    }
}

/// Hooks a timeline host uses to drive an object's time.
pub trait TimeControl {
    /// The timeline has taken ownership of time.
    fn on_control_time_start(&mut self);

    /// The timeline has released time.
    fn on_control_time_stop(&mut self);

    /// Time in seconds to use until the next call or until released.
    fn set_time(&mut self, time: f64);
}

/// Where an effector's local time comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeMode {
    /// Follow the host playback clock.
    #[default]
    Internal,
    /// Pinned by a timeline host.
    External(f32),
}

impl TimeMode {
    /// Resolve against `clock`: the external value if pinned, else the
    /// clock's time while it runs, else zero.
    #[must_use]
    pub fn resolve(self, clock: &dyn PlaybackClock) -> f32 {
        match self {
            Self::External(t) => t,
            Self::Internal if clock.is_running() => clock.time(),
            Self::Internal => 0.0,
        }
    }

    /// True while a timeline host has pinned the time.
    #[must_use]
    pub fn is_external(self) -> bool {
        matches!(self, Self::External(_))
    }
}
