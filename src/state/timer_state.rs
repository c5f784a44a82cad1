//! Timer state structure and the focus/break state machine

use serde::{Deserialize, Serialize};

/// Default focus length in seconds (25 minutes)
pub const FOCUS_DEFAULT: u64 = 25 * 60;
/// Shortest allowed focus length (5 minutes)
pub const FOCUS_FLOOR: u64 = 5 * 60;
/// Longest allowed focus length (60 minutes)
pub const FOCUS_ROOF: u64 = 60 * 60;

/// Default break length in seconds (5 minutes)
pub const BREAK_DEFAULT: u64 = 5 * 60;
/// Shortest allowed break length (1 minute)
pub const BREAK_FLOOR: u64 = 60;
/// Longest allowed break length (15 minutes)
pub const BREAK_ROOF: u64 = 15 * 60;

/// Which interval the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Break => "break",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }

    /// Parse a mode from its path segment
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "focus" => Some(Mode::Focus),
            "break" => Some(Mode::Break),
            _ => None,
        }
    }
}

/// Coarse view of the timer used by controls and responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    RunningFocus,
    RunningBreak,
}

/// What a single tick did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is not running; nothing changed
    Idle,
    /// The active counter went down by one
    Counted { remaining: u64 },
    /// The active counter was exhausted and the mode flipped. This is the alarm event.
    Switched { to: Mode },
}

/// Duration bounds and remaining time for one mode, all in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub max: u64,
    pub left: u64,
    pub floor: u64,
    pub roof: u64,
}

impl Countdown {
    /// Create a full countdown. `max` is pulled into `[floor, roof]`.
    pub fn new(max: u64, floor: u64, roof: u64) -> Self {
        let max = max.max(floor).min(roof);
        Self { max, left: max, floor, roof }
    }

    /// Refill the remaining time
    pub fn reset(&mut self) {
        self.left = self.max;
    }

    /// Move `max` by `delta` within the bounds and refill
    pub fn change_max(&mut self, delta: i64) {
        let proposed = self.max.saturating_add_signed(delta);
        self.max = if delta < 0 {
            proposed.max(self.floor)
        } else {
            proposed.min(self.roof)
        };
        self.left = self.max;
    }

    pub fn remaining_ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.left as f64 / self.max as f64
        }
    }
}

/// The whole Pomodoro timer: both countdowns plus run flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub focus: Countdown,
    #[serde(rename = "break")]
    pub break_: Countdown,
    pub running: bool,
    pub mode: Mode,
    pub session_started: bool,
}

impl TimerState {
    /// Create an idle timer with default lengths
    pub fn new() -> Self {
        Self::with_durations(FOCUS_DEFAULT, BREAK_DEFAULT)
    }

    /// Create an idle timer with the given lengths, clamped to the default bounds
    pub fn with_durations(focus_secs: u64, break_secs: u64) -> Self {
        Self {
            focus: Countdown::new(focus_secs, FOCUS_FLOOR, FOCUS_ROOF),
            break_: Countdown::new(break_secs, BREAK_FLOOR, BREAK_ROOF),
            running: false,
            mode: Mode::Focus,
            session_started: false,
        }
    }

    pub fn is_focus(&self) -> bool {
        self.mode == Mode::Focus
    }

    pub fn phase(&self) -> Phase {
        match (self.running, self.mode) {
            (false, _) => Phase::Idle,
            (true, Mode::Focus) => Phase::RunningFocus,
            (true, Mode::Break) => Phase::RunningBreak,
        }
    }

    pub fn countdown(&self, mode: Mode) -> &Countdown {
        match mode {
            Mode::Focus => &self.focus,
            Mode::Break => &self.break_,
        }
    }

    fn countdown_mut(&mut self, mode: Mode) -> &mut Countdown {
        match mode {
            Mode::Focus => &mut self.focus,
            Mode::Break => &mut self.break_,
        }
    }

    /// Countdown of the mode currently in effect
    pub fn active(&self) -> &Countdown {
        self.countdown(self.mode)
    }

    pub fn start(&mut self) {
        self.running = true;
        self.session_started = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Play/pause button: flips the run flag and marks the session started
    pub fn toggle(&mut self) {
        self.running = !self.running;
        self.session_started = true;
    }

    /// Halt and rewind to a fresh focus interval
    pub fn stop(&mut self) {
        self.running = false;
        self.session_started = false;
        self.focus.reset();
        self.break_.reset();
        self.mode = Mode::Focus;
    }

    /// Advance one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let mode = self.mode;
        let countdown = self.countdown_mut(mode);
        if countdown.left == 0 {
            self.switch_mode();
            TickOutcome::Switched { to: self.mode }
        } else {
            countdown.left -= 1;
            TickOutcome::Counted { remaining: countdown.left }
        }
    }

    /// Refill both countdowns and flip between focus and break
    pub fn switch_mode(&mut self) {
        self.focus.reset();
        self.break_.reset();
        self.mode = self.mode.other();
    }

    /// Adjust a mode's length. Remaining time is refilled even mid-session.
    pub fn change_max(&mut self, mode: Mode, delta: i64) {
        self.countdown_mut(mode).change_max(delta);
    }

    /// Remaining share of the active interval, from 1.0 (full) down to 0.0
    pub fn remaining_ratio(&self) -> f64 {
        self.active().remaining_ratio()
    }

    /// Elapsed share of the active interval as a whole percent
    pub fn progress_percent(&self) -> u8 {
        ((1.0 - self.remaining_ratio()) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
