//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{Countdown, Mode, Phase, TimerState},
    utils::format_clock,
};

/// Request body for an arbitrary duration change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationChange {
    /// Seconds to add (negative to remove)
    pub delta: i64,
}

/// One mode's countdown with ready-to-render clock strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownView {
    pub max: u64,
    pub left: u64,
    pub floor: u64,
    pub roof: u64,
    pub max_display: String,
    pub left_display: String,
}

impl From<&Countdown> for CountdownView {
    fn from(countdown: &Countdown) -> Self {
        Self {
            max: countdown.max,
            left: countdown.left,
            floor: countdown.floor,
            roof: countdown.roof,
            max_display: format_clock(countdown.max),
            left_display: format_clock(countdown.left),
        }
    }
}

/// Timer snapshot as seen by controls and progress indicators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub focus: CountdownView,
    #[serde(rename = "break")]
    pub break_: CountdownView,
    pub mode: Mode,
    pub phase: Phase,
    pub running: bool,
    pub session_started: bool,
    /// Remaining time of the active mode as `mm:ss`
    pub display: String,
    pub remaining_ratio: f64,
    pub progress_percent: u8,
}

impl From<&TimerState> for TimerView {
    fn from(timer: &TimerState) -> Self {
        Self {
            focus: CountdownView::from(&timer.focus),
            break_: CountdownView::from(&timer.break_),
            mode: timer.mode,
            phase: timer.phase(),
            running: timer.running,
            session_started: timer.session_started,
            display: format_clock(timer.active().left),
            remaining_ratio: timer.remaining_ratio(),
            progress_percent: timer.progress_percent(),
        }
    }
}

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a response whose status reflects the timer
    pub fn new(message: String, timer: &TimerState) -> Self {
        let status = if timer.running {
            "running"
        } else if timer.session_started {
            "paused"
        } else {
            "idle"
        };

        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: TimerView::from(timer),
        }
    }
}

/// Status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
