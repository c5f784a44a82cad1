//! Main application state management

use std::{sync::Mutex, time::Instant};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

use super::{Mode, TickOutcome, TimerState};
use crate::utils::format_uptime;

/// Direction of a single step adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

/// Main application state that owns the one timer
#[derive(Debug)]
pub struct AppState {
    /// The timer itself
    pub timer: Mutex<TimerState>,
    /// Seconds added or removed by one increase/decrease step
    pub step_seconds: u64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create a new AppState around an initial timer
    pub fn new(port: u16, host: String, timer: TimerState, step_seconds: u64) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(timer.clone());

        Self {
            timer: Mutex::new(timer),
            step_seconds,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a transition under the lock and publish the resulting snapshot
    fn update_timer<F, R>(&self, updater: F) -> Result<(TimerState, R), String>
    where
        F: FnOnce(&mut TimerState) -> R,
    {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let result = updater(&mut timer);
        let snapshot = timer.clone();
        drop(timer); // Release the lock early

        // send_replace never fails, even with no receivers
        self.timer_update_tx.send_replace(snapshot.clone());

        Ok((snapshot, result))
    }

    /// Apply a user-triggered transition and record it as the last action
    fn user_action<F>(&self, action: &str, updater: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut TimerState),
    {
        let (snapshot, ()) = self.update_timer(updater)?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    pub fn start(&self) -> Result<TimerState, String> {
        let timer = self.user_action("start", TimerState::start)?;
        info!("Timer started in {} mode", timer.mode.as_str());
        Ok(timer)
    }

    pub fn pause(&self) -> Result<TimerState, String> {
        let timer = self.user_action("pause", TimerState::pause)?;
        info!("Timer paused with {}s of {} left", timer.active().left, timer.mode.as_str());
        Ok(timer)
    }

    /// Start when paused, pause when running
    pub fn toggle(&self) -> Result<TimerState, String> {
        let timer = self.user_action("toggle", TimerState::toggle)?;
        info!("Timer toggled, running={}", timer.running);
        Ok(timer)
    }

    pub fn stop(&self) -> Result<TimerState, String> {
        let timer = self.user_action("stop", TimerState::stop)?;
        info!("Timer stopped and reset to focus");
        Ok(timer)
    }

    /// Change a mode's length by `delta` seconds
    pub fn change_max(&self, mode: Mode, delta: i64) -> Result<TimerState, String> {
        let action = format!("change-{}", mode.as_str());
        let timer = self.user_action(&action, |timer| timer.change_max(mode, delta))?;
        let countdown = timer.countdown(mode);
        if countdown.max == countdown.floor || countdown.max == countdown.roof {
            debug!("{} length pinned at bound {}s", mode.as_str(), countdown.max);
        }
        info!("{} length changed by {}s to {}s", mode.as_str(), delta, countdown.max);
        Ok(timer)
    }

    /// Change a mode's length by one configured step
    pub fn step_max(&self, mode: Mode, direction: Direction) -> Result<TimerState, String> {
        let step = i64::try_from(self.step_seconds).unwrap_or(i64::MAX);
        let delta = match direction {
            Direction::Increase => step,
            Direction::Decrease => -step,
        };
        self.change_max(mode, delta)
    }

    /// Advance the timer by one tick
    pub fn tick(&self) -> Result<TickOutcome, String> {
        let (timer, outcome) = self.update_timer(TimerState::tick)?;
        match outcome {
            TickOutcome::Idle => debug!("Tick ignored, timer not running"),
            TickOutcome::Counted { remaining } => {
                debug!("{} remaining: {}s", timer.mode.as_str(), remaining)
            }
            TickOutcome::Switched { to } => {
                info!("Interval finished, switching to {} for {}s", to.as_str(), timer.active().max)
            }
        }
        Ok(outcome)
    }

    /// Get current timer state
    pub fn snapshot(&self) -> Result<TimerState, String> {
        self.timer.lock()
            .map(|timer| timer.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    pub fn is_running(&self) -> Result<bool, String> {
        self.snapshot().map(|timer| timer.running)
    }

    /// Watch every published timer snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
