//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;
use tracing::warn;

use crate::state::{
    timer_state::{BREAK_FLOOR, BREAK_ROOF, FOCUS_FLOOR, FOCUS_ROOF},
    TimerState,
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "pomodoro-server")]
#[command(about = "A state-managed HTTP server running a Pomodoro focus/break timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Focus interval length in minutes (5-60)
    #[arg(short, long, default_value = "25")]
    pub focus: u64,

    /// Break interval length in minutes (1-15)
    #[arg(short = 'b', long = "break", default_value = "5")]
    pub break_minutes: u64,

    /// Seconds added or removed by each increase/decrease request
    #[arg(short, long, default_value = "60")]
    pub step: u64,

    /// Shell command run when an interval ends; $POMODORO_MODE holds the next mode
    #[arg(long)]
    pub alarm_command: Option<String>,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", hide = true)]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Period between ticks, never zero
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Build the initial timer, warning about lengths outside the allowed range
    pub fn initial_timer(&self) -> TimerState {
        let focus_secs = self.focus.saturating_mul(60);
        let break_secs = self.break_minutes.saturating_mul(60);

        if !(FOCUS_FLOOR..=FOCUS_ROOF).contains(&focus_secs) {
            warn!("Focus length {}min out of range, clamping to {}-{}min",
                  self.focus, FOCUS_FLOOR / 60, FOCUS_ROOF / 60);
        }
        if !(BREAK_FLOOR..=BREAK_ROOF).contains(&break_secs) {
            warn!("Break length {}min out of range, clamping to {}-{}min",
                  self.break_minutes, BREAK_FLOOR / 60, BREAK_ROOF / 60);
        }

        TimerState::with_durations(focus_secs, break_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["pomodoro-server"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.step, 60);
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.initial_timer(), TimerState::new());
    }

    #[test]
    fn lengths_are_clamped_into_range() {
        let config = Config::try_parse_from(["pomodoro-server", "--focus", "90", "-b", "0", "-v"]).unwrap();
        let timer = config.initial_timer();
        assert_eq!(timer.focus.max, FOCUS_ROOF);
        assert_eq!(timer.break_.max, BREAK_FLOOR);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn alarm_command_and_tick_period() {
        let config = Config::try_parse_from([
            "pomodoro-server", "--alarm-command", "paplay bell.wav", "--tick-ms", "0",
        ]).unwrap();
        assert_eq!(config.alarm_command.as_deref(), Some("paplay bell.wav"));
        assert_eq!(config.tick_period(), Duration::from_millis(1));
    }
}
