//! Pomodoro Server - A state-managed HTTP server running a Pomodoro timer
//! 
//! This library provides the focus/break timer state machine, the background
//! ticker that drives it, the alarm that marks each switch and the HTTP API
//! used by external controls.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Mode, TickOutcome, TimerState};
pub use api::create_router;
pub use utils::{format_clock, shutdown_signal};
