//! State management module
//! 
//! This module contains the timer state machine and the shared application state.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Direction};
pub use timer_state::{Countdown, Mode, Phase, TickOutcome, TimerState};
