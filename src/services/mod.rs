//! External side effects module
//! 
//! This module contains the pieces that reach outside the process, like the alarm.

pub mod alarm;

// Re-export main types
pub use alarm::{Alarm, CommandAlarm};
