//! Audible alarm played when an interval runs out

use std::future::Future;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::state::Mode;

/// Something that can announce the start of the next interval
pub trait Alarm: Send + Sync {
    /// Ring for a switch into `next`
    fn ring(&self, next: Mode) -> impl Future<Output = Result<(), String>> + Send;
}

/// Alarm that runs a user-supplied shell command
#[derive(Debug, Clone, Default)]
pub struct CommandAlarm {
    command: Option<String>,
}

impl CommandAlarm {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    /// The command that will actually run, if any. Blank and `#`-prefixed commands are disabled.
    pub fn active_command(&self) -> Option<&str> {
        self.command
            .as_deref()
            .map(str::trim)
            .filter(|command| !command.is_empty() && !command.starts_with('#'))
    }
}

impl Alarm for CommandAlarm {
    async fn ring(&self, next: Mode) -> Result<(), String> {
        let Some(command) = self.active_command() else {
            info!("Alarm: {} time", next.as_str());
            return Ok(());
        };

        debug!("Running alarm command: {}", command);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .env("POMODORO_MODE", next.as_str())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| format!("Failed to spawn alarm command: {}", e))?;

        // Reap the child without holding up the ticker
        let command = command.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!("Alarm command finished"),
                Ok(status) => warn!("Alarm command `{}` exited with {}", command, status),
                Err(e) => warn!("Failed to wait for alarm command `{}`: {}", command, e),
            }
        });

        Ok(())
    }
}
