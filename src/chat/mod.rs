//! The contract between the plugin and whatever chat platform hosts it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod console_host;

pub use console_host::ConsoleChatHost;

/// One historical chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub from: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(from: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            message: message.into(),
        }
    }
}

/// An incoming message as handed over by the host. `logs` is ordered the way
/// the host wants it scanned, usually most recent first.
#[derive(Debug, Clone, Default)]
pub struct ChatMessage {
    /// Raw command text with the bot trigger already stripped.
    pub command: Option<String>,
    pub logs: Vec<LogEntry>,
    /// Channel the message was sent to.
    pub to: String,
}

impl ChatMessage {
    pub fn command(text: impl Into<String>) -> Self {
        Self {
            command: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_logs(mut self, logs: Vec<LogEntry>) -> Self {
        self.logs = logs;
        self
    }

    pub fn in_channel(mut self, channel: impl Into<String>) -> Self {
        self.to = channel.into();
        self
    }
}

#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Reply in the originating channel, addressed to the command's sender.
    async fn respond_with_mention(&self, text: &str);

    /// Mark the command as claimed so no other plugin answers it.
    fn handling(&self);

    /// Verbose diagnostic log, never shown in the channel.
    fn vlog(&self, text: &str);
}
