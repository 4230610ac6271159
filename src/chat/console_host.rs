use super::ChatHost;
use crate::console::console;
use async_trait::async_trait;
use std::sync::Mutex;

/// Chat host for the command line: replies are printed, and kept so the
/// caller can inspect them afterwards.
pub struct ConsoleChatHost {
    nick: String,
    replies: Mutex<Vec<String>>,
}

impl ConsoleChatHost {
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            replies: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies
            .lock()
            .map(|replies| replies.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatHost for ConsoleChatHost {
    async fn respond_with_mention(&self, text: &str) {
        console().reply(&self.nick, text);
        if let Ok(mut replies) = self.replies.lock() {
            replies.push(text.to_string());
        }
    }

    fn handling(&self) {
        console().debug("command claimed");
    }

    fn vlog(&self, text: &str) {
        console().verbose(text);
    }
}
