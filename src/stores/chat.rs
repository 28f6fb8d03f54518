//! Classroom chat: one append-only message list open to every role.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::rc::Rc;

use tracing::{debug, info};

use crate::codec::JsonCodec;
use crate::ids;
use crate::keys;
use crate::platform::Platform;
use crate::synced::{SyncEnv, SyncedValue, WritePolicy};
use crate::types::ChatMessage;

pub const DEFAULT_RECENT_COUNT: usize = 50;

pub struct ChatStore {
    platform: Rc<dyn Platform>,
    messages: SyncedValue<Vec<ChatMessage>>,
}

impl ChatStore {
    #[must_use]
    pub fn new(env: &SyncEnv) -> Self {
        Self {
            platform: Rc::clone(&env.platform),
            messages: SyncedValue::new(
                env,
                keys::CHAT_MESSAGES,
                Vec::new(),
                JsonCodec::new(),
                WritePolicy::Open,
                env.options(),
            ),
        }
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read()
    }

    /// The last `count` messages, oldest first. A zero count yields none.
    #[must_use]
    pub fn recent_messages(&self, count: usize) -> Vec<ChatMessage> {
        self.messages
            .with(|list| list[list.len().saturating_sub(count)..].to_vec())
    }

    #[must_use]
    pub fn recent_messages_default(&self) -> Vec<ChatMessage> {
        self.recent_messages(DEFAULT_RECENT_COUNT)
    }

    /// Append a message. The list is re-read first so messages from other
    /// contexts that have not been polled yet are kept.
    pub fn send_message(&self, sender: &str, sender_id: &str, message: &str, is_teacher: bool) -> ChatMessage {
        let now = self.platform.now_ms();
        let entry = ChatMessage {
            id: ids::message_id(now),
            sender: sender.to_owned(),
            sender_id: sender_id.to_owned(),
            message: message.to_owned(),
            timestamp: now,
            is_teacher,
        };
        self.messages.poll_now();
        let appended = entry.clone();
        self.messages.update(move |list| list.push(appended));
        debug!(message_id = %entry.id, sender_id, "chat message sent");
        entry
    }

    pub fn clear_messages(&self) {
        self.messages.write(Vec::new());
        info!("chat cleared");
    }

    /// Re-read the list from storage now instead of waiting for a poll.
    pub fn refresh_messages(&self) {
        self.messages.poll_now();
    }

    pub fn stop_polling(&self) {
        self.messages.stop();
    }
}
