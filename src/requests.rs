//! Registry of in-flight photo requests, keyed by their progress message.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, MessageId};
use tokio_util::sync::CancellationToken;

/// Cancellation tokens of running requests, shared between the photo and
/// callback handlers
#[derive(Debug, Clone, Default)]
pub struct ActiveRequests {
    tokens: Arc<Mutex<HashMap<(ChatId, MessageId), CancellationToken>>>,
}

impl ActiveRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new request and hand back its token
    pub fn register(&self, chat_id: ChatId, message_id: MessageId) -> CancellationToken {
        let token = CancellationToken::new();
        self.lock().insert((chat_id, message_id), token.clone());
        token
    }

    /// Cancel the request shown in this message. Returns `false` if it already finished.
    pub fn cancel(&self, chat_id: ChatId, message_id: MessageId) -> bool {
        match self.lock().remove(&(chat_id, message_id)) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn finish(&self, chat_id: ChatId, message_id: MessageId) {
        self.lock().remove(&(chat_id, message_id));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(ChatId, MessageId), CancellationToken>> {
        // Entries stay consistent even if a holder panicked
        self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
