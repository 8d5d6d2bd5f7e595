//! The chat transcript: append-only per session, persisted on every change.

use santri_types::Message;

use crate::events::StateEvent;
use crate::kv::KeyValueStore;

use super::AppState;

impl<S: KeyValueStore> AppState<S> {
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub(crate) fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.persist_transcript();
        self.emit(StateEvent::TranscriptChanged);
    }

    /// Drop the whole transcript and persist the empty list.
    pub fn clear_transcript(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        self.messages.clear();
        self.persist_transcript();
        self.emit(StateEvent::TranscriptChanged);
    }
}
