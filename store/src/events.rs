//! Explicit change notification.
//!
//! The original design re-rendered implicitly on every state change. Here,
//! consumers register a listener and re-query whatever state slice they
//! depend on when an event arrives. Events carry identifiers, not payloads;
//! [`crate::AppState`] remains the single source of truth.

use std::fmt;

use santri_types::{Preset, Provider, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    ThemeChanged(Theme),
    ActiveProviderChanged(Provider),
    /// The settings of this provider changed (keys, default model, endpoint).
    ApiSettingsChanged(Provider),
    ChatParamsChanged,
    PresetChanged(Preset),
    TranscriptChanged,
    ProjectsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&StateEvent)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&StateEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when the id was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn emit(&self, event: &StateEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
