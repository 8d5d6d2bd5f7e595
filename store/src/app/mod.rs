//! The application state container.
//!
//! `AppState` owns every state slice the views consume and the key-value
//! store it persists into. Mutation methods live in the per-concern files:
//!
//! - [`settings`] - API key CRUD and provider defaults
//! - [`chat`] - chat parameters, model synchronization, send/generate flows
//! - [`history`] - the chat transcript
//! - [`projects`] - saved code projects
//!
//! Construction loads (and, once, migrates) the persisted records; from then
//! on every mutation persists its slice immediately and announces itself on
//! the [`EventBus`].

mod chat;
mod history;
mod projects;
mod settings;

use chrono::Utc;
use santri_types::{
    ApiSettings, ChatParams, CodeProject, Message, Preset, ProjectId, Provider, StoredApiSettings,
    Theme,
};

use crate::events::{EventBus, ListenerId, StateEvent};
use crate::keys;
use crate::kv::KeyValueStore;
use crate::migrate::migrate_legacy_settings;
use crate::parse::parse_or_default;

pub struct AppState<S: KeyValueStore> {
    kv: S,
    api_settings: ApiSettings,
    active_provider: Provider,
    chat_params: ChatParams,
    preset: Preset,
    theme: Theme,
    messages: Vec<Message>,
    projects: Vec<CodeProject>,
    active_editing_project: Option<ProjectId>,
    events: EventBus,
}

impl<S: KeyValueStore> AppState<S> {
    /// Load all persisted records from `kv`, migrating the legacy settings
    /// format when the current one is absent.
    pub fn load(kv: S) -> Self {
        Self::load_with_theme_fallback(kv, Theme::default())
    }

    /// Like [`AppState::load`], but with a caller-supplied theme for when no
    /// theme record has been persisted yet (e.g. a config-file default).
    pub fn load_with_theme_fallback(mut kv: S, theme_fallback: Theme) -> Self {
        let theme = parse_or_default(&mut kv, keys::THEME, || theme_fallback);

        let api_settings = if kv.get(keys::API_SETTINGS).is_some() {
            let stored: StoredApiSettings =
                parse_or_default(&mut kv, keys::API_SETTINGS, StoredApiSettings::default);
            ApiSettings::from_stored(stored)
        } else {
            migrate_legacy_settings(&mut kv).unwrap_or_default()
        };

        let active_provider = parse_or_default(&mut kv, keys::ACTIVE_PROVIDER, Provider::default);
        let preset = parse_or_default(&mut kv, keys::PRESET, Preset::default);
        let mut chat_params: ChatParams =
            parse_or_default(&mut kv, keys::CHAT_PARAMS, ChatParams::default);
        if chat_params.system_prompt.is_none() {
            chat_params.system_prompt = Some(preset.system_prompt().to_string());
        }

        let messages = parse_or_default(&mut kv, keys::CHAT_HISTORY, Vec::new);
        let projects = parse_or_default(&mut kv, keys::SAVED_CODES, Vec::new);

        let mut state = Self {
            kv,
            api_settings,
            active_provider,
            chat_params,
            preset,
            theme,
            messages,
            projects,
            active_editing_project: None,
            events: EventBus::new(),
        };
        // Establish the model invariant before anything reads it: the stored
        // model may predate a provider switch or catalog change.
        state.ensure_chat_model_valid();
        state
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    #[must_use]
    pub fn api_settings(&self) -> &ApiSettings {
        &self.api_settings
    }

    #[must_use]
    pub fn active_provider(&self) -> Provider {
        self.active_provider
    }

    #[must_use]
    pub fn chat_params(&self) -> &ChatParams {
        &self.chat_params
    }

    #[must_use]
    pub fn preset(&self) -> Preset {
        self.preset
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl Fn(&StateEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        persist_json(&mut self.kv, keys::THEME, &self.theme);
        self.events.emit(&StateEvent::ThemeChanged(theme));
    }

    // ------------------------------------------------------------------
    // Persistence plumbing (fire-and-forget)
    // ------------------------------------------------------------------

    /// Persist the complete settings map, every provider freshly stamped.
    pub(crate) fn persist_api_settings(&mut self) {
        let stored = self.api_settings.to_stored(Utc::now());
        persist_json(&mut self.kv, keys::API_SETTINGS, &stored);
    }

    pub(crate) fn persist_chat_params(&mut self) {
        persist_json(&mut self.kv, keys::CHAT_PARAMS, &self.chat_params);
    }

    pub(crate) fn persist_transcript(&mut self) {
        persist_json(&mut self.kv, keys::CHAT_HISTORY, &self.messages);
    }

    pub(crate) fn persist_projects(&mut self) {
        persist_json(&mut self.kv, keys::SAVED_CODES, &self.projects);
    }

    pub(crate) fn emit(&self, event: StateEvent) {
        self.events.emit(&event);
    }
}

/// Serialize and write one record; failures are logged, never propagated.
fn persist_json<S: KeyValueStore>(kv: &mut S, key: &str, value: &impl serde::Serialize) {
    match serde_json::to_string(value) {
        Ok(json) => kv.set(key, &json),
        Err(e) => tracing::warn!(key, "Failed to serialize record: {e}"),
    }
}
