//! State core for KangSantri AI.
//!
//! # Architecture
//!
//! [`AppState`] is the explicit application-state container: per-provider API
//! key settings, the active provider, chat parameters, the preset, the theme,
//! the chat transcript, and saved code projects. It is constructed with the
//! [`KeyValueStore`] it persists into (no ambient global), and every mutation
//! writes the affected record back immediately.
//!
//! Persistence is fire-and-forget: the store is local, so write failures are
//! logged and never propagated into mutation results. Loading goes through
//! [`parse_or_default`], which discards corrupt records and falls back to
//! built-in defaults.
//!
//! State changes are announced through the [`EventBus`]: consumers register a
//! listener and re-query the state they care about when a [`StateEvent`]
//! arrives.

mod config;
mod events;
mod kv;
mod migrate;
mod parse;

mod app;

pub use app::AppState;
pub use config::{AppSection, ConfigError, SantriConfig};
pub use events::{EventBus, ListenerId, StateEvent};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use migrate::migrate_legacy_settings;
pub use parse::parse_or_default;

/// Fixed identifiers of the persisted records, one JSON document each.
pub mod keys {
    /// Current-format API settings (provider -> key list + default model).
    pub const API_SETTINGS: &str = "kangsantri_api_settings";
    /// Legacy single-key-per-provider settings. Migration source only.
    pub const LEGACY_API_CONFIGS: &str = "kangsantri_api_configs";
    pub const THEME: &str = "kangsantri_theme";
    pub const ACTIVE_PROVIDER: &str = "kangsantri_active_provider";
    pub const CHAT_PARAMS: &str = "kangsantri_chat_params";
    pub const PRESET: &str = "kangsantri_preset";
    pub const CHAT_HISTORY: &str = "kangsantri_chat_history";
    pub const SAVED_CODES: &str = "kangsantri_saved_codes";
}
