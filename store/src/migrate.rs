//! One-shot migration of the legacy single-key-per-provider settings record.
//!
//! Runs during startup only when the current-format record is absent. For
//! each provider carrying a non-empty legacy key, a single default
//! [`ApiKeyEntry`] is synthesized and wrapped in provider settings using the
//! legacy model/endpoint or the built-in fallbacks. The migrated map is
//! written under the current key and the legacy record is deleted, so a
//! second run finds nothing to do.

use chrono::Utc;
use santri_types::{ApiKeyEntry, ApiSettings, KeyId, LegacyApiSettings};

use crate::keys;
use crate::kv::KeyValueStore;

/// Migrate the legacy record, if present. Returns the migrated settings, or
/// `None` when there was no legacy record or it was unreadable (an
/// unreadable record is still deleted; the caller proceeds with defaults).
pub fn migrate_legacy_settings<S: KeyValueStore + ?Sized>(kv: &mut S) -> Option<ApiSettings> {
    let raw = kv.get(keys::LEGACY_API_CONFIGS)?;
    tracing::info!("Migrating legacy API settings to the current format");

    let legacy: LegacyApiSettings = match serde_json::from_str(&raw) {
        Ok(legacy) => legacy,
        Err(e) => {
            tracing::warn!("Failed to parse legacy API settings, discarding: {e}");
            kv.remove(keys::LEGACY_API_CONFIGS);
            return None;
        }
    };

    let mut settings = ApiSettings::default();
    for (provider, old) in legacy {
        if old.api_key.is_empty() {
            continue;
        }
        let migrated = settings.get_mut(provider);
        migrated.api_keys = vec![ApiKeyEntry {
            id: KeyId::fresh(),
            label: format!("Kunci Utama {provider}"),
            api_key: old.api_key,
            is_default: true,
        }];
        if let Some(model) = old.model.filter(|m| !m.is_empty()) {
            migrated.default_model = model;
        }
        migrated.endpoint = old.endpoint.unwrap_or_default();
    }

    match serde_json::to_string(&settings.to_stored(Utc::now())) {
        Ok(json) => kv.set(keys::API_SETTINGS, &json),
        Err(e) => {
            // Leaves the settings in memory only; they re-persist on the
            // first mutation.
            tracing::warn!("Failed to serialize migrated settings: {e}");
        }
    }
    kv.remove(keys::LEGACY_API_CONFIGS);
    tracing::info!("Legacy API settings migrated");

    Some(settings)
}
