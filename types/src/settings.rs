//! Per-provider API-key settings.
//!
//! Two wire formats exist: the current one (`StoredApiSettings`, a key list
//! per provider plus a `lastUpdated` stamp) and the legacy one
//! (`LegacyApiSettings`, a single key per provider) that exists only as a
//! migration source. The in-memory [`ApiSettings`] always holds an entry for
//! every [`Provider`] so lookups never miss.
//!
//! Invariant: within a provider's key list, at most one entry has
//! `is_default = true`, and exactly one iff the list is non-empty.
//! [`ProviderSettings::normalize_default`] restores the invariant after
//! loading untrusted stored data; the mutation operations in `santri-store`
//! preserve it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::KeyId;
use crate::model::Provider;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyEntry {
    pub id: KeyId,
    pub label: String,
    pub api_key: String,
    pub is_default: bool,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl fmt::Debug for ApiKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .field(
                "api_key",
                if self.api_key.is_empty() {
                    &"<empty>"
                } else {
                    &"[REDACTED]"
                },
            )
            .field("is_default", &self.is_default)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,
    pub default_model: String,
    /// Empty string means "unset". Only meaningful for providers where
    /// [`Provider::supports_custom_endpoint`] holds.
    #[serde(default)]
    pub endpoint: String,
}

impl ProviderSettings {
    /// Built-in defaults for a fresh install.
    #[must_use]
    pub fn initial(provider: Provider) -> Self {
        Self {
            api_keys: Vec::new(),
            default_model: provider.default_model().to_string(),
            endpoint: String::new(),
        }
    }

    /// The credential used for provider calls: the default entry, provided
    /// its key material is non-empty.
    #[must_use]
    pub fn active_key(&self) -> Option<&ApiKeyEntry> {
        self.api_keys
            .iter()
            .find(|entry| entry.is_default && !entry.api_key.is_empty())
    }

    #[must_use]
    pub fn key(&self, id: &KeyId) -> Option<&ApiKeyEntry> {
        self.api_keys.iter().find(|entry| &entry.id == id)
    }

    /// Restore the default-key invariant after loading stored data: demote
    /// duplicate defaults (first wins) and promote the first entry when a
    /// non-empty list has none.
    pub fn normalize_default(&mut self) {
        let mut seen_default = false;
        for entry in &mut self.api_keys {
            if entry.is_default {
                if seen_default {
                    entry.is_default = false;
                } else {
                    seen_default = true;
                }
            }
        }
        if !seen_default {
            if let Some(first) = self.api_keys.first_mut() {
                first.is_default = true;
            }
        }
    }
}

/// In-memory settings for every provider. Construction guarantees an entry
/// per [`Provider`] variant; `get` therefore never misses.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    providers: BTreeMap<Provider, ProviderSettings>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        let providers = Provider::all()
            .iter()
            .map(|provider| (*provider, ProviderSettings::initial(*provider)))
            .collect();
        Self { providers }
    }
}

impl ApiSettings {
    #[must_use]
    pub fn get(&self, provider: Provider) -> &ProviderSettings {
        &self.providers[&provider]
    }

    pub fn get_mut(&mut self, provider: Provider) -> &mut ProviderSettings {
        self.providers
            .get_mut(&provider)
            .expect("ApiSettings holds an entry for every provider")
    }

    pub fn iter(&self) -> impl Iterator<Item = (Provider, &ProviderSettings)> {
        self.providers.iter().map(|(p, s)| (*p, s))
    }

    pub fn normalize(&mut self) {
        for settings in self.providers.values_mut() {
            settings.normalize_default();
        }
    }

    /// Rebuild from a stored record, merging over built-in defaults so that
    /// providers missing from the record still resolve.
    #[must_use]
    pub fn from_stored(stored: StoredApiSettings) -> Self {
        let mut settings = Self::default();
        for (provider, stored_provider) in stored {
            *settings.get_mut(provider) = stored_provider.settings;
        }
        settings.normalize();
        settings
    }

    /// The persisted form: every provider freshly stamped with `now`.
    #[must_use]
    pub fn to_stored(&self, now: DateTime<Utc>) -> StoredApiSettings {
        self.providers
            .iter()
            .map(|(provider, settings)| {
                (
                    *provider,
                    StoredProviderSettings {
                        settings: settings.clone(),
                        last_updated: now,
                    },
                )
            })
            .collect()
    }
}

/// Wire form of a provider's settings: the in-memory fields plus the
/// `lastUpdated` stamp written on every persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProviderSettings {
    #[serde(flatten)]
    pub settings: ProviderSettings,
    pub last_updated: DateTime<Utc>,
}

pub type StoredApiSettings = BTreeMap<Provider, StoredProviderSettings>;

/// Legacy single-key-per-provider record. Migration source only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProviderSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

pub type LegacyApiSettings = BTreeMap<Provider, LegacyProviderSettings>;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, is_default: bool) -> ApiKeyEntry {
        ApiKeyEntry {
            id: KeyId::from_raw(id),
            label: format!("key {id}"),
            api_key: format!("sk-{id}"),
            is_default,
        }
    }

    #[test]
    fn default_settings_cover_every_provider() {
        let settings = ApiSettings::default();
        for provider in Provider::all() {
            assert_eq!(
                settings.get(*provider).default_model,
                provider.default_model()
            );
        }
    }

    #[test]
    fn normalize_promotes_first_when_no_default() {
        let mut provider = ProviderSettings::initial(Provider::Gemini);
        provider.api_keys = vec![entry("a", false), entry("b", false)];
        provider.normalize_default();
        assert!(provider.api_keys[0].is_default);
        assert!(!provider.api_keys[1].is_default);
    }

    #[test]
    fn normalize_demotes_duplicate_defaults() {
        let mut provider = ProviderSettings::initial(Provider::Gemini);
        provider.api_keys = vec![entry("a", true), entry("b", true), entry("c", true)];
        provider.normalize_default();
        let defaults: Vec<_> = provider.api_keys.iter().filter(|k| k.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id.as_str(), "a");
    }

    #[test]
    fn active_key_requires_non_empty_material() {
        let mut provider = ProviderSettings::initial(Provider::Gemini);
        provider.api_keys = vec![ApiKeyEntry {
            id: KeyId::from_raw("a"),
            label: "blank".into(),
            api_key: String::new(),
            is_default: true,
        }];
        assert!(provider.active_key().is_none());
    }

    #[test]
    fn stored_roundtrip_preserves_settings() {
        let mut settings = ApiSettings::default();
        settings.get_mut(Provider::Gemini).api_keys.push(entry("a", true));
        settings.get_mut(Provider::OpenRouter).endpoint = "https://openrouter.ai/api/v1".into();

        let stored = settings.to_stored(Utc::now());
        let json = serde_json::to_string(&stored).unwrap();
        let reloaded: StoredApiSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(ApiSettings::from_stored(reloaded), settings);
    }

    #[test]
    fn stored_wire_format_is_camel_case() {
        let settings = ApiSettings::default();
        let json = serde_json::to_value(settings.to_stored(Utc::now())).unwrap();
        let gemini = &json["gemini"];
        assert!(gemini.get("apiKeys").is_some());
        assert!(gemini.get("defaultModel").is_some());
        assert!(gemini.get("lastUpdated").is_some());
    }

    #[test]
    fn debug_output_redacts_key_material() {
        let formatted = format!("{:?}", entry("a", true));
        assert!(!formatted.contains("sk-a"));
        assert!(formatted.contains("[REDACTED]"));
    }
}
