//! API key CRUD and provider defaults.
//!
//! Every operation persists the complete settings map (all providers,
//! freshly stamped) and emits [`StateEvent::ApiSettingsChanged`]. Operations
//! that can invalidate the active chat model route through the resolution in
//! [`super::chat`].

use santri_types::{ApiKeyEntry, KeyId, Provider};

use crate::events::StateEvent;
use crate::kv::KeyValueStore;

use super::AppState;

impl<S: KeyValueStore> AppState<S> {
    /// Add a key to a provider's list. The new entry becomes the default iff
    /// the list was previously empty.
    pub fn add_api_key(
        &mut self,
        provider: Provider,
        label: impl Into<String>,
        api_key: impl Into<String>,
    ) -> KeyId {
        let entry = ApiKeyEntry {
            id: KeyId::fresh(),
            label: label.into(),
            api_key: api_key.into(),
            is_default: self.api_settings.get(provider).api_keys.is_empty(),
        };
        let id = entry.id.clone();

        let list = &mut self.api_settings.get_mut(provider).api_keys;
        if entry.is_default {
            for existing in list.iter_mut() {
                existing.is_default = false;
            }
        }
        list.push(entry);

        self.persist_api_settings();
        self.emit(StateEvent::ApiSettingsChanged(provider));
        id
    }

    /// Merge label/key updates into the matching entry. No-op when the id is
    /// not found. The default flag is not updatable here; use
    /// [`AppState::set_active_api_key`].
    pub fn update_api_key(
        &mut self,
        provider: Provider,
        key_id: &KeyId,
        label: Option<String>,
        api_key: Option<String>,
    ) {
        let list = &mut self.api_settings.get_mut(provider).api_keys;
        let Some(entry) = list.iter_mut().find(|entry| &entry.id == key_id) else {
            return;
        };
        if let Some(label) = label {
            entry.label = label;
        }
        if let Some(api_key) = api_key {
            entry.api_key = api_key;
        }

        self.persist_api_settings();
        self.emit(StateEvent::ApiSettingsChanged(provider));
    }

    /// Remove an entry. Deleting the default promotes the first remaining
    /// entry, and refreshes the chat model when this provider is active.
    pub fn delete_api_key(&mut self, provider: Provider, key_id: &KeyId) {
        let list = &mut self.api_settings.get_mut(provider).api_keys;
        let Some(position) = list.iter().position(|entry| &entry.id == key_id) else {
            return;
        };
        let removed = list.remove(position);
        if removed.is_default {
            if let Some(first) = list.first_mut() {
                first.is_default = true;
            }
        }

        self.persist_api_settings();
        self.emit(StateEvent::ApiSettingsChanged(provider));

        if removed.is_default && provider == self.active_provider {
            self.refresh_chat_model();
        }
    }

    /// Mark exactly one entry as default. No-op when the id is not found
    /// (leaving the list without a default would break the invariant).
    pub fn set_active_api_key(&mut self, provider: Provider, key_id: &KeyId) {
        let list = &mut self.api_settings.get_mut(provider).api_keys;
        if !list.iter().any(|entry| &entry.id == key_id) {
            return;
        }
        for entry in list.iter_mut() {
            entry.is_default = &entry.id == key_id;
        }

        self.persist_api_settings();
        self.emit(StateEvent::ApiSettingsChanged(provider));

        if provider == self.active_provider {
            self.refresh_chat_model();
        }
    }

    /// Overwrite the provider's default model; refreshes the chat model when
    /// this provider is active.
    pub fn update_provider_default_model(&mut self, provider: Provider, model: impl Into<String>) {
        self.api_settings.get_mut(provider).default_model = model.into();

        self.persist_api_settings();
        self.emit(StateEvent::ApiSettingsChanged(provider));

        if provider == self.active_provider {
            self.refresh_chat_model();
        }
    }

    /// Overwrite the provider's endpoint. Rejected (no-op) for providers
    /// without custom-endpoint support.
    pub fn update_provider_endpoint(&mut self, provider: Provider, endpoint: impl Into<String>) {
        if !provider.supports_custom_endpoint() {
            tracing::debug!(%provider, "Ignoring endpoint update: provider has a fixed endpoint");
            return;
        }
        self.api_settings.get_mut(provider).endpoint = endpoint.into();

        self.persist_api_settings();
        self.emit(StateEvent::ApiSettingsChanged(provider));
    }
}
