//! Chat parameters, model synchronization, and the send/generate flows.
//!
//! The synchronization invariant: the active chat model always belongs to
//! the active provider's chat-model catalog (or is unset when the catalog is
//! empty). Mutations that can invalidate the model call
//! [`AppState::refresh_chat_model`], which re-resolves it from the provider's
//! configured default; loading calls [`AppState::ensure_chat_model_valid`],
//! which leaves a still-valid model untouched.

use chrono::Utc;
use santri_providers::{
    ImageGenerator, ImagePayload, ImageRequest, ProviderError, TextGenerator, TextRequest,
};
use santri_types::{ChatParams, ChatParamsError, Message, Preset, Provider};

use crate::events::StateEvent;
use crate::keys;
use crate::kv::KeyValueStore;

use super::{AppState, persist_json};

impl<S: KeyValueStore> AppState<S> {
    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Apply a partial update to the chat parameters. The merged result is
    /// validated before it replaces the current parameters; on rejection
    /// nothing changes.
    pub fn update_chat_params(
        &mut self,
        mutate: impl FnOnce(&mut ChatParams),
    ) -> Result<(), ChatParamsError> {
        let mut next = self.chat_params.clone();
        mutate(&mut next);
        next.validate()?;
        if next != self.chat_params {
            self.chat_params = next;
            self.persist_chat_params();
            self.emit(StateEvent::ChatParamsChanged);
        }
        Ok(())
    }

    /// Switch the active provider and reset the chat model to its default.
    pub fn set_active_provider(&mut self, provider: Provider) {
        if self.active_provider == provider {
            return;
        }
        self.active_provider = provider;
        persist_json(&mut self.kv, keys::ACTIVE_PROVIDER, &provider);
        self.emit(StateEvent::ActiveProviderChanged(provider));
        self.refresh_chat_model();
    }

    /// Switch presets: overwrites the system prompt unconditionally and
    /// resets the chat model to the active provider's default.
    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
        persist_json(&mut self.kv, keys::PRESET, &preset);
        self.emit(StateEvent::PresetChanged(preset));

        self.chat_params.system_prompt = Some(preset.system_prompt().to_string());
        self.persist_chat_params();
        self.emit(StateEvent::ChatParamsChanged);
        self.refresh_chat_model();
    }

    /// The model a chat call would use right now.
    #[must_use]
    pub fn effective_model(&self) -> String {
        self.chat_params.model.clone().unwrap_or_else(|| {
            self.api_settings
                .get(self.active_provider)
                .default_model
                .clone()
        })
    }

    /// The system prompt a chat call would use right now: the user override,
    /// or the active preset's prompt.
    #[must_use]
    pub fn effective_system_prompt(&self) -> String {
        self.chat_params
            .system_prompt
            .clone()
            .unwrap_or_else(|| self.preset.system_prompt().to_string())
    }

    // ------------------------------------------------------------------
    // Model synchronization
    // ------------------------------------------------------------------

    /// Resolve the model the active provider should fall back to: its
    /// configured default when that is in the catalog, else the first
    /// catalog entry, else unset.
    fn resolved_default_model(&self) -> Option<String> {
        let provider = self.active_provider;
        let catalog = provider.chat_models();
        let configured = self.api_settings.get(provider).default_model.as_str();
        if catalog.contains(&configured) {
            Some(configured.to_string())
        } else {
            catalog.first().map(|model| (*model).to_string())
        }
    }

    /// Reset the chat model to the active provider's resolved default.
    pub(crate) fn refresh_chat_model(&mut self) {
        let next = self.resolved_default_model();
        if next != self.chat_params.model {
            self.chat_params.model = next;
            self.persist_chat_params();
            self.emit(StateEvent::ChatParamsChanged);
        }
    }

    /// Reset the chat model only when it is not in the active provider's
    /// catalog. Used at load time so a valid, deliberately-picked model
    /// survives a restart.
    pub(crate) fn ensure_chat_model_valid(&mut self) {
        let catalog = self.active_provider.chat_models();
        let valid = self
            .chat_params
            .model
            .as_deref()
            .is_some_and(|model| catalog.contains(&model));
        if !valid {
            self.refresh_chat_model();
        }
    }

    // ------------------------------------------------------------------
    // Send / generate flows
    // ------------------------------------------------------------------

    /// Send a chat message through `generator` and append both sides of the
    /// exchange to the transcript. Failures become `Error:`-labeled AI
    /// messages; nothing is retried. Returns the appended reply, or `None`
    /// for blank input.
    pub async fn send_message<G: TextGenerator>(
        &mut self,
        generator: &G,
        text: &str,
        image: Option<String>,
    ) -> Option<&Message> {
        if text.trim().is_empty() && image.is_none() {
            return None;
        }

        let provider = self.active_provider;
        self.push_message(Message::user(text, image.clone(), Utc::now()));

        let Some(api_key) = self
            .api_settings
            .get(provider)
            .active_key()
            .map(|entry| entry.api_key.clone())
        else {
            let error = ProviderError::MissingCredential(provider);
            self.push_message(Message::error(error.to_string(), provider, Utc::now()));
            return self.messages().last();
        };

        let model = self.effective_model();
        let system_prompt = self.effective_system_prompt();
        let history_end = self.messages().len().saturating_sub(1);

        let request = TextRequest {
            prompt: text,
            history: &self.messages()[..history_end],
            api_key: &api_key,
            model: &model,
            params: &self.chat_params,
            system_prompt: &system_prompt,
            image: image.as_deref(),
        };

        let outcome = generator.send(request).await;
        match outcome {
            Ok(response) => {
                let mut reply = response.text;
                if !response.grounding.is_empty() {
                    reply.push_str("\n\nSumber Informasi:\n");
                    for chunk in &response.grounding {
                        reply.push_str(&format!("- {}: {}\n", chunk.title, chunk.uri));
                    }
                }
                self.push_message(Message::ai(reply, provider, model, Utc::now()));
            }
            Err(error) => {
                tracing::warn!(%provider, "Chat call failed: {error}");
                self.push_message(Message::error(error.to_string(), provider, Utc::now()));
            }
        }

        self.messages().last()
    }

    /// Generate images with the selected provider. The transcript is not
    /// touched; the caller renders the payloads or the error banner.
    ///
    /// `model` falls back to the first entry of the provider's image catalog
    /// when absent from it; `count` is clamped to 1..=4.
    pub async fn generate_images<G: ImageGenerator>(
        &self,
        generator: &G,
        prompt: &str,
        negative_prompt: Option<&str>,
        model: Option<&str>,
        count: u8,
    ) -> Result<Vec<ImagePayload>, ProviderError> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }

        let provider = generator.provider();
        let api_key = self
            .api_settings
            .get(provider)
            .active_key()
            .map(|entry| entry.api_key.clone())
            .ok_or(ProviderError::MissingCredential(provider))?;

        let catalog = provider.image_models();
        let model = match model {
            Some(requested) if catalog.contains(&requested) => requested,
            _ => catalog
                .first()
                .copied()
                .ok_or(ProviderError::NoModelAvailable {
                    provider,
                    kind: "gambar",
                })?,
        };

        generator
            .generate(ImageRequest {
                prompt,
                negative_prompt,
                api_key: &api_key,
                model,
                count: count.clamp(1, 4),
            })
            .await
    }
}
