//! Provider call contracts.
//!
//! The settings core treats the AI vendors as opaque external services; this
//! crate defines the seams it calls through:
//!
//! - [`TextGenerator`] - chat completion taking the prompt, prior transcript,
//!   credential, model, and parameters, returning text plus optional
//!   grounding citations
//! - [`ImageGenerator`] - image generation taking a prompt, count, and
//!   optional negative prompt, returning base64 payloads
//!
//! Both calls are async, non-cancelable, and awaited individually per user
//! action. Failures map to [`ProviderError`]; callers surface them inline
//! (chat transcript or image banner) and never retry.
//!
//! [`PlaceholderGenerator`] is the local stub the application ships for
//! providers without a wired network client; it implements both contracts
//! with canned responses.

mod placeholder;

pub use placeholder::PlaceholderGenerator;

use std::future::Future;

use santri_types::{ChatParams, Message, Provider};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// No active (default, non-empty) credential for the provider.
    /// Surfaced immediately; blocks the action.
    #[error("API Key aktif untuk {0} belum diatur atau tidak valid. Silakan periksa Pengaturan.")]
    MissingCredential(Provider),
    /// The prompt was blank.
    #[error("Prompt tidak boleh kosong.")]
    EmptyPrompt,
    /// The provider has no model for the requested capability.
    #[error("Tidak ada model {kind} yang tersedia untuk {provider}.")]
    NoModelAvailable { provider: Provider, kind: &'static str },
    /// The underlying provider call failed. Terminal for this action.
    #[error("{provider}: {message}")]
    Api { provider: Provider, message: String },
}

/// A chat completion request. `history` is the transcript *before* the
/// message being sent.
#[derive(Debug, Clone)]
pub struct TextRequest<'a> {
    pub prompt: &'a str,
    pub history: &'a [Message],
    pub api_key: &'a str,
    pub model: &'a str,
    pub params: &'a ChatParams,
    pub system_prompt: &'a str,
    pub image: Option<&'a str>,
}

/// A grounding citation attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingChunk {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextResponse {
    pub text: String,
    pub grounding: Vec<GroundingChunk>,
}

#[derive(Debug, Clone)]
pub struct ImageRequest<'a> {
    pub prompt: &'a str,
    pub negative_prompt: Option<&'a str>,
    pub api_key: &'a str,
    pub model: &'a str,
    /// Number of images, clamped by the caller to 1..=4.
    pub count: u8,
}

/// One generated image, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload(pub String);

pub trait TextGenerator {
    fn provider(&self) -> Provider;

    fn send(
        &self,
        request: TextRequest<'_>,
    ) -> impl Future<Output = Result<TextResponse, ProviderError>> + Send;
}

pub trait ImageGenerator {
    fn provider(&self) -> Provider;

    fn generate(
        &self,
        request: ImageRequest<'_>,
    ) -> impl Future<Output = Result<Vec<ImagePayload>, ProviderError>> + Send;
}
