//! Provider enumeration and the built-in model catalogs.
//!
//! The provider set is closed: the rest of the system dispatches on this
//! enum, and the persisted settings map always has an entry per variant.
//! Model catalogs are static; the chat-parameter sync rules in
//! `santri-store` only ever select models out of these lists.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENROUTER_MODEL: &str = "openrouter/auto";

const GEMINI_CHAT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-pro", "gemini-2.0-flash"];

const OPENROUTER_CHAT_MODELS: &[&str] = &[
    "openrouter/auto",
    "deepseek/deepseek-chat-v3-0324:free",
    "meta-llama/llama-3.3-70b-instruct:free",
];

const GEMINI_IMAGE_MODELS: &[&str] = &[
    "imagen-3.0-generate-002",
    "gemini-2.0-flash-preview-image-generation",
];

const OPENROUTER_IMAGE_MODELS: &[&str] = &["black-forest-labs/flux-1-schnell:free"];

const PROVIDER_PARSE_VALUES: &[&str] = &["gemini", "google", "openrouter", "open-router"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenRouter,
}

impl Provider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenRouter => "openrouter",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::OpenRouter => "OpenRouter",
        }
    }

    /// Built-in fallback chat model, used when a provider has no configured
    /// default (fresh install, migration from a legacy record without a model).
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::OpenRouter => DEFAULT_OPENROUTER_MODEL,
        }
    }

    #[must_use]
    pub const fn chat_models(self) -> &'static [&'static str] {
        match self {
            Provider::Gemini => GEMINI_CHAT_MODELS,
            Provider::OpenRouter => OPENROUTER_CHAT_MODELS,
        }
    }

    #[must_use]
    pub const fn image_models(self) -> &'static [&'static str] {
        match self {
            Provider::Gemini => GEMINI_IMAGE_MODELS,
            Provider::OpenRouter => OPENROUTER_IMAGE_MODELS,
        }
    }

    /// Only OpenRouter accepts a user-supplied endpoint; Gemini calls go to
    /// the fixed Google API host.
    #[must_use]
    pub const fn supports_custom_endpoint(self) -> bool {
        matches!(self, Provider::OpenRouter)
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openrouter" | "open-router" => Ok(Provider::OpenRouter),
            _ => Err(EnumParseError::new(
                EnumKind::Provider,
                trimmed,
                PROVIDER_PARSE_VALUES,
            )),
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Provider] {
        &[Provider::Gemini, Provider::OpenRouter]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    Provider,
    Preset,
    Theme,
}

impl EnumKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnumKind::Provider => "provider",
            EnumKind::Preset => "preset",
            EnumKind::Theme => "theme",
        }
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{raw}'; expected one of: {expected:?}")]
pub struct EnumParseError {
    kind: EnumKind,
    raw: String,
    expected: &'static [&'static str],
}

impl EnumParseError {
    #[must_use]
    pub fn new(kind: EnumKind, raw: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            raw: raw.into(),
            expected,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EnumKind {
        self.kind
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}
