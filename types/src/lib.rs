//! Domain types shared across the KangSantri AI crates.
//!
//! These types define the persisted wire formats (JSON, camelCase where the
//! stored records require it) and the in-memory invariants the stores
//! maintain. They carry no I/O: persistence lives in `santri-store`, and
//! provider calls live in `santri-providers`.

mod chat;
mod ids;
mod message;
mod model;
mod project;
mod settings;

pub use chat::{ChatParams, ChatParamsError, Preset};
pub use ids::{KeyId, MessageId, ProjectId};
pub use message::{ERROR_PREFIX, Message, Sender};
pub use model::{DEFAULT_GEMINI_MODEL, DEFAULT_OPENROUTER_MODEL, EnumKind, EnumParseError, Provider};
pub use project::CodeProject;
pub use settings::{
    ApiKeyEntry, ApiSettings, LegacyApiSettings, LegacyProviderSettings, ProviderSettings,
    StoredApiSettings, StoredProviderSettings,
};

use serde::{Deserialize, Serialize};

/// UI color scheme. Persisted as `"light"` / `"dark"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(EnumParseError::new(
                EnumKind::Theme,
                other,
                &["light", "dark"],
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn theme_toggles_both_ways() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn theme_parse_is_case_insensitive() {
        assert_eq!(Theme::parse("Dark").unwrap(), Theme::Dark);
        assert!(Theme::parse("sepia").is_err());
    }
}
