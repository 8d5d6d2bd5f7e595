//! Chat parameters and the KangSantri preset bundles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{EnumKind, EnumParseError};

/// Tunable parameters for a chat call. Persisted snake_case, exactly as the
/// records have always been stored.
///
/// `model` and `system_prompt` are user overrides; when unset, callers fall
/// back to the active provider's default model and the active preset's
/// prompt. Range checks happen at the mutation boundary
/// ([`ChatParams::validate`]), not in serde, so a stored out-of-range value
/// loads and is corrected on the next update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: None,
            system_prompt: None,
            temperature: Some(0.7),
            top_p: Some(0.95),
            max_tokens: Some(2048),
        }
    }
}

impl ChatParams {
    pub fn validate(&self) -> Result<(), ChatParamsError> {
        if let Some(t) = self.temperature {
            if !(0.0..=1.0).contains(&t) {
                return Err(ChatParamsError::TemperatureOutOfRange(t));
            }
        }
        if let Some(p) = self.top_p {
            if !(0.0..=1.0).contains(&p) {
                return Err(ChatParamsError::TopPOutOfRange(p));
            }
        }
        if self.max_tokens == Some(0) {
            return Err(ChatParamsError::ZeroMaxTokens);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatParamsError {
    #[error("temperature {0} out of range [0, 1]")]
    TemperatureOutOfRange(f32),
    #[error("top_p {0} out of range [0, 1]")]
    TopPOutOfRange(f32),
    #[error("max_tokens must be positive")]
    ZeroMaxTokens,
}

/// Named system-prompt bundles selectable by the user.
///
/// Switching presets overwrites the chat system prompt unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Default,
    Ustadz,
    Koding,
}

impl Preset {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Ustadz => "ustadz",
            Preset::Koding => "koding",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Preset::Default => "KangSantri Default",
            Preset::Ustadz => "Ustadz Digital",
            Preset::Koding => "Asisten Koding",
        }
    }

    #[must_use]
    pub const fn system_prompt(self) -> &'static str {
        match self {
            Preset::Default => {
                "Anda adalah KangSantri AI, asisten AI yang ramah, sopan, dan membantu. \
                 Jawablah dalam bahasa Indonesia yang santun."
            }
            Preset::Ustadz => {
                "Anda adalah Ustadz Digital KangSantri AI. Jawablah pertanyaan seputar \
                 ilmu agama dengan rujukan yang jelas, bahasa yang santun, dan ingatkan \
                 pengguna untuk memverifikasi kepada ustadz atau kyai setempat."
            }
            Preset::Koding => {
                "Anda adalah Asisten Koding KangSantri AI. Bantu pengguna menulis, \
                 menjelaskan, dan memperbaiki kode. Sertakan contoh kode yang dapat \
                 langsung dijalankan bila memungkinkan."
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "default" => Ok(Preset::Default),
            "ustadz" => Ok(Preset::Ustadz),
            "koding" => Ok(Preset::Koding),
            _ => Err(EnumParseError::new(
                EnumKind::Preset,
                trimmed,
                &["default", "ustadz", "koding"],
            )),
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Preset] {
        &[Preset::Default, Preset::Ustadz, Preset::Koding]
    }
}
