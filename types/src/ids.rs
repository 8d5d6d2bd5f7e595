//! Opaque string identifiers.
//!
//! Fresh ids are UUIDv4; loaded records keep whatever the stored value was
//! (the legacy app minted timestamp-based ids, and those must survive a
//! round-trip unchanged).

use std::fmt;

use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mint a fresh random identifier.
            #[must_use]
            pub fn fresh() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an existing identifier (loaded records, CLI arguments).
            #[must_use]
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of an [`crate::ApiKeyEntry`] within a provider's key list.
    KeyId
);
string_id!(
    /// Identifier of a saved [`crate::CodeProject`].
    ProjectId
);
string_id!(
    /// Identifier of a transcript [`crate::Message`].
    MessageId
);

#[cfg(test)]
mod tests {
    use super::KeyId;

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(KeyId::fresh(), KeyId::fresh());
    }

    #[test]
    fn serde_is_transparent() {
        let id = KeyId::from_raw("1718000000-gemini");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1718000000-gemini\"");
        let back: KeyId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
