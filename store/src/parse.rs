//! Best-effort loading of persisted JSON records.

use serde::de::DeserializeOwned;

use crate::kv::KeyValueStore;

/// Parse the record under `key`, falling back on absence or corruption.
///
/// A malformed record is logged and deleted so the next startup does not
/// trip over it again. This never panics and never propagates an error:
/// recovery is always "discard and use the fallback".
pub fn parse_or_default<S, T, F>(kv: &mut S, key: &str, fallback: F) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let Some(raw) = kv.get(key) else {
        return fallback();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, "Discarding malformed record: {e}");
            kv.remove(key);
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::kv::{KeyValueStore, MemoryStore};

    use super::parse_or_default;

    #[test]
    fn absent_record_yields_fallback() {
        let mut kv = MemoryStore::new();
        let value: u32 = parse_or_default(&mut kv, "missing", || 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn valid_record_parses() {
        let mut kv = MemoryStore::new();
        kv.set("n", "41");
        let value: u32 = parse_or_default(&mut kv, "n", || 0);
        assert_eq!(value, 41);
    }

    #[test]
    fn corrupt_record_is_discarded_and_fallback_used() {
        let mut kv = MemoryStore::new();
        kv.set("n", "{not json");
        let value: u32 = parse_or_default(&mut kv, "n", || 3);
        assert_eq!(value, 3);
        assert_eq!(kv.get("n"), None, "corrupt record should be deleted");
    }
}
