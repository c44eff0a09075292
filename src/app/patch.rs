//! Partial-update field helper.
//!
//! For a nullable column an update request needs three states: absent
//! (leave as is), `null` (clear) and a value (set). Fields typed
//! `Option<Option<T>>` with `#[serde(default, deserialize_with = "patch::some")]`
//! decode absent as `None`, `null` as `Some(None)` and a value as `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

pub fn some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Resolve a nullable field against its stored value.
pub fn apply<T>(update: Option<Option<T>>, current: Option<T>) -> Option<T> {
    match update {
        Some(v) => v,
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Req {
        #[serde(default, deserialize_with = "some")]
        email: Option<Option<String>>,
    }

    #[test]
    fn three_states() {
        let absent: Req = serde_json::from_str("{}").unwrap();
        let null: Req = serde_json::from_str(r#"{"email": null}"#).unwrap();
        let set: Req = serde_json::from_str(r#"{"email": "a@b.co"}"#).unwrap();
        assert_eq!(absent.email, None);
        assert_eq!(null.email, Some(None));
        assert_eq!(set.email, Some(Some("a@b.co".to_string())));
    }

    #[test]
    fn apply_keeps_or_replaces() {
        let current = Some("old".to_string());
        assert_eq!(apply(None, current.clone()), current);
        assert_eq!(apply(Some(None), current.clone()), None);
        assert_eq!(apply(Some(Some("new".to_string())), current), Some("new".to_string()));
    }
}
