//! Identifier normalisation.
//!
//! The tracking provider emits ids as JSON integers, while hand-written
//! fixtures often use strings. Both are folded into `String`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// `null` and a missing key both map to `None` (pair with `#[serde(default)]`).
pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_opt_id")]
        other: Option<String>,
    }

    #[test]
    fn test_integer_and_string_ids_normalise() {
        let a: Holder = serde_json::from_value(json!({"id": 145})).unwrap();
        let b: Holder = serde_json::from_value(json!({"id": "145"})).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.other, None);
    }

    #[test]
    fn test_null_optional_id() {
        let h: Holder = serde_json::from_value(json!({"id": 1, "other": null})).unwrap();
        assert_eq!(h.other, None);
    }
}
