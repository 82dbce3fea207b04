//! Tri-state field values for partial updates.
//!
//! A JSON update body has three distinct shapes per field:
//!
//! | JSON                  | `Patch`          | Meaning                  |
//! |-----------------------|------------------|--------------------------|
//! | key missing           | `Patch::Absent`  | leave the column as is   |
//! | `"key": null`         | `Patch::Null`    | clear the column         |
//! | `"key": <value>`      | `Patch::Value`   | overwrite the column     |
//!
//! A plain `Option<T>` collapses the first two cases. Update DTOs therefore
//! declare every field as `#[serde(default)] pub field: Patch<T>`; the
//! `default` attribute produces `Absent` for missing keys and the
//! `Deserialize` impl below maps `null` to `Null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// The supplied value, if any. Both `Absent` and `Null` yield `None`.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `None` when absent, `Some(None)` when cleared, `Some(Some(v))` when set.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        name: Patch<String>,
        #[serde(default)]
        count: Patch<i32>,
    }

    #[test]
    fn missing_key_is_absent() {
        let body: Body = serde_json::from_str(r#"{"count": 3}"#).unwrap();
        assert_eq!(body.name, Patch::Absent);
        assert_eq!(body.count, Patch::Value(3));
    }

    #[test]
    fn explicit_null_is_null() {
        let body: Body = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(body.name, Patch::Null);
        assert_eq!(body.count, Patch::Absent);
    }

    #[test]
    fn empty_string_is_a_value_not_a_clear() {
        let body: Body = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(body.name, Patch::Value(String::new()));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = serde_json::from_str::<Body>(r#"{"count": "three"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn into_option_preserves_all_three_states() {
        assert_eq!(Patch::<i32>::Absent.into_option(), None);
        assert_eq!(Patch::<i32>::Null.into_option(), Some(None));
        assert_eq!(Patch::Value(7).into_option(), Some(Some(7)));
    }

    #[test]
    fn serializes_absent_and_null_as_null() {
        assert_eq!(serde_json::to_string(&Patch::<i32>::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Patch::Value(1)).unwrap(), "1");
    }
}
