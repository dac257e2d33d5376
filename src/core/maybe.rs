//! Purpose: Tri-state value carrier for configuration leaves and coercion results.
//! Exports: `Maybe<T>`.
//! Role: Present-with-value or absent, independent of `Option` so config text
//! forms ("", "null", "None") and JSON null round through serde uniformly.
//! Invariants: `some(x).unwrap() == x`; `unwrap` on an absent value panics.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Maybe<T> {
    value: Option<T>,
}

impl<T> Maybe<T> {
    pub fn some(value: T) -> Self {
        Self { value: Some(value) }
    }

    pub fn none() -> Self {
        Self { value: None }
    }

    pub fn is_some(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_none(&self) -> bool {
        self.value.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the contained value.
    ///
    /// Panics when absent, mirroring `Option::unwrap`.
    pub fn unwrap(self) -> T {
        match self.value {
            Some(value) => value,
            None => panic!("called unwrap on an absent Maybe"),
        }
    }
}

impl<T: PartialEq> Maybe<T> {
    /// Present AND equal to the probe.
    pub fn is_some_equal(&self, probe: &T) -> bool {
        self.value.as_ref() == Some(probe)
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Self { value }
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.value {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

// TOML has no null, so the absent state travels as the "None" sentinel (or an
// empty/"null" string); JSON null deserializes through the unit arm.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum MaybeRepr<T> {
    Value(T),
    Sentinel(String),
    Null(()),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MaybeRepr::<T>::deserialize(deserializer)? {
            MaybeRepr::Value(value) => Ok(Maybe::some(value)),
            MaybeRepr::Null(()) => Ok(Maybe::none()),
            MaybeRepr::Sentinel(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case("null")
                    || trimmed.eq_ignore_ascii_case("none")
                {
                    Ok(Maybe::none())
                } else {
                    Err(de::Error::custom(format!(
                        "invalid tri-state text: {trimmed:?}"
                    )))
                }
            }
        }
    }
}
