//! Purpose: Lenient scalar wrapper types used in dirty-twin structures.
//! Exports: `Number`, `Integer`, `Bool`, `Text`, `Array`, `Object`.
//! Role: Each wrapper deserializes by dispatching on the wire kind and
//! consulting the active configuration; each serializes as its clean value so
//! the merge step projects it into the strict field type.
//! Invariants: With the owning config section disabled, a wrapper decodes
//! exactly like its clean counterpart.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::{BoolConfig, NumberFromStringsConfig, RoundingAlg};
use crate::core::maybe::Maybe;
use crate::decode::bool_from_num;
use crate::decode::scope;

const MAX_MESSAGE_LENGTH: usize = 50;

fn limited(s: &str) -> String {
    if s.len() > MAX_MESSAGE_LENGTH {
        let cut: String = s.chars().take(MAX_MESSAGE_LENGTH).collect();
        format!("{cut}…")
    } else {
        s.to_string()
    }
}

/// Cleans and parses a numeric string under the FromStrings policy.
pub(crate) fn number_from_str(cfg: &NumberFromStringsConfig, s: &str) -> Result<f64, String> {
    let mut text = s.trim().to_string();
    if cfg.spacing_allowed {
        text.retain(|c| c != ' ');
    }
    if cfg.commas_allowed {
        text.retain(|c| c != ',');
    }
    if !cfg.exponent_notation_allowed && text.contains(['e', 'E']) {
        return Err("dirty number: exponent notation not allowed".to_string());
    }
    text.trim()
        .parse::<f64>()
        .map_err(|_| format!("dirty number: cannot parse number from {:?}", limited(s)))
}

pub(crate) fn integer_from_str(cfg: &NumberFromStringsConfig, s: &str) -> Result<i64, String> {
    let mut text = s.trim().to_string();
    if cfg.spacing_allowed {
        text.retain(|c| c != ' ');
    }
    if cfg.commas_allowed {
        text.retain(|c| c != ',');
    }
    if !cfg.exponent_notation_allowed && text.contains(['e', 'E']) {
        return Err("dirty integer: exponent notation not allowed".to_string());
    }
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Ok(n);
    }
    let n = text
        .parse::<f64>()
        .map_err(|_| format!("dirty integer: cannot parse number from {:?}", limited(s)))?;
    integer_from_float(cfg.rounding_algorithm, n)
}

pub(crate) fn integer_from_float(rounding: RoundingAlg, n: f64) -> Result<i64, String> {
    let rounded = match rounding {
        RoundingAlg::None => {
            return Err(format!(
                "dirty integer: float input not allowed without rounding ({n})"
            ));
        }
        RoundingAlg::Floor => n.floor(),
        RoundingAlg::Round => n.round(),
    };
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(format!("dirty integer: out of range ({n})"));
    }
    Ok(rounded as i64)
}

/// Resolves a string into a bool under the full Bool section policy.
/// Absent means the string carries no boolean meaning; callers error out.
pub(crate) fn bool_from_str(cfg: &BoolConfig, s: &str) -> Maybe<bool> {
    let strings = &cfg.from_strings;

    // An empty string absent from both custom lists is plain false.
    if s.is_empty()
        && !strings.custom_list_for_true.iter().any(|t| t.is_empty())
        && !strings.custom_list_for_false.iter().any(|t| t.is_empty())
    {
        return Maybe::some(false);
    }

    let matches = |entry: &str| {
        if strings.case_insensitive {
            entry.eq_ignore_ascii_case(s)
        } else {
            entry == s
        }
    };

    if !strings.custom_list_for_true.is_empty()
        && strings.custom_list_for_true.iter().any(|t| matches(t))
    {
        return Maybe::some(true);
    }
    if !strings.custom_list_for_false.is_empty()
        && strings.custom_list_for_false.iter().any(|t| matches(t))
    {
        return Maybe::some(false);
    }
    if matches("true") {
        return Maybe::some(true);
    }
    if matches("false") {
        return Maybe::some(false);
    }

    if strings.respect_from_numbers_logic {
        if let Ok(n) = s.parse::<f64>() {
            return bool_from_number(cfg, n);
        }
    }

    cfg.fallback_value
}

pub(crate) fn bool_from_number(cfg: &BoolConfig, n: f64) -> Maybe<bool> {
    let parsed = bool_from_num::apply(cfg.from_numbers.custom_parse_func, n);
    if parsed.is_some() {
        parsed
    } else {
        cfg.fallback_value
    }
}

/// Any number (integer, float, scientific).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Number(pub f64);

/// An integer number.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Integer(pub i64);

/// A boolean value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Bool(pub bool);

/// Simply a string. Anything except an actual JSON string is rejected.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Text(pub String);

/// An array of anything. Only a JSON array token or null is accepted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array(pub Vec<Value>);

/// A JSON-like string-keyed map. Only a JSON object token or null is accepted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object(pub Map<String, Value>);

impl From<Number> for f64 {
    fn from(v: Number) -> f64 {
        v.0
    }
}

impl From<Integer> for i64 {
    fn from(v: Integer) -> i64 {
        v.0
    }
}

impl From<Bool> for bool {
    fn from(v: Bool) -> bool {
        v.0
    }
}

impl From<Text> for String {
    fn from(v: Text) -> String {
        v.0
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl Serialize for Bool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.0)
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cfg = scope::active();
        if cfg.number.is_disabled() {
            return f64::deserialize(deserializer).map(Number);
        }

        struct NumberVisitor(std::sync::Arc<crate::config::Config>);

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a lenient number")
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Number, E> {
                Ok(Number(n as f64))
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Number, E> {
                Ok(Number(n as f64))
            }

            fn visit_f64<E: de::Error>(self, n: f64) -> Result<Number, E> {
                Ok(Number(n))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Number, E> {
                if self.0.number.from_bools.is_disabled() {
                    return Err(E::custom("dirty number: numbers from bools are not allowed"));
                }
                Ok(Number(if v { 1.0 } else { 0.0 }))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Number, E> {
                if self.0.number.from_null.is_disabled() {
                    return Err(E::custom("dirty number: numbers from nulls are not allowed"));
                }
                Ok(Number(0.0))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Number, E> {
                if self.0.number.from_strings.is_disabled() {
                    return Err(E::custom("dirty number: string input not allowed"));
                }
                number_from_str(&self.0.number.from_strings, s)
                    .map(Number)
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_any(NumberVisitor(cfg))
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cfg = scope::active();
        if cfg.number.is_disabled() {
            return i64::deserialize(deserializer).map(Integer);
        }

        struct IntegerVisitor(std::sync::Arc<crate::config::Config>);

        impl<'de> Visitor<'de> for IntegerVisitor {
            type Value = Integer;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a lenient integer")
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Integer, E> {
                Ok(Integer(n))
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Integer, E> {
                i64::try_from(n)
                    .map(Integer)
                    .map_err(|_| E::custom(format!("dirty integer: out of range ({n})")))
            }

            fn visit_f64<E: de::Error>(self, n: f64) -> Result<Integer, E> {
                integer_from_float(self.0.number.from_strings.rounding_algorithm, n)
                    .map(Integer)
                    .map_err(E::custom)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Integer, E> {
                if self.0.number.from_bools.is_disabled() {
                    return Err(E::custom(
                        "dirty integer: numbers from bools are not allowed",
                    ));
                }
                Ok(Integer(i64::from(v)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Integer, E> {
                if self.0.number.from_null.is_disabled() {
                    return Err(E::custom(
                        "dirty integer: numbers from nulls are not allowed",
                    ));
                }
                Ok(Integer(0))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Integer, E> {
                if self.0.number.from_strings.is_disabled() {
                    return Err(E::custom("dirty integer: string input not allowed"));
                }
                integer_from_str(&self.0.number.from_strings, s)
                    .map(Integer)
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IntegerVisitor(cfg))
    }
}

impl<'de> Deserialize<'de> for Bool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cfg = scope::active();
        if cfg.boolean.is_disabled() {
            return bool::deserialize(deserializer).map(Bool);
        }

        struct BoolVisitor(std::sync::Arc<crate::config::Config>);

        impl<'de> Visitor<'de> for BoolVisitor {
            type Value = Bool;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a lenient bool")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Bool, E> {
                Ok(Bool(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Bool, E> {
                let from_null = &self.0.boolean.from_null;
                if from_null.is_disabled() {
                    return Err(E::custom("dirty bool: bools from nulls are not allowed"));
                }
                Ok(Bool(from_null.inverse))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Bool, E> {
                self.visit_f64(n as f64)
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Bool, E> {
                self.visit_f64(n as f64)
            }

            fn visit_f64<E: de::Error>(self, n: f64) -> Result<Bool, E> {
                match bool_from_number(&self.0.boolean, n).get() {
                    Some(v) => Ok(Bool(*v)),
                    None => Err(E::custom(format!(
                        "dirty bool: unrecognized value for bool ({n})"
                    ))),
                }
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Bool, E> {
                if self.0.boolean.from_strings.is_disabled() {
                    return Err(E::custom("dirty bool: string input not allowed"));
                }
                match bool_from_str(&self.0.boolean, s.trim()).get() {
                    Some(v) => Ok(Bool(*v)),
                    None => Err(E::custom(format!(
                        "dirty bool: cannot parse string ({:?}) as bool",
                        limited(s)
                    ))),
                }
            }
        }

        deserializer.deserialize_any(BoolVisitor(cfg))
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = Text;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Text, E> {
                Ok(Text(s.trim().to_string()))
            }
        }

        deserializer.deserialize_any(TextVisitor)
    }
}

impl<'de> Deserialize<'de> for Array {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArrayVisitor;

        impl<'de> Visitor<'de> for ArrayVisitor {
            type Value = Array;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array or null")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Array, E> {
                Ok(Array::default())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Array, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<Value>()? {
                    items.push(item);
                }
                Ok(Array(items))
            }
        }

        deserializer.deserialize_any(ArrayVisitor)
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectVisitor;

        impl<'de> Visitor<'de> for ObjectVisitor {
            type Value = Object;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object or null")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Object, E> {
                Ok(Object::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Object, A::Error> {
                let mut map = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    map.insert(key, value);
                }
                Ok(Object(map))
            }
        }

        deserializer.deserialize_any(ObjectVisitor)
    }
}
