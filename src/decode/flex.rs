//! Purpose: Deserialize a buffered value tree with flexible object-key matching.
//! Exports: `Flex`, `key_matches`.
//! Role: The lenient-pass deserializer. serde's `deserialize_struct` hands us
//! the target's declared field names, so the traversal is type-directed
//! rather than reflective.
//! Invariants: With FlexKeys disabled this behaves as plain value decoding.
//! Invariants: Two input keys claiming one target field is an ambiguity error.

use serde::de::value::StrDeserializer;
use serde::de::{
    self, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::Value;

use crate::config::{Config, FlexKeysConfig};
use crate::core::casing;

/// Matches an input object key against a target field's wire name under the
/// current FlexKeys policy.
pub(crate) fn key_matches(input: &str, field: &str, flex: &FlexKeysConfig) -> bool {
    if input == field {
        return true;
    }
    if flex.is_disabled() {
        return false;
    }
    if flex.chameleon_case {
        return casing::normalize(input) == casing::normalize(field);
    }
    if flex.case_insensitive {
        return input.eq_ignore_ascii_case(field);
    }
    false
}

pub(crate) struct Flex<'de> {
    value: &'de Value,
    cfg: &'de Config,
}

impl<'de> Flex<'de> {
    pub(crate) fn new(value: &'de Value, cfg: &'de Config) -> Self {
        Self { value, cfg }
    }
}

impl<'de> Deserializer<'de> for Flex<'de> {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    visitor.visit_i64(i)
                } else if let Some(u) = n.as_u64() {
                    visitor.visit_u64(u)
                } else {
                    visitor.visit_f64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(items) => visitor.visit_seq(FlexSeq {
                iter: items.iter(),
                cfg: self.cfg,
            }),
            Value::Object(map) => visitor.visit_map(FlexEntries {
                iter: map.iter(),
                pending: None,
                cfg: self.cfg,
            }),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let Value::Object(map) = self.value else {
            // Let the visitor produce its own invalid-type error.
            return self.deserialize_any(visitor);
        };

        let flex = &self.cfg.flex_keys;
        let mut pairs: Vec<(&'static str, &'de Value)> = Vec::new();
        for (key, value) in map {
            let Some(idx) = fields.iter().position(|f| key_matches(key, f, flex)) else {
                // Unmatched input keys are skipped, not errors.
                continue;
            };
            let field = fields[idx];
            if pairs.iter().any(|(taken, _)| *taken == field) {
                return Err(de::Error::custom(format!(
                    "ambiguous key {key:?}: another input key already matched field {field:?}"
                )));
            }
            pairs.push((field, value));
        }

        visitor.visit_map(FlexFields {
            iter: pairs.into_iter(),
            pending: None,
            cfg: self.cfg,
        })
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.as_str().into_deserializer()),
            other => other.deserialize_enum(name, variants, visitor),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
        ignored_any
    }
}

struct FlexSeq<'de> {
    iter: std::slice::Iter<'de, Value>,
    cfg: &'de Config,
}

impl<'de> SeqAccess<'de> for FlexSeq<'de> {
    type Error = serde_json::Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        match self.iter.next() {
            Some(value) => seed.deserialize(Flex::new(value, self.cfg)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

// Plain maps keep their raw keys; only struct fields get flexible matching.
struct FlexEntries<'de> {
    iter: serde_json::map::Iter<'de>,
    pending: Option<&'de Value>,
    cfg: &'de Config,
}

impl<'de> MapAccess<'de> for FlexEntries<'de> {
    type Error = serde_json::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        match self.iter.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                let key: StrDeserializer<'de, serde_json::Error> =
                    key.as_str().into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
        match self.pending.take() {
            Some(value) => seed.deserialize(Flex::new(value, self.cfg)),
            None => Err(de::Error::custom("value requested before key")),
        }
    }
}

struct FlexFields<'de> {
    iter: std::vec::IntoIter<(&'static str, &'de Value)>,
    pending: Option<&'de Value>,
    cfg: &'de Config,
}

impl<'de> MapAccess<'de> for FlexFields<'de> {
    type Error = serde_json::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        match self.iter.next() {
            Some((field, value)) => {
                self.pending = Some(value);
                let key: StrDeserializer<'de, serde_json::Error> = field.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
        match self.pending.take() {
            Some(value) => seed.deserialize(Flex::new(value, self.cfg)),
            None => Err(de::Error::custom("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::{key_matches, Flex};
    use crate::config::{Config, FlexKeysConfig};

    fn flex(case_insensitive: bool, chameleon: bool) -> FlexKeysConfig {
        FlexKeysConfig {
            disabled: false,
            case_insensitive,
            chameleon_case: chameleon,
        }
    }

    #[test]
    fn exact_match_needs_no_policy() {
        assert!(key_matches("id", "id", &FlexKeysConfig::default()));
        assert!(!key_matches("ID", "id", &FlexKeysConfig::default()));
    }

    #[test]
    fn case_insensitive_match() {
        assert!(key_matches("IS_ACTIVE", "is_active", &flex(true, false)));
        assert!(!key_matches("Is-Active", "is_active", &flex(true, false)));
    }

    #[test]
    fn chameleon_match_erases_separators() {
        assert!(key_matches("Is-Active", "is_active", &flex(false, true)));
        assert!(key_matches("isActive", "is_active", &flex(true, true)));
        assert!(!key_matches("is_activated", "is_active", &flex(true, true)));
    }

    #[test]
    fn matcher_is_transitive_under_chameleon() {
        let policy = flex(true, true);
        let keys = ["is_active", "Is-Active", "isActive", "IS_ACTIVE"];
        for a in keys {
            for b in keys {
                for c in keys {
                    if key_matches(a, b, &policy) && key_matches(b, c, &policy) {
                        assert!(key_matches(a, c, &policy));
                    }
                }
            }
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        is_active: bool,
        name: String,
    }

    #[test]
    fn struct_fields_match_flexibly() {
        let mut cfg = Config::empty();
        cfg.flex_keys = flex(true, true);

        let value = json!({"Is-Active": true, "NAME": "foo", "extra": 1});
        let probe = Probe::deserialize(Flex::new(&value, &cfg)).unwrap();
        assert_eq!(
            probe,
            Probe {
                is_active: true,
                name: "foo".into()
            }
        );
    }

    #[test]
    fn duplicate_matches_are_ambiguous() {
        let mut cfg = Config::empty();
        cfg.flex_keys = flex(true, true);

        let value = json!({"is_active": true, "Is-Active": false, "name": "x"});
        let err = Probe::deserialize(Flex::new(&value, &cfg)).unwrap_err();
        assert!(err.to_string().contains("ambiguous key"));
    }

    #[test]
    fn plain_decoding_when_policy_disabled() {
        let cfg = Config::empty();
        let value = json!({"is_active": true, "name": "foo"});
        assert!(Probe::deserialize(Flex::new(&value, &cfg)).is_ok());

        let shifted = json!({"Is-Active": true, "name": "foo"});
        assert!(Probe::deserialize(Flex::new(&shifted, &cfg)).is_err());
    }
}
