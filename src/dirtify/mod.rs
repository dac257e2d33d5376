//! Purpose: Generate dirty JSON from clean values for round-trip testing.
//! Exports: `Dirtifier`, `random_config`.
//! Role: The inverse of the lenient decoder: every perturbation it emits must
//! decode back to the original value under the same configuration.
//! Invariants: Disabled config sections are never exercised.
//! Invariants: Deterministic for a given coin seed.

mod random_config;

pub use random_config::random_config;

use serde_json::{Map, Number as JsonNumber, Value};

use crate::config::{BoolFromNumberAlg, Config};
use crate::core::casing::{self, CaseName};
use crate::core::coin::Coin;

/// Makes dirty JSON values from clean ones.
pub struct Dirtifier<'c> {
    /// How dirty the result ends up: 1.0 perturbs every eligible spot, 0.0
    /// leaves the value clean.
    threshold: f64,
    coin: Coin,
    cfg: &'c Config,
}

impl<'c> Dirtifier<'c> {
    pub fn new(threshold: f64, cfg: &'c Config, coin: Coin) -> Self {
        Self {
            threshold,
            coin,
            cfg,
        }
    }

    fn keep_clean(&mut self) -> bool {
        self.coin.chance(self.threshold)
    }

    /// Applies random dirtify-transformations through the value tree.
    pub fn make(&mut self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, element) in map {
                    out.insert(self.make_dirty_key(key), self.make(element));
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(items.iter().map(|item| self.make(item)).collect()),
            Value::Bool(v) => self.make_dirty_bool(*v),
            Value::Number(n) => self.make_dirty_number(n),
            // Strings (and nulls) are left unchanged.
            other => other.clone(),
        }
    }

    fn make_dirty_key(&mut self, key: &str) -> String {
        let flex = &self.cfg.flex_keys;
        if flex.is_disabled() || (!flex.case_insensitive && !flex.chameleon_case) {
            return key.to_string();
        }
        if self.keep_clean() {
            return key.to_string();
        }

        if casing::is_complex(key) && flex.chameleon_case && self.coin.flip() {
            let all_cases = [
                CaseName::Camel,
                CaseName::Snake,
                CaseName::Kebab,
                CaseName::Pascal,
                CaseName::Header,
                CaseName::TitleSnake,
                CaseName::Hybrid,
            ];
            let convert_to = self.coin.pick(&all_cases).copied().unwrap_or(CaseName::Snake);
            if convert_to == CaseName::Hybrid {
                return casing::transform_to_hybrid(key, &mut self.coin);
            }
            return casing::transform_to(key, convert_to);
        }

        if flex.case_insensitive && self.coin.flip() {
            // Shuffle the transforms and take the first one that actually
            // changes the key (an already-uppercase key ignores uppercasing).
            let mut transforms: [fn(&str) -> String; 3] =
                [str::to_uppercase, str::to_lowercase, capitalize_ascii];
            self.coin.shuffle(&mut transforms);
            for transform in transforms {
                let transformed = transform(key);
                if transformed != key {
                    return transformed;
                }
            }
        }

        key.to_string()
    }

    fn random_case(&mut self, s: &str) -> String {
        s.chars()
            .map(|c| {
                if self.coin.flip() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect()
    }

    fn make_dirty_bool(&mut self, v: bool) -> Value {
        let cfg = &self.cfg.boolean;
        if cfg.is_disabled() || self.keep_clean() {
            return Value::Bool(v);
        }

        // FromNull is handled as a follow-up on top of the string/number
        // flows, not as a flow of its own.
        let mut flows = Vec::new();
        if !cfg.from_strings.is_disabled() {
            flows.push("string");
        }
        if !cfg.from_numbers.is_disabled() {
            flows.push("number");
        }
        let Some(&flow) = self.coin.pick(&flows) else {
            return Value::Bool(v);
        };

        let mut stringified_number = false;
        if flow == "string" {
            let strings = &cfg.from_strings;
            // With numbers logic in play, half the time emit a stringified
            // number instead of a word; forced when the word list for this
            // side is empty.
            if strings.respect_from_numbers_logic {
                let list_empty = if v {
                    strings.custom_list_for_true.is_empty()
                } else {
                    strings.custom_list_for_false.is_empty()
                };
                if self.coin.flip() || list_empty {
                    stringified_number = true;
                }
            }

            if !stringified_number {
                let word = if v {
                    self.coin
                        .pick(&strings.custom_list_for_true)
                        .cloned()
                        .unwrap_or_else(|| "true".to_string())
                } else {
                    self.coin
                        .pick(&strings.custom_list_for_false)
                        .cloned()
                        .unwrap_or_else(|| "false".to_string())
                };
                let word = if strings.case_insensitive && self.coin.flip() {
                    self.random_case(&word)
                } else {
                    word
                };
                return self.maybe_bool_nilify(v, Value::String(word));
            }
        }

        let n: i64 = match cfg.from_numbers.custom_parse_func {
            BoolFromNumberAlg::Binary => i64::from(v),
            BoolFromNumberAlg::PositiveNegative => {
                if v {
                    self.coin.roll(1000) as i64 + 1
                } else {
                    -(self.coin.roll(1000) as i64)
                }
            }
            BoolFromNumberAlg::SignOfOne => {
                if v {
                    1
                } else {
                    -1
                }
            }
        };

        if stringified_number {
            self.maybe_bool_nilify(v, Value::String(n.to_string()))
        } else {
            self.maybe_bool_nilify(v, Value::Number(n.into()))
        }
    }

    fn make_dirty_number(&mut self, n: &JsonNumber) -> Value {
        let cfg = &self.cfg.number;
        if cfg.is_disabled() || self.keep_clean() {
            return Value::Number(n.clone());
        }

        let mut flows = Vec::new();
        if !cfg.from_strings.is_disabled() {
            flows.push("string");
        }
        if !cfg.from_bools.is_disabled() {
            flows.push("bool");
        }
        let Some(&flow) = self.coin.pick(&flows) else {
            return Value::Number(n.clone());
        };

        let as_float = n.as_f64().unwrap_or(0.0);

        if flow == "bool" {
            // Only 0 and 1 carry a boolean reading.
            if as_float == 0.0 || as_float == 1.0 {
                return self.maybe_number_nilify(as_float, Value::Bool(as_float != 0.0));
            }
            if cfg.from_strings.is_disabled() {
                return Value::Number(n.clone());
            }
            // Fall through to the string flow for other numbers.
        }

        let text = n.to_string();
        if !cfg.from_strings.exponent_notation_allowed && text.contains(['e', 'E']) {
            // The decimal text form would need exponent notation the decoder
            // is configured to reject.
            return Value::Number(n.clone());
        }
        self.maybe_number_nilify(as_float, Value::String(text))
    }

    // Substitutes null for a bool that would coerce back from null, at
    // reduced likelihood.
    fn maybe_bool_nilify(&mut self, v: bool, actual: Value) -> Value {
        if self.cfg.boolean.from_null.is_disabled() || self.keep_clean() {
            return actual;
        }
        if self.coin.flip() {
            return actual;
        }
        if v == self.cfg.boolean.from_null.inverse {
            return Value::Null;
        }
        actual
    }

    // Substitutes null for zero, at reduced likelihood.
    fn maybe_number_nilify(&mut self, v: f64, actual: Value) -> Value {
        if self.cfg.number.from_null.is_disabled() || self.keep_clean() {
            return actual;
        }
        if self.coin.flip() {
            return actual;
        }
        if v == 0.0 {
            return Value::Null;
        }
        actual
    }
}

fn capitalize_ascii(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::Dirtifier;
    use crate::config::Config;
    use crate::core::coin::Coin;

    #[test]
    fn zero_threshold_keeps_values_clean() {
        let cfg = Config::standard();
        let clean = json!({"id": 1, "is_active": true, "name": "foo"});
        let mut dirtifier = Dirtifier::new(0.0, &cfg, Coin::from_seed(5));
        assert_eq!(dirtifier.make(&clean), clean);
    }

    #[test]
    fn empty_config_keeps_values_clean() {
        let cfg = Config::empty();
        let clean = json!({"id": 1, "is_active": true, "nested": {"score": 0.5}});
        let mut dirtifier = Dirtifier::new(1.0, &cfg, Coin::from_seed(5));
        assert_eq!(dirtifier.make(&clean), clean);
    }

    #[test]
    fn full_threshold_dirties_bools() {
        let cfg = Config::standard();
        let mut dirtifier = Dirtifier::new(1.0, &cfg, Coin::from_seed(11));
        let mut saw_non_bool = false;
        for _ in 0..32 {
            let dirty = dirtifier.make(&json!({"flag": true}));
            let flag = &dirty["flag"];
            if !flag.is_boolean() {
                saw_non_bool = true;
                assert!(flag.is_string() || flag.is_number() || flag.is_null());
            }
        }
        assert!(saw_non_bool);
    }

    #[test]
    fn strings_are_never_touched() {
        let cfg = Config::standard();
        let mut dirtifier = Dirtifier::new(1.0, &cfg, Coin::from_seed(13));
        for _ in 0..16 {
            let dirty = dirtifier.make(&json!({"name": "unchanged"}));
            assert_eq!(dirty["name"], Value::String("unchanged".into()));
        }
    }

    #[test]
    fn keys_stay_clean_without_flex_keys() {
        // standard config ships with FlexKeys disabled
        let cfg = Config::standard();
        let mut dirtifier = Dirtifier::new(1.0, &cfg, Coin::from_seed(17));
        for _ in 0..16 {
            let dirty = dirtifier.make(&json!({"is_active": true}));
            assert!(dirty.get("is_active").is_some());
        }
    }

    #[test]
    fn chameleon_keys_keep_normalized_form() {
        let mut cfg = Config::standard();
        cfg.flex_keys.disabled = false;
        cfg.flex_keys.case_insensitive = true;
        cfg.flex_keys.chameleon_case = true;

        let mut dirtifier = Dirtifier::new(1.0, &cfg, Coin::from_seed(19));
        for _ in 0..32 {
            let dirty = dirtifier.make(&json!({"is_active": true}));
            let key = dirty
                .as_object()
                .unwrap()
                .keys()
                .next()
                .cloned()
                .unwrap();
            assert_eq!(crate::core::casing::normalize(&key), "isactive", "key {key:?}");
        }
    }
}
