//! Purpose: Enumerated coercion algorithms referenced by the config tree.
//! Exports: `BoolFromNumberAlg`, `RoundingAlg`.
//! Invariants: Text forms are snake_case; unknown text fails config parse
//! instead of degrading into an "undefined" variant.

use serde::{Deserialize, Serialize};

/// How a number turns into a bool.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolFromNumberAlg {
    /// 0 is false, 1 is true; anything else is unparsed (fallback value).
    Binary,
    /// Positive numbers are true; zero and negatives are false.
    PositiveNegative,
    /// -1 is false, +1 is true; anything else is unparsed (fallback value).
    SignOfOne,
}

impl BoolFromNumberAlg {
    pub const ALL: [BoolFromNumberAlg; 3] = [
        BoolFromNumberAlg::Binary,
        BoolFromNumberAlg::PositiveNegative,
        BoolFromNumberAlg::SignOfOne,
    ];
}

impl Default for BoolFromNumberAlg {
    fn default() -> Self {
        BoolFromNumberAlg::Binary
    }
}

/// How floats behave when the target is an integer.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingAlg {
    /// Integers cannot be parsed from floats.
    None,
    /// Floats floor into integers.
    Floor,
    /// Floats round into integers.
    Round,
}

impl RoundingAlg {
    pub const ALL: [RoundingAlg; 3] = [RoundingAlg::None, RoundingAlg::Floor, RoundingAlg::Round];
}

impl Default for RoundingAlg {
    fn default() -> Self {
        RoundingAlg::None
    }
}

#[cfg(test)]
mod tests {
    use super::{BoolFromNumberAlg, RoundingAlg};

    #[test]
    fn text_forms_round_trip() {
        let alg: BoolFromNumberAlg = serde_json::from_str("\"positive_negative\"").unwrap();
        assert_eq!(alg, BoolFromNumberAlg::PositiveNegative);
        assert_eq!(
            serde_json::to_string(&BoolFromNumberAlg::SignOfOne).unwrap(),
            "\"sign_of_one\""
        );

        let rounding: RoundingAlg = serde_json::from_str("\"floor\"").unwrap();
        assert_eq!(rounding, RoundingAlg::Floor);
    }

    #[test]
    fn unknown_text_is_rejected() {
        assert!(serde_json::from_str::<BoolFromNumberAlg>("\"ternary\"").is_err());
        assert!(serde_json::from_str::<RoundingAlg>("\"ceil\"").is_err());
    }
}
