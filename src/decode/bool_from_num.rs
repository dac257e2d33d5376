//! Purpose: The number→bool decision rules.
//! Exports: `apply`.
//! Invariants: Ambiguous inputs return an absent result; callers decide the
//! fallback.

use crate::config::BoolFromNumberAlg;
use crate::core::maybe::Maybe;

/// Applies the configured number→bool rule. Absent means the number carries
/// no boolean meaning under this algorithm.
pub(crate) fn apply(alg: BoolFromNumberAlg, n: f64) -> Maybe<bool> {
    match alg {
        BoolFromNumberAlg::Binary => {
            if n == 0.0 {
                Maybe::some(false)
            } else if n == 1.0 {
                Maybe::some(true)
            } else {
                Maybe::none()
            }
        }
        BoolFromNumberAlg::PositiveNegative => Maybe::some(n > 0.0),
        BoolFromNumberAlg::SignOfOne => {
            if n == -1.0 {
                Maybe::some(false)
            } else if n == 1.0 {
                Maybe::some(true)
            } else {
                Maybe::none()
            }
        }
    }
}
