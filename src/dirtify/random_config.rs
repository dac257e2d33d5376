//! Purpose: Generate randomized configurations for round-trip property tests.
//! Exports: `random_config`.
//! Invariants: Every disable-able section is flipped independently; enum
//! leaves always hold a valid algorithm.

use crate::config::{BoolFromNumberAlg, Config, DateLayoutsConfig, RoundingAlg};
use crate::core::coin::Coin;
use crate::core::maybe::Maybe;

const DICT_TRUES: [&str; 6] = ["true", "yes", "on", "1", "ok", "yep"];
const DICT_FALSES: [&str; 7] = ["false", "no", "off", "0", "nah", "nope", ""];

/// A configuration with every disable-able section independently flipped,
/// custom word lists drawn as random subsets of fixed dictionaries, and
/// enumeration leaves chosen uniformly.
pub fn random_config(coin: &mut Coin) -> Config {
    let mut cfg = Config::empty();

    cfg.boolean.disabled = coin.flip();
    cfg.boolean.fallback_value = Maybe::some(coin.flip());
    cfg.boolean.from_strings.disabled = coin.flip();
    if !cfg.boolean.from_strings.disabled {
        cfg.boolean.from_strings.custom_list_for_true = random_subset(&DICT_TRUES, 3, 6, coin);
        cfg.boolean.from_strings.custom_list_for_false = random_subset(&DICT_FALSES, 3, 6, coin);
        cfg.boolean.from_strings.case_insensitive = coin.flip();
        cfg.boolean.from_strings.respect_from_numbers_logic = coin.flip();
    }
    cfg.boolean.from_numbers.disabled = coin.flip();
    cfg.boolean.from_numbers.custom_parse_func = pick_alg(coin);
    cfg.boolean.from_null.disabled = coin.flip();
    cfg.boolean.from_null.inverse = coin.flip();

    cfg.number.disabled = coin.flip();
    cfg.number.from_strings.disabled = coin.flip();
    if !cfg.number.from_strings.disabled {
        cfg.number.from_strings.spacing_allowed = coin.flip();
        cfg.number.from_strings.exponent_notation_allowed = coin.flip();
        cfg.number.from_strings.commas_allowed = coin.flip();
        cfg.number.from_strings.rounding_algorithm = *coin
            .pick(&RoundingAlg::ALL)
            .unwrap_or(&RoundingAlg::Floor);
    }
    cfg.number.from_bools.disabled = coin.flip();
    cfg.number.from_null.disabled = coin.flip();

    cfg.date.disabled = coin.flip();
    if !cfg.date.disabled {
        cfg.date.from_strings.disabled = coin.flip();
        cfg.date.from_strings.layouts = DateLayoutsConfig::standard();
        cfg.date.from_strings.aliases = coin.flip();
        cfg.date.from_strings.respect_from_numbers_logic = coin.flip();
        cfg.date.from_numbers.disabled = coin.flip();
        cfg.date.from_numbers.unix_timestamp = coin.flip();
        cfg.date.from_numbers.unix_milli_timestamp = coin.flip();
        cfg.date.from_null.disabled = coin.flip();
    }

    cfg.flex_keys.disabled = coin.flip();
    if !cfg.flex_keys.disabled {
        cfg.flex_keys.case_insensitive = coin.flip();
        cfg.flex_keys.chameleon_case = coin.flip();
    }

    cfg
}

fn pick_alg(coin: &mut Coin) -> BoolFromNumberAlg {
    *coin
        .pick(&BoolFromNumberAlg::ALL)
        .unwrap_or(&BoolFromNumberAlg::Binary)
}

fn random_subset(dict: &[&str], min: usize, max: usize, coin: &mut Coin) -> Vec<String> {
    let count = (min + coin.roll(max - min + 1)).min(dict.len());
    let mut shuffled: Vec<String> = dict.iter().map(|s| s.to_string()).collect();
    coin.shuffle(&mut shuffled);
    shuffled.truncate(count);
    shuffled
}

#[cfg(test)]
mod tests {
    use super::{random_config, random_subset, DICT_FALSES, DICT_TRUES};
    use crate::core::coin::Coin;

    #[test]
    fn subsets_stay_within_bounds() {
        let mut coin = Coin::from_seed(23);
        for _ in 0..64 {
            let subset = random_subset(&DICT_TRUES, 3, 6, &mut coin);
            assert!(subset.len() >= 3 && subset.len() <= 6);
            for word in &subset {
                assert!(DICT_TRUES.contains(&word.as_str()));
            }
        }
    }

    #[test]
    fn false_dictionary_includes_the_empty_string() {
        assert!(DICT_FALSES.contains(&""));
    }

    #[test]
    fn generated_configs_vary_and_stay_valid() {
        let mut coin = Coin::from_seed(29);
        let mut saw_enabled_bool = false;
        let mut saw_disabled_bool = false;
        for _ in 0..64 {
            let cfg = random_config(&mut coin);
            if cfg.boolean.is_disabled() {
                saw_disabled_bool = true;
            } else {
                saw_enabled_bool = true;
            }
            if !cfg.boolean.from_strings.is_disabled() {
                let trues = &cfg.boolean.from_strings.custom_list_for_true;
                assert!(trues.len() >= 3);
            }
        }
        assert!(saw_enabled_bool && saw_disabled_bool);
    }

    #[test]
    fn same_seed_same_config() {
        let a = random_config(&mut Coin::from_seed(31));
        let b = random_config(&mut Coin::from_seed(31));
        assert_eq!(a, b);
    }
}
