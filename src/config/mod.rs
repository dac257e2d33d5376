//! Purpose: The configuration tree gating every lenient coercion.
//! Exports: `Config` and its section types, `BoolFromNumberAlg`, `RoundingAlg`,
//! `global`, `update`.
//! Role: Policy source for the decoder and the dirtifier.
//! Invariants: A section with `Disabled = true` behaves identically to an
//! absent section; an absent section materializes as a disabled one.
//! Invariants: `Config::empty()` makes the decoder behave as a strict decoder.

mod alg;
mod global;

pub use alg::{BoolFromNumberAlg, RoundingAlg};
pub use global::{global, update};

use serde::Deserialize;

use crate::core::error::{Error, ErrorKind};
use crate::core::maybe::Maybe;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    #[serde(rename = "Bool")]
    pub boolean: BoolConfig,
    pub number: NumberConfig,
    pub date: DateConfig,
    pub flex_keys: FlexKeysConfig,
}

impl Config {
    /// A configuration with every section disabled: decoding behaves exactly
    /// like the strict decoder.
    pub fn empty() -> Self {
        Self {
            boolean: BoolConfig::default(),
            number: NumberConfig::default(),
            date: DateConfig::default(),
            flex_keys: FlexKeysConfig::default(),
        }
    }

    /// The shipped defaults: every coercion family enabled with conservative
    /// parsing options, flexible keys off.
    pub fn standard() -> Self {
        Self {
            boolean: BoolConfig {
                disabled: false,
                fallback_value: Maybe::some(false),
                from_strings: BoolFromStringsConfig {
                    disabled: false,
                    custom_list_for_true: vec!["true".into(), "yes".into(), "on".into()],
                    custom_list_for_false: vec![
                        "false".into(),
                        "no".into(),
                        "off".into(),
                        String::new(),
                    ],
                    case_insensitive: true,
                    respect_from_numbers_logic: true,
                },
                from_numbers: BoolFromNumbersConfig {
                    disabled: false,
                    custom_parse_func: BoolFromNumberAlg::Binary,
                },
                from_null: BoolFromNullConfig {
                    disabled: false,
                    inverse: false,
                },
            },
            number: NumberConfig {
                disabled: false,
                from_strings: NumberFromStringsConfig {
                    disabled: false,
                    spacing_allowed: true,
                    exponent_notation_allowed: true,
                    commas_allowed: true,
                    rounding_algorithm: RoundingAlg::Floor,
                },
                from_bools: NumberFromBoolsConfig { disabled: false },
                from_null: NumberFromNullConfig { disabled: false },
            },
            date: DateConfig {
                disabled: false,
                timezone: DateTimezoneConfig {
                    disabled: false,
                    default: "UTC".into(),
                    fields: vec!["timezone".into(), "tz".into()],
                    force_converting_into: false,
                },
                from_numbers: DateFromNumbersConfig {
                    disabled: false,
                    unix_timestamp: true,
                    unix_milli_timestamp: true,
                },
                from_strings: DateFromStringsConfig {
                    disabled: false,
                    layouts: DateLayoutsConfig::standard(),
                    aliases: true,
                    respect_from_numbers_logic: true,
                },
                from_null: DateFromNullConfig { disabled: false },
            },
            flex_keys: FlexKeysConfig::default(),
        }
    }

    /// Parses a configuration from external TOML text and normalizes
    /// defaults. Absent sections come out disabled.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(data).map_err(|err| {
            Error::new(ErrorKind::ConfigParse)
                .with_message("config bytes are not valid utf-8")
                .with_source(err)
        })?;
        let mut cfg: Config = toml::from_str(text).map_err(|err| {
            Error::new(ErrorKind::ConfigParse)
                .with_message(err.to_string())
                .with_source(err)
        })?;
        cfg.normalize();
        Ok(cfg)
    }

    /// Resets to the clean state: dirty decoding disabled everywhere.
    pub fn reset_to_empty(&mut self) {
        *self = Config::empty();
    }

    /// Restores the shipped defaults.
    pub fn reset_to_default(&mut self) {
        *self = Config::standard();
    }

    // Fills leaves whose empty text forms stand for a default.
    fn normalize(&mut self) {
        if self.date.timezone.default.is_empty() {
            self.date.timezone.default = "UTC".into();
        }
        if self.date.timezone.fields.is_empty() {
            self.date.timezone.fields = vec!["tz".into(), "timezone".into()];
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::empty()
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct BoolConfig {
    pub disabled: bool,
    pub fallback_value: Maybe<bool>,
    pub from_strings: BoolFromStringsConfig,
    pub from_numbers: BoolFromNumbersConfig,
    pub from_null: BoolFromNullConfig,
}

impl BoolConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for BoolConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            fallback_value: Maybe::none(),
            from_strings: BoolFromStringsConfig::default(),
            from_numbers: BoolFromNumbersConfig::default(),
            from_null: BoolFromNullConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct BoolFromStringsConfig {
    pub disabled: bool,
    pub custom_list_for_true: Vec<String>,
    pub custom_list_for_false: Vec<String>,
    pub case_insensitive: bool,
    pub respect_from_numbers_logic: bool,
}

impl BoolFromStringsConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for BoolFromStringsConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            custom_list_for_true: Vec::new(),
            custom_list_for_false: Vec::new(),
            case_insensitive: false,
            respect_from_numbers_logic: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct BoolFromNumbersConfig {
    pub disabled: bool,
    pub custom_parse_func: BoolFromNumberAlg,
}

impl BoolFromNumbersConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for BoolFromNumbersConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            custom_parse_func: BoolFromNumberAlg::Binary,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct BoolFromNullConfig {
    pub disabled: bool,
    pub inverse: bool,
}

impl BoolFromNullConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for BoolFromNullConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            inverse: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct NumberConfig {
    pub disabled: bool,
    pub from_strings: NumberFromStringsConfig,
    pub from_bools: NumberFromBoolsConfig,
    pub from_null: NumberFromNullConfig,
}

impl NumberConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            from_strings: NumberFromStringsConfig::default(),
            from_bools: NumberFromBoolsConfig::default(),
            from_null: NumberFromNullConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct NumberFromStringsConfig {
    pub disabled: bool,
    pub spacing_allowed: bool,
    pub exponent_notation_allowed: bool,
    pub commas_allowed: bool,
    pub rounding_algorithm: RoundingAlg,
}

impl NumberFromStringsConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for NumberFromStringsConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            spacing_allowed: false,
            exponent_notation_allowed: false,
            commas_allowed: false,
            rounding_algorithm: RoundingAlg::None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct NumberFromBoolsConfig {
    pub disabled: bool,
}

impl NumberFromBoolsConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for NumberFromBoolsConfig {
    fn default() -> Self {
        Self { disabled: true }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct NumberFromNullConfig {
    pub disabled: bool,
}

impl NumberFromNullConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for NumberFromNullConfig {
    fn default() -> Self {
        Self { disabled: true }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DateConfig {
    pub disabled: bool,
    pub timezone: DateTimezoneConfig,
    pub from_numbers: DateFromNumbersConfig,
    pub from_strings: DateFromStringsConfig,
    pub from_null: DateFromNullConfig,
}

impl DateConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            timezone: DateTimezoneConfig::default(),
            from_numbers: DateFromNumbersConfig::default(),
            from_strings: DateFromStringsConfig::default(),
            from_null: DateFromNullConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DateTimezoneConfig {
    pub disabled: bool,
    pub default: String,
    /// Input key names recognized as a timezone override for sibling date
    /// fields.
    pub fields: Vec<String>,
    pub force_converting_into: bool,
}

impl DateTimezoneConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for DateTimezoneConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            default: "UTC".into(),
            fields: vec!["tz".into(), "timezone".into()],
            force_converting_into: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DateFromNumbersConfig {
    pub disabled: bool,
    pub unix_timestamp: bool,
    pub unix_milli_timestamp: bool,
}

impl DateFromNumbersConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for DateFromNumbersConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            unix_timestamp: false,
            unix_milli_timestamp: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DateFromStringsConfig {
    pub disabled: bool,
    pub layouts: DateLayoutsConfig,
    pub aliases: bool,
    pub respect_from_numbers_logic: bool,
}

impl DateFromStringsConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for DateFromStringsConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            layouts: DateLayoutsConfig::default(),
            aliases: false,
            respect_from_numbers_logic: false,
        }
    }
}

/// Layout lists are chrono format strings; the sentinels `rfc3339` and
/// `rfc2822` select the dedicated chrono parsers.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DateLayoutsConfig {
    pub time: Vec<String>,
    pub date: Vec<String>,
    pub date_time: Vec<String>,
}

impl DateLayoutsConfig {
    pub fn standard() -> Self {
        Self {
            time: vec!["%H:%M:%S".into(), "%H:%M".into(), "%I:%M %p".into()],
            date: vec![
                "%Y-%m-%d".into(),
                "%Y/%m/%d".into(),
                "%d.%m.%Y".into(),
                "%d %b %Y".into(),
            ],
            date_time: vec![
                "rfc3339".into(),
                "%Y-%m-%d %H:%M:%S".into(),
                "%Y-%m-%dT%H:%M:%S".into(),
                "%Y-%m-%d %H:%M".into(),
                "%d %b %Y %H:%M:%S".into(),
            ],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DateFromNullConfig {
    pub disabled: bool,
}

impl DateFromNullConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for DateFromNullConfig {
    fn default() -> Self {
        Self { disabled: true }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct FlexKeysConfig {
    pub disabled: bool,
    pub case_insensitive: bool,
    pub chameleon_case: bool,
}

impl FlexKeysConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for FlexKeysConfig {
    fn default() -> Self {
        Self {
            disabled: true,
            case_insensitive: false,
            chameleon_case: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoolFromNumberAlg, Config, RoundingAlg};

    #[test]
    fn empty_config_disables_everything() {
        let cfg = Config::empty();
        assert!(cfg.boolean.is_disabled());
        assert!(cfg.number.is_disabled());
        assert!(cfg.date.is_disabled());
        assert!(cfg.flex_keys.is_disabled());
        assert!(cfg.boolean.from_strings.is_disabled());
        assert!(cfg.number.from_null.is_disabled());
    }

    #[test]
    fn standard_config_content() {
        let cfg = Config::standard();
        assert!(!cfg.boolean.is_disabled());
        assert_eq!(
            cfg.boolean.from_strings.custom_list_for_true,
            ["true", "yes", "on"]
        );
        assert_eq!(
            cfg.boolean.from_strings.custom_list_for_false,
            ["false", "no", "off", ""]
        );
        assert!(cfg.boolean.fallback_value.is_some_equal(&false));
        assert_eq!(
            cfg.boolean.from_numbers.custom_parse_func,
            BoolFromNumberAlg::Binary
        );
        assert_eq!(
            cfg.number.from_strings.rounding_algorithm,
            RoundingAlg::Floor
        );
        assert_eq!(cfg.date.timezone.default, "UTC");
        assert_eq!(cfg.date.timezone.fields, ["timezone", "tz"]);
        assert!(cfg.date.from_numbers.unix_timestamp);
        assert!(cfg.date.from_numbers.unix_milli_timestamp);
        assert!(cfg.flex_keys.is_disabled());
    }

    #[test]
    fn absent_sections_parse_as_disabled() {
        let cfg = Config::from_bytes(
            br#"
[Bool]
Disabled = false

[Bool.FromStrings]
Disabled = false
CustomListForTrue = ["yep"]
CaseInsensitive = true
"#,
        )
        .unwrap();

        assert!(!cfg.boolean.is_disabled());
        assert!(!cfg.boolean.from_strings.is_disabled());
        assert_eq!(cfg.boolean.from_strings.custom_list_for_true, ["yep"]);
        assert!(cfg.boolean.from_numbers.is_disabled());
        assert!(cfg.number.is_disabled());
        assert!(cfg.date.is_disabled());
        assert!(cfg.flex_keys.is_disabled());
        // normalize() keeps timezone defaults present even for a disabled tree
        assert_eq!(cfg.date.timezone.default, "UTC");
        assert_eq!(cfg.date.timezone.fields, ["tz", "timezone"]);
    }

    #[test]
    fn enum_leaves_parse_text_forms() {
        let cfg = Config::from_bytes(
            br#"
[Bool.FromNumbers]
Disabled = false
CustomParseFunc = "sign_of_one"

[Number.FromStrings]
Disabled = false
RoundingAlgorithm = "round"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.boolean.from_numbers.custom_parse_func,
            BoolFromNumberAlg::SignOfOne
        );
        assert_eq!(
            cfg.number.from_strings.rounding_algorithm,
            RoundingAlg::Round
        );
    }

    #[test]
    fn fallback_value_accepts_toml_sentinel() {
        let cfg = Config::from_bytes(
            br#"
[Bool]
Disabled = false
FallbackValue = "None"
"#,
        )
        .unwrap();
        assert!(cfg.boolean.fallback_value.is_none());

        let cfg = Config::from_bytes(
            br#"
[Bool]
FallbackValue = true
"#,
        )
        .unwrap();
        assert!(cfg.boolean.fallback_value.is_some_equal(&true));
    }

    #[test]
    fn malformed_bytes_fail_with_config_parse() {
        let err = Config::from_bytes(b"Bool = {{{").unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::ConfigParse);
    }

    #[test]
    fn reset_round_trips() {
        let mut cfg = Config::standard();
        cfg.reset_to_empty();
        assert_eq!(cfg, Config::empty());
        cfg.reset_to_default();
        assert_eq!(cfg, Config::standard());
    }

    #[test]
    fn clone_is_independent() {
        let mut original = Config::standard();
        let snapshot = original.clone();
        original.boolean.disabled = true;
        original
            .boolean
            .from_strings
            .custom_list_for_true
            .push("sure".into());
        assert!(!snapshot.boolean.is_disabled());
        assert_eq!(
            snapshot.boolean.from_strings.custom_list_for_true,
            ["true", "yes", "on"]
        );
    }
}
