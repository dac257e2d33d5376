//! Purpose: Define the stable public Rust API boundary for Silt.
//! Exports: Decode entrypoints, configuration types, lenient scalar wrappers,
//! and the dirtifier test harness.
//! Role: Public, additive-only surface; hides internal coercion modules.
//! Invariants: This module is the only public path to decoder primitives.
//! Invariants: Internal modules remain private and are not directly exposed.

pub use crate::config::{
    global, update, BoolConfig, BoolFromNullConfig, BoolFromNumberAlg, BoolFromNumbersConfig,
    BoolFromStringsConfig, Config, DateConfig, DateFromNullConfig, DateFromNumbersConfig,
    DateFromStringsConfig, DateLayoutsConfig, DateTimezoneConfig, FlexKeysConfig,
    NumberConfig, NumberFromBoolsConfig, NumberFromNullConfig, NumberFromStringsConfig,
    RoundingAlg,
};
pub use crate::core::casing::{
    is as is_case, is_complex, normalize, split_words, transform_to, transform_to_hybrid, CaseName,
};
pub use crate::core::coin::Coin;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::maybe::Maybe;
pub use crate::decode::moment::{Date, DateTime, Time};
pub use crate::decode::scalar::{Array, Bool, Integer, Number, Object, Text};
pub use crate::decode::{
    from_slice, from_slice_report, from_slice_report_with, from_slice_with, from_str,
    from_str_with, from_value, scoped_from_slice, strict_from_slice, Color, Decoder, Dirtyable,
    Lenient, Report,
};
pub use crate::dirtify::{random_config, Dirtifier};
