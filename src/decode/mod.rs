//! Purpose: The two-pass strict-then-lenient decode dispatcher.
//! Exports: `Dirtyable`, `Lenient`, `Decoder`, `Color`, `Report`, decode entrypoints.
//! Role: Buffers the input value tree, tries strict decoding, falls back to the
//! consumer's dirty twin, and merges the recovered values back into the strict
//! shape.
//! Invariants: With `Config::empty()` the result is identical to strict serde_json.
//! Invariants: One config snapshot per top-level decode.

pub(crate) mod bool_from_num;
pub(crate) mod flex;
pub(crate) mod merge;
pub mod moment;
pub mod scalar;
pub(crate) mod scope;

use std::io::Read;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{self, Config};
use crate::core::error::{classify_decode, Error, ErrorKind};
use crate::json;

/// Links a strict ("clean") structure to its lenient twin.
///
/// The twin mirrors the strict field set, substituting lenient scalar
/// wrappers for the fields that should tolerate dirty representations.
/// Setting `LENIENT = false` opts the structure out of the fallback while
/// keeping the declaration shape intact.
pub trait Dirtyable: DeserializeOwned {
    type Twin: DeserializeOwned + Serialize;

    const LENIENT: bool = true;
}

/// Outcome colors for one decode call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    /// Strict decode alone succeeded.
    Green,
    /// The lenient fallback succeeded without field loss.
    Yellow,
    /// At least one field was dropped and left at its default.
    Red,
}

/// The decode outcome beside the recovered value: the color, the input keys
/// no twin field matched (kept verbatim), and the keys dropped in red mode.
#[derive(Clone, Debug)]
pub struct Report {
    pub color: Color,
    pub warnings: Vec<String>,
    pub dropped: Vec<String>,
}

impl Report {
    fn green() -> Self {
        Self {
            color: Color::Green,
            warnings: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

/// Runs the two-pass decode against a buffered value tree.
pub(crate) fn decode_value<T: Dirtyable>(
    value: &Value,
    cfg: Arc<Config>,
) -> Result<(T, Report), Error> {
    let _scope = scope::ConfigScope::enter(cfg.clone());

    // A clean pass is final unless flexible keys could still bind more input
    // keys to fields.
    match T::deserialize(value) {
        Ok(decoded) => {
            if cfg.flex_keys.is_disabled() || !T::LENIENT {
                return Ok((decoded, Report::green()));
            }
        }
        Err(err) => {
            if !T::LENIENT {
                return Err(classify_decode(err));
            }
        }
    }

    let twin = T::Twin::deserialize(flex::Flex::new(value, &cfg)).map_err(classify_decode)?;
    let twin_value = serde_json::to_value(&twin).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("serializing the dirty twin failed")
            .with_source(err)
    })?;

    let (merged, unmatched) = merge::overlay(value, &twin_value, &cfg);
    let warnings: Vec<String> = unmatched.iter().map(|p| merge::path_display(p)).collect();

    match T::deserialize(&merged) {
        Ok(decoded) => Ok((
            decoded,
            Report {
                color: Color::Yellow,
                warnings,
                dropped: Vec::new(),
            },
        )),
        Err(_) => {
            let (decoded, dropped) =
                merge::recover_with_drops::<T>(&merged, &unmatched).map_err(classify_decode)?;
            if !dropped.is_empty() {
                tracing::warn!(dropped = ?dropped, "lenient decode dropped fields");
            }
            let color = if dropped.is_empty() {
                Color::Yellow
            } else {
                Color::Red
            };
            Ok((
                decoded,
                Report {
                    color,
                    warnings,
                    dropped,
                },
            ))
        }
    }
}

/// Composition point for nesting an opted-in structure inside plain
/// containers: a `Vec<Lenient<Event>>` field runs the two-pass decode per
/// element.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Lenient<T>(pub T);

impl<T> Lenient<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Lenient<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<'de, T: Dirtyable> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let cfg = scope::active();
        decode_value::<T>(&value, cfg)
            .map(|(decoded, _report)| Lenient(decoded))
            .map_err(serde::de::Error::custom)
    }
}

impl<T: Serialize> Serialize for Lenient<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Lenient decode using the process-wide configuration.
pub fn from_slice<T: Dirtyable>(data: &[u8]) -> Result<T, Error> {
    from_slice_with(data, &config::global())
}

/// Lenient decode under an explicit configuration handle.
pub fn from_slice_with<T: Dirtyable>(data: &[u8], cfg: &Config) -> Result<T, Error> {
    from_slice_report_with(data, cfg).map(|(decoded, _)| decoded)
}

pub fn from_str<T: Dirtyable>(data: &str) -> Result<T, Error> {
    from_slice(data.as_bytes())
}

pub fn from_str_with<T: Dirtyable>(data: &str, cfg: &Config) -> Result<T, Error> {
    from_slice_with(data.as_bytes(), cfg)
}

/// Lenient decode of an already-parsed value tree.
pub fn from_value<T: Dirtyable>(value: &Value, cfg: &Config) -> Result<T, Error> {
    decode_value(value, Arc::new(cfg.clone())).map(|(decoded, _)| decoded)
}

/// Lenient decode that also returns the Green/Yellow/Red outcome.
pub fn from_slice_report<T: Dirtyable>(data: &[u8]) -> Result<(T, Report), Error> {
    from_slice_report_with(data, &config::global())
}

pub fn from_slice_report_with<T: Dirtyable>(
    data: &[u8],
    cfg: &Config,
) -> Result<(T, Report), Error> {
    let value = json::parse::value_from_slice(data)?;
    decode_value(&value, Arc::new(cfg.clone()))
}

/// Strict decode, byte-identical to serde_json; the baseline the lenient
/// paths are measured against.
pub fn strict_from_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, Error> {
    json::parse::from_slice(data).map_err(classify_decode)
}

/// Decode for containers that nest [`Lenient`] fields without being
/// [`Dirtyable`] themselves: the outer walk is strict, while nested lenient
/// structures honor the given configuration instead of the global one.
pub fn scoped_from_slice<T: DeserializeOwned>(data: &[u8], cfg: &Config) -> Result<T, Error> {
    let value = json::parse::value_from_slice(data)?;
    let _scope = scope::ConfigScope::enter(Arc::new(cfg.clone()));
    T::deserialize(&value).map_err(classify_decode)
}

/// The streaming form: reads one JSON document from a reader, then decodes.
pub struct Decoder<R> {
    reader: R,
    cfg: Option<Config>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, cfg: None }
    }

    /// Pins an explicit configuration instead of the process-wide one.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn decode<T: Dirtyable>(mut self) -> Result<T, Error> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf).map_err(|err| {
            Error::new(ErrorKind::InvalidEncoding)
                .with_message("failed to read input")
                .with_source(err)
        })?;
        match self.cfg.take() {
            Some(cfg) => from_slice_with(&buf, &cfg),
            None => from_slice(&buf),
        }
    }
}
