//! Purpose: Provide the internal strict JSON decode entrypoints.
//! Exports: `value_from_slice`, `from_slice`.
//! Role: Parser boundary that centralizes serde_json usage details.
//! Invariants: Token-level scanning is delegated entirely to serde_json.
//! Notes: Coercion error mapping is done by callsites so domain context stays explicit.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};

/// Parses one JSON document into a value tree; the buffering step of the
/// two-pass decode.
pub(crate) fn value_from_slice(input: &[u8]) -> Result<Value, Error> {
    serde_json::from_slice(input).map_err(|err| {
        Error::new(ErrorKind::InvalidEncoding)
            .with_message("invalid json input")
            .with_source(err)
    })
}

/// Strict decode of one JSON document, byte-identical to serde_json.
pub(crate) fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(input)
}
