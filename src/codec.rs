//! Per-type string encodings for synced values.
//!
//! Each [`crate::synced::SyncedValue`] is built with one codec, chosen at
//! construction time. Encodings are bit-exact with what every other context
//! expects to find in the store: booleans as `"true"`/`"false"`, numbers as
//! decimal text read with float semantics, objects as JSON, strings raw.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Serializer/deserializer pair for one value type.
pub trait Codec<T> {
    /// Encode a value. `Ok(None)` means "remove the key".
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] when the value has no string form.
    fn encode(&self, value: &T) -> Result<Option<String>, CodecError>;
    /// Decode a stored, non-absent string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the text cannot represent a `T`.
    fn decode(&self, raw: &str) -> Result<T, CodecError>;
}

/// `"true"` is true; every other stored text is false.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolCodec;

impl Codec<bool> for BoolCodec {
    fn encode(&self, value: &bool) -> Result<Option<String>, CodecError> {
        Ok(Some(if *value { "true" } else { "false" }.to_owned()))
    }

    fn decode(&self, raw: &str) -> Result<bool, CodecError> {
        Ok(raw == "true")
    }
}

/// Decimal text read with leading-prefix float semantics.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberCodec;

impl Codec<f64> for NumberCodec {
    fn encode(&self, value: &f64) -> Result<Option<String>, CodecError> {
        Ok(Some(value.to_string()))
    }

    fn decode(&self, raw: &str) -> Result<f64, CodecError> {
        parse_float_prefix(raw).ok_or_else(|| CodecError::NotANumber(raw.to_owned()))
    }
}

/// Whole numbers stored as decimal text; fractional input truncates toward zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerCodec;

impl Codec<i64> for IntegerCodec {
    fn encode(&self, value: &i64) -> Result<Option<String>, CodecError> {
        Ok(Some(value.to_string()))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn decode(&self, raw: &str) -> Result<i64, CodecError> {
        match parse_float_prefix(raw) {
            Some(v) if v.is_finite() => Ok(v.trunc() as i64),
            _ => Err(CodecError::NotANumber(raw.to_owned())),
        }
    }
}

/// Plain strings, stored unencoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextCodec;

impl Codec<String> for TextCodec {
    fn encode(&self, value: &String) -> Result<Option<String>, CodecError> {
        Ok(Some(value.clone()))
    }

    fn decode(&self, raw: &str) -> Result<String, CodecError> {
        Ok(raw.to_owned())
    }
}

/// JSON text via serde.
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<Option<String>, CodecError> {
        serde_json::to_string(value).map(Some).map_err(CodecError::Encode)
    }

    fn decode(&self, raw: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// JSON for optional values: `None` removes the key, `"null"` reads as `None`.
pub struct OptionalJsonCodec<T>(PhantomData<fn() -> T>);

impl<T> OptionalJsonCodec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for OptionalJsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec<Option<T>> for OptionalJsonCodec<T> {
    fn encode(&self, value: &Option<T>) -> Result<Option<String>, CodecError> {
        match value {
            Some(v) => JsonCodec::<T>::new().encode(v),
            None => Ok(None),
        }
    }

    fn decode(&self, raw: &str) -> Result<Option<T>, CodecError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Parse the longest leading decimal float in `raw`, skipping leading
/// whitespace. `"42px"` yields 42, `"-.5e1x"` yields -5, `"abc"` yields `None`.
#[must_use]
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let v = if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
        return Some(v);
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}
