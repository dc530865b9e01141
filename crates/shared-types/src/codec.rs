//! # Codec
//!
//! Marshal/unmarshal and type-tagged wrapping for values stored inside a
//! transaction's generic payload.

use crate::errors::CodecError;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Upper bound on a single decoded value.
pub const MAX_DECODE_BYTES: u64 = 16 * 1024 * 1024;

/// Type-tagged payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Any {
    /// Identifies the concrete type encoded in `value`.
    pub type_url: String,
    /// Encoded value.
    pub value: Vec<u8>,
}

/// Types that can be wrapped in an [`Any`].
pub trait TypeUrl {
    /// Stable tag written into [`Any::type_url`].
    const TYPE_URL: &'static str;
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_DECODE_BYTES)
}

/// Encode a value.
pub fn marshal<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    options()
        .serialize(value)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a value, rejecting trailing bytes.
pub fn unmarshal<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    options()
        .deserialize(bytes)
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Wrap a value with its type tag.
pub fn to_any<T: Serialize + TypeUrl>(value: &T) -> Result<Any, CodecError> {
    Ok(Any {
        type_url: T::TYPE_URL.to_string(),
        value: marshal(value)?,
    })
}

/// Unwrap a value, checking its type tag.
pub fn from_any<T: DeserializeOwned + TypeUrl>(any: &Any) -> Result<T, CodecError> {
    if any.type_url != T::TYPE_URL {
        return Err(CodecError::TypeUrlMismatch {
            expected: T::TYPE_URL.to_string(),
            actual: any.type_url.clone(),
        });
    }
    unmarshal(&any.value)
}
