//! Canonical encoder for the tnetstrings wire format.
//!
//! Every value becomes a frame `<length>:<payload><tag>` where `<length>` is the decimal byte count
//! of the payload and `<tag>` a single byte naming the kind of value. Containers concatenate the
//! frames of their children, so any reader can skip over a value without understanding it.
//!
//! The encoding is canonical: dictionary keys are always written in ascending byte order and floats
//! always carry exactly six fractional digits. The latter means floats do not survive a roundtrip
//! with full precision.
//!
//! All encoding functions take a value and a writer and return the amount of written bytes. Decoding
//! is not part of this crate.
//!
//! # Examples
//!
//! ```
//! use tnetstring::*;
//! use std::borrow::Cow;
//! use std::collections::BTreeMap;
//!
//! let mut buf = Vec::new();
//! let value = Value::Dict(BTreeMap::from([
//!     (Cow::Borrowed("name"), Value::from("Wantan")),
//!     (Cow::Borrowed("lives"), Value::from(vec![9, 8])),
//! ]));
//! let written = Encoder::encode(&value, &mut buf).unwrap();
//! assert_eq!(written, buf.len());
//! assert_eq!(buf, b"35:5:lives,8:1:9#1:8#]4:name,6:Wantan,}");
//! ```

mod error;
mod frame;
mod value;

#[cfg(test)]
mod reader;

pub use error::EncodeError;
pub use frame::{format_float, format_int, Sign, Tag, FLOAT_PRECISION};
pub use value::{Encoder, Value};

/// Encodes `value` into a fresh buffer.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    Encoder::encode(value, &mut buf)?;
    Ok(buf)
}
