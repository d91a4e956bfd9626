//! A tnetstring frame is `<length>:<payload><tag>`. The length is the decimal byte count of the
//! payload, excluding the colon and the tag. The tag is a single trailing byte which tells a reader
//! how to interpret the payload. Frames are self-delimiting, so containers simply concatenate the
//! frames of their children.

use crate::error::EncodeError;
use std::fmt;
use std::io::Write;

/// Number of fractional digits every float payload carries.
pub const FLOAT_PRECISION: usize = 6;

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Tag {
    /// Raw bytes. Text and byte blobs share this tag.
    Str = b',',
    /// Base-10 integer with an optional leading minus
    Int = b'#',
    /// Fixed-point decimal with `FLOAT_PRECISION` fractional digits
    Float = b'^',
    /// Either `true` or `false`
    Bool = b'!',
    /// Always has an empty payload
    Null = b'~',
    /// Key and value frames, alternating, keys in ascending order
    Dict = b'}',
    /// Child frames in order
    List = b']',
}

impl Tag {

    /// Returns the mnemonic of the tag. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Tag::Str   => "Str",
            Tag::Int   => "Int",
            Tag::Float => "Float",
            Tag::Bool  => "Bool",
            Tag::Null  => "Null",
            Tag::Dict  => "Dict",
            Tag::List  => "List",
        }
    }

    #[inline]
    pub fn byte(&self) -> u8 {
        *self as u8
    }

    /// Writes `payload` framed by its length and this tag. Returns the number of written bytes.
    pub fn encode<W: Write>(&self, payload: &[u8], w: &mut W) -> Result<usize, EncodeError> {
        let prefix = format!("{}:", payload.len());
        w.write_all(prefix.as_bytes())?;
        w.write_all(payload)?;
        w.write_all(&[self.byte()])?;
        Ok(prefix.len() + payload.len() + 1)
    }

}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            b',' => Ok(Tag::Str),
            b'#' => Ok(Tag::Int),
            b'^' => Ok(Tag::Float),
            b'!' => Ok(Tag::Bool),
            b'~' => Ok(Tag::Null),
            b'}' => Ok(Tag::Dict),
            b']' => Ok(Tag::List),
            x    => Err(x),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.byte() as char)
    }
}

/// The sign of an integer. Negative zero is accepted but written as plain `0`, and compares equal to
/// positive zero inside a `Value`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sign { Pos, Neg }

/// Canonical integer payload: no leading zeros, a minus only for nonzero negatives.
pub fn format_int(sign: Sign, magnitude: u128) -> String {
    match sign {
        Sign::Neg if magnitude != 0 => format!("-{}", magnitude),
        _                           => magnitude.to_string(),
    }
}

/// Canonical float payload. This rounds to `FLOAT_PRECISION` digits and therefore loses
/// information for most values.
pub fn format_float(value: f64) -> Result<String, EncodeError> {
    if value.is_finite() {
        Ok(format!("{:.*}", FLOAT_PRECISION, value))
    } else {
        Err(EncodeError::NonFiniteFloat(value))
    }
}
