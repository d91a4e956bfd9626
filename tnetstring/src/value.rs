//! The atom of a tnetstring is the `Value`.
//! Scalars are written straight to the sink since their payload length is known up front. Lists and
//! dictionaries need the length of all their children first, so those children are encoded into a
//! scratch buffer which then becomes the payload of the container's frame.

use crate::error::EncodeError;
use crate::frame::{format_float, format_int, Sign, Tag};
use log::trace;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::str::from_utf8;

/// The possible values according to the tnetstring data model.
///
/// Dictionary keys are text and live in a `BTreeMap`, which hands them out in byte-wise ascending
/// order. That order is the canonical one, so two dictionaries with the same pairs always produce
/// the same bytes.
///
/// Integers are a sign and a magnitude wide enough for every primitive integer type. Both signs of
/// zero encode to `0` and therefore compare equal.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(Sign, u128),
    Float(f64),
    Str(Cow<'a, [u8]>),
    List(Vec<Value<'a>>),
    Dict(BTreeMap<Cow<'a, str>, Value<'a>>),
}

impl<'a> Value<'a> {

    /// A string value holding arbitrary bytes. There is no separate tag for binary data.
    pub fn bytes<B: Into<Cow<'a, [u8]>>>(bytes: B) -> Self {
        Value::Str(bytes.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null      => "null",
            Self::Bool(_)   => "boolean",
            Self::Int(_, _) => "integer",
            Self::Float(_)  => "float",
            Self::Str(_)    => "string",
            Self::List(_)   => "list",
            Self::Dict(_)   => "dictionary",
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::Null      => Tag::Null,
            Self::Bool(_)   => Tag::Bool,
            Self::Int(_, _) => Tag::Int,
            Self::Float(_)  => Tag::Float,
            Self::Str(_)    => Tag::Str,
            Self::List(_)   => Tag::List,
            Self::Dict(_)   => Tag::Dict,
        }
    }

    fn quote(f: &mut std::fmt::Formatter<'_>, bytes: &[u8]) -> std::fmt::Result {
        match from_utf8(bytes) {
            Ok(s)  => write!(f, "{:?}", s),
            Err(_) => write!(f, "b\"{}\"", bytes.escape_ascii()),
        }
    }

}

impl<'a> PartialEq for Value<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null)               => true,
            (Value::Bool(a), Value::Bool(b))         => a == b,
            (Value::Int(_, 0), Value::Int(_, 0))     => true,
            (Value::Int(s, a), Value::Int(t, b))     => s == t && a == b,
            (Value::Float(a), Value::Float(b))       => a == b,
            (Value::Str(a), Value::Str(b))           => a == b,
            (Value::List(a), Value::List(b))         => a == b,
            (Value::Dict(a), Value::Dict(b))         => a == b,
            _                                        => false,
        }
    }
}

impl<'a> std::fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null         => f.write_str("null"),
            Value::Bool(true)   => f.write_str("true"),
            Value::Bool(false)  => f.write_str("false"),
            Value::Int(s, v)    => f.write_str(&format_int(*s, *v)),
            Value::Float(v)     => write!(f, "{}", v),
            Value::Str(v)       => Self::quote(f, v),
            Value::List(v)      => write!(f, "[\n{}\n]", v.iter()
                .flat_map(|v| format!("{},", v).lines().map(|line| format!("  {}", line)).collect::<Vec<String>>())
                .collect::<Vec<String>>().join("\n")),
            Value::Dict(v)      => write!(f, "{{\n{}\n}}", v.iter()
                .flat_map(|(k, v)| format!("{:?}: {},", k, v).lines().map(|line| format!("  {}", line)).collect::<Vec<String>>())
                .collect::<Vec<String>>().join("\n")),
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                let v = v as i128;
                match v < 0 {
                    true  => Value::Int(Sign::Neg, v.unsigned_abs()),
                    false => Value::Int(Sign::Pos, v.unsigned_abs()),
                }
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Int(Sign::Pos, v as u128)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, i128, isize);
from_unsigned!(u8, u16, u32, u64, u128, usize);

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(Cow::Borrowed(v.as_bytes()))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v.into_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Str(Cow::Borrowed(v))
    }
}

/// `None` collapses to `Null`, `Some` is transparent.
impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None    => Value::Null,
        }
    }
}

impl<'a, T: Into<Value<'a>>> From<Vec<T>> for Value<'a> {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<'a, T: Into<Value<'a>>> From<BTreeMap<String, T>> for Value<'a> {
    fn from(v: BTreeMap<String, T>) -> Self {
        Value::Dict(v.into_iter().map(|(k, v)| (Cow::Owned(k), v.into())).collect())
    }
}

impl<'a, T: Into<Value<'a>>> From<HashMap<String, T>> for Value<'a> {
    fn from(v: HashMap<String, T>) -> Self {
        Value::Dict(v.into_iter().map(|(k, v)| (Cow::Owned(k), v.into())).collect())
    }
}

/// Writes values to a sink. Holds nothing but the sink, so every call starts from scratch.
pub struct Encoder<'w, W: Write> {
    writer: &'w mut W,
}

impl<'w, W: Write> Encoder<'w, W> {

    /// Encode a value to the given writer. The resulting `usize` is the amount of bytes that got written.
    ///
    /// If encoding a child of a container fails, nothing of that container reaches the writer.
    pub fn encode(value: &Value, writer: &'w mut W) -> Result<usize, EncodeError> {
        Self { writer }.encode_inner(value)
    }

    fn encode_inner(&mut self, value: &Value) -> Result<usize, EncodeError> {
        match value {
            Value::Null        => Tag::Null.encode(b"", self.writer),
            Value::Bool(true)  => Tag::Bool.encode(b"true", self.writer),
            Value::Bool(false) => Tag::Bool.encode(b"false", self.writer),
            Value::Int(s, v)   => Tag::Int.encode(format_int(*s, *v).as_bytes(), self.writer),
            Value::Float(v)    => Tag::Float.encode(format_float(*v)?.as_bytes(), self.writer),
            Value::Str(v)      => Tag::Str.encode(v, self.writer),
            Value::List(inner) => {
                let mut buf = Vec::new();
                for value in inner.iter() {
                    Encoder::encode(value, &mut buf)?;
                }
                self.encode_container(Tag::List, &buf)
            },
            Value::Dict(inner) => {
                let mut buf = Vec::new();
                for (key, value) in inner.iter() {
                    Tag::Str.encode(key.as_bytes(), &mut buf)?;
                    Encoder::encode(value, &mut buf)?;
                }
                self.encode_container(Tag::Dict, &buf)
            },
        }
    }

    fn encode_container(&mut self, tag: Tag, payload: &[u8]) -> Result<usize, EncodeError> {
        trace!("flushing {} frame with {} byte payload", tag.name(), payload.len());
        tag.encode(payload, self.writer)
    }

}
