use serde::ser::{Impossible, Serialize, Serializer};
use log::debug;

use crate::error::{Error, Result};

/// Turns a map key into text. Dictionary keys are sorted byte-wise, which is only a meaningful order
/// for text, so every other kind of key is refused instead of being stringified.
pub(crate) struct KeySerializer;

macro_rules! must_be_text {
    ($name:literal: $ser:ident($($t:ty),*)) => {
        fn $ser(self, $(_: $t),*) -> Result<String> {
            refuse(concat!("map key of type ", $name))
        }
    };

    ($name:literal: $ser:ident<T>($($t:ty),*)) => {
        fn $ser<T: ?Sized + Serialize>(self, $(_: $t),*) -> Result<String> {
            refuse(concat!("map key of type ", $name))
        }
    };

    ($name:literal: $ser:ident($($t:ty),*) -> $res:ty) => {
        fn $ser(self, $(_: $t),*) -> Result<$res> {
            refuse(concat!("map key of type ", $name))
        }
    };
}

fn refuse<T>(kind: &'static str) -> Result<T> {
    debug!("refusing {}", kind);
    Err(Error::UnsupportedType(kind))
}

impl Serializer for KeySerializer {
    type Ok = String;
    type Error = Error;
    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<String> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    must_be_text!("bool": serialize_bool(bool));
    must_be_text!("i8": serialize_i8(i8));
    must_be_text!("i16": serialize_i16(i16));
    must_be_text!("i32": serialize_i32(i32));
    must_be_text!("i64": serialize_i64(i64));
    must_be_text!("i128": serialize_i128(i128));
    must_be_text!("u8": serialize_u8(u8));
    must_be_text!("u16": serialize_u16(u16));
    must_be_text!("u32": serialize_u32(u32));
    must_be_text!("u64": serialize_u64(u64));
    must_be_text!("u128": serialize_u128(u128));
    must_be_text!("f32": serialize_f32(f32));
    must_be_text!("f64": serialize_f64(f64));
    must_be_text!("bytes": serialize_bytes(&[u8]));
    must_be_text!("none": serialize_none());
    must_be_text!("unit": serialize_unit());
    must_be_text!("unit struct": serialize_unit_struct(&'static str));
    must_be_text!("newtype variant": serialize_newtype_variant<T>(&'static str, u32, &'static str, &T));
    must_be_text!("seq": serialize_seq(Option<usize>) -> Self::SerializeSeq);
    must_be_text!("tuple": serialize_tuple(usize) -> Self::SerializeTuple);
    must_be_text!("tuple struct": serialize_tuple_struct(&'static str, usize) -> Self::SerializeTupleStruct);
    must_be_text!("tuple variant": serialize_tuple_variant(&'static str, u32, &'static str, usize) -> Self::SerializeTupleVariant);
    must_be_text!("map": serialize_map(Option<usize>) -> Self::SerializeMap);
    must_be_text!("struct": serialize_struct(&'static str, usize) -> Self::SerializeStruct);
    must_be_text!("struct variant": serialize_struct_variant(&'static str, u32, &'static str, usize) -> Self::SerializeStructVariant);
}
