use serde::{ser, Serialize};
use tnetstring::{format_float, Tag};
use log::{debug, trace};
use std::io::Write;

use crate::error::{Error, Result};
use crate::key::KeySerializer;

/// Streams tnetstring frames into a writer.
///
/// Scalars go to the writer as soon as they are seen. Lists and dictionaries are assembled in a
/// scratch buffer first because their frame starts with the length of everything inside. A failure
/// anywhere inside a container therefore leaves the writer untouched.
pub struct Serializer<W> {
    output: W,
}

pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new(Vec::new());
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

pub fn to_writer<T: ?Sized + Serialize, W: Write>(writer: W, value: &T) -> Result<()> {
    let mut serializer = Serializer::new(writer);
    value.serialize(&mut serializer)?;
    Ok(())
}

impl<W: Write> Serializer<W> {

    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn frame(&mut self, tag: Tag, payload: &[u8]) -> Result<()> {
        tag.encode(payload, &mut self.output)?;
        Ok(())
    }

    fn container(&mut self, tag: Tag, payload: &[u8], variant: Option<&'static str>) -> Result<()> {
        trace!("flushing {} frame with {} byte payload", tag.name(), payload.len());
        match variant {
            None          => self.frame(tag, payload),
            Some(variant) => {
                let mut pair = Vec::new();
                Tag::Str.encode(variant.as_bytes(), &mut pair)?;
                tag.encode(payload, &mut pair)?;
                self.frame(Tag::Dict, &pair)
            },
        }
    }

}

/// Serializes `value` as a standalone frame into `buf`.
fn encode_into<T: ?Sized + Serialize>(buf: &mut Vec<u8>, value: &T) -> Result<()> {
    value.serialize(&mut Serializer::new(buf))
}

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {

    type Ok = ();
    type Error = Error;
    type SerializeSeq = ListSerializer<'a, W>;
    type SerializeTuple = ListSerializer<'a, W>;
    type SerializeTupleStruct = ListSerializer<'a, W>;
    type SerializeTupleVariant = ListSerializer<'a, W>;
    type SerializeMap = DictSerializer<'a, W>;
    type SerializeStruct = DictSerializer<'a, W>;
    type SerializeStructVariant = DictSerializer<'a, W>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        let payload: &[u8] = match v { true => b"true", false => b"false" };
        self.frame(Tag::Bool, payload)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.frame(Tag::Int, v.to_string().as_bytes())
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.frame(Tag::Int, v.to_string().as_bytes())
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.frame(Tag::Int, v.to_string().as_bytes())
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.frame(Tag::Int, v.to_string().as_bytes())
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.frame(Tag::Float, format_float(v)?.as_bytes())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_str(v.encode_utf8(&mut [0; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.frame(Tag::Str, v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.frame(Tag::Str, v)
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.frame(Tag::Null, b"")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, _index: u32, variant: &'static str, value: &T) -> Result<()> {
        let mut pair = Vec::new();
        Tag::Str.encode(variant.as_bytes(), &mut pair)?;
        encode_into(&mut pair, value)?;
        self.container(Tag::Dict, &pair, None)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(ListSerializer { ser: self, buf: Vec::new(), variant: None })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(self, _name: &'static str, _index: u32, variant: &'static str, _len: usize) -> Result<Self::SerializeTupleVariant> {
        Ok(ListSerializer { ser: self, buf: Vec::new(), variant: Some(variant) })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(DictSerializer { ser: self, pairs: Pairs::default(), key: None, variant: None })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(self, _name: &'static str, _index: u32, variant: &'static str, _len: usize) -> Result<Self::SerializeStructVariant> {
        Ok(DictSerializer { ser: self, pairs: Pairs::default(), key: None, variant: Some(variant) })
    }

}

pub struct ListSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    buf: Vec<u8>,
    variant: Option<&'static str>,
}

impl<'a, W: Write> ser::SerializeSeq for ListSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        encode_into(&mut self.buf, value)
    }

    fn end(self) -> Result<()> {
        self.ser.container(Tag::List, &self.buf, self.variant)
    }

}

impl<'a, W: Write> ser::SerializeTuple for ListSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        ser::SerializeSeq::end(self)
    }
}

impl<'a, W: Write> ser::SerializeTupleStruct for ListSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        ser::SerializeSeq::end(self)
    }
}

impl<'a, W: Write> ser::SerializeTupleVariant for ListSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        ser::SerializeSeq::end(self)
    }
}

/// Encoded dictionary entries waiting to be put into canonical order.
#[derive(Default)]
pub(crate) struct Pairs {
    entries: Vec<(String, Vec<u8>)>,
}

impl Pairs {

    fn push<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        let mut buf = Vec::new();
        encode_into(&mut buf, value)?;
        self.entries.push((key, buf));
        Ok(())
    }

    /// Sorts the entries by key and concatenates key and value frames.
    fn into_payload(mut self) -> Result<Vec<u8>> {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(w) = self.entries.windows(2).find(|w| w[0].0 == w[1].0) {
            debug!("refusing duplicate key {}", w[0].0);
            return Err(Error::DuplicateKey(w[0].0.clone()));
        }
        let mut payload = Vec::new();
        for (key, value) in self.entries.iter() {
            Tag::Str.encode(key.as_bytes(), &mut payload)?;
            payload.extend_from_slice(value);
        }
        Ok(payload)
    }

}

pub struct DictSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    pairs: Pairs,
    key: Option<String>,
    variant: Option<&'static str>,
}

impl<'a, W: Write> DictSerializer<'a, W> {
    fn end_dict(self) -> Result<()> {
        let payload = self.pairs.into_payload()?;
        self.ser.container(Tag::Dict, &payload, self.variant)
    }
}

impl<'a, W: Write> ser::SerializeMap for DictSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        match self.key.take() {
            Some(key) => self.pairs.push(key, value),
            None      => Err(Error::Message("value serialized before its key".to_owned())),
        }
    }

    fn end(self) -> Result<()> {
        self.end_dict()
    }

}

impl<'a, W: Write> ser::SerializeStruct for DictSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.pairs.push(key.to_owned(), value)
    }

    fn end(self) -> Result<()> {
        self.end_dict()
    }

}

impl<'a, W: Write> ser::SerializeStructVariant for DictSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.pairs.push(key.to_owned(), value)
    }

    fn end(self) -> Result<()> {
        self.end_dict()
    }

}
