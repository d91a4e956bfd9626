use serde::ser::{self, Serialize};
use tnetstring::Value;
use log::debug;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::key::KeySerializer;

/// Classifies any serializable value into the closed tnetstring `Value` model.
///
/// Optional values are unwrapped: `None` becomes `Value::Null`, `Some(v)` becomes whatever `v` is.
/// Structs are flattened into dictionaries using their serialized field names, so serde's `rename`,
/// `skip` and `skip_serializing_if` attributes decide which keys appear.
///
/// ```
/// use serde::Serialize;
/// use tnetstring::Value;
///
/// #[derive(Serialize)]
/// struct Cat {
///     name: &'static str,
///     #[serde(skip)]
///     secret: u32,
/// }
///
/// let value = tnetstring_serde::to_value(&Cat { name: "Sphinx", secret: 3 }).unwrap();
/// assert_eq!("dictionary", value.kind());
/// assert_eq!(tnetstring::to_bytes(&value).unwrap(), b"16:4:name,6:Sphinx,}");
/// ```
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value<'static>> {
    value.serialize(ValueSerializer)
}

pub struct ValueSerializer;

fn insert(map: &mut BTreeMap<Cow<'static, str>, Value<'static>>, key: String, value: Value<'static>) -> Result<()> {
    if map.contains_key(key.as_str()) {
        debug!("refusing duplicate key {}", key);
        return Err(Error::DuplicateKey(key));
    }
    map.insert(Cow::Owned(key), value);
    Ok(())
}

fn wrap(variant: Option<&'static str>, value: Value<'static>) -> Value<'static> {
    match variant {
        None          => value,
        Some(variant) => Value::Dict(BTreeMap::from([(Cow::Borrowed(variant), value)])),
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value<'static>;
    type Error = Error;
    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeList;
    type SerializeMap = SerializeDict;
    type SerializeStruct = SerializeDict;
    type SerializeStructVariant = SerializeDict;

    fn serialize_bool(self, v: bool) -> Result<Value<'static>> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value<'static>> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value<'static>> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value<'static>> {
        Ok(Value::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value<'static>> {
        Ok(Value::from(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value<'static>> {
        Ok(Value::bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value<'static>> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value<'static>> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value<'static>> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value<'static>> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<Value<'static>> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<Value<'static>> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, _index: u32, variant: &'static str, value: &T) -> Result<Value<'static>> {
        Ok(wrap(Some(variant), value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList> {
        Ok(SerializeList { list: Vec::with_capacity(len.unwrap_or(0)), variant: None })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(self, _name: &'static str, _index: u32, variant: &'static str, len: usize) -> Result<SerializeList> {
        Ok(SerializeList { list: Vec::with_capacity(len), variant: Some(variant) })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeDict> {
        Ok(SerializeDict { dict: BTreeMap::new(), key: None, variant: None })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeDict> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(self, _name: &'static str, _index: u32, variant: &'static str, _len: usize) -> Result<SerializeDict> {
        Ok(SerializeDict { dict: BTreeMap::new(), key: None, variant: Some(variant) })
    }
}

pub struct SerializeList {
    list: Vec<Value<'static>>,
    variant: Option<&'static str>,
}

impl ser::SerializeSeq for SerializeList {
    type Ok = Value<'static>;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.list.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value<'static>> {
        Ok(wrap(self.variant, Value::List(self.list)))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = Value<'static>;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value<'static>> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = Value<'static>;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value<'static>> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeList {
    type Ok = Value<'static>;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value<'static>> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeDict {
    dict: BTreeMap<Cow<'static, str>, Value<'static>>,
    key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::SerializeMap for SerializeDict {
    type Ok = Value<'static>;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        match self.key.take() {
            Some(key) => insert(&mut self.dict, key, value.serialize(ValueSerializer)?),
            None      => Err(Error::Message("value serialized before its key".to_owned())),
        }
    }

    fn end(self) -> Result<Value<'static>> {
        Ok(wrap(self.variant, Value::Dict(self.dict)))
    }
}

impl ser::SerializeStruct for SerializeDict {
    type Ok = Value<'static>;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        insert(&mut self.dict, key.to_owned(), value.serialize(ValueSerializer)?)
    }

    fn end(self) -> Result<Value<'static>> {
        ser::SerializeMap::end(self)
    }
}

impl ser::SerializeStructVariant for SerializeDict {
    type Ok = Value<'static>;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        insert(&mut self.dict, key.to_owned(), value.serialize(ValueSerializer)?)
    }

    fn end(self) -> Result<Value<'static>> {
        ser::SerializeMap::end(self)
    }
}
