//! Conveniently serialize your Rust data structures into the tnetstring wire format.
//!
//! # Records
//!
//! Structs are flattened into dictionaries. Which fields end up as keys, and under which name, is
//! decided by serde's derive attributes and therefore fixed at compile time:
//!
//! * `#[serde(rename = "other")]` changes the key of a field,
//! * `#[serde(skip)]` leaves a field out,
//! * `#[serde(skip_serializing_if = "tnetstring_serde::is_default")]` leaves a field out whenever it
//!   holds the default value of its type.
//!
//! Like every dictionary, the resulting keys are written in ascending byte order, regardless of the
//! order in which the fields are declared.
//!
//! # Maps
//!
//! Map keys must be text: strings, chars or unit enum variants. Integer or composite keys have no
//! meaningful text ordering and are refused with `Error::UnsupportedType`.
//!
//! # Byte blobs
//!
//! serde treats a `Vec<u8>` or `&[u8]` as a sequence of integers, so it becomes a list of `#`
//! frames. To write a blob as a single `,` frame, the same way `tnetstring::Value::from(&[u8])`
//! does, mark the field with `#[serde(with = "serde_bytes")]` or wrap it in `serde_bytes::Bytes`.
//!
//! # Examples
//!
//! ```
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! pub enum Species {
//!     PrionailurusViverrinus,
//!     LynxLynx,
//!     FelisCatus,
//! }
//!
//! #[derive(Serialize)]
//! pub struct Cat<'a> {
//!     name: &'a str,
//!     species: Species,
//!     #[serde(skip_serializing_if = "tnetstring_serde::is_default")]
//!     lives_lost: u8,
//! }
//!
//! #[derive(Serialize)]
//! struct Message<'a> {
//!     version: u32,
//!     cats: Vec<Cat<'a>>,
//! }
//!
//! let msg = Message {
//!     version: 1,
//!     cats: vec![
//!         Cat { name: "Jessica", species: Species::PrionailurusViverrinus, lives_lost: 0 },
//!         Cat { name: "Wantan", species: Species::LynxLynx, lives_lost: 2 },
//!     ],
//! };
//!
//! let bytes = tnetstring_serde::to_bytes(&msg).unwrap();
//! assert_eq!(bytes, [
//!     "142:",
//!         "4:cats,", "116:",
//!             "53:",
//!                 "4:name,", "7:Jessica,",
//!                 "7:species,", "22:PrionailurusViverrinus,",
//!             "}",
//!             "55:",
//!                 "10:lives_lost,", "1:2#",
//!                 "4:name,", "6:Wantan,",
//!                 "7:species,", "8:LynxLynx,",
//!             "}",
//!         "]",
//!         "7:version,", "1:1#",
//!     "}",
//! ].concat().as_bytes());
//! ```

mod error;
mod key;
mod ser;
mod value;

pub use error::{Error, Result};
pub use ser::{to_bytes, to_writer, DictSerializer, ListSerializer, Serializer};
pub use value::{to_value, SerializeDict, SerializeList, ValueSerializer};

/// Tells whether `value` equals the default of its type. Meant for
/// `#[serde(skip_serializing_if = "tnetstring_serde::is_default")]`.
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use std::collections::{BTreeMap, HashMap};
    use std::io::{self, Write};
    use tnetstring::EncodeError;
    use super::{is_default, to_bytes, to_value, to_writer, Error, Serializer};

    #[derive(Serialize, Debug, PartialEq, PartialOrd, Eq, Ord)]
    enum Species {
        FelisCatus,
        LynxLynx,
    }

    #[derive(Serialize)]
    struct Cat<'a> {
        name: &'a str,
        #[serde(rename = "kind")]
        species: Species,
        #[serde(skip)]
        #[allow(dead_code)]
        password: String,
        #[serde(skip_serializing_if = "is_default")]
        lives_lost: u8,
        #[serde(skip_serializing_if = "is_default")]
        nickname: String,
        owner: Option<&'a str>,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(u8),
        Rect(u8, u8),
        Named { id: u8 },
    }

    #[derive(Serialize)]
    struct UnitStruct;

    #[derive(Serialize)]
    struct Meters(u32);

    #[derive(Serialize)]
    struct TupleStruct(char, char);

    /// Emits its pairs as a map without any deduplication.
    struct RawPairs(Vec<(&'static str, u8)>);

    impl Serialize for RawPairs {
        fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
            s.collect_map(self.0.iter().map(|(k, v)| (k, v)))
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn scalars() {
        assert_bytes(b"5:hello,", &"hello");
        assert_bytes(b"3:123#", &123);
        assert_bytes(b"4:-123#", &-123i16);
        assert_bytes(b"20:18446744073709551615#", &u64::MAX);
        assert_bytes(b"20:-9223372036854775808#", &i64::MIN);
        assert_bytes(b"4:true!", &true);
        assert_bytes(b"0:~", &());
        assert_bytes(b"8:1.500000^", &1.5f32);
        assert_bytes(b"8:3.141593^", &std::f64::consts::PI);
        assert_bytes("2:ß,".as_bytes(), &'ß');
        assert_bytes("8:Grüße!,".as_bytes(), &"Grüße!".to_string());
    }

    #[test]
    fn wrappers_unwrap() {
        assert_bytes(b"0:~", &None::<u8>);
        assert_bytes(b"1:7#", &Some(7u8));
        assert_bytes(b"0:~", &Some(None::<u8>));
        assert_bytes(b"1:7#", &Box::new(7u8));
        assert_bytes(b"1:7#", &&&7u8);
        assert_bytes(b"1:5#", &Meters(5));
        assert_bytes(b"0:~", &UnitStruct);
    }

    #[test]
    fn sequences() {
        assert_bytes(b"12:1:1#1:2#1:3#]", &vec![1, 2, 3]);
        assert_bytes(b"0:]", &Vec::<u8>::new());
        assert_bytes(b"8:1:1#1:a,]", &(1, "a"));
        assert_bytes(b"8:1:x,1:y,]", &TupleStruct('x', 'y'));
        assert_bytes(b"9:0:]3:0:~]]", &vec![vec![None::<u8>; 0], vec![None]]);
    }

    #[test]
    fn wide_integers() {
        assert_bytes(b"40:-170141183460469231731687303715884105728#", &i128::MIN);
        assert_bytes(b"39:340282366920938463463374607431768211455#", &u128::MAX);
        assert_bytes(b"20:18446744073709551616#", &(u128::from(u64::MAX) + 1));
        assert_bytes(b"1:0#", &0i128);
        assert_bytes(b"12:5:wide,2:-1#}", &BTreeMap::from([("wide", -1i128)]));
    }

    #[test]
    fn bytes_are_strings() {
        assert_bytes(b"3:\x00\x01\xff,", serde_bytes::Bytes::new(&[0, 1, 255]));
        assert_bytes(b"14:1:0#1:1#3:255#]", &vec![0u8, 1, 255]);
        let blob = tnetstring::Value::from(&b"abc"[..]);
        assert_eq!(tnetstring::to_bytes(&blob).unwrap(), to_bytes(serde_bytes::Bytes::new(b"abc")).unwrap());
    }

    #[test]
    fn dictionaries() {
        assert_bytes(b"8:1:a,1:1#}", &BTreeMap::from([("a", 1)]));
        assert_bytes(b"0:}", &HashMap::<String, u8>::new());
        assert_bytes(b"33:10:FelisCatus,1:2#8:LynxLynx,1:1#}", &BTreeMap::from([(Species::LynxLynx, 1), (Species::FelisCatus, 2)]));
        assert_bytes(b"8:1:c,1:1#}", &BTreeMap::from([('c', 1)]));
    }

    #[test]
    fn dictionaries_are_deterministic() {
        let forward: HashMap<String, usize> = (0..100).map(|i| (format!("key{}", i), i)).collect();
        let backward: HashMap<String, usize> = (0..100).rev().map(|i| (format!("key{}", i), i)).collect();
        let sorted: BTreeMap<String, usize> = (0..100).map(|i| (format!("key{}", i), i)).collect();
        let expected = to_bytes(&sorted).unwrap();
        assert_eq!(expected, to_bytes(&forward).unwrap());
        assert_eq!(expected, to_bytes(&backward).unwrap());
    }

    #[test]
    fn records() {
        let plain = Cat {
            name: "Wantan",
            species: Species::LynxLynx,
            password: "hunter2".to_string(),
            lives_lost: 0,
            nickname: String::new(),
            owner: None,
        };
        assert_bytes(b"45:4:kind,8:LynxLynx,4:name,6:Wantan,5:owner,0:~}", &plain);
        let full = Cat { lives_lost: 2, nickname: "Wanti".to_string(), owner: Some("Liv"), ..plain };
        assert_bytes(b"85:4:kind,8:LynxLynx,10:lives_lost,1:2#4:name,6:Wantan,8:nickname,5:Wanti,5:owner,3:Liv,}", &full);
    }

    #[test]
    fn enums() {
        assert_bytes(b"5:Empty,", &Shape::Empty);
        assert_bytes(b"13:6:Circle,1:3#}", &Shape::Circle(3));
        assert_bytes(b"18:4:Rect,8:1:1#1:2#]}", &Shape::Rect(1, 2));
        assert_bytes(b"20:5:Named,9:2:id,1:7#}}", &Shape::Named { id: 7 });
    }

    #[test]
    fn unsupported_types_write_nothing() {
        let mut buf = Vec::new();
        let wide_keys = BTreeMap::from([(1u128, "one")]);
        assert!(matches!(to_writer(&mut buf, &wide_keys), Err(Error::UnsupportedType("map key of type u128"))));
        let int_keys = vec![HashMap::from([(1, "one")])];
        assert!(matches!(to_writer(&mut buf, &int_keys), Err(Error::UnsupportedType("map key of type i32"))));
        let list_keys = BTreeMap::from([(vec!["a"], 1)]);
        assert!(matches!(to_writer(&mut buf, &list_keys), Err(Error::UnsupportedType("map key of type seq"))));
        assert!(buf.is_empty());
        assert!(matches!(to_value(&int_keys), Err(Error::UnsupportedType("map key of type i32"))));
        assert!(matches!(to_value(&wide_keys), Err(Error::UnsupportedType("map key of type u128"))));
    }

    #[test]
    fn duplicate_keys() {
        let pairs = RawPairs(vec![("a", 1), ("b", 2), ("a", 3)]);
        assert!(matches!(to_bytes(&pairs), Err(Error::DuplicateKey(k)) if k == "a"));
        assert!(matches!(to_value(&pairs), Err(Error::DuplicateKey(k)) if k == "a"));
        assert_bytes(b"16:1:a,1:1#1:b,1:2#}", &RawPairs(vec![("b", 2), ("a", 1)]));
    }

    #[test]
    fn non_finite_floats() {
        let mut buf = Vec::new();
        assert!(matches!(to_writer(&mut buf, &vec![1.0, f64::NAN]), Err(Error::Encode(EncodeError::NonFiniteFloat(_)))));
        assert!(buf.is_empty());
    }

    #[test]
    fn sink_errors_pass_through() {
        match to_writer(BrokenPipe, &vec!["x"]) {
            Err(Error::Encode(EncodeError::Io(e))) => assert_eq!(io::ErrorKind::BrokenPipe, e.kind()),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn earlier_frames_stay_in_the_sink() {
        let mut serializer = Serializer::new(Vec::new());
        "kept".serialize(&mut serializer).unwrap();
        assert!(matches!(vec![f64::NAN].serialize(&mut serializer), Err(Error::Encode(_))));
        (1i128 << 100).serialize(&mut serializer).unwrap();
        assert_eq!(&b"4:kept,31:1267650600228229401496703205376#"[..], &serializer.into_inner()[..]);
    }

    #[test]
    fn value_and_stream_agree() {
        #[derive(Serialize)]
        struct Test {
            bool: bool,
            i8: i8,
            i16: i16,
            i32: i32,
            i64: i64,
            u8: u8,
            u16: u16,
            u32: u32,
            u64: u64,
            i128: i128,
            u128: u128,
            f32: f32,
            f64: f64,
            char: char,
            str: String,
            #[serde(with = "serde_bytes")]
            bytes: Vec<u8>,
            none: Option<u8>,
            some: Option<u8>,
            unit: (),
            unit_struct: UnitStruct,
            newtype_struct: Meters,
            seq: Vec<String>,
            tuple: (u16, u16, u16),
            map: HashMap<String, String>,
            unit_variant: Shape,
            newtype_variant: Shape,
            tuple_variant: Shape,
            struct_variant: Shape,
        }

        let message = Test {
            bool: true,
            i8: -1,
            i16: -20,
            i32: -7000,
            i64: i64::MIN,
            u8: 1,
            u16: 20,
            u32: 7000,
            u64: u64::MAX,
            i128: i128::MIN,
            u128: u128::MAX,
            f32: 1337.8472,
            f64: 1337.8472,
            char: 'x',
            str: "Test".to_string(),
            bytes: vec![0x31, 0x3a, 0x7e, 0x5d, 0xff],
            none: None,
            some: Some(0),
            unit: (),
            unit_struct: UnitStruct,
            newtype_struct: Meters(1701),
            seq: vec![
                "Elen".to_string(),
                "síla".to_string(),
                "lúmenn'".to_string(),
                "omentielvo".to_string(),
            ],
            tuple: (0, 0, 0),
            map: [
                ("1701".to_string(), "Enterprise".to_string()),
                ("74656".to_string(), "Voyager".to_string()),
            ].into_iter().collect(),
            unit_variant: Shape::Empty,
            newtype_variant: Shape::Circle(9),
            tuple_variant: Shape::Rect(3, 4),
            struct_variant: Shape::Named { id: 33 },
        };
        let value = to_value(&message).unwrap();
        println!("{}", &value);
        assert_eq!(tnetstring::to_bytes(&value).unwrap(), to_bytes(&message).unwrap());
    }

    #[test]
    fn default_values() {
        assert!(is_default(&0u8));
        assert!(is_default(&String::new()));
        assert!(is_default(&None::<u8>));
        assert!(is_default(&Vec::<u8>::new()));
        assert!(!is_default(&1.5f64));
        assert!(!is_default(&"x".to_string()));
    }

    fn assert_bytes<T: ?Sized + Serialize>(expected: &[u8], value: &T) {
        let streamed = to_bytes(value).unwrap();
        assert_eq!(expected, &streamed[..]);
        assert_eq!(streamed, tnetstring::to_bytes(&to_value(value).unwrap()).unwrap());
    }

}
