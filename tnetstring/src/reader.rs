//! Minimal tnetstring reader, only used to check that encoded bytes parse back into the value they
//! came from. It trusts its input no further than the grammar requires.

use crate::frame::{Sign, Tag};
use crate::value::Value;
use nom::bytes::complete::take;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res};
use nom::error::{make_error, ErrorKind};
use nom::multi::many0;
use nom::sequence::{pair, terminated};
use nom::{Finish, IResult};
use std::borrow::Cow;
use std::str::from_utf8;

fn length(i: &[u8]) -> IResult<&[u8], usize> {
    map_res(map_res(terminated(digit1, char(':')), from_utf8), str::parse::<usize>)(i)
}

fn frame(i: &[u8]) -> IResult<&[u8], (&[u8], Tag)> {
    let (i, len) = length(i)?;
    let (i, payload) = take(len)(i)?;
    let (rest, tag) = map_res(take(1usize), |t: &[u8]| Tag::try_from(t[0]))(i)?;
    Ok((rest, (payload, tag)))
}

type Failure<'a> = nom::Err<nom::error::Error<&'a [u8]>>;

fn text(i: &[u8]) -> Result<&str, Failure<'_>> {
    from_utf8(i).map_err(|_| nom::Err::Failure(make_error(i, ErrorKind::Char)))
}

fn invalid(i: &[u8]) -> Failure<'_> {
    nom::Err::Failure(make_error(i, ErrorKind::Verify))
}

fn value(i: &[u8]) -> IResult<&[u8], Value<'_>> {
    let (rest, (payload, tag)) = frame(i)?;
    let value = match tag {
        Tag::Null if payload.is_empty() => Value::Null,
        Tag::Null                       => return Err(invalid(payload)),
        Tag::Bool => match payload {
            b"true"  => Value::Bool(true),
            b"false" => Value::Bool(false),
            _        => return Err(invalid(payload)),
        },
        Tag::Int => match text(payload)? {
            n if n.starts_with('-') => Value::Int(Sign::Neg, n[1..].parse().map_err(|_| invalid(payload))?),
            n                       => Value::Int(Sign::Pos, n.parse().map_err(|_| invalid(payload))?),
        },
        Tag::Float => Value::Float(text(payload)?.parse().map_err(|_| invalid(payload))?),
        Tag::Str   => Value::Str(Cow::Borrowed(payload)),
        Tag::List  => Value::List(all_consuming(many0(value))(payload)?.1),
        Tag::Dict  => {
            let (_, pairs) = all_consuming(many0(pair(value, value)))(payload)?;
            let mut dict = std::collections::BTreeMap::new();
            for (key, val) in pairs {
                match key {
                    Value::Str(Cow::Borrowed(key)) => { dict.insert(Cow::Borrowed(text(key)?), val); },
                    _                              => return Err(invalid(payload)),
                }
            }
            Value::Dict(dict)
        },
    };
    Ok((rest, value))
}

/// Decodes exactly one frame which must span the whole buffer.
pub fn decode(buf: &[u8]) -> Result<Value<'_>, nom::error::Error<&[u8]>> {
    all_consuming(value)(buf).finish().map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::frame::Sign;
    use crate::value::Value;

    #[test]
    fn accepts_canonical_frames() {
        assert_eq!(Value::Int(Sign::Neg, 5), decode(b"2:-5#").unwrap());
        assert_eq!(Value::List(vec![Value::Null, Value::Bool(true)]), decode(b"10:0:~4:true!]").unwrap());
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(decode(b"").is_err());
        assert!(decode(b"5:hello").is_err());
        assert!(decode(b"5:hello,trailing").is_err());
        assert!(decode(b"4:hello,").is_err());
        assert!(decode(b"1:x~").is_err());
        assert!(decode(b"3:yes!").is_err());
        assert!(decode(b"4:1:1#}").is_err());
        assert!(decode(b"3:abc?").is_err());
    }
}
