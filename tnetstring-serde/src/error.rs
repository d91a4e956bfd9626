use std::fmt::Display;
use serde::ser;
use thiserror::Error;
use tnetstring::EncodeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The value has no mapping onto the tnetstring data model. Carries the name of the offending kind.
    #[error("Unsupported type: {0}")]
    UnsupportedType(&'static str),
    /// Two entries of one dictionary resolved to the same key.
    #[error("Duplicate key `{0}`")]
    DuplicateKey(String),
    /// The sink failed or a float could not be written.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("{0}")]
    Message(String),
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
