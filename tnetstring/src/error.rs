use thiserror::Error;

/// Everything that can go wrong while writing a tnetstring.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The sink refused the bytes. The underlying error is passed through untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// NaN and the infinities have no fixed-point representation.
    #[error("Float {0} has no fixed-point representation")]
    NonFiniteFloat(f64),
}
