use thiserror::Error;

/// Errors raised while setting up a [`crate::engine::MorphEngine`].
///
/// These are contract violations caught at construction time. Once an
/// engine exists, ticking it cannot fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("particle buffers must hold at least one particle")]
    EmptyBuffer,
    #[error("buffer length mismatch: expected {expected} particles, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Errors raised while decoding a textual gesture sample.
#[derive(Debug, Error, PartialEq)]
pub enum SampleParseError {
    #[error("empty gesture sample")]
    Empty,
    #[error("expected 2 values (tension, expansion), found {0}")]
    FieldCount(usize),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("unknown field `{0}`")]
    UnknownField(String),
}
