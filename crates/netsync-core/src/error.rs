// Numan Thabit 2025
use thiserror::Error;

/// Fatal error taxonomy. `NeedMore` never escapes this crate: short reads are
/// the normal, resumable case and are handled internally by rewinding.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("invalid snapshot length: expected {expected}, got {actual}")]
    ArgumentError { expected: usize, actual: usize },

    #[error("construction requires at least one record, got {actual}")]
    EmptyArray { actual: usize },

    #[error("varint decode overflowed 64 bits")]
    VarIntOverflow,

    #[error("record index {index} out of range for {len} records")]
    IndexOutOfRange { index: u64, len: usize },

    #[error("transport io error: {0}")]
    Io(#[from] std::io::Error),
}
