// Numan Thabit 2025
//! `netsync-core`: the packet encoder/decoder engine for synchronizing a
//! fixed-length array of small value-type records across a network link.
//!
//! A sender and receiver each hold a baseline snapshot (state as of the last
//! exchange) and a working snapshot (the latest known values). Encoding
//! diffs `working` against `baseline` field-by-field, via a pluggable
//! [`RecordCodec`], and writes only the fields that changed, prefixed by a
//! per-record change mask and index. Decoding parses that stream
//! incrementally, tolerating arbitrary fragmentation and truncation, and
//! applies a pluggable [`ContextCodec`]'s packet-wide context to every
//! record.
//!
//! This crate owns the wire format and the snapshot bookkeeping; it knows
//! nothing about the transport, the concrete record type, or how an initial
//! baseline is established (a keyframe mechanism is an external concern).
//!
//! ```text
//! u32  body_length
//! [ CONTEXT_SIZE bytes ]
//! repeated {
//!     varint index
//!     varint mask
//!     [ delta_size(mask) bytes ]
//! }
//! ```

mod codec;
mod cursor;
mod engine;
mod error;
mod frame_buffer;
mod source;
mod varint;
mod writer;

pub use codec::{ContextCodec, RecordCodec};
pub use cursor::ByteCursor;
pub use engine::DeltaCompressor;
pub use error::CodecError;
pub use frame_buffer::FrameBuffer;
pub use source::{PacketSource, ReadOutcome, StreamSource};
pub use varint::{try_decode as try_decode_varint, VarIntDecode, MAX_VARINT_LEN};
pub use writer::PacketWriter;
