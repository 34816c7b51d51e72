// Numan Thabit 2025
//! The pluggable per-record and per-packet serializer contracts.
//!
//! Implementations are pure, inlinable, zero-sized types — the hot loop in
//! `DeltaCompressor` calls `delta_size` once per changed record per packet,
//! so these should never incur dynamic dispatch. A typical implementation is
//! a unit struct: `struct PlayerStateCodec; impl RecordCodec<PlayerState,
//! TickContext> for PlayerStateCodec { ... }`.

use crate::cursor::ByteCursor;
use crate::frame_buffer::FrameBuffer;

/// Per-record delta serialization. `T` is the record type; `TContext` is the
/// packet-wide context applied to every record on decode.
pub trait RecordCodec<T, TContext> {
    /// Computes the change-mask of `new` against `old`. Must return 0 iff
    /// every user-visible field is equal; pure and side-effect free.
    fn change_mask(new: &T, old: &T, ctx: &TContext) -> u64;

    /// The exact number of payload bytes `write_delta` emits for `mask`.
    /// A pure function of `mask` alone — never inspects a record value —
    /// because the decoder calls it before any read that commits state.
    fn delta_size(mask: u64) -> usize;

    /// Writes exactly the fields flagged in `mask`, in a fixed order, no
    /// mask or length prefix (the engine writes those).
    fn write_delta(record: &T, buf: &mut FrameBuffer, mask: u64);

    /// Reads exactly `delta_size(mask)` bytes and assigns the flagged
    /// fields of `record` in place. Fields not flagged in `mask` are left
    /// untouched. The caller guarantees `delta_size(mask)` bytes are
    /// available before calling.
    fn apply_delta(record: &mut T, cursor: &mut ByteCursor, mask: u64);

    /// Applied to every record on every decoded packet, including records
    /// whose mask was zero, so packet-wide data (tick, timestamp) reaches
    /// the whole array.
    fn apply_context(record: &mut T, ctx: &TContext);
}

/// Per-packet context serialization. `CONTEXT_SIZE` must be a true
/// compile-time constant: `write` always emits exactly that many bytes and
/// `read` always consumes exactly that many.
pub trait ContextCodec<TContext> {
    const CONTEXT_SIZE: usize;

    fn write(ctx: &TContext, buf: &mut FrameBuffer);

    /// Reads exactly `CONTEXT_SIZE` bytes. The caller guarantees that many
    /// bytes are available before calling.
    fn read(cursor: &mut ByteCursor) -> TContext;
}
