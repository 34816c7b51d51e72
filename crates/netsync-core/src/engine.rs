// Numan Thabit 2025
//! The compressor engine: owns the baseline/working snapshot arrays and
//! drives encode and decode of delta packets.
//!
//! See the crate-level docs for the wire format. In short: a packet is a
//! little-endian `u32` body length, followed by a fixed-size context blob,
//! followed by zero or more `(varint index, varint mask, payload)` entries
//! in ascending index order.

use std::marker::PhantomData;

use tokio::io::AsyncWrite;
use tracing::{debug, trace, warn};

use crate::codec::{ContextCodec, RecordCodec};
use crate::cursor::{ByteCursor, SegmentedBuffer};
use crate::error::CodecError;
use crate::source::PacketSource;
use crate::varint::{self, MAX_VARINT_LEN};
use crate::writer::PacketWriter;

/// Owns the two snapshot arrays and drives encode/decode against them.
///
/// Not safe for concurrent use: at most one of `write_packet`, `apply_packet`,
/// `set_initial_state`, `advance_baseline` may run against a given instance
/// at any instant (see the crate-level concurrency notes).
pub struct DeltaCompressor<T, TContext, R, C> {
    baseline: Vec<T>,
    working: Vec<T>,
    _marker: PhantomData<(TContext, R, C)>,
}

impl<T, TContext, R, C> DeltaCompressor<T, TContext, R, C>
where
    T: Clone,
    R: RecordCodec<T, TContext>,
    C: ContextCodec<TContext>,
{
    /// Constructs an engine over `initial_state`, which becomes both the
    /// initial baseline and working snapshot. Rejects an empty array.
    pub fn new(initial_state: Vec<T>) -> Result<Self, CodecError> {
        if initial_state.is_empty() {
            return Err(CodecError::EmptyArray { actual: 0 });
        }
        Ok(Self {
            baseline: initial_state.clone(),
            working: initial_state,
            _marker: PhantomData,
        })
    }

    /// Number of records, `N`, fixed at construction.
    pub fn len(&self) -> usize {
        self.working.len()
    }

    /// Read-only view of `working`. Valid until the next call to any method
    /// on this engine (the buffer backing it may be swapped away).
    pub fn current_state(&self) -> &[T] {
        &self.working
    }

    /// Resets both `baseline` and `working` to a deep copy of `state`.
    /// Rejects a length mismatch against `N`.
    pub fn set_initial_state(&mut self, state: &[T]) -> Result<(), CodecError> {
        self.check_len(state.len())?;
        self.working.clone_from_slice(state);
        self.baseline.clone_from_slice(state);
        Ok(())
    }

    /// After a decode, copies `working` into `baseline` so a subsequent
    /// `write_packet` diffs against the state just received instead of the
    /// stale pre-decode baseline. Needed for relay/proxy use: without it the
    /// next re-encode would emit an empty delta and downstream peers would
    /// miss the change.
    pub fn advance_baseline(&mut self) {
        self.baseline.clone_from_slice(&self.working);
    }

    fn check_len(&self, actual: usize) -> Result<(), CodecError> {
        if actual != self.working.len() {
            return Err(CodecError::ArgumentError {
                expected: self.working.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Encodes `new_state` against the current baseline, writes one packet
    /// to `writer`, and swaps baseline/working so the next encode diffs
    /// against what was just sent.
    pub async fn write_packet<W: AsyncWrite + Unpin>(
        &mut self,
        writer: &mut PacketWriter<W>,
        new_state: &[T],
        ctx: &TContext,
    ) -> Result<(), CodecError> {
        self.check_len(new_state.len())?;
        self.working.clone_from_slice(new_state);

        let frame = writer.frame_mut();
        let len_slot = frame.reserve_length_prefix();
        let body_start = frame.len();

        C::write(ctx, frame);

        let mut varint_buf = [0u8; MAX_VARINT_LEN];
        let mut changed = 0usize;
        for (index, current) in self.working.iter().enumerate() {
            let mask = R::change_mask(current, &self.baseline[index], ctx);
            if mask == 0 {
                continue;
            }
            changed += 1;
            let n = varint::encode(index as u64, &mut varint_buf);
            frame.write_bytes(&varint_buf[..n]);
            let n = varint::encode(mask, &mut varint_buf);
            frame.write_bytes(&varint_buf[..n]);
            R::write_delta(current, frame, mask);
        }

        let body_len = (frame.len() - body_start) as u32;
        frame.patch_length_prefix(len_slot, body_len);
        trace!(changed, body_len, "encoded delta packet");

        // Swap before flush: the just-sent snapshot becomes next round's
        // baseline without an O(N) copy, and the stale baseline becomes the
        // scratch destination for the next `new_state` copy.
        std::mem::swap(&mut self.baseline, &mut self.working);

        writer.flush_frame().await?;
        Ok(())
    }

    /// Parses and applies delta packets from `source` until it reports
    /// completion. A truncated trailing packet followed by EOF is silently
    /// discarded, never an error.
    pub async fn apply_packet<S: PacketSource>(&mut self, source: &mut S) -> Result<(), CodecError> {
        let mut buffer = SegmentedBuffer::new();
        loop {
            let outcome = source.read().await?;
            if let Some(chunk) = outcome.chunk {
                buffer.push(chunk);
            }

            let mut cursor = buffer.cursor();
            let mut consumed = 0usize;
            loop {
                match self.try_read_one_packet(&mut cursor)? {
                    Some(end) => consumed = end,
                    None => break,
                }
            }
            buffer.consume(consumed);

            if outcome.is_completed {
                if buffer.len() > 0 {
                    warn!(
                        trailing_bytes = buffer.len(),
                        "discarding truncated trailing packet at end of stream"
                    );
                }
                break;
            }
        }
        Ok(())
    }

    /// Parses and applies at most one complete packet starting at the
    /// cursor's current position. Returns `Ok(Some(end))` with the cursor
    /// position just past the consumed packet on success, `Ok(None)` if the
    /// cursor did not contain a complete packet (rewound to where it
    /// started), or `Err` on a fatal protocol violation.
    fn try_read_one_packet(&mut self, cursor: &mut ByteCursor) -> Result<Option<usize>, CodecError> {
        let start = cursor.position();

        let Some(length) = cursor.try_read_u32() else {
            cursor.seek(start);
            return Ok(None);
        };
        let length = length as usize;

        if !cursor.has_remaining(length) {
            cursor.seek(start);
            return Ok(None);
        }
        let body_start = cursor.position();

        if !cursor.has_remaining(C::CONTEXT_SIZE) {
            cursor.seek(start);
            return Ok(None);
        }
        let ctx = C::read(cursor);

        while cursor.position().saturating_sub(body_start) < length {
            let index = match cursor.try_read_varint() {
                Ok(Some(v)) => v,
                Ok(None) => {
                    cursor.seek(start);
                    return Ok(None);
                }
                Err(()) => return Err(CodecError::VarIntOverflow),
            };
            let mask = match cursor.try_read_varint() {
                Ok(Some(v)) => v,
                Ok(None) => {
                    cursor.seek(start);
                    return Ok(None);
                }
                Err(()) => return Err(CodecError::VarIntOverflow),
            };

            if index >= self.working.len() as u64 {
                return Err(CodecError::IndexOutOfRange {
                    index,
                    len: self.working.len(),
                });
            }

            let payload = R::delta_size(mask);
            if !cursor.has_remaining(payload) {
                cursor.seek(start);
                return Ok(None);
            }
            R::apply_delta(&mut self.working[index as usize], cursor, mask);
        }

        for record in self.working.iter_mut() {
            R::apply_context(record, &ctx);
        }
        debug!(packet_len = length, "applied delta packet");

        Ok(Some(cursor.position()))
    }
}
