// Numan Thabit 2025
//! Shared fixtures for the integration test suite: the `N = 3`, `T = {int32
//! a, uint16 b}`, `CONTEXT_SIZE = 8` scenario used throughout the spec.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use netsync_core::{ByteCursor, ContextCodec, FrameBuffer, PacketSource, ReadOutcome, RecordCodec};
use tokio::io::AsyncWrite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rec {
    pub a: i32,
    pub b: u16,
    /// Set by `apply_context`; not part of the wire payload.
    pub synced_tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ctx {
    pub tick: u64,
}

pub const MASK_A: u64 = 1 << 0;
pub const MASK_B: u64 = 1 << 1;

pub struct RecCodec;

impl RecordCodec<Rec, Ctx> for RecCodec {
    fn change_mask(new: &Rec, old: &Rec, _ctx: &Ctx) -> u64 {
        let mut mask = 0u64;
        if new.a != old.a {
            mask |= MASK_A;
        }
        if new.b != old.b {
            mask |= MASK_B;
        }
        mask
    }

    fn delta_size(mask: u64) -> usize {
        let mut size = 0;
        if mask & MASK_A != 0 {
            size += 4;
        }
        if mask & MASK_B != 0 {
            size += 2;
        }
        size
    }

    fn write_delta(record: &Rec, buf: &mut FrameBuffer, mask: u64) {
        if mask & MASK_A != 0 {
            buf.write_i32(record.a);
        }
        if mask & MASK_B != 0 {
            buf.write_u16(record.b);
        }
    }

    fn apply_delta(record: &mut Rec, cursor: &mut ByteCursor, mask: u64) {
        if mask & MASK_A != 0 {
            record.a = cursor.read_i32();
        }
        if mask & MASK_B != 0 {
            record.b = cursor.read_u16();
        }
    }

    fn apply_context(record: &mut Rec, ctx: &Ctx) {
        record.synced_tick = ctx.tick;
    }
}

pub struct CtxCodec;

impl ContextCodec<Ctx> for CtxCodec {
    const CONTEXT_SIZE: usize = 8;

    fn write(ctx: &Ctx, buf: &mut FrameBuffer) {
        buf.write_u64(ctx.tick);
    }

    fn read(cursor: &mut ByteCursor) -> Ctx {
        Ctx {
            tick: cursor.read_u64(),
        }
    }
}

pub type Engine = netsync_core::DeltaCompressor<Rec, Ctx, RecCodec, CtxCodec>;

/// A `Vec<u8>`-backed `AsyncWrite` sink for tests that need to inspect the
/// exact bytes a packet was encoded into.
#[derive(Default)]
pub struct VecSink(pub Vec<u8>);

impl AsyncWrite for VecSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut TaskContext<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.0.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        _cx: &mut TaskContext<'_>,
    ) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// A scripted `PacketSource` that hands out pre-recorded chunks one call at
/// a time, then reports completion. Used to drive fragmentation and
/// truncation scenarios deterministically.
pub struct ScriptedSource {
    chunks: VecDeque<Bytes>,
}

impl ScriptedSource {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Bytes::from).collect(),
        }
    }

    /// Splits `bytes` into one-byte chunks, simulating a maximally
    /// fragmented transport.
    pub fn byte_at_a_time(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().map(|&b| vec![b]).collect())
    }

    /// A single chunk containing only the first `k` bytes of `bytes`,
    /// followed by EOF — simulating a connection cut mid-packet.
    pub fn truncated(bytes: &[u8], k: usize) -> Self {
        Self::new(vec![bytes[..k].to_vec()])
    }
}

#[async_trait]
impl PacketSource for ScriptedSource {
    async fn read(&mut self) -> std::io::Result<ReadOutcome> {
        match self.chunks.pop_front() {
            Some(chunk) => Ok(ReadOutcome {
                chunk: Some(chunk),
                is_completed: false,
            }),
            None => Ok(ReadOutcome {
                chunk: None,
                is_completed: true,
            }),
        }
    }
}
