// Numan Thabit 2025
//! A pooled, growable byte buffer that the encoder writes packets into.
//!
//! `PacketWriter` hands out one `FrameBuffer` per packet, backed by a
//! `BytesMut` drawn from a small free-list. After a flush the buffer is
//! cleared and returned to the pool instead of being dropped, so steady-state
//! encoding does no per-packet heap allocation once the pool has warmed up.

use bytes::BytesMut;

const DEFAULT_POOL_CAP: usize = 8;

/// A tiny free-list of reusable `BytesMut` buffers.
pub struct BufferPool {
    free: Vec<BytesMut>,
    capacity_hint: usize,
    pool_cap: usize,
}

impl BufferPool {
    pub fn new(capacity_hint: usize) -> Self {
        Self {
            free: Vec::new(),
            capacity_hint,
            pool_cap: DEFAULT_POOL_CAP,
        }
    }

    pub fn acquire(&mut self) -> BytesMut {
        self.free
            .pop()
            .unwrap_or_else(|| BytesMut::with_capacity(self.capacity_hint))
    }

    pub fn release(&mut self, mut buf: BytesMut) {
        if self.free.len() < self.pool_cap {
            buf.clear();
            self.free.push(buf);
        }
    }
}

/// The byte-level sink that `RecordCodec` and `ContextCodec` implementations
/// write into. Purely synchronous; no knowledge of the underlying transport.
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    pub(crate) fn new(buf: BytesMut) -> Self {
        Self { buf }
    }

    pub(crate) fn into_inner(self) -> BytesMut {
        self.buf
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.extend_from_slice(&[v]);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.write_u8(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Reserves 4 bytes for a little-endian body-length prefix, returning the
    /// offset to patch once the body has been written.
    pub(crate) fn reserve_length_prefix(&mut self) -> usize {
        let at = self.buf.len();
        self.buf.extend_from_slice(&[0u8; 4]);
        at
    }

    pub(crate) fn patch_length_prefix(&mut self, at: usize, body_len: u32) {
        self.buf[at..at + 4].copy_from_slice(&body_len.to_le_bytes());
    }
}
