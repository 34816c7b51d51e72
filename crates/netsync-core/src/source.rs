// Numan Thabit 2025
//! The incremental byte-reader contract the decoder pulls from.
//!
//! `DeltaCompressor::apply_packet` is transport-agnostic: it only knows how
//! to ask a `PacketSource` for the next chunk of bytes and whether the
//! upstream has signalled completion. `StreamSource` is a convenience
//! adapter over any `tokio::io::AsyncRead`, suitable for a TCP or UDS
//! connection; callers with their own framing (QUIC streams, a replay log)
//! can implement `PacketSource` directly instead.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

const DEFAULT_READ_CHUNK: usize = 4096;

/// One read from the upstream transport.
pub struct ReadOutcome {
    /// Bytes received this call, if any. `None`/empty is valid even when
    /// `is_completed` is false (e.g. a spurious wakeup).
    pub chunk: Option<Bytes>,
    /// True once the upstream has reported it will never produce more bytes.
    pub is_completed: bool,
}

/// The engine's view of a byte-stream transport.
#[async_trait]
pub trait PacketSource {
    async fn read(&mut self) -> std::io::Result<ReadOutcome>;
}

/// Adapts any `AsyncRead` into a `PacketSource` by repeatedly filling a
/// fixed-size scratch buffer.
pub struct StreamSource<R> {
    inner: R,
    chunk_size: usize,
}

impl<R: AsyncRead + Unpin> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, DEFAULT_READ_CHUNK)
    }

    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self { inner, chunk_size }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> PacketSource for StreamSource<R> {
    async fn read(&mut self) -> std::io::Result<ReadOutcome> {
        let mut scratch = BytesMut::with_capacity(self.chunk_size);
        let n = self.inner.read_buf(&mut scratch).await?;
        if n == 0 {
            return Ok(ReadOutcome {
                chunk: None,
                is_completed: true,
            });
        }
        Ok(ReadOutcome {
            chunk: Some(scratch.freeze()),
            is_completed: false,
        })
    }
}
