// Numan Thabit 2025
//! The async byte-pipeline writer that `DeltaCompressor::write_packet` drives.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::frame_buffer::{BufferPool, FrameBuffer};

const DEFAULT_CAPACITY_HINT: usize = 256;

/// Vends a pooled `FrameBuffer` per packet and flushes it to the underlying
/// sink, returning the spent buffer to the pool instead of freeing it.
pub struct PacketWriter<W> {
    sink: W,
    pool: BufferPool,
    frame: FrameBuffer,
}

impl<W: AsyncWrite + Unpin> PacketWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_capacity_hint(sink, DEFAULT_CAPACITY_HINT)
    }

    pub fn with_capacity_hint(sink: W, capacity_hint: usize) -> Self {
        let mut pool = BufferPool::new(capacity_hint);
        let frame = FrameBuffer::new(pool.acquire());
        Self { sink, pool, frame }
    }

    pub(crate) fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    pub(crate) async fn flush_frame(&mut self) -> std::io::Result<()> {
        self.sink.write_all(self.frame.as_slice()).await?;
        self.sink.flush().await?;
        let spent = std::mem::replace(&mut self.frame, FrameBuffer::new(self.pool.acquire()));
        self.pool.release(spent.into_inner());
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }
}
