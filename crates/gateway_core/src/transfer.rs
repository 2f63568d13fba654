//! crates/gateway_core/src/transfer.rs
//!
//! The chunked transfer codec. A `ByteSource` of known size is cut into
//! `CHUNK_SIZE` frames, pushed in order through a `ChunkSink`, and the single
//! reply of the client-streaming call is returned. Uploads and image analysis
//! both go through `transfer`.

use bytes::Bytes;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace, warn};

use crate::context::RequestContext;
use crate::ports::{ChunkSink, PortError, PortResult};

/// Size of one frame on the wire (1 MiB).
pub const CHUNK_SIZE: usize = 1 << 20;

/// A file-like payload pending transfer. Consumed exactly once.
pub struct ByteSource {
    size: u64,
    content_type: String,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl ByteSource {
    pub fn new(
        reader: impl AsyncRead + Send + Unpin + 'static,
        size: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            size,
            content_type: content_type.into(),
            reader: Box::new(reader),
        }
    }

    /// Declared size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteSource")
            .field("size", &self.size)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Number of frames needed for `size` bytes.
pub fn chunk_count(size: u64, chunk_size: usize) -> u64 {
    size.div_ceil(chunk_size as u64)
}

/// Streams `source` into `sink` and returns the sink's reply.
///
/// Exactly `chunk_count(source.size(), CHUNK_SIZE)` frames are sent. A source
/// that ends before its declared size fails the transfer; nothing is retried.
pub async fn transfer<S>(
    ctx: &RequestContext,
    source: ByteSource,
    sink: Box<S>,
) -> PortResult<S::Reply>
where
    S: ChunkSink + ?Sized,
{
    transfer_in_chunks(ctx, source, sink, CHUNK_SIZE).await
}

async fn transfer_in_chunks<S>(
    ctx: &RequestContext,
    mut source: ByteSource,
    mut sink: Box<S>,
    chunk_size: usize,
) -> PortResult<S::Reply>
where
    S: ChunkSink + ?Sized,
{
    let chunks = chunk_count(source.size, chunk_size);
    debug!(
        parent: ctx.span(),
        size = source.size,
        content_type = %source.content_type,
        chunks,
        "starting chunked transfer"
    );

    let mut remaining = source.size;
    for index in 0..chunks {
        let want = remaining.min(chunk_size as u64) as usize;
        let mut buf = vec![0u8; want];
        source.reader.read_exact(&mut buf).await.map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                warn!(parent: ctx.span(), chunk = index, "payload ended before its declared size");
                PortError::InvalidRequest(format!(
                    "payload is shorter than its declared size of {} bytes",
                    source.size
                ))
            } else {
                PortError::Internal(format!("failed to read payload: {}", e))
            }
        })?;

        sink.send(Bytes::from(buf)).await?;
        remaining -= want as u64;
        trace!(parent: ctx.span(), chunk = index, bytes = want, "sent chunk");
    }

    let reply = sink.close_and_receive().await?;
    debug!(parent: ctx.span(), chunks, "chunked transfer complete");
    Ok(reply)
}
