//! The resumable, seek-capable chunk pipeline: wraps a
//! [`ChunkEnvelope`] around a byte source and lets both upload and download
//! restart at an arbitrary *output* byte offset despite chunk alignment.
//!
//! The offset math in [`ChunkPlan`] is the one part of this crate that must
//! be exact — see the module docs on why: crypto cannot skip chunks it
//! hasn't processed, so a decrypting resume always starts from a chunk
//! boundary and discards a prefix of the over-read first chunk.

use tokio::io::{AsyncRead, AsyncReadExt};

use secsend_crypto::envelope::ChunkEnvelope;

use crate::error::Result;

/// Resolves an output-byte offset into where the envelope and the source
/// stream need to resume from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Chunk index the envelope's counter must be seeked to
    pub chunk_idx: u64,
    /// Byte offset the *source* stream must be seeked to before reading
    pub chunk_seek: u64,
    /// Bytes to discard from the first processed chunk's output
    pub bytes_skip: usize,
}

impl ChunkPlan {
    /// Compute the resume point for `out_seek` output bytes already held,
    /// given an envelope (only its `out_chunk_size` is used) and the
    /// plaintext-side chunk size driving reads from the source.
    pub fn new(envelope: &ChunkEnvelope, in_chunk_size: usize, out_seek: u64) -> Self {
        let out_chunk_size = envelope.out_chunk_size(in_chunk_size) as u64;
        let chunk_idx = out_seek / out_chunk_size;
        let chunk_seek = chunk_idx * in_chunk_size as u64;
        let bytes_skip = (out_seek % out_chunk_size) as usize;
        Self {
            chunk_idx,
            chunk_seek,
            bytes_skip,
        }
    }
}

async fn read_up_to<R: AsyncRead + Unpin>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = source.read(&mut buf[total..]).await?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

/// Drives a [`ChunkEnvelope`] over an async byte source, chunk by chunk,
/// honoring an initial `out_seek` resume point.
///
/// The caller must have already seeked `source` to `ChunkPlan::chunk_seek`
/// when `out_seek > 0` — this type only knows how to read forward from
/// wherever `source` currently points.
pub struct StreamTransform<R> {
    envelope: ChunkEnvelope,
    source: R,
    in_chunk_size: usize,
    pending_skip: usize,
}

impl<R: AsyncRead + Unpin> StreamTransform<R> {
    /// Build a transform resuming at `out_seek` output bytes
    pub fn new(mut envelope: ChunkEnvelope, source: R, in_chunk_size: usize, out_seek: u64) -> (Self, ChunkPlan) {
        let plan = ChunkPlan::new(&envelope, in_chunk_size, out_seek);
        envelope.seek_chunk_idx(plan.chunk_idx);
        (
            Self {
                envelope,
                source,
                in_chunk_size,
                pending_skip: plan.bytes_skip,
            },
            plan,
        )
    }

    /// Read, process, and return the next output block, or `None` at EOF
    pub async fn next_block(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; self.in_chunk_size];
        let n = read_up_to(&mut self.source, &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);

        let mut out = self.envelope.process(&buf)?;
        if self.pending_skip > 0 {
            let skip = self.pending_skip.min(out.len());
            out.drain(0..skip);
            self.pending_skip -= skip;
        }
        Ok(Some(out))
    }
}
