//! Chunked upload bodies with progress reporting

use super::types::{ProgressHandler, UploadProgress};
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};

/// Default chunk size for streamed uploads (64KB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Split `data` into chunks of at most `chunk_size` bytes
pub fn split_chunks(mut data: Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(data.len().div_ceil(chunk_size));
    while !data.is_empty() {
        let n = chunk_size.min(data.len());
        chunks.push(data.split_to(n));
    }
    chunks
}

/// Stream `data` in chunks, reporting cumulative bytes as each chunk is taken
///
/// Reported counts never decrease and the last report equals the total size.
/// An empty upload produces no chunks and no reports.
pub fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    progress: Option<ProgressHandler>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = data.len() as u64;
    let mut loaded = 0u64;

    stream::iter(split_chunks(data, chunk_size)).map(move |chunk| {
        loaded += chunk.len() as u64;
        if let Some(handler) = &progress {
            handler(UploadProgress { loaded, total });
        }
        Ok(chunk)
    })
}
