use async_trait::async_trait;
use bytes::Bytes;

use crate::blob::{Blob, BlobPair, Destination, PairSource, Source};

/// Loads input records. A call either returns every record or fails.
#[async_trait]
pub trait SourceReader: Send + Sync {
    async fn read_blobs(&self, source: &Source) -> anyhow::Result<Vec<Blob>>;
    async fn read_blob_pairs(&self, source: &PairSource) -> anyhow::Result<Vec<BlobPair>>;
}

/// Writes rendered output to a stream handle or path.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, destination: &Destination, bytes: Bytes) -> anyhow::Result<()>;
}
