use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use semflow_core::runtime::OutputSink;
use semflow_core::Destination;

/// Writes to stdout, or replaces the contents of a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOutputSink;

#[async_trait]
impl OutputSink for FsOutputSink {
    async fn write(&self, destination: &Destination, bytes: Bytes) -> anyhow::Result<()> {
        match destination {
            Destination::Stdout => {
                let mut out = tokio::io::stdout();
                out.write_all(&bytes).await.context("cannot write stdout")?;
                out.flush().await.context("cannot flush stdout")?;
            }
            Destination::File(path) => {
                tokio::fs::write(path, &bytes)
                    .await
                    .with_context(|| format!("cannot write {}", path.display()))?;
            }
        }
        Ok(())
    }
}
