#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWrite;

use semflow_core::config::{ColorChoice, Options};
use semflow_core::log::{DiagnosticStream, Level};
use semflow_core::runtime::{OutputSink, SourceReader};
use semflow_core::{Blob, BlobPair, Collaborators, Destination, PairSource, RunOutcome, Runner, Source, Task};

/// Serves fixed records, or fails every read when `fault` is set.
#[derive(Clone, Default)]
pub struct MemoryReader {
    pub blobs: Vec<Blob>,
    pub pairs: Vec<BlobPair>,
    pub fault: Option<String>,
}

#[async_trait]
impl SourceReader for MemoryReader {
    async fn read_blobs(&self, _source: &Source) -> anyhow::Result<Vec<Blob>> {
        match &self.fault {
            Some(fault) => Err(anyhow::anyhow!(fault.clone())),
            None => Ok(self.blobs.clone()),
        }
    }

    async fn read_blob_pairs(&self, _source: &PairSource) -> anyhow::Result<Vec<BlobPair>> {
        match &self.fault {
            Some(fault) => Err(anyhow::anyhow!(fault.clone())),
            None => Ok(self.pairs.clone()),
        }
    }
}

#[derive(Clone, Default)]
pub struct CaptureSink {
    pub writes: Arc<Mutex<Vec<(Destination, Bytes)>>>,
}

impl CaptureSink {
    pub fn written(&self) -> Vec<(Destination, Bytes)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutputSink for CaptureSink {
    async fn write(&self, destination: &Destination, bytes: Bytes) -> anyhow::Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((destination.clone(), bytes));
        Ok(())
    }
}

/// An in-memory diagnostic stream.
#[derive(Clone, Default)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// Each line with its `[timestamp] ` prefix removed.
    pub fn messages(&self) -> Vec<String> {
        self.contents()
            .lines()
            .map(|line| match line.find("] ") {
                Some(i) => line[i + 2..].to_string(),
                None => line.to_string(),
            })
            .collect()
    }
}

impl AsyncWrite for CaptureWriter {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

pub fn options(verbosity: Option<Level>) -> Options {
    Options {
        color: ColorChoice::Never,
        verbosity,
        ..Options::default()
    }
}

/// Run `task` against the given reader, capturing output writes and diagnostics.
pub async fn run_captured<T: Send + 'static>(
    options: Options,
    reader: MemoryReader,
    task: Task<T>,
) -> (RunOutcome<T>, CaptureSink, CaptureWriter) {
    let sink = CaptureSink::default();
    let writer = CaptureWriter::default();
    let outcome = Runner::new(options, Collaborators::new(reader, sink.clone()))
        .with_diagnostics(DiagnosticStream::writer(writer.clone()))
        .run(task)
        .await;
    (outcome, sink, writer)
}
