use std::io;
use std::path::PathBuf;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{format_line, Level, LogMessage, Tags};

/// Where the log sink writes formatted lines.
pub enum DiagnosticStream {
    Stderr,
    Stdout,
    /// Appended to, created if missing.
    File(PathBuf),
    /// Any async writer; `is_terminal` drives color auto-detection.
    Writer {
        writer: Box<dyn AsyncWrite + Unpin + Send>,
        is_terminal: bool,
    },
}

impl DiagnosticStream {
    pub fn writer(writer: impl AsyncWrite + Unpin + Send + 'static) -> Self {
        Self::Writer {
            writer: Box::new(writer),
            is_terminal: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Stderr => atty::is(atty::Stream::Stderr),
            Self::Stdout => atty::is(atty::Stream::Stdout),
            Self::File(_) => false,
            Self::Writer { is_terminal, .. } => *is_terminal,
        }
    }

    async fn open(self) -> io::Result<Box<dyn AsyncWrite + Unpin + Send>> {
        Ok(match self {
            Self::Stderr => Box::new(tokio::io::stderr()),
            Self::Stdout => Box::new(tokio::io::stdout()),
            Self::File(path) => Box::new(
                tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .await?,
            ),
            Self::Writer { writer, .. } => writer,
        })
    }
}

impl std::fmt::Debug for DiagnosticStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("Stderr"),
            Self::Stdout => f.write_str("Stdout"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Writer { is_terminal, .. } => f
                .debug_struct("Writer")
                .field("is_terminal", is_terminal)
                .finish_non_exhaustive(),
        }
    }
}

/// Producer handle onto the sink's queue. Cheap to clone; safe to use from
/// any number of concurrent branches.
#[derive(Clone)]
pub struct LogQueue {
    tx: mpsc::Sender<LogMessage>,
    threshold: Option<Level>,
}

impl LogQueue {
    /// Whether a message at `level` passes the verbosity threshold.
    pub fn accepts(&self, level: Level) -> bool {
        self.threshold.is_some_and(|threshold| level <= threshold)
    }

    /// Stamp and enqueue a message, or do nothing if it is filtered out.
    ///
    /// Waits for queue capacity instead of dropping.
    pub async fn write(&self, level: Level, message: impl Into<String>, tags: Tags) {
        if !self.accepts(level) {
            return;
        }
        let msg = LogMessage::now(level, message, tags);
        if self.tx.send(msg).await.is_err() {
            tracing::warn!(target: "semflow.log_sink", "log sink closed; message discarded");
        }
    }
}

/// The single worker that owns the diagnostic stream.
pub struct LogSink {
    queue: LogQueue,
    handle: JoinHandle<io::Result<()>>,
}

impl LogSink {
    /// Open `stream` and start draining a queue of `capacity` messages.
    pub async fn start(
        stream: DiagnosticStream,
        color: bool,
        threshold: Option<Level>,
        capacity: usize,
    ) -> io::Result<Self> {
        let mut writer = stream.open().await?;
        let (tx, mut rx) = mpsc::channel::<LogMessage>(capacity.max(1));

        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let line = format_line(&msg, color);
                writer.write_all(line.as_bytes()).await?;
            }
            writer.flush().await
        });

        Ok(Self {
            queue: LogQueue { tx, threshold },
            handle,
        })
    }

    pub fn queue(&self) -> LogQueue {
        self.queue.clone()
    }

    /// Close the queue, drain what is left and wait for the worker to exit.
    ///
    /// Every `LogQueue` clone handed out must be dropped before this returns;
    /// the worker only sees closure once the last producer is gone.
    pub async fn shutdown(self) -> io::Result<()> {
        let Self { queue, handle } = self;
        drop(queue);
        handle.await.map_err(io::Error::other)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::tag;

    #[tokio::test]
    async fn drains_everything_before_shutdown_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diag.log");
        let sink = LogSink::start(DiagnosticStream::File(path.clone()), false, Some(Level::Debug), 2)
            .await
            .unwrap();
        let queue = sink.queue();
        for i in 0..10 {
            queue.write(Level::Info, format!("msg {i}"), vec![tag("n", i)]).await;
        }
        drop(queue);
        sink.shutdown().await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].ends_with("INFO msg 0 n=0"));
        assert!(lines[9].ends_with("INFO msg 9 n=9"));
    }

    #[tokio::test]
    async fn threshold_filters_and_none_disables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diag.log");
        let sink = LogSink::start(DiagnosticStream::File(path.clone()), false, Some(Level::Warning), 8)
            .await
            .unwrap();
        let queue = sink.queue();
        assert!(queue.accepts(Level::Error));
        assert!(!queue.accepts(Level::Debug));
        queue.write(Level::Debug, "hidden", Vec::new()).await;
        queue.write(Level::Error, "shown", Vec::new()).await;
        drop(queue);
        sink.shutdown().await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("hidden"));
        assert!(text.contains("ERROR shown"));

        let silent = LogSink::start(DiagnosticStream::File(path), false, None, 8)
            .await
            .unwrap();
        assert!(!silent.queue().accepts(Level::Error));
        silent.shutdown().await.unwrap();
    }
}
