//! Output sink managing the lifecycle of a renderer's byte stream.
//!
//! A sink starts in one of three states:
//! - **Deferred**: holds a file path; the file (and its parent directory) is
//!   created on the first write.
//! - **Open**: writes go to a live stream. Streams handed in by the caller and
//!   stdout are borrowed and never closed by the sink.
//! - **Degraded**: the file could not be opened or the stream failed; writes
//!   are silently discarded.
//!
//! No sink operation ever returns an error. Environmental failures are
//! reported through `tracing::warn!` and the sink carries on.

use crate::LOG_CHECK;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// A stream owned by another component and shared with a renderer.
pub type SharedStream = Arc<Mutex<dyn Write + Send>>;

enum Stream {
    File(BufWriter<File>),
    Shared(SharedStream),
    Stdout(io::Stdout),
}

impl Stream {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Stream::File(file) => file.write_all(bytes),
            Stream::Shared(shared) => shared.lock().write_all(bytes),
            Stream::Stdout(stdout) => stdout.write_all(bytes),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Stream::File(file) => file.flush(),
            Stream::Shared(shared) => shared.lock().flush(),
            Stream::Stdout(stdout) => stdout.flush(),
        }
    }
}

enum SinkState {
    Deferred(PathBuf),
    Open { stream: Stream, owned: bool },
    Degraded,
    Closed,
}

/// Destination of a renderer's encoded output.
pub struct OutputSink {
    state: SinkState,
}

impl OutputSink {
    /// Sink that creates `path` lazily on the first write.
    pub fn deferred(path: impl Into<PathBuf>) -> Self {
        Self {
            state: SinkState::Deferred(path.into()),
        }
    }

    /// Sink writing to a stream owned by the caller. It is never closed here.
    pub fn shared(stream: SharedStream) -> Self {
        Self {
            state: SinkState::Open {
                stream: Stream::Shared(stream),
                owned: false,
            },
        }
    }

    /// Sink writing to the process's standard output.
    pub fn stdout() -> Self {
        Self {
            state: SinkState::Open {
                stream: Stream::Stdout(io::stdout()),
                owned: false,
            },
        }
    }

    /// True while the file has not been created yet.
    pub fn is_deferred(&self) -> bool {
        matches!(self.state, SinkState::Deferred(_))
    }

    /// True after a failure turned this sink into a discard target.
    pub fn is_degraded(&self) -> bool {
        matches!(self.state, SinkState::Degraded)
    }

    /// True if the sink created its stream and must close it.
    pub fn owns_stream(&self) -> bool {
        matches!(self.state, SinkState::Open { owned: true, .. })
    }

    /// Writes bytes, opening a deferred file first.
    pub fn write(&mut self, bytes: &[u8]) {
        if let SinkState::Deferred(path) = &self.state {
            self.state = open_file(path);
        }
        match &mut self.state {
            SinkState::Open { stream, .. } => {
                if let Err(err) = stream.write_all(bytes) {
                    warn!(target: LOG_CHECK, "write to output failed: {err}; disabling output");
                    self.state = SinkState::Degraded;
                }
            }
            SinkState::Degraded | SinkState::Deferred(_) => {}
            SinkState::Closed => {
                warn!(target: LOG_CHECK, "writing to uninitialized or closed file");
            }
        }
    }

    /// Best-effort flush; failures are ignored.
    pub fn flush(&mut self) {
        if let SinkState::Open { stream, .. } = &mut self.state {
            let _ = stream.flush();
        }
    }

    /// Flushes and, if the stream is owned, closes it. Idempotent.
    ///
    /// A deferred sink that never saw a write is closed without creating
    /// its file.
    pub fn close(&mut self) {
        self.flush();
        let previous = std::mem::replace(&mut self.state, SinkState::Closed);
        if let SinkState::Open { stream, owned } = previous {
            if owned {
                debug!(target: LOG_CHECK, "closing owned output file");
                drop(stream);
            }
        }
    }
}

fn open_file(path: &Path) -> SinkState {
    match create_file(path) {
        Ok(file) => {
            debug!(target: LOG_CHECK, "opened output file {}", path.display());
            SinkState::Open {
                stream: Stream::File(BufWriter::new(file)),
                owned: true,
            }
        }
        Err(err) => {
            warn!(
                target: LOG_CHECK,
                "Could not open file {:?} for writing: {}\nDisabling log output",
                path.display().to_string(),
                err
            );
            SinkState::Degraded
        }
    }
}

fn create_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fs::create_dir_all(parent)?;
        }
    }
    File::create(path)
}
