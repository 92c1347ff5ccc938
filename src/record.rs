//! Lock-event recording as JSON lines.
//!
//! Events are handed to a background writer thread over an `mpsc` channel so the
//! session never waits on file I/O. The thread exits once every sender is gone.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

use crate::core::LockEvent;

pub struct Recorder {
    tx: Sender<LockEvent>,
    handle: JoinHandle<usize>,
}

impl Recorder {
    /// Open (append) `path` and start the writer thread.
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| anyhow!("record: open {} failed: {}", path.display(), e))?;

        let (tx, rx) = mpsc::channel::<LockEvent>();
        let handle = thread::Builder::new()
            .name("termtris-record".to_string())
            .spawn(move || {
                let mut out = BufWriter::new(file);
                let mut buf: Vec<u8> = Vec::with_capacity(256);
                let mut written = 0usize;

                for event in rx {
                    buf.clear();
                    if let Err(e) = serde_json::to_writer(&mut buf, &event) {
                        warn!(error = %e, "failed to encode lock event");
                        continue;
                    }
                    buf.push(b'\n');
                    if let Err(e) = out.write_all(&buf).and_then(|_| out.flush()) {
                        warn!(error = %e, "failed to write lock event, recording stopped");
                        break;
                    }
                    written += 1;
                }

                debug!(written, "recorder finished");
                written
            })?;

        Ok(Self { tx, handle })
    }

    /// A sender to hand to the session
    pub fn sender(&self) -> Sender<LockEvent> {
        self.tx.clone()
    }

    /// Wait for the writer to drain. Every other sender must be dropped first,
    /// or this blocks. Returns the number of recorded events.
    pub fn finish(self) -> Result<usize> {
        drop(self.tx);
        self.handle
            .join()
            .map_err(|_| anyhow!("record: writer thread panicked"))
    }
}
