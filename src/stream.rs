use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::{CompactError, Compactor};

/// How often a worker waiting for input checks whether it has been cancelled.
const CANCEL_POLL: Duration = Duration::from_millis(20);

#[derive(Debug)]
enum Chunk {
    Data(Vec<u8>),
    Abort(io::Error),
}

/// The writable end of a streaming compaction, see [`crate::Compactor::stream`].
///
/// Dropping it, or calling [`close`](StreamInput::close), ends the input. Writes block while the
/// pipe to the worker is full. Once the worker has stopped, writes fail with
/// [`io::ErrorKind::BrokenPipe`].
#[derive(Debug)]
pub struct StreamInput {
    tx: Option<SyncSender<Chunk>>,
}

impl StreamInput {
    /// Signal that the input is complete. The same as dropping it.
    pub fn close(mut self) {
        self.tx = None;
    }

    /// Fail the run with `error`. The [`Completion`] resolves to [`CompactError::Read`].
    pub fn abort(mut self, error: io::Error) {
        if let Some(tx) = self.tx.take() {
            // the worker may already be gone, then there is nobody left to tell
            let _ = tx.send(Chunk::Abort(error));
        }
    }
}

impl Write for StreamInput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(tx) = &self.tx else {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream input is closed"));
        };
        if buf.is_empty() {
            return Ok(0);
        }
        tx.send(Chunk::Data(buf.to_vec())).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "compaction worker has stopped")
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The worker's side of the pipe, readable through [`crate::IoReader`].
struct PipeReader {
    rx: Receiver<Chunk>,
    cancel: Arc<AtomicBool>,
    chunk: Vec<u8>,
    offset: usize,
    done: bool,
}

impl PipeReader {
    fn new(rx: Receiver<Chunk>, cancel: Arc<AtomicBool>) -> Self {
        PipeReader {
            rx,
            cancel,
            chunk: Vec::new(),
            offset: 0,
            done: false,
        }
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.offset < self.chunk.len() {
                let n = buf.len().min(self.chunk.len() - self.offset);
                buf[..n].copy_from_slice(&self.chunk[self.offset..self.offset + n]);
                self.offset += n;
                return Ok(n);
            }
            if self.done {
                return Ok(0);
            }
            // must not be Interrupted, IoReader retries those
            if self.cancel.load(Ordering::SeqCst) {
                self.done = true;
                return Err(io::Error::new(io::ErrorKind::Other, "compaction cancelled"));
            }

            match self.rx.recv_timeout(CANCEL_POLL) {
                Ok(Chunk::Data(data)) => {
                    self.chunk = data;
                    self.offset = 0;
                }
                Ok(Chunk::Abort(e)) => {
                    self.done = true;
                    if e.kind() == io::ErrorKind::Interrupted {
                        return Err(io::Error::new(io::ErrorKind::Other, e));
                    }
                    return Err(e);
                }
                Err(RecvTimeoutError::Timeout) => (),
                Err(RecvTimeoutError::Disconnected) => self.done = true,
            }
        }
    }
}

/// Delivers the result of a worker exactly once, even if the worker never gets to produce one.
struct Resolver<W> {
    tx: Option<SyncSender<Result<W, CompactError>>>,
}

impl<W> Resolver<W> {
    fn resolve(mut self, result: Result<W, CompactError>) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(result);
        }
    }
}

impl<W> Drop for Resolver<W> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            log::warn!(target: "compacthtml::stream", "compaction worker stopped without a result");
            let _ = tx.send(Err(CompactError::WorkerLost));
        }
    }
}

/// Resolves once a streaming compaction has finished, see [`crate::Compactor::stream`].
#[derive(Debug)]
pub struct Completion<W> {
    rx: Receiver<Result<W, CompactError>>,
    cancel: Arc<AtomicBool>,
}

impl<W> Completion<W> {
    /// Block until the worker has written everything, then return the output destination.
    pub fn wait(self) -> Result<W, CompactError> {
        self.rx.recv().unwrap_or(Err(CompactError::WorkerLost))
    }

    /// Like [`wait`](Completion::wait), but give up after `timeout`.
    ///
    /// Giving up cancels the worker. It stops the next time it waits for input, and this returns
    /// [`CompactError::Cancelled`]. A worker that finishes in the meantime still reports its own
    /// result, and one that is blocked writing to the output is waited for.
    pub fn wait_timeout(self, timeout: Duration) -> Result<W, CompactError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                log::debug!(target: "compacthtml::stream", "no result after {:?}, cancelling", timeout);
                self.cancel.store(true, Ordering::SeqCst);
                self.wait()
            }
            Err(RecvTimeoutError::Disconnected) => Err(CompactError::WorkerLost),
        }
    }
}

pub(crate) fn spawn<W: Write + Send + 'static>(
    compactor: Compactor,
    output: W,
) -> (Completion<W>, StreamInput) {
    let (chunk_tx, chunk_rx) = mpsc::sync_channel(compactor.pipe_capacity);
    let (result_tx, result_rx) = mpsc::sync_channel(1);
    let cancel = Arc::new(AtomicBool::new(false));

    let resolver = Resolver {
        tx: Some(result_tx),
    };
    let reader = PipeReader::new(chunk_rx, Arc::clone(&cancel));
    let cancelled = Arc::clone(&cancel);

    let spawned = thread::Builder::new()
        .name("compacthtml-stream".to_owned())
        .spawn(move || {
            log::debug!(target: "compacthtml::stream", "worker started");
            let result = match compactor.compact_to(reader, output) {
                Err(CompactError::Read(_)) if cancelled.load(Ordering::SeqCst) => {
                    Err(CompactError::Cancelled)
                }
                result => result,
            };
            match &result {
                Ok(_) => log::debug!(target: "compacthtml::stream", "worker finished"),
                Err(e) => log::warn!(target: "compacthtml::stream", "worker failed: {}", e),
            }
            resolver.resolve(result);
        });

    // on failure the closure is dropped, and its resolver reports WorkerLost
    if let Err(e) = spawned {
        log::warn!(target: "compacthtml::stream", "failed to start compaction worker: {}", e);
    }

    (
        Completion {
            rx: result_rx,
            cancel,
        },
        StreamInput { tx: Some(chunk_tx) },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe() -> (SyncSender<Chunk>, PipeReader, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::sync_channel(4);
        let cancel = Arc::new(AtomicBool::new(false));
        (tx, PipeReader::new(rx, Arc::clone(&cancel)), cancel)
    }

    #[test]
    fn pipe_reader_splits_chunks_across_small_buffers() {
        let (tx, mut reader, _) = pipe();
        tx.send(Chunk::Data(b"hello".to_vec())).unwrap();
        drop(tx);

        let mut buf = [0; 3];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"lo");
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn pipe_reader_reports_abort_once() {
        let (tx, mut reader, _) = pipe();
        tx.send(Chunk::Data(b"ab".to_vec())).unwrap();
        tx.send(Chunk::Abort(io::Error::new(io::ErrorKind::Interrupted, "gone")))
            .unwrap();

        let mut buf = [0; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn pipe_reader_stops_when_cancelled() {
        let (_tx, mut reader, cancel) = pipe();
        cancel.store(true, Ordering::SeqCst);
        let err = reader.read(&mut [0; 8]).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn dropped_resolver_reports_lost_worker() {
        let (tx, rx) = mpsc::sync_channel::<Result<(), CompactError>>(1);
        drop(Resolver { tx: Some(tx) });
        assert!(matches!(rx.recv().unwrap(), Err(CompactError::WorkerLost)));
    }
}
