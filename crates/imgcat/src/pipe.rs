//! In-process byte pipe between the transcode stage and the composer.
//!
//! Built on a zero-capacity crossbeam channel: every chunk is handed over
//! directly, so a write blocks until the reader takes it. The writer closes
//! the pipe exactly once, optionally with an error that the reader returns
//! in place of end-of-stream.

use std::io::{self, ErrorKind, Read, Write};

use crossbeam::channel::{bounded, Receiver, Sender};

enum Message {
    Data(Vec<u8>),
    Close(io::Result<()>),
}

/// Create a connected reader/writer pair.
pub(crate) fn pipe() -> (PipeReader, PipeWriter) {
    let (tx, rx) = bounded(0);
    (
        PipeReader {
            rx,
            chunk: Vec::new(),
            pos: 0,
            state: State::Open,
        },
        PipeWriter { tx },
    )
}

pub(crate) struct PipeWriter {
    tx: Sender<Message>,
}

impl PipeWriter {
    /// Hand an owned chunk to the reader.
    pub(crate) fn send(&self, chunk: Vec<u8>) -> io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        self.tx
            .send(Message::Data(chunk))
            .map_err(|_| io::Error::new(ErrorKind::BrokenPipe, "read end of pipe closed"))
    }

    /// Close the pipe with its terminal result. A reader that is already gone
    /// has nobody to report to, so that case is not an error.
    pub(crate) fn close(self, result: io::Result<()>) {
        let _ = self.tx.send(Message::Close(result));
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(buf.to_vec())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    Open,
    Done,
    /// Kind and message of the terminal error, replayed on every later read.
    Failed(ErrorKind, String),
}

pub(crate) struct PipeReader {
    rx: Receiver<Message>,
    chunk: Vec<u8>,
    pos: usize,
    state: State,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.pos < self.chunk.len() {
                let n = usize::min(buf.len(), self.chunk.len() - self.pos);
                buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }

            match &self.state {
                State::Open => {}
                State::Done => return Ok(0),
                State::Failed(kind, msg) => return Err(io::Error::new(*kind, msg.clone())),
            }

            match self.rx.recv() {
                Ok(Message::Data(chunk)) => {
                    self.chunk = chunk;
                    self.pos = 0;
                }
                Ok(Message::Close(Ok(()))) => self.state = State::Done,
                Ok(Message::Close(Err(e))) => {
                    self.state = State::Failed(e.kind(), e.to_string());
                    return Err(e);
                }
                Err(_) => {
                    let msg = "pipe writer dropped without closing";
                    self.state = State::Failed(ErrorKind::UnexpectedEof, msg.to_string());
                    return Err(io::Error::new(ErrorKind::UnexpectedEof, msg));
                }
            }
        }
    }
}
