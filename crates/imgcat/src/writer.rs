//! A `Write` front end for the encoder, for images that arrive in pieces.

use std::io::{self, ErrorKind, Write};
use std::thread::{self, JoinHandle};

use crate::encoder::Encoder;
use crate::env::Capabilities;
use crate::pipe::{pipe, PipeWriter};
use crate::{ImgcatError, Result};

/// Writer returned by [`Encoder::writer`].
///
/// Bytes written here are the raw image. They are handed to a background
/// thread running [`Encoder::encode`], one chunk at a time with no buffering:
/// `write` blocks until the transcode thread has received this chunk. Call
/// [`close`] (or [`finish`]) when the image is complete; it waits for the
/// encoder to write the footer and returns its result.
///
/// If the encoder fails, further writes fail with `BrokenPipe`; the
/// actual error is returned by `close`.
///
/// Dropping the writer closes it and waits, like `BufWriter` flushing on
/// drop. Errors on that path are logged and discarded.
///
/// [`close`]: ImageWriter::close
/// [`finish`]: ImageWriter::finish
pub struct ImageWriter<W> {
    pipe: Option<PipeWriter>,
    done: Option<JoinHandle<Result<W>>>,
}

impl<W: Write + Send + 'static> ImageWriter<W> {
    pub(crate) fn spawn<C>(mut encoder: Encoder<W, C>) -> Self
    where
        C: Capabilities + Send + 'static,
    {
        let (body, pipe) = pipe();
        let done = thread::spawn(move || -> Result<W> {
            encoder.encode(body)?;
            Ok(encoder.into_inner())
        });
        Self {
            pipe: Some(pipe),
            done: Some(done),
        }
    }
}

impl<W> ImageWriter<W> {
    /// End the image and wait for the encoder to finish.
    pub fn close(self) -> Result<()> {
        self.finish().map(drop)
    }

    /// End the image, wait for the encoder to finish and return the output.
    pub fn finish(mut self) -> Result<W> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<W> {
        if let Some(pipe) = self.pipe.take() {
            pipe.close(Ok(()));
        }
        match self.done.take() {
            Some(handle) => handle.join().map_err(|_| ImgcatError::WorkerPanicked)?,
            // only reachable if shut down twice
            None => Err(ImgcatError::WorkerPanicked),
        }
    }
}

impl<W> Write for ImageWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.pipe.as_mut() {
            Some(pipe) => pipe.write(buf),
            None => Err(io::Error::new(ErrorKind::BrokenPipe, "image writer closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W> Drop for ImageWriter<W> {
    fn drop(&mut self) {
        if self.done.is_none() {
            return;
        }
        if thread::panicking() {
            // Dropping the pipe unclosed fails the encode instead of blocking.
            drop(self.pipe.take());
            return;
        }
        if let Err(e) = self.shutdown() {
            log::warn!("image writer dropped without close: {e}");
        }
    }
}
