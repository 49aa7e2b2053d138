//! The streaming encoder.
//!
//! `encode` writes the header, then the base64 body as it is produced by a
//! transcode thread, then the footer. The body is never buffered as a whole.

use std::io::{ErrorKind, Read, Write};
use std::thread;

use crate::env::{Capabilities, TerminalEnv};
use crate::framing::{build_framing, Framing};
use crate::options::DisplayOption;
use crate::pipe::pipe;
use crate::transcode::transcode;
use crate::writer::ImageWriter;
use crate::{ImgcatError, Result};

/// Copy buffer used when draining the composed stream into the output.
const DRAIN_BUF: usize = 8 * 1024;

/// Encodes images for iTerm2 into an output stream.
///
/// # Example
/// ```ignore
/// use imgcat::{DisplayOption, Encoder, Length};
///
/// let mut enc = Encoder::new(std::io::stdout(), [DisplayOption::height(Length::Percent(50))])?;
/// enc.encode(std::fs::File::open("cat.png")?)?;
/// ```
pub struct Encoder<W, C = TerminalEnv> {
    out: W,
    options: Vec<DisplayOption>,
    caps: C,
}

impl<W: Write> Encoder<W> {
    /// Create an encoder that detects the terminal from the environment.
    ///
    /// Fails with [`ImgcatError::UnsupportedEnvironment`] outside iTerm2.
    pub fn new<I>(out: W, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = DisplayOption>,
    {
        Self::with_capabilities(out, options, TerminalEnv)
    }
}

impl<W: Write, C: Capabilities> Encoder<W, C> {
    /// Create an encoder with an explicit capability strategy.
    pub fn with_capabilities<I>(out: W, options: I, caps: C) -> Result<Self>
    where
        I: IntoIterator<Item = DisplayOption>,
    {
        if !caps.supports_protocol() {
            return Err(ImgcatError::UnsupportedEnvironment);
        }
        Ok(Self {
            out,
            options: options.into_iter().collect(),
            caps,
        })
    }

    /// The options sent with every image, in order.
    pub fn options(&self) -> &[DisplayOption] {
        &self.options
    }

    /// Header and footer for the next encode. Multiplexer detection runs on
    /// every call.
    pub fn framing(&self) -> Framing {
        build_framing(&self.options, self.caps.is_multiplexer())
    }

    /// Encode everything `source` yields as one image.
    ///
    /// Returns the first error from either side: [`ImgcatError::SourceRead`]
    /// if the source failed, [`ImgcatError::SinkWrite`] if the output did.
    /// Bytes already written are not taken back, so after an error the
    /// terminal may have received a truncated sequence.
    ///
    /// A failed output returns at once, even while the source is blocked in
    /// `read`. The transcode thread is then left to exit by itself the next
    /// time the source yields.
    pub fn encode<R: Read + Send + 'static>(&mut self, source: R) -> Result<()> {
        let Framing { header, footer } = self.begin();
        let (body, sink) = pipe();
        let stage = thread::spawn(move || transcode(source, sink));

        // Draining consumes the body reader; once it is dropped the
        // transcode thread cannot block on a write any more.
        let composed = header.as_slice().chain(body).chain(footer.as_slice());
        let drained = drain(composed, &mut self.out);
        if let Err(e @ ImgcatError::SinkWrite(_)) = drained {
            log::debug!("output failed, not waiting for the transcode thread");
            return Err(e);
        }

        // Any other outcome means the stage has closed or dropped its end.
        stage.join().map_err(|_| ImgcatError::WorkerPanicked)?;
        finished(drained)
    }

    /// Encode an in-memory image.
    ///
    /// Reading a slice never blocks, so the transcode thread is always
    /// joined before this returns.
    pub fn encode_bytes(&mut self, data: &[u8]) -> Result<()> {
        let Framing { header, footer } = self.begin();
        let (body, sink) = pipe();
        let out = &mut self.out;

        thread::scope(|scope| {
            let stage = scope.spawn(move || transcode(data, sink));
            let composed = header.as_slice().chain(body).chain(footer.as_slice());
            let drained = drain(composed, out);
            stage.join().map_err(|_| ImgcatError::WorkerPanicked)?;
            finished(drained)
        })
    }

    fn begin(&self) -> Framing {
        let framing = self.framing();
        log::debug!(
            "encoding image: {} options, header {} bytes, footer {} bytes",
            self.options.len(),
            framing.header.len(),
            framing.footer.len()
        );
        framing
    }

    /// Give back the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W, C> Encoder<W, C>
where
    W: Write + Send + 'static,
    C: Capabilities + Send + 'static,
{
    /// Turn the encoder into a writer: whatever is written to it becomes the
    /// image payload. See [`ImageWriter`].
    pub fn writer(self) -> ImageWriter<W> {
        ImageWriter::spawn(self)
    }
}

fn finished(drained: Result<u64>) -> Result<()> {
    let written = drained?;
    log::debug!("encoded image: {written} bytes written");
    Ok(())
}

/// Copy `composed` into `out` until end of stream, then flush.
///
/// Read errors can only come from the body, so they are source errors.
fn drain<R: Read, W: Write>(mut composed: R, out: &mut W) -> Result<u64> {
    let mut buf = [0u8; DRAIN_BUF];
    let mut written = 0u64;
    loop {
        let n = match composed.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ImgcatError::SourceRead(e)),
        };
        out.write_all(&buf[..n]).map_err(ImgcatError::SinkWrite)?;
        written += n as u64;
    }
    out.flush().map_err(ImgcatError::SinkWrite)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedCapabilities;
    use crate::options::Length;

    #[test]
    fn test_encode_simple() {
        let opts = [
            DisplayOption::width(Length::Cells(80)),
            DisplayOption::height(Length::Cells(24)),
            DisplayOption::inline(true),
        ];
        let mut enc =
            Encoder::with_capabilities(Vec::<u8>::new(), opts, FixedCapabilities::PLAIN).unwrap();
        enc.encode_bytes(b"AB").unwrap();
        assert_eq!(
            enc.into_inner(),
            b"\x1b]1337;File=width=80;height=24;inline=1:QUI=\x07\n".to_vec()
        );
    }

    #[test]
    fn test_unsupported() {
        let caps = FixedCapabilities {
            supported: false,
            multiplexer: false,
        };
        let result = Encoder::with_capabilities(Vec::<u8>::new(), [], caps);
        assert!(matches!(result, Err(ImgcatError::UnsupportedEnvironment)));
    }

    #[test]
    fn test_encoder_is_reusable() {
        let mut enc =
            Encoder::with_capabilities(Vec::<u8>::new(), [], FixedCapabilities::PLAIN).unwrap();
        enc.encode_bytes(b"A").unwrap();
        enc.encode_bytes(b"B").unwrap();
        assert_eq!(
            enc.into_inner(),
            b"\x1b]1337;File=:QQ==\x07\n\x1b]1337;File=:Qg==\x07\n".to_vec()
        );
    }
}
