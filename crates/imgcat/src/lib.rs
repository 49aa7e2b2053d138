//! # imgcat
//!
//! A streaming encoder for the iTerm2 inline image protocol (`OSC 1337 ; File=`).
//!
//! The payload is treated as an opaque byte stream: it is base64 encoded on a
//! background thread while the framed result is drained into the output, so
//! the image is never held in memory as a whole.
//!
//! ## Quick Start
//!
//! ### Encoding a file
//!
//! ```ignore
//! use imgcat::{DisplayOption, Encoder, Length};
//!
//! let file = std::fs::File::open("cat.png")?;
//! let mut enc = Encoder::new(
//!     std::io::stdout(),
//!     [DisplayOption::width(Length::Cells(40)), DisplayOption::inline(true)],
//! )?;
//! enc.encode(file)?;
//! ```
//!
//! ### Writing incrementally
//!
//! ```ignore
//! use std::io::Write;
//! use imgcat::{DisplayOption, Encoder};
//!
//! let mut w = Encoder::new(std::io::stdout(), [DisplayOption::inline(true)])?.writer();
//! w.write_all(&png_bytes)?;
//! w.close()?;
//! ```

use std::io;

use thiserror::Error;

pub mod encoder;
pub mod env;
pub mod framing;
pub mod options;
pub(crate) mod pipe;
pub(crate) mod transcode;
pub mod writer;

pub use encoder::Encoder;
pub use env::{Capabilities, FixedCapabilities, TerminalEnv};
pub use framing::{build_framing, Framing};
pub use options::{DisplayOption, Length};
pub use writer::ImageWriter;

/// Errors that can occur while encoding an image for the terminal.
#[derive(Debug, Error)]
pub enum ImgcatError {
    /// The terminal does not advertise support for inline images
    #[error("imgcat is only supported with iTerm2")]
    UnsupportedEnvironment,

    /// The image source failed mid-read
    #[error("failed to read image data: {0}")]
    SourceRead(#[source] io::Error),

    /// The destination failed mid-write
    #[error("failed to write encoded image: {0}")]
    SinkWrite(#[source] io::Error),

    /// A length could not be parsed from text
    #[error("invalid length {0:?}: expected N, Npx, N% or auto")]
    InvalidLength(String),

    /// A background encoding thread panicked
    #[error("encoder thread panicked")]
    WorkerPanicked,
}

/// Result type for imgcat operations.
pub type Result<T> = core::result::Result<T, ImgcatError>;
