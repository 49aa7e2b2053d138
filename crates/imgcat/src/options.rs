//! Display options, formatted as `key=value` protocol attributes.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::ImgcatError;

/// A rendered width or height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
    /// Character cells.
    Cells(i32),
    /// Pixels.
    Pixels(i32),
    /// Percentage of the session's width or height.
    Percent(i32),
    /// The image's inherent size.
    Auto,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Cells(n) => write!(f, "{n}"),
            Length::Pixels(n) => write!(f, "{n}px"),
            Length::Percent(n) => write!(f, "{n}%"),
            Length::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for Length {
    type Err = ImgcatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ImgcatError::InvalidLength(s.to_string());
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Length::Auto);
        }
        if let Some(n) = s.strip_suffix("px") {
            return n.parse().map(Length::Pixels).map_err(|_| invalid());
        }
        if let Some(n) = s.strip_suffix('%') {
            return n.parse().map(Length::Percent).map_err(|_| invalid());
        }
        s.parse().map(Length::Cells).map_err(|_| invalid())
    }
}

/// A single protocol attribute such as `width=80` or `inline=1`.
///
/// Options are formatted once, when they are built, and never change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisplayOption(String);

impl DisplayOption {
    /// File name shown by the terminal. Defaults to "Unnamed file" on the
    /// terminal side when omitted.
    pub fn name(name: &str) -> Self {
        Self(format!("name={}", STANDARD.encode(name)))
    }

    /// File size in bytes. Only used by the terminal's progress indicator.
    pub fn size(size: i64) -> Self {
        Self(format!("size={size}"))
    }

    /// Width to render at.
    pub fn width(length: Length) -> Self {
        Self(format!("width={length}"))
    }

    /// Height to render at.
    pub fn height(length: Length) -> Self {
        Self(format!("height={length}"))
    }

    /// When false the image is stretched to fill the requested width and
    /// height. Terminals default to true.
    pub fn preserve_aspect_ratio(preserve: bool) -> Self {
        Self(format!("preserveAspectRatio={}", u8::from(preserve)))
    }

    /// When true the image is displayed inline, otherwise it is downloaded
    /// with no visual representation. Terminals default to false.
    pub fn inline(inline: bool) -> Self {
        Self(format!("inline={}", u8::from(inline)))
    }

    /// The attribute key, e.g. `width`.
    pub fn key(&self) -> &str {
        self.0.split_once('=').map_or(self.0.as_str(), |(k, _)| k)
    }

    /// The formatted `key=value` attribute.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayOption {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
