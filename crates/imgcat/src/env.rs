//! Terminal capability detection.
//!
//! The encoder never reads the environment directly; it asks a
//! [`Capabilities`] implementation handed to it at construction.

use std::env;

/// What the attached terminal can do.
pub trait Capabilities {
    /// Whether the terminal renders OSC 1337 inline images. Checked once when
    /// an encoder is built.
    fn supports_protocol(&self) -> bool;

    /// Whether output passes through tmux and needs the passthrough framing.
    /// Checked once per encode.
    fn is_multiplexer(&self) -> bool;
}

/// Detection from the process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalEnv;

impl Capabilities for TerminalEnv {
    fn supports_protocol(&self) -> bool {
        detect_support(|key| env::var(key).ok())
    }

    fn is_multiplexer(&self) -> bool {
        detect_multiplexer(|key| env::var(key).ok())
    }
}

/// Fixed answers, for forcing a mode or for tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedCapabilities {
    pub supported: bool,
    pub multiplexer: bool,
}

impl FixedCapabilities {
    /// Supported terminal, no multiplexer.
    pub const PLAIN: Self = Self {
        supported: true,
        multiplexer: false,
    };

    /// Supported terminal behind tmux.
    pub const TMUX: Self = Self {
        supported: true,
        multiplexer: true,
    };
}

impl Capabilities for FixedCapabilities {
    fn supports_protocol(&self) -> bool {
        self.supported
    }

    fn is_multiplexer(&self) -> bool {
        self.multiplexer
    }
}

impl<C: Capabilities + ?Sized> Capabilities for &C {
    fn supports_protocol(&self) -> bool {
        (**self).supports_protocol()
    }

    fn is_multiplexer(&self) -> bool {
        (**self).is_multiplexer()
    }
}

/// `TERM_PROGRAM` is set to `iTerm.app` by iTerm2.
pub fn detect_support<F>(var: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    var("TERM_PROGRAM").as_deref() == Some("iTerm.app")
}

/// `TMUX_TEST=true|false` overrides detection. Otherwise a `screen` terminal
/// type or a non-empty `TMUX` means tmux.
///
/// NOTE: outside of iTerm2's tmux integration (`tmux -CC`) tmux does not know
/// the size of the image, so its prompt and cursor may be drawn over it.
pub fn detect_multiplexer<F>(var: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match var("TMUX_TEST").as_deref() {
        Some("true") => return true,
        Some("false") => return false,
        _ => {}
    }
    var("TERM").as_deref() == Some("screen") || var("TMUX").is_some_and(|v| !v.is_empty())
}
