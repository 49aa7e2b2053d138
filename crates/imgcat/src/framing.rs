//! Escape sequences that wrap the base64 payload.

use crate::options::DisplayOption;

/// OSC 1337 introducer.
pub const HEADER: &[u8] = b"\x1b]1337;File=";
/// OSC 1337 introducer wrapped in a tmux DCS passthrough.
pub const HEADER_TMUX: &[u8] = b"\x1bPtmux;\x1b\x1b]1337;File=";
/// BEL terminator.
pub const FOOTER: &[u8] = b"\x07\n";
/// BEL terminator followed by the string terminator closing the passthrough.
pub const FOOTER_TMUX: &[u8] = b"\x07\x1b\\\n";

/// Bytes written before and after the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framing {
    pub header: Vec<u8>,
    pub footer: Vec<u8>,
}

/// Build the header and footer for one image.
///
/// The header is the introducer, the attributes joined by `;`, and a single
/// `:` separating them from the payload.
pub fn build_framing(options: &[DisplayOption], multiplexer: bool) -> Framing {
    let (intro, footer) = if multiplexer {
        (HEADER_TMUX, FOOTER_TMUX)
    } else {
        (HEADER, FOOTER)
    };

    let attrs_len: usize = options.iter().map(|o| o.as_str().len() + 1).sum();
    let mut header = Vec::with_capacity(intro.len() + attrs_len + 1);
    header.extend_from_slice(intro);
    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            header.push(b';');
        }
        header.extend_from_slice(option.as_str().as_bytes());
    }
    header.push(b':');

    Framing {
        header,
        footer: footer.to_vec(),
    }
}
