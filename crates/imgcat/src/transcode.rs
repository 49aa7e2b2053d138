//! Base64 transcoding of the image source into a pipe.

use std::io::{self, ErrorKind, Read};

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::pipe::PipeWriter;

/// Read size. A multiple of 3 so a full read encodes without padding.
const READ_CHUNK: usize = 24 * 1024;

/// Encode `source` into `sink` until the source is exhausted or fails, then
/// close the sink with the outcome. Meant to run on its own thread.
pub(crate) fn transcode<R: Read>(mut source: R, sink: PipeWriter) {
    let result = pump(&mut source, &sink);
    if let Err(e) = &result {
        log::debug!("transcode stopped: {e}");
    }
    sink.close(result);
}

fn pump<R: Read>(source: &mut R, sink: &PipeWriter) -> io::Result<()> {
    let mut buf = vec![0u8; READ_CHUNK];
    // Raw bytes at the front of `buf` not yet encoded; always fewer than 3.
    let mut carry = 0;

    loop {
        let n = match source.read(&mut buf[carry..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let filled = carry + n;
        let whole = filled - filled % 3;
        if whole > 0 {
            log::trace!("transcode: {whole} bytes");
            sink.send(STANDARD.encode(&buf[..whole]).into_bytes())?;
        }
        buf.copy_within(whole..filled, 0);
        carry = filled - whole;
    }

    if carry > 0 {
        sink.send(STANDARD.encode(&buf[..carry]).into_bytes())?;
    }
    Ok(())
}
