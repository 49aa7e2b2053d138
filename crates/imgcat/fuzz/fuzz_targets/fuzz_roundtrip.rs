#![no_main]

use arbitrary::Arbitrary;
use base64::{engine::general_purpose::STANDARD, Engine};
use imgcat::{build_framing, DisplayOption, Encoder, FixedCapabilities};
use libfuzzer_sys::fuzz_target;
use std::io::Write;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    name: String,
    tmux: bool,
    // write sizes for the incremental path
    splits: Vec<u8>,
    payload: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let caps = FixedCapabilities {
        supported: true,
        multiplexer: input.tmux,
    };
    let opts = vec![DisplayOption::name(&input.name), DisplayOption::inline(true)];
    let framing = build_framing(&opts, input.tmux);

    let mut w = Encoder::with_capabilities(Vec::<u8>::new(), opts, caps)
        .unwrap()
        .writer();
    let mut rest = input.payload.as_slice();
    for &split in &input.splits {
        let n = (split as usize).min(rest.len());
        w.write_all(&rest[..n]).unwrap();
        rest = &rest[n..];
    }
    w.write_all(rest).unwrap();
    let out = w.finish().unwrap();

    assert!(out.starts_with(&framing.header));
    assert!(out.ends_with(&framing.footer));
    let body = &out[framing.header.len()..out.len() - framing.footer.len()];
    assert_eq!(STANDARD.decode(body).unwrap(), input.payload);
});
