#![no_main]
use libfuzzer_sys::fuzz_target;
use rlcodec::low_level::block_codec::decode_block;
use rlcodec::low_level::palette::{ExtendedPalette, StandardPalette};

fuzz_target!(|data: &[u8]| {
    let sp = StandardPalette::new();
    let mut ep = ExtendedPalette::new();
    let mut out = [0u16; 4];
    let _ = decode_block(data, &sp, &mut ep, Some(&mut out));
});
