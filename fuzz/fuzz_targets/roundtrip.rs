#![no_main]
use libfuzzer_sys::fuzz_target;
use rlcodec::low_level::frame::{decode_frame, encode_frame};
use rlcodec::quantizer::quantize;

// Quantization is lossy, but encode(quantize(x)) -> decode(...) must be
// exact: this checks that invariant directly rather than round-tripping
// arbitrary (pre-quantization) pixels.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let width = (data[0] % 8) as u32 + 1;
    let height = (data[1] % 8) as u32 + 1;
    let needed = (width * height) as usize;
    let pixels: &[u8] = &data[2..];
    if pixels.len() < needed * 2 {
        return;
    }

    let mut plane: Vec<u16> = (0..needed)
        .map(|i| u16::from_le_bytes([pixels[i * 2], pixels[i * 2 + 1]]))
        .collect();

    if quantize(&mut plane, width, height).is_err() {
        return;
    }

    let encoded = match encode_frame(&plane, width, height, None) {
        Ok(e) => e,
        Err(_) => return,
    };

    let mut decoded = vec![0u16; needed];
    if decode_frame(&encoded, width, height, Some(&mut decoded)).is_ok() {
        assert_eq!(decoded, plane);
    }
});
