#![no_main]
use libfuzzer_sys::fuzz_target;
use rlcodec::Decoder;

fuzz_target!(|data: &[u8]| {
    if let Ok(dec) = Decoder::from_mem(data) {
        for frame in 0..dec.frame_count() {
            let _ = dec.decode_frame(frame);
        }
    }
});
