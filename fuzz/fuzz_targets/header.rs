#![no_main]
use libfuzzer_sys::fuzz_target;
use rlcodec::low_level::header;

fuzz_target!(|data: &[u8]| {
    let _ = header::get_info(data);
});
