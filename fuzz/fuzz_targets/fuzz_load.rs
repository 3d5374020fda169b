#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Loading arbitrary bytes must never panic, and large headers must not
    // allocate beyond what the input holds.
    let Ok(file) = zentga::TgaFile::from_bytes(data) else {
        return;
    };
    if file.is_rle() {
        let _ = zentga::unpack_rle(&file, None, enough::Unstoppable);
    }
});
