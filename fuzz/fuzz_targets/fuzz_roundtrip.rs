#![no_main]
use libfuzzer_sys::fuzz_target;
use zentga::*;

fuzz_target!(|data: &[u8]| {
    // Anything that loads must write back and load to the same file.
    let Ok(file) = TgaFile::from_bytes(data) else {
        return;
    };

    let encoded = file.to_vec().expect("loaded file failed to write");
    let Ok(reloaded) = TgaFile::from_bytes(&encoded) else {
        panic!("written file failed to load");
    };
    assert_eq!(file, reloaded, "roundtrip mismatch");

    // Sections that are present come back byte-for-byte.
    if file.header.has_id_field() {
        assert_eq!(&encoded[18..18 + file.id_field.len()], &file.id_field[..]);
    }
    assert_eq!(&encoded[..18], &data[..18]);
});
