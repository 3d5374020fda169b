#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&bpp, rest)) = data.split_first() else {
        return;
    };
    let bpp = usize::from(bpp % 4) + 1;
    let Some((len, packets)) = rest.split_first_chunk::<2>() else {
        return;
    };
    let expected = usize::from(u16::from_le_bytes(*len)) * bpp;

    if let Ok(out) = zentga::unpack_packets(packets, bpp, expected, enough::Unstoppable) {
        assert_eq!(out.len(), expected);
        assert!(out.consumed() <= packets.len());
    }
});
