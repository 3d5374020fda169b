#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(id_len: u8, cmap_type: u8, image_type: u8, cmap_len: u16, cmap_bits: u8,
          width: u16, height: u16, depth: u8, descriptor: u8) -> Vec<u8> {
    let mut h = vec![id_len, cmap_type, image_type, 0, 0];
    h.extend_from_slice(&cmap_len.to_le_bytes());
    h.push(cmap_bits);
    h.extend_from_slice(&[0, 0, 0, 0]); // x/y origin
    h.extend_from_slice(&width.to_le_bytes());
    h.extend_from_slice(&height.to_le_bytes());
    h.push(depth);
    h.push(descriptor);
    h
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_load";
    fs::create_dir_all(dir).unwrap();

    // RGB 2x2, 24-bit
    let mut rgb = header(0, 0, 2, 0, 0, 2, 2, 24, 0);
    rgb.extend_from_slice(&[0xff, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff, 0x80, 0x80, 0x80]);
    fs::write(format!("{dir}/rgb_2x2.tga"), rgb).unwrap();

    // Color-mapped 3x1 with ID field and 2-entry 24-bit palette
    let mut cmap = header(3, 1, 1, 2, 24, 3, 1, 8, 0x20);
    cmap.extend_from_slice(b"abc");
    cmap.extend_from_slice(&[0, 0, 0, 255, 255, 255]);
    cmap.extend_from_slice(&[0, 1, 0]);
    fs::write(format!("{dir}/cmap_3x1.tga"), cmap).unwrap();

    // RLE gray 4x1: run of 3, raw 1
    let mut rle = header(0, 0, 11, 0, 0, 4, 1, 8, 0);
    rle.extend_from_slice(&[0x82, 0x40, 0x00, 0x80]);
    fs::write(format!("{dir}/rle_gray_4x1.tga"), rle).unwrap();

    // RLE BGRA 2x1 with TGA 2.0 footer after the data
    let mut rle32 = header(0, 0, 10, 0, 0, 2, 1, 32, 8);
    rle32.extend_from_slice(&[0x81, 1, 2, 3, 4]);
    rle32.extend_from_slice(&[0; 8]);
    rle32.extend_from_slice(b"TRUEVISION-XFILE.\0");
    fs::write(format!("{dir}/rle_bgra_2x1.tga"), rle32).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/header_17.bin"), &header(0, 0, 2, 0, 0, 1, 1, 24, 0)[..17]).unwrap();
    fs::write(format!("{dir}/huge_dims.bin"), header(0, 0, 2, 0, 0, 65535, 65535, 32, 0)).unwrap();
    fs::write(format!("{dir}/absent_cmap_len.bin"), {
        let mut v = header(0, 0, 3, 10, 8, 1, 1, 8, 0);
        v.extend_from_slice(&[0xee; 11]);
        v
    }).unwrap();

    println!("Generated seed corpus in {dir}/");
}
