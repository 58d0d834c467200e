use icoforge::{
    assemble, encode, read_directory, EncodedVariant, ImageCodec, PngCodec,
    RgbaPixels, SizeSpec, Tier,
};

//===========================================================================//

const SIZES: &[u32] = &[16, 32, 48, 64, 128, 256];

// Reverses the bitmap encoding: drops the header, flips rows back to
// top-down order and swaps BGRA to RGBA.
fn decode_bitmap_body(data: &[u8], size: u32) -> Vec<u8> {
    let row_size = 4 * size as usize;
    let body = &data[40..];
    let mut rgba = Vec::with_capacity(body.len());
    for row in (0..size as usize).rev() {
        for bgra in body[row * row_size..][..row_size].chunks_exact(4) {
            rgba.extend_from_slice(&[bgra[2], bgra[1], bgra[0], bgra[3]]);
        }
    }
    rgba
}

//===========================================================================//

#[test]
fn bitmap_tier_round_trips_solid_colors() {
    for &size in SIZES.iter() {
        let pixels = RgbaPixels::solid(size, size, [0x20, 0x80, 0xe0, 0xff]);
        let data = encode(&pixels, Tier::Bitmap, &PngCodec).unwrap();
        assert_eq!(data.len(), 40 + (size * size * 4) as usize);
        assert_eq!(decode_bitmap_body(&data, size), pixels.rgba_data());
    }
}

#[test]
fn bitmap_tier_round_trips_patterns() {
    // Every pixel differs, so a missing row flip or channel swap shows up.
    let size = 16;
    let mut rgba = Vec::new();
    for index in 0..(size * size) {
        rgba.extend_from_slice(&[
            index as u8,
            (index / 16) as u8,
            (255 - index % 256) as u8,
            if index % 7 == 0 { 128 } else { 255 },
        ]);
    }
    let pixels = RgbaPixels::from_rgba_data(size, size, rgba.clone());
    let data = encode(&pixels, Tier::Bitmap, &PngCodec).unwrap();
    assert_eq!(decode_bitmap_body(&data, size), rgba);
}

#[test]
fn bitmap_height_field_is_doubled() {
    let pixels = RgbaPixels::solid(48, 48, [0, 0, 0, 0]);
    let data = encode(&pixels, Tier::Bitmap, &PngCodec).unwrap();
    assert_eq!(&data[4..8], &48i32.to_le_bytes());
    assert_eq!(&data[8..12], &96i32.to_le_bytes());
    assert_eq!(&data[14..16], &32u16.to_le_bytes());
}

#[test]
fn compressed_tier_matches_codec_output() {
    let pixels = RgbaPixels::solid(128, 128, [1, 2, 3, 4]);
    let data = encode(&pixels, Tier::Compressed, &PngCodec).unwrap();
    assert_eq!(data, PngCodec.compress(&pixels).unwrap());
}

//===========================================================================//

#[test]
fn assembled_length_and_bounds_for_every_count() {
    for count in 1..=SIZES.len() {
        let variants: Vec<EncodedVariant> = SIZES[..count]
            .iter()
            .map(|&size| {
                let tier =
                    if size >= 128 { Tier::Compressed } else { Tier::Bitmap };
                let pixels = RgbaPixels::solid(size, size, [9, 8, 7, 255]);
                EncodedVariant {
                    spec: SizeSpec::square(size, tier),
                    payload: encode(&pixels, tier, &PngCodec).unwrap(),
                }
            })
            .collect();
        let file = assemble(&variants).unwrap();
        let payloads: usize =
            variants.iter().map(|variant| variant.payload.len()).sum();
        assert_eq!(file.len(), 6 + 16 * count + payloads);
        assert_eq!(&file[..6], &[0, 0, 1, 0, count as u8, 0]);

        let entries = read_directory(&file).unwrap();
        assert_eq!(entries.len(), count);
        let mut spans: Vec<(usize, usize)> = entries
            .iter()
            .map(|entry| {
                let start = entry.data_offset as usize;
                (start, start + entry.data_size as usize)
            })
            .collect();
        for &(start, end) in spans.iter() {
            assert!(start >= 6 + 16 * count);
            assert!(end <= file.len());
        }
        spans.sort();
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "overlapping payloads");
        }
    }
}

#[test]
fn dimension_bytes_use_zero_for_256() {
    let variants: Vec<EncodedVariant> = SIZES
        .iter()
        .map(|&size| EncodedVariant {
            spec: SizeSpec::square(size, Tier::Compressed),
            payload: vec![0xaa; 3],
        })
        .collect();
    let file = assemble(&variants).unwrap();
    for (index, &size) in SIZES.iter().enumerate() {
        let entry = &file[6 + 16 * index..][..16];
        let expected = if size == 256 { 0 } else { size as u8 };
        assert_eq!(entry[0], expected);
        assert_eq!(entry[1], expected);
    }
}

//===========================================================================//
