use icoforge::{
    read_directory, BatchError, BatchIntent, CancelToken, Compositor,
    ConvertError, Converter, ImageCodec, ImageDecoder, Mode, Placement,
    PngCodec, PngDecoder, RawSource, RgbaPixels, SmoothCompositor,
    SourceImage,
};
use std::thread;
use std::time::Duration;

//===========================================================================//

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    PngCodec.compress(&RgbaPixels::solid(width, height, rgba)).unwrap()
}

// Delegates to `SmoothCompositor` after sleeping in proportion to the
// source width, so wider sources finish later.
struct SlowCompositor;

impl Compositor for SlowCompositor {
    fn draw(
        &self,
        source: &RgbaPixels,
        placement: &Placement,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<RgbaPixels, ConvertError> {
        thread::sleep(Duration::from_millis(2 * source.width() as u64));
        SmoothCompositor.draw(source, placement, canvas_width, canvas_height)
    }
}

//===========================================================================//

#[test]
fn optimized_conversion_of_red_logo() {
    let red = RgbaPixels::solid(512, 512, [255, 0, 0, 255]);
    let source = SourceImage::new("logo.png", red);
    let converter = Converter::new();
    let file = converter.convert_one(&source, Mode::Optimized).unwrap();
    assert_eq!(&file[..6], b"\x00\x00\x01\x00\x06\x00");

    let entries = read_directory(&file).unwrap();
    let sizes: Vec<u32> = entries.iter().map(|entry| entry.width).collect();
    assert_eq!(sizes, vec![16, 32, 48, 64, 128, 256]);
    assert_eq!(file[6 + 16 * 5], 0); // 256 is stored as 0

    let mut expected_offset = 6 + 16 * 6;
    for entry in entries.iter() {
        assert_eq!(entry.width, entry.height);
        assert_eq!(entry.bits_per_pixel, 32);
        assert_eq!(entry.data_offset, expected_offset);
        expected_offset += entry.data_size;
    }
    assert_eq!(expected_offset as usize, file.len());

    for entry in entries[..4].iter() {
        assert!(!entry.is_png(&file));
        let size = entry.width as usize;
        assert_eq!(entry.data_size as usize, 40 + size * size * 4);
        let body = &entry.payload(&file).unwrap()[40..];
        for bgra in body.chunks_exact(4) {
            assert_eq!(bgra[0], 0);
            assert_eq!(bgra[1], 0);
            assert!(bgra[2] >= 0xfe);
            assert!(bgra[3] >= 0xfe);
        }
    }
    for entry in entries[4..].iter() {
        assert!(entry.is_png(&file));
        let pixels = PngDecoder.decode(entry.payload(&file).unwrap()).unwrap();
        assert_eq!(pixels.width(), entry.width);
        assert_eq!(pixels.height(), entry.height);
    }
}

#[test]
fn wide_source_is_centered_with_transparent_bands() {
    let blue = RgbaPixels::solid(100, 50, [0, 0, 255, 255]);
    let source = SourceImage::new("wide.png", blue);
    let file = Converter::new().convert_one(&source, Mode::Optimized).unwrap();
    let entries = read_directory(&file).unwrap();
    let entry = entries.iter().find(|entry| entry.width == 64).unwrap();
    let body = &entry.payload(&file).unwrap()[40..];
    let stored_row = |row: usize| &body[row * 64 * 4..][..64 * 4];
    // Stored rows run bottom to top, so source rows 0..16 are stored last.
    for row in 0..16 {
        assert!(stored_row(row).iter().all(|&byte| byte == 0));
        assert!(stored_row(63 - row).iter().all(|&byte| byte == 0));
    }
    assert_eq!(&stored_row(32)[..4], &[255, 0, 0, 255]);
}

#[test]
fn identical_input_gives_identical_output() {
    let converter = Converter::new();
    let raw = RawSource::new("logo.png", png_bytes(40, 30, [10, 20, 30, 200]));
    let first = converter.convert_raw(&raw, Mode::Optimized).unwrap();
    let second = converter.convert_raw(&raw, Mode::Optimized).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.output_name(), "logo.ico");
}

#[test]
fn single_file_decode_failure_is_reported() {
    let raw = RawSource::new("notes.txt", b"hello".to_vec());
    let result = Converter::new().convert_raw(&raw, Mode::SingleLarge);
    assert!(matches!(result, Err(ConvertError::DecodeFailed(_))));
}

//===========================================================================//

#[test]
fn batch_keeps_input_order() {
    let colors = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]];
    let sources = vec![
        RawSource::new("first.png", png_bytes(60, 60, colors[0])),
        RawSource::new("second.png", png_bytes(30, 30, colors[1])),
        RawSource::new("third.png", png_bytes(10, 10, colors[2])),
    ];
    let converter = Converter::new()
        .with_compositor(SlowCompositor)
        .with_max_parallel(3);
    let outcome = converter
        .convert_batch(&sources, Mode::SingleLarge, BatchIntent::Individual)
        .unwrap();
    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.failure_count(), 0);
    let results = outcome.into_results();
    let names: Vec<&str> =
        results.iter().map(|result| result.output_name()).collect();
    assert_eq!(names, vec!["first.ico", "second.ico", "third.ico"]);
    for (result, color) in results.iter().zip(colors.iter()) {
        let file = result.bytes();
        assert_eq!(&file[..6], b"\x00\x00\x01\x00\x01\x00");
        let entries = read_directory(file).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!((entries[0].width, entries[0].height), (256, 256));
        assert!(entries[0].is_png(file));
        let pixels =
            PngDecoder.decode(entries[0].payload(file).unwrap()).unwrap();
        assert_eq!(&pixels.pixel(128, 128), color);
    }
}

fn sources_with_broken_second() -> Vec<RawSource> {
    vec![
        RawSource::new("one.png", png_bytes(8, 8, [1, 2, 3, 255])),
        RawSource::new("broken.png", b"\x89PNG\r\n\x1a\nnope".to_vec()),
        RawSource::new("three.png", png_bytes(8, 8, [4, 5, 6, 255])),
    ]
}

#[test]
fn individual_batch_isolates_failures() {
    let sources = sources_with_broken_second();
    let outcome = Converter::new()
        .convert_batch(&sources, Mode::Optimized, BatchIntent::Individual)
        .unwrap();
    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.failed_names(), vec!["broken.png"]);
    let outcomes = outcome.outcomes();
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(outcomes[1].result, Err(ConvertError::DecodeFailed(_))));
    assert!(outcomes[2].result.is_ok());
}

#[test]
fn archive_batch_reports_aggregate_failure() {
    let sources = sources_with_broken_second();
    let error = Converter::new()
        .convert_batch(&sources, Mode::Optimized, BatchIntent::Archive)
        .unwrap_err();
    assert!(error.to_string().contains("broken.png"));
    let outcome = match error {
        BatchError::Partial(outcome) => outcome,
        other => panic!("unexpected error: {}", other),
    };
    let names: Vec<&str> =
        outcome.results().map(|result| result.output_name()).collect();
    assert_eq!(names, vec!["one.ico", "three.ico"]);
    for result in outcome.results() {
        assert_eq!(read_directory(result.bytes()).unwrap().len(), 6);
    }
}

#[test]
fn archive_batch_without_failures_succeeds() {
    let sources = vec![
        RawSource::new("a.png", png_bytes(5, 9, [9, 9, 9, 255])),
        RawSource::new("b.png", png_bytes(9, 5, [9, 9, 9, 0])),
    ];
    let outcome = Converter::new()
        .convert_batch(&sources, Mode::SingleLarge, BatchIntent::Archive)
        .unwrap();
    assert_eq!(outcome.results().count(), 2);
}

#[test]
fn cancelled_batch_discards_results() {
    let sources = sources_with_broken_second();
    let token = CancelToken::new();
    token.cancel();
    let result = Converter::new().convert_batch_with_cancel(
        &sources,
        Mode::Optimized,
        BatchIntent::Individual,
        &token,
    );
    assert!(matches!(result, Err(BatchError::Cancelled)));
}

#[test]
fn empty_batch_is_empty() {
    let outcome = Converter::new()
        .convert_batch(&[], Mode::Optimized, BatchIntent::Archive)
        .unwrap();
    assert!(outcome.is_empty());
}

//===========================================================================//
