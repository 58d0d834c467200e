use crate::error::ConvertError;
use crate::pixels::RgbaPixels;
use std::io::Read;

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

//===========================================================================//

/// Undecoded source bytes plus the name they were submitted under.
#[derive(Clone, Debug)]
pub struct RawSource {
    name: String,
    bytes: Vec<u8>,
}

impl RawSource {
    /// Wraps encoded image bytes, e.g. the contents of `logo.png`.
    pub fn new<S: Into<String>>(name: S, bytes: Vec<u8>) -> RawSource {
        RawSource { name: name.into(), bytes }
    }

    /// Returns the name this source was submitted under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

//===========================================================================//

/// A decoded raster plus its identifying name.
#[derive(Clone, Debug)]
pub struct SourceImage {
    name: String,
    pixels: RgbaPixels,
}

impl SourceImage {
    /// Creates a source image from already-decoded pixels.
    pub fn new<S: Into<String>>(name: S, pixels: RgbaPixels) -> SourceImage {
        SourceImage { name: name.into(), pixels }
    }

    /// Decodes `raw` with the given decoder.
    pub fn decode(
        raw: &RawSource,
        decoder: &dyn ImageDecoder,
    ) -> Result<SourceImage, ConvertError> {
        let pixels = decoder.decode(raw.bytes())?;
        Ok(SourceImage::new(raw.name(), pixels))
    }

    /// Returns the name this image was submitted under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded pixels.
    pub fn pixels(&self) -> &RgbaPixels {
        &self.pixels
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

//===========================================================================//

/// Turns encoded image bytes into a fully materialized RGBA raster.
pub trait ImageDecoder: Send + Sync {
    /// Decodes `bytes`, failing with `ConvertError::DecodeFailed` if they
    /// are not an image this decoder understands.
    fn decode(&self, bytes: &[u8]) -> Result<RgbaPixels, ConvertError>;
}

/// Decodes PNG files of any color type into 8-bit RGBA.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngDecoder;

impl PngDecoder {
    fn read_png<R: Read>(reader: R) -> Result<RgbaPixels, ConvertError> {
        let mut decoder = png::Decoder::new(reader);
        // Palette and sub-byte images come out as 8-bit RGB(A) or gray.
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        let mut png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(error) => decode_failed!("Malformed PNG data: {}", error),
        };
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let info = match png_reader.next_frame(&mut buffer) {
            Ok(info) => info,
            Err(error) => decode_failed!("Malformed PNG data: {}", error),
        };
        if info.width == 0 || info.height == 0 {
            decode_failed!("Invalid PNG size ({}x{})",
                           info.width,
                           info.height);
        }
        if info.bit_depth != png::BitDepth::Eight {
            decode_failed!("Unsupported PNG bit depth: {:?}", info.bit_depth);
        }
        buffer.truncate(info.buffer_size());
        let rgba_data = match info.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                let num_pixels = buffer.len() / 3;
                let mut rgba = Vec::with_capacity(num_pixels * 4);
                for i in 0..num_pixels {
                    rgba.extend_from_slice(&buffer[(3 * i)..][..3]);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let num_pixels = buffer.len() / 2;
                let mut rgba = Vec::with_capacity(num_pixels * 4);
                for i in 0..num_pixels {
                    let gray = buffer[2 * i];
                    let alpha = buffer[2 * i + 1];
                    rgba.extend_from_slice(&[gray, gray, gray, alpha]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buffer.len() * 4);
                for gray in buffer.into_iter() {
                    rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
                }
                rgba
            }
            png::ColorType::Indexed => {
                decode_failed!("Unexpanded PNG palette data ({:?})",
                               info.color_type);
            }
        };
        Ok(RgbaPixels::from_rgba_data(info.width, info.height, rgba_data))
    }
}

impl ImageDecoder for PngDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaPixels, ConvertError> {
        if !bytes.starts_with(PNG_SIGNATURE) {
            decode_failed!("Not a PNG file ({} bytes)", bytes.len());
        }
        PngDecoder::read_png(bytes)
    }
}

//===========================================================================//


//===========================================================================//
