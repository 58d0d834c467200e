use crate::error::ConvertError;
use crate::pixels::RgbaPixels;
use crate::policy::Tier;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

//===========================================================================//

// The size of a BITMAPINFOHEADER struct, in bytes.
pub(crate) const BMP_HEADER_LEN: u32 = 40;

// Every variant is emitted as 32-bit BGRA.
pub(crate) const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// A lossless, alpha-preserving single-frame image codec.
pub trait ImageCodec: Send + Sync {
    /// Compresses `pixels` into a complete, self-contained byte stream.
    fn compress(&self, pixels: &RgbaPixels) -> Result<Vec<u8>, ConvertError>;
}

/// Encodes pixels as 8-bit RGBA PNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl PngCodec {
    fn write_png<W: Write>(
        pixels: &RgbaPixels,
        writer: W,
    ) -> Result<(), png::EncodingError> {
        let mut encoder =
            png::Encoder::new(writer, pixels.width(), pixels.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels.rgba_data())?;
        writer.finish()
    }
}

impl ImageCodec for PngCodec {
    fn compress(&self, pixels: &RgbaPixels) -> Result<Vec<u8>, ConvertError> {
        let mut data = Vec::new();
        match PngCodec::write_png(pixels, &mut data) {
            Ok(()) => Ok(data),
            Err(png::EncodingError::IoError(error)) => Err(error.into()),
            Err(png::EncodingError::Format(error)) => {
                encode_failed!("PNG format error: {}", error);
            }
            Err(png::EncodingError::LimitsExceeded) => {
                encode_failed!("PNG limits exceeded ({}x{})",
                               pixels.width(),
                               pixels.height());
            }
            Err(png::EncodingError::Parameter(error)) => {
                encode_failed!("PNG parameter error: {}", error);
            }
        }
    }
}

//===========================================================================//

/// Encodes `pixels` as the payload of one directory entry.
pub fn encode(
    pixels: &RgbaPixels,
    tier: Tier,
    codec: &dyn ImageCodec,
) -> Result<Vec<u8>, ConvertError> {
    let payload = match tier {
        Tier::Bitmap => encode_bitmap(pixels)?,
        Tier::Compressed => codec.compress(pixels)?,
    };
    log::debug!(
        "Encoded {}x{} {:?} payload ({} bytes)",
        pixels.width(),
        pixels.height(),
        tier,
        payload.len()
    );
    Ok(payload)
}

/// Encodes `pixels` as a 32-bpp device-independent bitmap: a
/// BITMAPINFOHEADER followed by BGRA rows stored bottom row first.
///
/// The header's height field is doubled, as ICO consumers expect for an
/// XOR image followed by an AND mask, but no AND mask is written; the
/// alpha channel carries all transparency.
pub fn encode_bitmap(pixels: &RgbaPixels) -> io::Result<Vec<u8>> {
    let width = pixels.width();
    let height = pixels.height();
    let rgba = pixels.rgba_data();
    let row_size = 4 * width as usize;
    let data_size = BMP_HEADER_LEN as usize + height as usize * row_size;
    let mut data = Vec::<u8>::with_capacity(data_size);

    // Write the BITMAPINFOHEADER struct:
    data.write_u32::<LittleEndian>(BMP_HEADER_LEN)?;
    data.write_i32::<LittleEndian>(width as i32)?;
    data.write_i32::<LittleEndian>(2 * height as i32)?;
    data.write_u16::<LittleEndian>(1)?; // planes
    data.write_u16::<LittleEndian>(BITS_PER_PIXEL)?;
    data.write_u32::<LittleEndian>(0)?; // compression
    data.write_u32::<LittleEndian>(0)?; // image size
    data.write_i32::<LittleEndian>(0)?; // horz ppm
    data.write_i32::<LittleEndian>(0)?; // vert ppm
    data.write_u32::<LittleEndian>(0)?; // colors used
    data.write_u32::<LittleEndian>(0)?; // colors important
    debug_assert_eq!(data.len(), BMP_HEADER_LEN as usize);

    // Write the color data, starting from the *bottom* row:
    for row in 0..height {
        let start = row_size * (height - row - 1) as usize;
        for pixel in rgba[start..start + row_size].chunks_exact(4) {
            data.write_all(&[pixel[2], pixel[1], pixel[0], pixel[3]])?;
        }
    }

    debug_assert_eq!(data.len(), data_size);
    Ok(data)
}

//===========================================================================//


//===========================================================================//
