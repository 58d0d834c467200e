//===========================================================================//

// Largest edge, in pixels, that an ICO directory entry can describe.
pub(crate) const MAX_ICON_DIMENSION: u32 = 256;

//===========================================================================//

/// A block of straight (non-premultiplied) RGBA pixel data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RgbaPixels {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl RgbaPixels {
    /// Creates a pixel block with the given dimensions and RGBA data.  The
    /// `width` and `height` must be nonzero, and `rgba_data` must have `4 *
    /// width * height` bytes and be in row-major order from top to bottom.
    /// Panics if the dimensions are zero or if `rgba_data` is the wrong
    /// length.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> RgbaPixels {
        if width == 0 || height == 0 {
            panic!("Invalid dimensions ({}x{}, but must be nonzero)",
                   width,
                   height);
        }
        let expected_data_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_data_len {
            panic!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        RgbaPixels { width, height, rgba_data }
    }

    /// Creates a pixel block in which every pixel has the same color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaPixels {
        let count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        RgbaPixels::from_rgba_data(width, height, data)
    }

    /// Creates a fully transparent (all-zero) pixel block.
    pub fn transparent(width: u32, height: u32) -> RgbaPixels {
        RgbaPixels::solid(width, height, [0, 0, 0, 0])
    }

    /// Returns the width, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA data, in row-major order from top to bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Returns the RGBA value of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = 4 * (y as usize * self.width as usize + x as usize);
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.rgba_data[start..start + 4]);
        rgba
    }

    /// Consumes the block, returning its RGBA data.
    pub fn into_rgba_data(self) -> Vec<u8> {
        self.rgba_data
    }
}

//===========================================================================//


//===========================================================================//
