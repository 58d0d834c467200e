use crate::error::ConvertError;
use crate::pixels::RgbaPixels;
use crate::source::SourceImage;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};

//===========================================================================//

/// Where a scaled source lands on a target canvas.
///
/// The scale is uniform (`min(target_w / src_w, target_h / src_h)`), so the
/// aspect ratio is kept.  The drawn size is `round(src * scale)`, clamped to
/// `1..=target`, and the offsets center it with any odd leftover pixel
/// going to the right/bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Uniform scale factor applied to the source.
    pub scale: f64,
    /// Left edge of the drawn region on the canvas.
    pub x: u32,
    /// Top edge of the drawn region on the canvas.
    pub y: u32,
    /// Width of the drawn region.
    pub width: u32,
    /// Height of the drawn region.
    pub height: u32,
}

impl Placement {
    /// Computes the placement of a `src_width`x`src_height` image centered
    /// on a `target_width`x`target_height` canvas.  All four dimensions must
    /// be nonzero.
    pub fn center(
        src_width: u32,
        src_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> Placement {
        debug_assert!(src_width > 0 && src_height > 0);
        debug_assert!(target_width > 0 && target_height > 0);
        let scale = f64::min(
            target_width as f64 / src_width as f64,
            target_height as f64 / src_height as f64,
        );
        let scaled = |edge: u32, limit: u32| -> u32 {
            ((edge as f64 * scale).round() as u32).clamp(1, limit)
        };
        let width = scaled(src_width, target_width);
        let height = scaled(src_height, target_height);
        Placement {
            scale,
            x: (target_width - width) / 2,
            y: (target_height - height) / 2,
            width,
            height,
        }
    }
}

//===========================================================================//

/// A drawing surface capability: scales a source onto a transparent canvas.
pub trait Compositor: Send + Sync {
    /// Draws `source`, scaled to `placement.width`x`placement.height`, at
    /// (`placement.x`, `placement.y`) on a fully transparent canvas of
    /// `canvas_width`x`canvas_height` pixels, and returns the canvas.
    fn draw(
        &self,
        source: &RgbaPixels,
        placement: &Placement,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<RgbaPixels, ConvertError>;
}

/// Software compositor using bilinear (triangle-filter) resampling.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmoothCompositor;

impl Compositor for SmoothCompositor {
    fn draw(
        &self,
        source: &RgbaPixels,
        placement: &Placement,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<RgbaPixels, ConvertError> {
        // Borrow the source pixels; only the scaled copy is allocated.
        let source_view = match ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(
            source.width(),
            source.height(),
            source.rgba_data(),
        ) {
            Some(view) => view,
            None => {
                return Err(ConvertError::CompositingUnavailable(format!(
                    "Cannot wrap {}x{} source pixels",
                    source.width(),
                    source.height()
                )))
            }
        };
        // A fresh buffer is all zeros, i.e. fully transparent.
        let mut canvas = RgbaImage::new(canvas_width, canvas_height);
        let (x, y) = (placement.x as i64, placement.y as i64);
        if (placement.width, placement.height)
            == (source.width(), source.height())
        {
            imageops::replace(&mut canvas, &source_view, x, y);
        } else {
            let scaled = imageops::resize(
                &source_view,
                placement.width,
                placement.height,
                FilterType::Triangle,
            );
            imageops::replace(&mut canvas, &scaled, x, y);
        }
        Ok(RgbaPixels::from_rgba_data(
            canvas_width,
            canvas_height,
            canvas.into_raw(),
        ))
    }
}

//===========================================================================//

/// Scales `image` to fit, centered, on a transparent `target_width`x
/// `target_height` canvas.
pub fn resample(
    compositor: &dyn Compositor,
    image: &SourceImage,
    target_width: u32,
    target_height: u32,
) -> Result<RgbaPixels, ConvertError> {
    if target_width == 0 || target_height == 0 {
        return Err(ConvertError::CompositingUnavailable(format!(
            "Cannot create a {}x{} canvas",
            target_width, target_height
        )));
    }
    let placement = Placement::center(
        image.width(),
        image.height(),
        target_width,
        target_height,
    );
    let pixels = compositor.draw(
        image.pixels(),
        &placement,
        target_width,
        target_height,
    )?;
    if pixels.width() != target_width || pixels.height() != target_height {
        return Err(ConvertError::CompositingUnavailable(format!(
            "Compositor returned {}x{} canvas (expected {}x{})",
            pixels.width(),
            pixels.height(),
            target_width,
            target_height
        )));
    }
    Ok(pixels)
}

//===========================================================================//


//===========================================================================//
