//! A library for converting raster images into Windows ICO files.
//!
//! Each source image is resampled to every size a [`SizePolicy`] calls for,
//! each size is encoded either as an uncompressed 32-bpp bitmap or as an
//! embedded PNG, and the results are assembled into one ICO container.  A
//! [`Converter`] runs that pipeline for a single image or for a whole batch,
//! converting batch members in parallel while keeping results in input
//! order.
//!
//! # Example
//!
//! ```no_run
//! use icoforge::{Converter, Mode, RawSource};
//!
//! let bytes = std::fs::read("logo.png").unwrap();
//! let converter = Converter::new();
//! let result = converter
//!     .convert_raw(&RawSource::new("logo.png", bytes), Mode::Optimized)
//!     .unwrap();
//! std::fs::write(result.output_name(), result.bytes()).unwrap();
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod archive;
mod batch;
mod container;
mod encode;
mod error;
mod pixels;
mod policy;
mod resample;
mod source;

pub use crate::archive::{
    archive_name, archive_name_now, bundle, ArchiveSink, DirectorySink,
};
pub use crate::batch::{
    output_name, BatchError, BatchIntent, BatchOutcome, CancelToken,
    ConversionResult, Converter, SourceOutcome,
};
pub use crate::container::{
    assemble, read_directory, DirectoryEntry, EncodedVariant, IconContainer,
};
pub use crate::encode::{encode, encode_bitmap, ImageCodec, PngCodec};
pub use crate::error::ConvertError;
pub use crate::pixels::RgbaPixels;
pub use crate::policy::{Mode, SizePolicy, SizeSpec, Tier};
pub use crate::resample::{resample, Compositor, Placement, SmoothCompositor};
pub use crate::source::{ImageDecoder, PngDecoder, RawSource, SourceImage};

//===========================================================================//

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    PngCodec.compress(&RgbaPixels::solid(width, height, rgba)).unwrap()
}

//===========================================================================//
