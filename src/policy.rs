use crate::error::ConvertError;
use crate::pixels::MAX_ICON_DIMENSION;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// How the pixels of one icon variant are stored in the ICO file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Tier {
    /// An uncompressed 32-bpp device-independent bitmap.
    Bitmap,
    /// An embedded, independently decodable PNG stream.
    Compressed,
}

/// Which set of sizes to produce for each source image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Mode {
    /// Every size in the policy's optimized set.
    Optimized,
    /// Only the policy's single large size.
    SingleLarge,
}

//===========================================================================//

/// One requested output variant.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct SizeSpec {
    /// Width of the variant, in pixels.
    pub width: u32,
    /// Height of the variant, in pixels.
    pub height: u32,
    /// Encoding used for the variant's payload.
    pub tier: Tier,
}

impl SizeSpec {
    /// Creates a square spec of `size`x`size` pixels.
    pub const fn square(size: u32, tier: Tier) -> SizeSpec {
        SizeSpec { width: size, height: size, tier }
    }

    /// Checks that the spec is square with an edge between 1 and 256.
    pub(crate) fn validate(&self) -> Result<(), ConvertError> {
        if self.width != self.height {
            invalid_policy!("Icon sizes must be square (got {}x{})",
                            self.width,
                            self.height);
        }
        if self.width == 0 || self.width > MAX_ICON_DIMENSION {
            invalid_policy!("Icon size must be between 1 and {} (got {})",
                            MAX_ICON_DIMENSION,
                            self.width);
        }
        Ok(())
    }
}

//===========================================================================//

const OPTIMIZED_SIZES: &[SizeSpec] = &[
    SizeSpec::square(16, Tier::Bitmap),
    SizeSpec::square(32, Tier::Bitmap),
    SizeSpec::square(48, Tier::Bitmap),
    SizeSpec::square(64, Tier::Bitmap),
    SizeSpec::square(128, Tier::Compressed),
    SizeSpec::square(256, Tier::Compressed),
];

const SINGLE_LARGE_SIZES: &[SizeSpec] =
    &[SizeSpec::square(256, Tier::Compressed)];

/// The table of sizes produced for each `Mode`.  Built once and handed to
/// the `Converter`; never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSizePolicy"))]
pub struct SizePolicy {
    optimized: Vec<SizeSpec>,
    single_large: Vec<SizeSpec>,
}

impl SizePolicy {
    /// The standard table: 16, 32, 48 and 64 as bitmaps plus 128 and 256
    /// compressed for `Mode::Optimized`; a single compressed 256 for
    /// `Mode::SingleLarge`.
    pub fn standard() -> SizePolicy {
        SizePolicy {
            optimized: OPTIMIZED_SIZES.to_vec(),
            single_large: SINGLE_LARGE_SIZES.to_vec(),
        }
    }

    /// Creates a custom table.  Each set must be non-empty and every spec
    /// must be square with an edge between 1 and 256.
    pub fn new(
        optimized: Vec<SizeSpec>,
        single_large: Vec<SizeSpec>,
    ) -> Result<SizePolicy, ConvertError> {
        for (label, specs) in
            [("optimized", &optimized), ("single-large", &single_large)]
        {
            if specs.is_empty() {
                invalid_policy!("The {} size set is empty", label);
            }
            if specs.len() > u16::MAX as usize {
                invalid_policy!("The {} size set has {} entries (max {})",
                                label,
                                specs.len(),
                                u16::MAX);
            }
            for spec in specs.iter() {
                spec.validate()?;
            }
        }
        Ok(SizePolicy { optimized, single_large })
    }

    /// Returns the specs for `mode`, in directory order.
    pub fn specs(&self, mode: Mode) -> &[SizeSpec] {
        match mode {
            Mode::Optimized => &self.optimized,
            Mode::SingleLarge => &self.single_large,
        }
    }
}

impl Default for SizePolicy {
    fn default() -> SizePolicy {
        SizePolicy::standard()
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawSizePolicy {
    optimized: Vec<SizeSpec>,
    single_large: Vec<SizeSpec>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSizePolicy> for SizePolicy {
    type Error = ConvertError;

    fn try_from(raw: RawSizePolicy) -> Result<SizePolicy, ConvertError> {
        SizePolicy::new(raw.optimized, raw.single_large)
    }
}

//===========================================================================//



//===========================================================================//
