use crate::encode::{BITS_PER_PIXEL, BMP_HEADER_LEN};
use crate::error::ConvertError;
use crate::policy::{SizeSpec, Tier};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

//===========================================================================//

// Length of the ICONDIR header, in bytes.
const HEADER_LEN: u32 = 6;

// Length of one ICONDIRENTRY, in bytes.
const ENTRY_LEN: u32 = 16;

// Resource type number for icons (cursors use 2).
const ICON_RESOURCE_TYPE: u16 = 1;

//===========================================================================//

/// One encoded size variant, ready to be placed in a container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedVariant {
    /// The size and tier this payload was produced for.
    pub spec: SizeSpec,
    /// The bitmap body or compressed stream.
    pub payload: Vec<u8>,
}

//===========================================================================//

/// An assembled ICO file together with the variants it was built from.
#[derive(Clone, Debug)]
pub struct IconContainer {
    variants: Vec<EncodedVariant>,
    bytes: Vec<u8>,
}

impl IconContainer {
    /// Serializes `variants`, in order, into a complete ICO file.
    pub fn assemble(
        variants: Vec<EncodedVariant>,
    ) -> Result<IconContainer, ConvertError> {
        let mut bytes = Vec::with_capacity(file_len(&variants));
        write_icon(&variants, &mut bytes)?;
        debug_assert_eq!(bytes.len(), file_len(&variants));
        log::debug!(
            "Assembled ICO with {} image(s) ({} bytes)",
            variants.len(),
            bytes.len()
        );
        Ok(IconContainer { variants, bytes })
    }

    /// Returns the variants, in directory order.
    pub fn variants(&self) -> &[EncodedVariant] {
        &self.variants
    }

    /// Returns the serialized ICO file.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the container, returning the serialized ICO file.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Serializes `variants`, in order, into a complete ICO file.
pub fn assemble(variants: &[EncodedVariant]) -> Result<Vec<u8>, ConvertError> {
    let mut bytes = Vec::with_capacity(file_len(variants));
    write_icon(variants, &mut bytes)?;
    Ok(bytes)
}

fn file_len(variants: &[EncodedVariant]) -> usize {
    let payloads: usize =
        variants.iter().map(|variant| variant.payload.len()).sum();
    HEADER_LEN as usize + ENTRY_LEN as usize * variants.len() + payloads
}

fn write_icon<W: Write>(
    variants: &[EncodedVariant],
    mut writer: W,
) -> Result<(), ConvertError> {
    if variants.is_empty() {
        return Err(ConvertError::EmptyVariantSet);
    }
    if variants.len() > (u16::MAX as usize) {
        return Err(invalid_input(format!(
            "Too many images in ICO (was {}, but max is {})",
            variants.len(),
            u16::MAX
        )));
    }
    for variant in variants.iter() {
        check_variant(variant)?;
    }
    if file_len(variants) > (u32::MAX as usize) {
        return Err(invalid_input(format!(
            "ICO data too large for 32-bit offsets ({} bytes)",
            file_len(variants)
        )));
    }
    writer.write_u16::<LittleEndian>(0)?; // reserved
    writer.write_u16::<LittleEndian>(ICON_RESOURCE_TYPE)?;
    writer.write_u16::<LittleEndian>(variants.len() as u16)?;
    let mut data_offset = HEADER_LEN + ENTRY_LEN * (variants.len() as u32);
    for variant in variants.iter() {
        writer.write_u8(dimension_byte(variant.spec.width))?;
        writer.write_u8(dimension_byte(variant.spec.height))?;
        writer.write_u8(0)?; // color count
        writer.write_u8(0)?; // reserved
        writer.write_u16::<LittleEndian>(1)?; // color planes
        writer.write_u16::<LittleEndian>(BITS_PER_PIXEL)?;
        let data_size = variant.payload.len() as u32;
        writer.write_u32::<LittleEndian>(data_size)?;
        writer.write_u32::<LittleEndian>(data_offset)?;
        data_offset += data_size;
    }
    for variant in variants.iter() {
        writer.write_all(&variant.payload)?;
    }
    Ok(())
}

fn check_variant(variant: &EncodedVariant) -> Result<(), ConvertError> {
    let spec = variant.spec;
    if let Err(error) = spec.validate() {
        return Err(match error {
            ConvertError::InvalidPolicy(message) => invalid_input(message),
            other => other,
        });
    }
    if spec.tier == Tier::Bitmap {
        let expected = BMP_HEADER_LEN as usize
            + 4 * spec.width as usize * spec.height as usize;
        if variant.payload.len() != expected {
            return Err(invalid_input(format!(
                "Bitmap payload for {}x{} has {} bytes (must be {})",
                spec.width,
                spec.height,
                variant.payload.len(),
                expected
            )));
        }
    }
    Ok(())
}

// A width/height byte of zero indicates a size of 256.  Sizes outside
// 1..=256 are rejected by `check_variant` before anything is written.
fn dimension_byte(size: u32) -> u8 {
    if size == 256 {
        0
    } else {
        size as u8
    }
}

fn invalid_input(message: String) -> ConvertError {
    io::Error::new(io::ErrorKind::InvalidInput, message).into()
}

//===========================================================================//

/// The fields of one ICONDIRENTRY, as read back from an ICO file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DirectoryEntry {
    /// Width in pixels, with a stored zero read as 256.
    pub width: u32,
    /// Height in pixels, with a stored zero read as 256.
    pub height: u32,
    /// Number of palette colors (zero for true-color images).
    pub num_colors: u8,
    /// Color planes.
    pub color_planes: u16,
    /// Bits per pixel.
    pub bits_per_pixel: u16,
    /// Length of the image payload, in bytes.
    pub data_size: u32,
    /// Absolute file offset of the image payload.
    pub data_offset: u32,
}

impl DirectoryEntry {
    /// Returns true if the payload this entry points to is a PNG stream.
    pub fn is_png(&self, file: &[u8]) -> bool {
        self.payload(file).map_or(false, |data| data.starts_with(b"\x89PNG"))
    }

    /// Returns the payload this entry points to within `file`, or `None` if
    /// it runs past the end of the file.
    pub fn payload<'a>(&self, file: &'a [u8]) -> Option<&'a [u8]> {
        let start = self.data_offset as usize;
        let end = start.checked_add(self.data_size as usize)?;
        file.get(start..end)
    }
}

/// Reads the header and directory of an ICO file without decoding any
/// image data.  Fails if the file is not an icon (type 1) resource or any
/// entry's payload lies outside the file.
pub fn read_directory(file: &[u8]) -> io::Result<Vec<DirectoryEntry>> {
    let mut reader = file;
    let reserved = reader.read_u16::<LittleEndian>()?;
    if reserved != 0 {
        invalid_data!(
            "Invalid reserved field value in ICONDIR \
             (was {}, but must be 0)",
            reserved
        );
    }
    let restype = reader.read_u16::<LittleEndian>()?;
    if restype != ICON_RESOURCE_TYPE {
        invalid_data!("Invalid resource type ({})", restype);
    }
    let num_entries = reader.read_u16::<LittleEndian>()? as usize;
    let mut entries = Vec::<DirectoryEntry>::with_capacity(num_entries);
    for _ in 0..num_entries {
        let entry = read_entry(&mut reader)?;
        if entry.payload(file).is_none() {
            invalid_data!(
                "Image data out of bounds (offset {} + size {} > {})",
                entry.data_offset,
                entry.data_size,
                file.len()
            );
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn read_entry<R: Read>(reader: &mut R) -> io::Result<DirectoryEntry> {
    let width_byte = reader.read_u8()?;
    let height_byte = reader.read_u8()?;
    let num_colors = reader.read_u8()?;
    let reserved = reader.read_u8()?;
    if reserved != 0 {
        invalid_data!(
            "Invalid reserved field value in ICONDIRENTRY \
             (was {}, but must be 0)",
            reserved
        );
    }
    let color_planes = reader.read_u16::<LittleEndian>()?;
    let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
    let data_size = reader.read_u32::<LittleEndian>()?;
    let data_offset = reader.read_u32::<LittleEndian>()?;
    Ok(DirectoryEntry {
        width: if width_byte == 0 { 256 } else { width_byte as u32 },
        height: if height_byte == 0 { 256 } else { height_byte as u32 },
        num_colors,
        color_planes,
        bits_per_pixel,
        data_size,
        data_offset,
    })
}

//===========================================================================//


//===========================================================================//
