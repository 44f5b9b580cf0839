//! DDS header structures and header validation.
//!
//! A DDS file is laid out as:
//!
//! ```text
//! "DDS " | DDS_HEADER (124) | [DDS_HEADER_DXT10 (20)] | payload
//! ```
//!
//! The extended header is present when the pixel format carries the
//! FOURCC flag and the code `DX10`.

use std::mem::size_of;
use std::path::Path;

use ddsvk_format::{DxgiFormat, LegacyPixelFormat, PixelFormatFlags, PixelFormatSource};
use tracing::debug;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result, DDS_MAGIC};

/// The 124-byte header following the magic, read in place.
///
/// Only the fields the loader consults are documented; the rest are kept
/// for layout.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Self-declared size, rejected unless it equals [`DdsHeader::SIZE`].
    pub size: u32,
    /// [`HeaderFlags`]; `HEIGHT` guards the 1D height check and `VOLUME`
    /// selects a 3D image.
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    /// Ignored; sizes are always recomputed from the format.
    pub pitch_or_linear_size: u32,
    /// Slice count of 3D textures, clamped to at least 1.
    pub depth: u32,
    /// Stored mips. Read through [`DdsHeader::mip_count`], which treats 0
    /// as 1.
    pub mipmap_count: u32,
    pub reserved1: [u32; 11],
    /// Legacy format description, or the `DX10` marker.
    pub pixel_format: DdsPixelFormat,
    pub caps: u32,
    /// Cube bits of legacy files; all six [`Caps2`] faces are required.
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// Whether a DX10 extended header follows.
    pub fn is_dx10(&self) -> bool {
        let flags = self.pixel_format.flags;
        flags & PixelFormatFlags::FOURCC != 0 && self.pixel_format.four_cc == FourCC::DX10
    }

    /// Whether the header flags mark a volume texture.
    pub fn is_volume(&self) -> bool {
        self.flags & HeaderFlags::VOLUME != 0
    }

    /// Mip count with 0 read as 1.
    pub fn mip_count(&self) -> u32 {
        self.mipmap_count.max(1)
    }
}

/// Header flag bits.
pub struct HeaderFlags;

impl HeaderFlags {
    /// Height is valid.
    pub const HEIGHT: u32 = 0x0000_0002;
    /// Depth is valid; the texture is a volume.
    pub const VOLUME: u32 = 0x0080_0000;
}

/// Cubemap bits in `caps2`.
pub struct Caps2;

impl Caps2 {
    /// The texture is a cubemap.
    pub const CUBEMAP: u32 = 0x0000_0200;
    pub const POSITIVE_X: u32 = 0x0000_0600;
    pub const NEGATIVE_X: u32 = 0x0000_0a00;
    pub const POSITIVE_Y: u32 = 0x0000_1200;
    pub const NEGATIVE_Y: u32 = 0x0000_2200;
    pub const POSITIVE_Z: u32 = 0x0000_4200;
    pub const NEGATIVE_Z: u32 = 0x0000_8200;
    /// All six faces.
    pub const ALL_FACES: u32 = Self::POSITIVE_X
        | Self::NEGATIVE_X
        | Self::POSITIVE_Y
        | Self::NEGATIVE_Y
        | Self::POSITIVE_Z
        | Self::NEGATIVE_Z;
}

/// The 32-byte legacy pixel format block embedded in [`DdsHeader`].
///
/// Converted to a [`LegacyPixelFormat`] for table matching.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Self-declared size, rejected unless it equals [`DdsPixelFormat::SIZE`].
    pub size: u32,
    /// Family bits ([`PixelFormatFlags`]) choosing the lookup table.
    pub flags: u32,
    /// Tag or D3DFMT code, matched only when no mask family is flagged.
    pub four_cc: FourCC,
    /// Selects the mask bucket within a family.
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected pixel format size.
    pub const SIZE: u32 = 32;
}

impl From<&DdsPixelFormat> for LegacyPixelFormat {
    fn from(pf: &DdsPixelFormat) -> Self {
        Self {
            flags: pf.flags,
            four_cc: u32::from_le_bytes(pf.four_cc.0),
            rgb_bit_count: pf.rgb_bit_count,
            masks: [pf.r_bit_mask, pf.g_bit_mask, pf.b_bit_mask, pf.a_bit_mask],
        }
    }
}

/// Four-character code stored in [`DdsPixelFormat::four_cc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const DXT1: Self = Self(*b"DXT1");
    /// Loaded as BC2 with premultiplied alpha.
    pub const DXT2: Self = Self(*b"DXT2");
    pub const DXT3: Self = Self(*b"DXT3");
    /// Loaded as BC3 with premultiplied alpha.
    pub const DXT4: Self = Self(*b"DXT4");
    pub const DXT5: Self = Self(*b"DXT5");
    /// Marks a following [`DdsHeaderDxt10`].
    pub const DX10: Self = Self(*b"DX10");
}

/// The 20-byte extension present when the pixel format says `DX10`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeaderDxt10 {
    /// Resolved through the DXGI table instead of the legacy masks.
    pub dxgi_format: u32,
    /// [`ResourceDimension`] code choosing a 1D, 2D or 3D image.
    pub resource_dimension: u32,
    /// Only [`DdsHeaderDxt10::MISC_TEXTURECUBE`] is read.
    pub misc_flag: u32,
    /// Textures (cubes, for cubemaps) in the array; 0 is invalid.
    pub array_size: u32,
    /// [`AlphaMode`](crate::AlphaMode) in the low three bits.
    pub misc_flags2: u32,
}

impl DdsHeaderDxt10 {
    /// `misc_flag` bit marking a cubemap.
    pub const MISC_TEXTURECUBE: u32 = 0x4;
    /// Mask of the alpha mode in `misc_flags2`.
    pub const MISC2_ALPHA_MODE_MASK: u32 = 0x7;

    /// Whether the texture is a cubemap.
    pub fn is_cube(&self) -> bool {
        self.misc_flag & Self::MISC_TEXTURECUBE != 0
    }
}

/// D3D10 resource dimension codes.
pub struct ResourceDimension;

impl ResourceDimension {
    pub const TEXTURE1D: u32 = 2;
    pub const TEXTURE2D: u32 = 3;
    pub const TEXTURE3D: u32 = 4;
}

const MAGIC_LEN: usize = DDS_MAGIC.len();
const HEADER_LEN: usize = MAGIC_LEN + size_of::<DdsHeader>();
const DX10_HEADER_LEN: usize = HEADER_LEN + size_of::<DdsHeaderDxt10>();

/// A validated view over an in-memory DDS file.
///
/// Borrows the caller's buffer; neither headers nor pixel data are copied.
#[derive(Debug, Clone, Copy)]
pub struct DdsFile<'a> {
    header: &'a DdsHeader,
    dx10: Option<&'a DdsHeaderDxt10>,
    payload: &'a [u8],
    payload_offset: usize,
}

impl<'a> DdsFile<'a> {
    /// Validate the headers at the front of `data`.
    ///
    /// # Errors
    ///
    /// - [`Error::TooShort`] / [`Error::TooLarge`] for buffers of impossible size.
    /// - [`Error::BadMagic`] if the file does not start with `"DDS "`.
    /// - [`Error::BadHeaderSize`] / [`Error::BadPixelFormatSize`] for wrong
    ///   self-declared sizes.
    /// - [`Error::TruncatedExtendedHeader`] if `DX10` is signalled but the
    ///   extended header does not fit.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if u32::try_from(data.len()).is_err() {
            return Err(Error::TooLarge(data.len()));
        }
        if data.len() < HEADER_LEN {
            return Err(Error::TooShort(data.len()));
        }

        let (magic, rest) = data.split_at(MAGIC_LEN);
        if magic != DDS_MAGIC {
            return Err(Error::BadMagic([magic[0], magic[1], magic[2], magic[3]]));
        }

        let (header, rest) = DdsHeader::ref_from_prefix(rest).map_err(|_| Error::TooShort(data.len()))?;
        let size = header.size;
        if size != DdsHeader::SIZE {
            return Err(Error::BadHeaderSize(size));
        }
        let pf_size = header.pixel_format.size;
        if pf_size != DdsPixelFormat::SIZE {
            return Err(Error::BadPixelFormatSize(pf_size));
        }

        let (dx10, payload, payload_offset) = if header.is_dx10() {
            let (ext, payload) =
                DdsHeaderDxt10::ref_from_prefix(rest).map_err(|_| Error::TruncatedExtendedHeader(rest.len()))?;
            (Some(ext), payload, DX10_HEADER_LEN)
        } else {
            (None, rest, HEADER_LEN)
        };

        let (width, height, depth) = (header.width, header.height, header.depth);
        debug!(
            width,
            height,
            depth,
            dx10 = dx10.is_some(),
            payload_len = payload.len(),
            "parsed DDS header"
        );

        Ok(Self {
            header,
            dx10,
            payload,
            payload_offset,
        })
    }

    /// The main header.
    pub fn header(&self) -> &'a DdsHeader {
        self.header
    }

    /// The DX10 extended header, if present.
    pub fn dx10(&self) -> Option<&'a DdsHeaderDxt10> {
        self.dx10
    }

    /// Pixel data following the headers.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Offset of the payload from the start of the file.
    pub fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    /// Number of header bytes (magic included) consumed.
    pub fn header_len(&self) -> usize {
        self.payload_offset
    }

    /// Where the pixel format is described.
    pub fn pixel_format_source(&self) -> PixelFormatSource {
        match self.dx10 {
            Some(ext) => PixelFormatSource::Dxgi(DxgiFormat(ext.dxgi_format)),
            None => PixelFormatSource::Legacy(LegacyPixelFormat::from(&self.header.pixel_format)),
        }
    }
}

/// Read a whole file into memory in a single read.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    debug!(path = %path.display(), len = data.len(), "read DDS file");
    Ok(data)
}
