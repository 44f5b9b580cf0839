//! Legacy (pre-DX10) pixel format mapping.
//!
//! Uncompressed legacy formats are described by a family flag, a bit count
//! and four channel masks. Each (family, bit count) bucket holds an ordered
//! list of mask tuples; matching is exact and the first match wins, so the
//! order of each bucket is significant. Compressed and float formats use a
//! four-character code, either a printable tag or a numeric D3DFORMAT value.

use ash::vk;
use ash::vk::Format as F;

use crate::{Error, Result};

/// Pixel format flags from the legacy pixel format block.
pub struct PixelFormatFlags;

impl PixelFormatFlags {
    /// Alpha-only surface.
    pub const ALPHA: u32 = 0x0000_0002;
    /// The four-character code is valid.
    pub const FOURCC: u32 = 0x0000_0004;
    /// Uncompressed RGB data, masks are valid.
    pub const RGB: u32 = 0x0000_0040;
    /// Luminance data.
    pub const LUMINANCE: u32 = 0x0002_0000;
    /// Signed bump-map (du/dv) data.
    pub const BUMPDUDV: u32 = 0x0008_0000;
}

/// Owned copy of the fields of a legacy pixel format block that matter for
/// format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegacyPixelFormat {
    pub flags: u32,
    /// Four-character code, little-endian.
    pub four_cc: u32,
    pub rgb_bit_count: u32,
    /// Red, green, blue and alpha masks.
    pub masks: [u32; 4],
}

impl LegacyPixelFormat {
    /// Pixel format described by a four-character code.
    pub const fn from_four_cc(four_cc: [u8; 4]) -> Self {
        Self {
            flags: PixelFormatFlags::FOURCC,
            four_cc: u32::from_le_bytes(four_cc),
            rgb_bit_count: 0,
            masks: [0; 4],
        }
    }

    /// Pixel format described by masks within a family.
    pub const fn from_masks(flags: u32, rgb_bit_count: u32, masks: [u32; 4]) -> Self {
        Self {
            flags,
            four_cc: 0,
            rgb_bit_count,
            masks,
        }
    }

    fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// One entry in a legacy lookup table.
#[derive(Debug, Clone, Copy)]
pub struct LegacyEntry {
    /// D3D9 name of the layout, without the `D3DFMT_` prefix.
    pub d3d_name: &'static str,
    /// Vulkan equivalent, `UNDEFINED` for layouts with no counterpart.
    pub format: vk::Format,
    key: LegacyKey,
}

#[derive(Debug, Clone, Copy)]
enum LegacyKey {
    Masks([u32; 4]),
    FourCC(u32),
}

const fn masks(r: u32, g: u32, b: u32, a: u32, d3d_name: &'static str, format: vk::Format) -> LegacyEntry {
    LegacyEntry {
        d3d_name,
        format,
        key: LegacyKey::Masks([r, g, b, a]),
    }
}

const fn tag(code: &[u8; 4], d3d_name: &'static str, format: vk::Format) -> LegacyEntry {
    LegacyEntry {
        d3d_name,
        format,
        key: LegacyKey::FourCC(u32::from_le_bytes(*code)),
    }
}

const fn d3dfmt(code: u32, d3d_name: &'static str, format: vk::Format) -> LegacyEntry {
    LegacyEntry {
        d3d_name,
        format,
        key: LegacyKey::FourCC(code),
    }
}

static RGB_32: &[LegacyEntry] = &[
    masks(0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000, "A8B8G8R8", F::R8G8B8A8_UNORM),
    masks(0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000, "A8R8G8B8", F::B8G8R8A8_UNORM),
    masks(0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x0000_0000, "X8R8G8B8", F::UNDEFINED),
    // Written with swapped masks by some older tools.
    masks(0x3ff0_0000, 0x000f_fc00, 0x0000_03ff, 0xc000_0000, "A2R10G10B10", F::A2B10G10R10_UNORM_PACK32),
    masks(0x0000_03ff, 0x000f_fc00, 0x3ff0_0000, 0xc000_0000, "A2B10G10R10", F::A2R10G10B10_UNORM_PACK32),
    masks(0x0000_ffff, 0xffff_0000, 0x0000_0000, 0x0000_0000, "G16R16", F::R16G16_UNORM),
    masks(0xffff_ffff, 0x0000_0000, 0x0000_0000, 0x0000_0000, "R32F", F::R32_SFLOAT),
];

static RGB_24: &[LegacyEntry] = &[masks(0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0, "R8G8B8", F::R8G8B8_UNORM)];

static RGB_16: &[LegacyEntry] = &[
    masks(0x7c00, 0x03e0, 0x001f, 0x8000, "A1R5G5B5", F::A1R5G5B5_UNORM_PACK16),
    masks(0xf800, 0x07e0, 0x001f, 0x0000, "R5G6B5", F::R5G6B5_UNORM_PACK16),
    masks(0x0f00, 0x00f0, 0x000f, 0xf000, "A4R4G4B4", F::A4R4G4B4_UNORM_PACK16),
];

static LUMINANCE_8: &[LegacyEntry] = &[
    masks(0xff, 0, 0, 0x00, "L8", F::R8_UNORM),
    masks(0x0f, 0, 0, 0xf0, "A4L4", F::R4G4_UNORM_PACK8),
    masks(0xff, 0, 0, 0xff00, "A8L8", F::R8G8_UNORM),
];

static LUMINANCE_16: &[LegacyEntry] = &[
    masks(0xffff, 0, 0, 0x0000, "L16", F::R16_UNORM),
    masks(0x00ff, 0, 0, 0xff00, "A8L8", F::R8G8_UNORM),
];

static BUMP_16: &[LegacyEntry] = &[masks(0x00ff, 0xff00, 0, 0, "V8U8", F::R8G8_SNORM)];

static BUMP_32: &[LegacyEntry] = &[
    masks(0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000, "Q8W8V8U8", F::R8G8B8A8_SNORM),
    masks(0x0000_ffff, 0xffff_0000, 0x0000_0000, 0x0000_0000, "V16U16", F::R16G16_SNORM),
    masks(0x3ff0_0000, 0x000f_fc00, 0x0000_03ff, 0xc000_0000, "A2W10V10U10", F::A2B10G10R10_SNORM_PACK32),
];

static FOURCC: &[LegacyEntry] = &[
    tag(b"DXT1", "DXT1", F::BC1_RGBA_UNORM_BLOCK),
    tag(b"DXT3", "DXT3", F::BC2_UNORM_BLOCK),
    tag(b"DXT5", "DXT5", F::BC3_UNORM_BLOCK),
    // Premultiplied alpha variants; the alpha mode records the difference.
    tag(b"DXT2", "DXT2", F::BC2_UNORM_BLOCK),
    tag(b"DXT4", "DXT4", F::BC3_UNORM_BLOCK),
    tag(b"ATI1", "ATI1", F::BC4_UNORM_BLOCK),
    tag(b"BC4U", "BC4U", F::BC4_UNORM_BLOCK),
    tag(b"BC4S", "BC4S", F::BC4_SNORM_BLOCK),
    tag(b"ATI2", "ATI2", F::BC5_UNORM_BLOCK),
    tag(b"BC5U", "BC5U", F::BC5_UNORM_BLOCK),
    tag(b"BC5S", "BC5S", F::BC5_SNORM_BLOCK),
    tag(b"RGBG", "R8G8_B8G8", F::G8B8G8R8_422_UNORM),
    tag(b"GRGB", "G8R8_G8B8", F::B8G8R8G8_422_UNORM),
    tag(b"UYVY", "UYVY", F::G8B8G8R8_422_UNORM),
    tag(b"YUY2", "YUY2", F::B8G8R8G8_422_UNORM),
    d3dfmt(36, "A16B16G16R16", F::R16G16B16A16_UNORM),
    d3dfmt(110, "Q16W16V16U16", F::R16G16B16A16_SNORM),
    d3dfmt(111, "R16F", F::R16_SFLOAT),
    d3dfmt(112, "G16R16F", F::R16G16_SFLOAT),
    d3dfmt(113, "A16B16G16R16F", F::R16G16B16A16_SFLOAT),
    d3dfmt(114, "R32F", F::R32_SFLOAT),
    d3dfmt(115, "G32R32F", F::R32G32_SFLOAT),
    d3dfmt(116, "A32B32G32R32F", F::R32G32B32A32_SFLOAT),
];

fn mask_bucket(pf: &LegacyPixelFormat) -> &'static [LegacyEntry] {
    if pf.has(PixelFormatFlags::RGB) {
        match pf.rgb_bit_count {
            32 => RGB_32,
            24 => RGB_24,
            16 => RGB_16,
            _ => &[],
        }
    } else if pf.has(PixelFormatFlags::LUMINANCE) {
        match pf.rgb_bit_count {
            8 => LUMINANCE_8,
            16 => LUMINANCE_16,
            _ => &[],
        }
    } else if pf.has(PixelFormatFlags::BUMPDUDV) {
        match pf.rgb_bit_count {
            16 => BUMP_16,
            32 => BUMP_32,
            _ => &[],
        }
    } else {
        &[]
    }
}

/// Find the table entry a legacy pixel format matches.
///
/// The family flags are checked in the order RGB, luminance, bump, FOURCC.
/// The alpha flag selects no family on its own, so alpha-only surfaces
/// match nothing. Returns `None` when nothing matches.
pub fn legacy_match(pf: &LegacyPixelFormat) -> Option<&'static LegacyEntry> {
    let table = if pf.has(PixelFormatFlags::RGB)
        || pf.has(PixelFormatFlags::LUMINANCE)
        || pf.has(PixelFormatFlags::BUMPDUDV)
    {
        mask_bucket(pf)
    } else if pf.has(PixelFormatFlags::FOURCC) {
        FOURCC
    } else {
        return None;
    };

    table.iter().find(|entry| match entry.key {
        LegacyKey::Masks(m) => m == pf.masks,
        LegacyKey::FourCC(code) => code == pf.four_cc,
    })
}

/// Map a legacy pixel format to its Vulkan equivalent.
///
/// Returns [`vk::Format::UNDEFINED`] when no entry matches, or when the
/// matching entry has no Vulkan counterpart.
pub fn legacy_to_vk(pf: &LegacyPixelFormat) -> vk::Format {
    legacy_match(pf).map_or(vk::Format::UNDEFINED, |entry| entry.format)
}

/// Like [`legacy_to_vk`], failing instead of returning `UNDEFINED`.
pub fn try_legacy_to_vk(pf: &LegacyPixelFormat) -> Result<vk::Format> {
    match legacy_to_vk(pf) {
        vk::Format::UNDEFINED => Err(Error::UnsupportedLegacyFormat {
            flags: pf.flags,
            four_cc: pf.four_cc,
            bit_count: pf.rgb_bit_count,
        }),
        format => Ok(format),
    }
}

/// Iterate over every mask and FOURCC entry, in table order.
pub fn legacy_entries() -> impl Iterator<Item = &'static LegacyEntry> {
    [RGB_32, RGB_24, RGB_16, LUMINANCE_8, LUMINANCE_16, BUMP_16, BUMP_32, FOURCC]
        .into_iter()
        .flatten()
}
