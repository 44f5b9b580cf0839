//! Per-format properties: bit rate, texel layout, planes, sRGB counterpart.

use ash::vk;
use ash::vk::Format as F;

/// How texels of a format are laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelLayout {
    /// One element per texel, `bits_per_pixel` wide.
    Linear,
    /// Fixed-size compressed blocks.
    Block { width: u32, height: u32, bytes: u32 },
    /// 4:2:2 packed: each element of `bytes` bytes holds two texels.
    Packed422 { bytes: u32 },
    /// Multi-planar YCbCr.
    Planar(PlanarLayout),
}

/// Plane geometry of a multi-planar format.
///
/// Plane 0 is luma at full resolution. Chroma planes are subsampled by
/// `sub_x` x `sub_y`; on 2-plane formats the single chroma plane stores
/// interleaved Cb/Cr pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanarLayout {
    pub planes: u32,
    /// Bytes per luma texel.
    pub luma_bytes: u32,
    /// Bytes per chroma texel (both components on 2-plane formats).
    pub chroma_bytes: u32,
    pub sub_x: u32,
    pub sub_y: u32,
}

/// Static properties of a Vulkan format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Average bits per texel, rounded up for block formats.
    pub bits_per_pixel: u32,
    pub layout: TexelLayout,
}

impl FormatInfo {
    /// Number of planes (1 unless planar).
    pub fn planes(&self) -> u32 {
        match self.layout {
            TexelLayout::Planar(p) => p.planes,
            _ => 1,
        }
    }

    /// Block dimensions in texels, `(1, 1)` for non-block formats and
    /// `(2, 1)` for packed 4:2:2.
    pub fn block_extent(&self) -> (u32, u32) {
        match self.layout {
            TexelLayout::Block { width, height, .. } => (width, height),
            TexelLayout::Packed422 { .. } => (2, 1),
            _ => (1, 1),
        }
    }

    /// Bytes per block (or per element for linear formats).
    pub fn bytes_per_block(&self) -> u32 {
        match self.layout {
            TexelLayout::Block { bytes, .. } | TexelLayout::Packed422 { bytes } => bytes,
            TexelLayout::Linear => self.bits_per_pixel.div_ceil(8),
            TexelLayout::Planar(p) => p.luma_bytes,
        }
    }

    /// Whether the format is block-compressed.
    pub fn is_compressed(&self) -> bool {
        matches!(self.layout, TexelLayout::Block { .. })
    }
}

const fn linear(bits_per_pixel: u32) -> FormatInfo {
    FormatInfo {
        bits_per_pixel,
        layout: TexelLayout::Linear,
    }
}

const fn block(width: u32, height: u32, bytes: u32, bits_per_pixel: u32) -> FormatInfo {
    FormatInfo {
        bits_per_pixel,
        layout: TexelLayout::Block { width, height, bytes },
    }
}

const fn packed(bytes: u32, bits_per_pixel: u32) -> FormatInfo {
    FormatInfo {
        bits_per_pixel,
        layout: TexelLayout::Packed422 { bytes },
    }
}

const fn planar(planes: u32, luma_bytes: u32, chroma_bytes: u32, sub_x: u32, sub_y: u32, bits_per_pixel: u32) -> FormatInfo {
    FormatInfo {
        bits_per_pixel,
        layout: TexelLayout::Planar(PlanarLayout {
            planes,
            luma_bytes,
            chroma_bytes,
            sub_x,
            sub_y,
        }),
    }
}

/// Look up the properties of a format, `None` if it has no known layout.
pub fn format_info(format: vk::Format) -> Option<FormatInfo> {
    let info = match format {
        F::R64G64B64A64_UINT | F::R64G64B64A64_SINT | F::R64G64B64A64_SFLOAT => linear(256),
        F::R64G64B64_UINT | F::R64G64B64_SINT | F::R64G64B64_SFLOAT => linear(192),

        F::R32G32B32A32_UINT
        | F::R32G32B32A32_SINT
        | F::R32G32B32A32_SFLOAT
        | F::R64G64_UINT
        | F::R64G64_SINT
        | F::R64G64_SFLOAT => linear(128),

        F::R32G32B32_UINT | F::R32G32B32_SINT | F::R32G32B32_SFLOAT => linear(96),

        F::R16G16B16A16_UNORM
        | F::R16G16B16A16_SNORM
        | F::R16G16B16A16_USCALED
        | F::R16G16B16A16_SSCALED
        | F::R16G16B16A16_UINT
        | F::R16G16B16A16_SINT
        | F::R16G16B16A16_SFLOAT
        | F::R32G32_UINT
        | F::R32G32_SINT
        | F::R32G32_SFLOAT
        | F::R64_UINT
        | F::R64_SINT
        | F::R64_SFLOAT
        | F::R10X6G10X6B10X6A10X6_UNORM_4PACK16
        | F::R12X4G12X4B12X4A12X4_UNORM_4PACK16 => linear(64),

        F::R16G16B16_UNORM
        | F::R16G16B16_SNORM
        | F::R16G16B16_USCALED
        | F::R16G16B16_SSCALED
        | F::R16G16B16_UINT
        | F::R16G16B16_SINT
        | F::R16G16B16_SFLOAT => linear(48),

        F::D32_SFLOAT_S8_UINT => linear(40),

        F::R8G8B8A8_UNORM
        | F::R8G8B8A8_SNORM
        | F::R8G8B8A8_USCALED
        | F::R8G8B8A8_SSCALED
        | F::R8G8B8A8_UINT
        | F::R8G8B8A8_SINT
        | F::R8G8B8A8_SRGB
        | F::B8G8R8A8_UNORM
        | F::B8G8R8A8_SNORM
        | F::B8G8R8A8_USCALED
        | F::B8G8R8A8_SSCALED
        | F::B8G8R8A8_UINT
        | F::B8G8R8A8_SINT
        | F::B8G8R8A8_SRGB
        | F::A8B8G8R8_UNORM_PACK32
        | F::A8B8G8R8_SNORM_PACK32
        | F::A8B8G8R8_USCALED_PACK32
        | F::A8B8G8R8_SSCALED_PACK32
        | F::A8B8G8R8_UINT_PACK32
        | F::A8B8G8R8_SINT_PACK32
        | F::A8B8G8R8_SRGB_PACK32
        | F::A2R10G10B10_UNORM_PACK32
        | F::A2R10G10B10_SNORM_PACK32
        | F::A2R10G10B10_USCALED_PACK32
        | F::A2R10G10B10_SSCALED_PACK32
        | F::A2R10G10B10_UINT_PACK32
        | F::A2R10G10B10_SINT_PACK32
        | F::A2B10G10R10_UNORM_PACK32
        | F::A2B10G10R10_SNORM_PACK32
        | F::A2B10G10R10_USCALED_PACK32
        | F::A2B10G10R10_SSCALED_PACK32
        | F::A2B10G10R10_UINT_PACK32
        | F::A2B10G10R10_SINT_PACK32
        | F::R16G16_UNORM
        | F::R16G16_SNORM
        | F::R16G16_USCALED
        | F::R16G16_SSCALED
        | F::R16G16_UINT
        | F::R16G16_SINT
        | F::R16G16_SFLOAT
        | F::R32_UINT
        | F::R32_SINT
        | F::R32_SFLOAT
        | F::B10G11R11_UFLOAT_PACK32
        | F::E5B9G9R9_UFLOAT_PACK32
        | F::X8_D24_UNORM_PACK32
        | F::D24_UNORM_S8_UINT
        | F::D32_SFLOAT
        | F::R10X6G10X6_UNORM_2PACK16
        | F::R12X4G12X4_UNORM_2PACK16 => linear(32),

        F::R8G8B8_UNORM
        | F::R8G8B8_SNORM
        | F::R8G8B8_USCALED
        | F::R8G8B8_SSCALED
        | F::R8G8B8_UINT
        | F::R8G8B8_SINT
        | F::R8G8B8_SRGB
        | F::B8G8R8_UNORM
        | F::B8G8R8_SNORM
        | F::B8G8R8_USCALED
        | F::B8G8R8_SSCALED
        | F::B8G8R8_UINT
        | F::B8G8R8_SINT
        | F::B8G8R8_SRGB
        | F::D16_UNORM_S8_UINT => linear(24),

        F::R8G8_UNORM
        | F::R8G8_SNORM
        | F::R8G8_USCALED
        | F::R8G8_SSCALED
        | F::R8G8_UINT
        | F::R8G8_SINT
        | F::R8G8_SRGB
        | F::R16_UNORM
        | F::R16_SNORM
        | F::R16_USCALED
        | F::R16_SSCALED
        | F::R16_UINT
        | F::R16_SINT
        | F::R16_SFLOAT
        | F::D16_UNORM
        | F::R4G4B4A4_UNORM_PACK16
        | F::B4G4R4A4_UNORM_PACK16
        | F::A4R4G4B4_UNORM_PACK16
        | F::A4B4G4R4_UNORM_PACK16
        | F::R5G6B5_UNORM_PACK16
        | F::B5G6R5_UNORM_PACK16
        | F::R5G5B5A1_UNORM_PACK16
        | F::B5G5R5A1_UNORM_PACK16
        | F::A1R5G5B5_UNORM_PACK16
        | F::R10X6_UNORM_PACK16
        | F::R12X4_UNORM_PACK16 => linear(16),

        F::R8_UNORM
        | F::R8_SNORM
        | F::R8_USCALED
        | F::R8_SSCALED
        | F::R8_UINT
        | F::R8_SINT
        | F::R8_SRGB
        | F::R4G4_UNORM_PACK8
        | F::S8_UINT => linear(8),

        // 8-byte 4x4 blocks
        F::BC1_RGB_UNORM_BLOCK
        | F::BC1_RGB_SRGB_BLOCK
        | F::BC1_RGBA_UNORM_BLOCK
        | F::BC1_RGBA_SRGB_BLOCK
        | F::BC4_UNORM_BLOCK
        | F::BC4_SNORM_BLOCK
        | F::ETC2_R8G8B8_UNORM_BLOCK
        | F::ETC2_R8G8B8_SRGB_BLOCK
        | F::ETC2_R8G8B8A1_UNORM_BLOCK
        | F::ETC2_R8G8B8A1_SRGB_BLOCK
        | F::EAC_R11_UNORM_BLOCK
        | F::EAC_R11_SNORM_BLOCK => block(4, 4, 8, 4),

        // 16-byte 4x4 blocks
        F::BC2_UNORM_BLOCK
        | F::BC2_SRGB_BLOCK
        | F::BC3_UNORM_BLOCK
        | F::BC3_SRGB_BLOCK
        | F::BC5_UNORM_BLOCK
        | F::BC5_SNORM_BLOCK
        | F::BC6H_UFLOAT_BLOCK
        | F::BC6H_SFLOAT_BLOCK
        | F::BC7_UNORM_BLOCK
        | F::BC7_SRGB_BLOCK
        | F::ETC2_R8G8B8A8_UNORM_BLOCK
        | F::ETC2_R8G8B8A8_SRGB_BLOCK
        | F::EAC_R11G11_UNORM_BLOCK
        | F::EAC_R11G11_SNORM_BLOCK
        | F::ASTC_4X4_UNORM_BLOCK
        | F::ASTC_4X4_SRGB_BLOCK
        | F::ASTC_4X4_SFLOAT_BLOCK => block(4, 4, 16, 8),

        F::ASTC_5X4_UNORM_BLOCK | F::ASTC_5X4_SRGB_BLOCK | F::ASTC_5X4_SFLOAT_BLOCK => block(5, 4, 16, 8),
        F::ASTC_5X5_UNORM_BLOCK | F::ASTC_5X5_SRGB_BLOCK | F::ASTC_5X5_SFLOAT_BLOCK => block(5, 5, 16, 8),
        F::ASTC_6X5_UNORM_BLOCK | F::ASTC_6X5_SRGB_BLOCK | F::ASTC_6X5_SFLOAT_BLOCK => block(6, 5, 16, 8),
        F::ASTC_6X6_UNORM_BLOCK | F::ASTC_6X6_SRGB_BLOCK | F::ASTC_6X6_SFLOAT_BLOCK => block(6, 6, 16, 4),
        F::ASTC_8X5_UNORM_BLOCK | F::ASTC_8X5_SRGB_BLOCK | F::ASTC_8X5_SFLOAT_BLOCK => block(8, 5, 16, 4),
        F::ASTC_8X6_UNORM_BLOCK | F::ASTC_8X6_SRGB_BLOCK | F::ASTC_8X6_SFLOAT_BLOCK => block(8, 6, 16, 4),
        F::ASTC_10X5_UNORM_BLOCK | F::ASTC_10X5_SRGB_BLOCK | F::ASTC_10X5_SFLOAT_BLOCK => block(10, 5, 16, 4),
        F::ASTC_10X6_UNORM_BLOCK | F::ASTC_10X6_SRGB_BLOCK | F::ASTC_10X6_SFLOAT_BLOCK => block(10, 6, 16, 4),
        F::ASTC_8X8_UNORM_BLOCK | F::ASTC_8X8_SRGB_BLOCK | F::ASTC_8X8_SFLOAT_BLOCK => block(8, 8, 16, 2),
        F::ASTC_10X8_UNORM_BLOCK | F::ASTC_10X8_SRGB_BLOCK | F::ASTC_10X8_SFLOAT_BLOCK => block(10, 8, 16, 2),
        F::ASTC_10X10_UNORM_BLOCK | F::ASTC_10X10_SRGB_BLOCK | F::ASTC_10X10_SFLOAT_BLOCK => block(10, 10, 16, 2),
        F::ASTC_12X10_UNORM_BLOCK | F::ASTC_12X10_SRGB_BLOCK | F::ASTC_12X10_SFLOAT_BLOCK => block(12, 10, 16, 2),
        F::ASTC_12X12_UNORM_BLOCK | F::ASTC_12X12_SRGB_BLOCK | F::ASTC_12X12_SFLOAT_BLOCK => block(12, 12, 16, 1),

        F::PVRTC1_2BPP_UNORM_BLOCK_IMG
        | F::PVRTC1_2BPP_SRGB_BLOCK_IMG
        | F::PVRTC2_2BPP_UNORM_BLOCK_IMG
        | F::PVRTC2_2BPP_SRGB_BLOCK_IMG => block(8, 4, 8, 2),
        F::PVRTC1_4BPP_UNORM_BLOCK_IMG
        | F::PVRTC1_4BPP_SRGB_BLOCK_IMG
        | F::PVRTC2_4BPP_UNORM_BLOCK_IMG
        | F::PVRTC2_4BPP_SRGB_BLOCK_IMG => block(4, 4, 8, 4),

        F::G8B8G8R8_422_UNORM | F::B8G8R8G8_422_UNORM => packed(4, 32),
        F::G10X6B10X6G10X6R10X6_422_UNORM_4PACK16
        | F::B10X6G10X6R10X6G10X6_422_UNORM_4PACK16
        | F::G12X4B12X4G12X4R12X4_422_UNORM_4PACK16
        | F::B12X4G12X4R12X4G12X4_422_UNORM_4PACK16
        | F::G16B16G16R16_422_UNORM
        | F::B16G16R16G16_422_UNORM => packed(8, 64),

        F::G8_B8R8_2PLANE_420_UNORM => planar(2, 1, 2, 2, 2, 12),
        F::G8_B8R8_2PLANE_422_UNORM => planar(2, 1, 2, 2, 1, 16),
        F::G8_B8R8_2PLANE_444_UNORM => planar(2, 1, 2, 1, 1, 24),
        F::G8_B8_R8_3PLANE_420_UNORM => planar(3, 1, 1, 2, 2, 12),
        F::G8_B8_R8_3PLANE_422_UNORM => planar(3, 1, 1, 2, 1, 16),
        F::G8_B8_R8_3PLANE_444_UNORM => planar(3, 1, 1, 1, 1, 24),

        F::G10X6_B10X6R10X6_2PLANE_420_UNORM_3PACK16
        | F::G12X4_B12X4R12X4_2PLANE_420_UNORM_3PACK16
        | F::G16_B16R16_2PLANE_420_UNORM => planar(2, 2, 4, 2, 2, 24),
        F::G10X6_B10X6R10X6_2PLANE_422_UNORM_3PACK16
        | F::G12X4_B12X4R12X4_2PLANE_422_UNORM_3PACK16
        | F::G16_B16R16_2PLANE_422_UNORM => planar(2, 2, 4, 2, 1, 32),
        F::G10X6_B10X6R10X6_2PLANE_444_UNORM_3PACK16
        | F::G12X4_B12X4R12X4_2PLANE_444_UNORM_3PACK16
        | F::G16_B16R16_2PLANE_444_UNORM => planar(2, 2, 4, 1, 1, 48),
        F::G10X6_B10X6_R10X6_3PLANE_420_UNORM_3PACK16
        | F::G12X4_B12X4_R12X4_3PLANE_420_UNORM_3PACK16
        | F::G16_B16_R16_3PLANE_420_UNORM => planar(3, 2, 2, 2, 2, 24),
        F::G10X6_B10X6_R10X6_3PLANE_422_UNORM_3PACK16
        | F::G12X4_B12X4_R12X4_3PLANE_422_UNORM_3PACK16
        | F::G16_B16_R16_3PLANE_422_UNORM => planar(3, 2, 2, 2, 1, 32),
        F::G10X6_B10X6_R10X6_3PLANE_444_UNORM_3PACK16
        | F::G12X4_B12X4_R12X4_3PLANE_444_UNORM_3PACK16
        | F::G16_B16_R16_3PLANE_444_UNORM => planar(3, 2, 2, 1, 1, 48),

        _ => return None,
    };
    Some(info)
}

/// Bits per pixel, 0 for formats without a known layout.
pub fn bits_per_pixel(format: vk::Format) -> u32 {
    format_info(format).map_or(0, |info| info.bits_per_pixel)
}

/// Number of planes: 0 for `UNDEFINED` and unknown formats, otherwise 1 to 3.
pub fn plane_count(format: vk::Format) -> u32 {
    format_info(format).map_or(0, |info| info.planes())
}

/// Whether the format has a depth or stencil component.
pub fn is_depth_stencil(format: vk::Format) -> bool {
    matches!(
        format,
        F::D16_UNORM
            | F::X8_D24_UNORM_PACK32
            | F::D32_SFLOAT
            | F::S8_UINT
            | F::D16_UNORM_S8_UINT
            | F::D24_UNORM_S8_UINT
            | F::D32_SFLOAT_S8_UINT
    )
}

/// Image aspect addressed by a plane of the format.
///
/// Multi-planar formats use the per-plane aspects. Depth and stencil
/// formats use whichever of the two aspects they carry.
pub fn aspect_for_plane(format: vk::Format, plane: u32) -> vk::ImageAspectFlags {
    if plane_count(format) > 1 {
        return match plane {
            0 => vk::ImageAspectFlags::PLANE_0,
            1 => vk::ImageAspectFlags::PLANE_1,
            _ => vk::ImageAspectFlags::PLANE_2,
        };
    }

    match format {
        F::D16_UNORM | F::X8_D24_UNORM_PACK32 | F::D32_SFLOAT => vk::ImageAspectFlags::DEPTH,
        F::S8_UINT => vk::ImageAspectFlags::STENCIL,
        F::D16_UNORM_S8_UINT | F::D24_UNORM_S8_UINT | F::D32_SFLOAT_S8_UINT => {
            vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
        }
        _ => vk::ImageAspectFlags::COLOR,
    }
}

/// sRGB counterpart of a UNORM format, or the format itself if it has none.
pub fn make_srgb(format: vk::Format) -> vk::Format {
    match format {
        F::R8_UNORM => F::R8_SRGB,
        F::R8G8_UNORM => F::R8G8_SRGB,
        F::R8G8B8_UNORM => F::R8G8B8_SRGB,
        F::B8G8R8_UNORM => F::B8G8R8_SRGB,
        F::R8G8B8A8_UNORM => F::R8G8B8A8_SRGB,
        F::B8G8R8A8_UNORM => F::B8G8R8A8_SRGB,
        F::A8B8G8R8_UNORM_PACK32 => F::A8B8G8R8_SRGB_PACK32,
        F::BC1_RGB_UNORM_BLOCK => F::BC1_RGB_SRGB_BLOCK,
        F::BC1_RGBA_UNORM_BLOCK => F::BC1_RGBA_SRGB_BLOCK,
        F::BC2_UNORM_BLOCK => F::BC2_SRGB_BLOCK,
        F::BC3_UNORM_BLOCK => F::BC3_SRGB_BLOCK,
        F::BC7_UNORM_BLOCK => F::BC7_SRGB_BLOCK,
        F::ETC2_R8G8B8_UNORM_BLOCK => F::ETC2_R8G8B8_SRGB_BLOCK,
        F::ETC2_R8G8B8A1_UNORM_BLOCK => F::ETC2_R8G8B8A1_SRGB_BLOCK,
        F::ETC2_R8G8B8A8_UNORM_BLOCK => F::ETC2_R8G8B8A8_SRGB_BLOCK,
        F::ASTC_4X4_UNORM_BLOCK => F::ASTC_4X4_SRGB_BLOCK,
        F::ASTC_5X4_UNORM_BLOCK => F::ASTC_5X4_SRGB_BLOCK,
        F::ASTC_5X5_UNORM_BLOCK => F::ASTC_5X5_SRGB_BLOCK,
        F::ASTC_6X5_UNORM_BLOCK => F::ASTC_6X5_SRGB_BLOCK,
        F::ASTC_6X6_UNORM_BLOCK => F::ASTC_6X6_SRGB_BLOCK,
        F::ASTC_8X5_UNORM_BLOCK => F::ASTC_8X5_SRGB_BLOCK,
        F::ASTC_8X6_UNORM_BLOCK => F::ASTC_8X6_SRGB_BLOCK,
        F::ASTC_8X8_UNORM_BLOCK => F::ASTC_8X8_SRGB_BLOCK,
        F::ASTC_10X5_UNORM_BLOCK => F::ASTC_10X5_SRGB_BLOCK,
        F::ASTC_10X6_UNORM_BLOCK => F::ASTC_10X6_SRGB_BLOCK,
        F::ASTC_10X8_UNORM_BLOCK => F::ASTC_10X8_SRGB_BLOCK,
        F::ASTC_10X10_UNORM_BLOCK => F::ASTC_10X10_SRGB_BLOCK,
        F::ASTC_12X10_UNORM_BLOCK => F::ASTC_12X10_SRGB_BLOCK,
        F::ASTC_12X12_UNORM_BLOCK => F::ASTC_12X12_SRGB_BLOCK,
        F::PVRTC1_2BPP_UNORM_BLOCK_IMG => F::PVRTC1_2BPP_SRGB_BLOCK_IMG,
        F::PVRTC1_4BPP_UNORM_BLOCK_IMG => F::PVRTC1_4BPP_SRGB_BLOCK_IMG,
        F::PVRTC2_2BPP_UNORM_BLOCK_IMG => F::PVRTC2_2BPP_SRGB_BLOCK_IMG,
        F::PVRTC2_4BPP_UNORM_BLOCK_IMG => F::PVRTC2_4BPP_SRGB_BLOCK_IMG,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(F::R8G8B8A8_UNORM, 32)]
    #[case(F::R16G16B16A16_SFLOAT, 64)]
    #[case(F::R32G32B32A32_SFLOAT, 128)]
    #[case(F::R5G6B5_UNORM_PACK16, 16)]
    #[case(F::R8_UNORM, 8)]
    #[case(F::BC1_RGBA_UNORM_BLOCK, 4)]
    #[case(F::BC7_UNORM_BLOCK, 8)]
    #[case(F::ASTC_5X4_UNORM_BLOCK, 8)]
    #[case(F::ASTC_8X6_SRGB_BLOCK, 4)]
    #[case(F::ASTC_12X10_UNORM_BLOCK, 2)]
    #[case(F::ASTC_12X12_SFLOAT_BLOCK, 1)]
    #[case(F::G8B8G8R8_422_UNORM, 32)]
    #[case(F::G16B16G16R16_422_UNORM, 64)]
    #[case(F::G8_B8R8_2PLANE_420_UNORM, 12)]
    #[case(F::G16_B16_R16_3PLANE_444_UNORM, 48)]
    #[case(F::D32_SFLOAT_S8_UINT, 40)]
    #[case(F::UNDEFINED, 0)]
    fn test_bits_per_pixel(#[case] format: vk::Format, #[case] expected: u32) {
        assert_eq!(bits_per_pixel(format), expected);
    }

    #[rstest]
    #[case(F::UNDEFINED, 0)]
    #[case(F::BC3_UNORM_BLOCK, 1)]
    #[case(F::G8_B8R8_2PLANE_420_UNORM, 2)]
    #[case(F::G10X6_B10X6R10X6_2PLANE_420_UNORM_3PACK16, 2)]
    #[case(F::G8_B8_R8_3PLANE_422_UNORM, 3)]
    fn test_plane_count(#[case] format: vk::Format, #[case] expected: u32) {
        assert_eq!(plane_count(format), expected);
    }

    /// Planar bit rates agree with the per-plane byte counts.
    #[test]
    fn test_planar_bit_rates_are_consistent() {
        let planar_formats = [
            F::G8_B8R8_2PLANE_420_UNORM,
            F::G8_B8R8_2PLANE_422_UNORM,
            F::G8_B8R8_2PLANE_444_UNORM,
            F::G8_B8_R8_3PLANE_420_UNORM,
            F::G8_B8_R8_3PLANE_422_UNORM,
            F::G8_B8_R8_3PLANE_444_UNORM,
            F::G16_B16R16_2PLANE_420_UNORM,
            F::G16_B16R16_2PLANE_422_UNORM,
            F::G16_B16R16_2PLANE_444_UNORM,
            F::G16_B16_R16_3PLANE_420_UNORM,
            F::G16_B16_R16_3PLANE_422_UNORM,
            F::G16_B16_R16_3PLANE_444_UNORM,
        ];
        for format in planar_formats {
            let info = format_info(format).unwrap();
            let TexelLayout::Planar(p) = info.layout else {
                panic!("{format:?} is not planar");
            };
            // Bits over a sub_x * sub_y patch of luma texels.
            let texels = p.sub_x * p.sub_y;
            let bits = 8 * (p.luma_bytes * texels + p.chroma_bytes * (p.planes - 1));
            assert_eq!(bits / texels, info.bits_per_pixel, "{format:?}");
        }
    }

    #[test]
    fn test_block_extent() {
        assert_eq!(format_info(F::BC1_RGBA_UNORM_BLOCK).unwrap().block_extent(), (4, 4));
        assert_eq!(format_info(F::ASTC_10X6_UNORM_BLOCK).unwrap().block_extent(), (10, 6));
        assert_eq!(format_info(F::B8G8R8G8_422_UNORM).unwrap().block_extent(), (2, 1));
        assert_eq!(format_info(F::R8G8B8A8_UNORM).unwrap().block_extent(), (1, 1));
        assert_eq!(format_info(F::BC5_SNORM_BLOCK).unwrap().bytes_per_block(), 16);
        assert_eq!(format_info(F::R16G16B16_UNORM).unwrap().bytes_per_block(), 6);
    }

    #[rstest]
    #[case(F::R8G8B8A8_UNORM, F::R8G8B8A8_SRGB)]
    #[case(F::B8G8R8A8_UNORM, F::B8G8R8A8_SRGB)]
    #[case(F::BC1_RGBA_UNORM_BLOCK, F::BC1_RGBA_SRGB_BLOCK)]
    #[case(F::BC7_UNORM_BLOCK, F::BC7_SRGB_BLOCK)]
    #[case(F::ASTC_6X6_UNORM_BLOCK, F::ASTC_6X6_SRGB_BLOCK)]
    #[case(F::BC4_UNORM_BLOCK, F::BC4_UNORM_BLOCK)]
    #[case(F::R8G8B8A8_SRGB, F::R8G8B8A8_SRGB)]
    #[case(F::R16G16B16A16_SFLOAT, F::R16G16B16A16_SFLOAT)]
    fn test_make_srgb(#[case] format: vk::Format, #[case] expected: vk::Format) {
        assert_eq!(make_srgb(format), expected);
    }

    #[test]
    fn test_depth_stencil_aspects() {
        assert!(is_depth_stencil(F::D24_UNORM_S8_UINT));
        assert!(!is_depth_stencil(F::R32_SFLOAT));
        assert_eq!(aspect_for_plane(F::D32_SFLOAT, 0), vk::ImageAspectFlags::DEPTH);
        assert_eq!(aspect_for_plane(F::S8_UINT, 0), vk::ImageAspectFlags::STENCIL);
        assert_eq!(
            aspect_for_plane(F::D24_UNORM_S8_UINT, 0),
            vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
        );
        assert_eq!(aspect_for_plane(F::BC1_RGBA_UNORM_BLOCK, 0), vk::ImageAspectFlags::COLOR);
        assert_eq!(aspect_for_plane(F::G8_B8_R8_3PLANE_420_UNORM, 2), vk::ImageAspectFlags::PLANE_2);
    }
}
