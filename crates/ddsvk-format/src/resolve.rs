//! Resolving a DDS pixel format description to a Vulkan format.

use ash::vk;

use crate::dxgi::DxgiFormat;
use crate::info::format_info;
use crate::legacy::{try_legacy_to_vk, LegacyPixelFormat};
use crate::{Error, Result};

/// Where a texture's pixel format comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormatSource {
    /// Legacy masks or four-character code.
    Legacy(LegacyPixelFormat),
    /// DXGI code from the DX10 extended header.
    Dxgi(DxgiFormat),
}

/// A pixel format resolved to Vulkan together with its layout properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFormat {
    pub format: vk::Format,
    pub bits_per_pixel: u32,
    pub planes: u32,
    pub block_width: u32,
    pub block_height: u32,
    pub bytes_per_block: u32,
    /// Only DXGI codes can be typeless.
    pub typeless: bool,
}

impl ResolvedFormat {
    /// Collect the layout properties of an already mapped format.
    pub fn from_vk(format: vk::Format, typeless: bool) -> Result<Self> {
        let info = format_info(format).ok_or(Error::UnsupportedFormat(format))?;
        let (block_width, block_height) = info.block_extent();
        Ok(Self {
            format,
            bits_per_pixel: info.bits_per_pixel,
            planes: info.planes(),
            block_width,
            block_height,
            bytes_per_block: info.bytes_per_block(),
            typeless,
        })
    }
}

/// Map a pixel format source to Vulkan and collect its layout properties.
///
/// Formats without a Vulkan equivalent fail here rather than surfacing
/// later as a zero bit rate.
pub fn resolve(source: &PixelFormatSource) -> Result<ResolvedFormat> {
    match source {
        PixelFormatSource::Legacy(pf) => ResolvedFormat::from_vk(try_legacy_to_vk(pf)?, false),
        PixelFormatSource::Dxgi(code) => ResolvedFormat::from_vk(code.try_to_vk()?, code.is_typeless()),
    }
}
