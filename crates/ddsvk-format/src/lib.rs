//! Pixel format mapping and surface layout for DDS textures on Vulkan.
//!
//! DDS files describe their pixel format either with a legacy block of
//! channel masks and four-character codes, or with a DXGI code in the DX10
//! extended header. This crate maps both onto [`ash::vk::Format`] and
//! computes the byte layout of individual mip levels and planes.
//!
//! Everything here is a pure function over static tables.
//!
//! # Example
//!
//! ```
//! use ash::vk;
//! use ddsvk_format::{dxgi_to_vk, surface_layout};
//!
//! let format = dxgi_to_vk(71); // BC1_UNORM
//! assert_eq!(format, vk::Format::BC1_RGBA_UNORM_BLOCK);
//!
//! let layout = surface_layout(256, 256, format, 0)?;
//! assert_eq!(layout.row_bytes, 64 * 8);
//! assert_eq!(layout.total_bytes, 64 * 64 * 8);
//! # Ok::<(), ddsvk_format::Error>(())
//! ```

mod dxgi;
mod error;
mod info;
mod layout;
mod legacy;
mod resolve;

pub use dxgi::{dxgi_entry, dxgi_to_vk, DxgiEntry, DxgiFormat};
pub use error::{Error, Result};
pub use info::{
    aspect_for_plane, bits_per_pixel, format_info, is_depth_stencil, make_srgb, plane_count, FormatInfo,
    PlanarLayout, TexelLayout,
};
pub use layout::{surface_layout, SurfaceLayout};
pub use legacy::{
    legacy_entries, legacy_match, legacy_to_vk, try_legacy_to_vk, LegacyEntry, LegacyPixelFormat, PixelFormatFlags,
};
pub use resolve::{resolve, PixelFormatSource, ResolvedFormat};

/// Maximum mip levels a loaded texture may have (a 16384 texel edge).
pub const MAX_MIP_LEVELS: u32 = 15;

/// Length of the full mip chain for a 2D extent, capped at
/// [`MAX_MIP_LEVELS`].
pub fn full_mip_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    (u32::BITS - largest.leading_zeros()).min(MAX_MIP_LEVELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mip_count() {
        assert_eq!(full_mip_count(1, 1), 1);
        assert_eq!(full_mip_count(0, 0), 1);
        assert_eq!(full_mip_count(256, 1), 9);
        assert_eq!(full_mip_count(300, 200), 9);
        assert_eq!(full_mip_count(16384, 16384), 15);
        assert_eq!(full_mip_count(65536, 1), 15);
    }
}
