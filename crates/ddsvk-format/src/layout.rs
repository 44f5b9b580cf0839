//! Byte layout of one 2D slice of a surface.

use ash::vk;

use crate::info::{format_info, TexelLayout};
use crate::{Error, Result};

/// Byte layout of one mip level (one depth slice) of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    /// Bytes per row of texels (or per row of blocks).
    pub row_bytes: usize,
    /// Number of rows (block rows for compressed formats).
    pub row_count: usize,
    /// `row_bytes * row_count`.
    pub total_bytes: usize,
    /// Width of the plane in texels.
    pub width: u32,
    /// Height of the plane in texels.
    pub height: u32,
}

/// Compute the layout of a `width` x `height` slice of `plane` in `format`.
///
/// Block-compressed surfaces always occupy at least one block in each
/// direction, even for zero dimensions. Chroma planes of multi-planar
/// formats are computed at their subsampled resolution.
///
/// # Errors
///
/// - [`Error::UnsupportedFormat`] if the format has no known bit rate.
/// - [`Error::InvalidPlane`] if `plane` is out of range for the format.
/// - [`Error::ArithmeticOverflow`] if a size does not fit in `usize`.
pub fn surface_layout(width: u32, height: u32, format: vk::Format, plane: u32) -> Result<SurfaceLayout> {
    let info = format_info(format).ok_or(Error::UnsupportedFormat(format))?;
    if plane >= info.planes() {
        return Err(Error::InvalidPlane { format, plane });
    }

    let w = u64::from(width);
    let h = u64::from(height);

    let (row_bytes, row_count, plane_width, plane_height) = match info.layout {
        TexelLayout::Block {
            width: bw,
            height: bh,
            bytes,
        } => {
            let blocks_wide = w.div_ceil(u64::from(bw)).max(1);
            let blocks_high = h.div_ceil(u64::from(bh)).max(1);
            (blocks_wide * u64::from(bytes), blocks_high, width, height)
        }
        TexelLayout::Packed422 { bytes } => (w.div_ceil(2) * u64::from(bytes), h, width, height),
        TexelLayout::Planar(p) if plane == 0 => (w * u64::from(p.luma_bytes), h, width, height),
        TexelLayout::Planar(p) => {
            let cw = width.div_ceil(p.sub_x);
            let ch = height.div_ceil(p.sub_y);
            (u64::from(cw) * u64::from(p.chroma_bytes), u64::from(ch), cw, ch)
        }
        TexelLayout::Linear => ((w * u64::from(info.bits_per_pixel)).div_ceil(8), h, width, height),
    };

    let total = row_bytes
        .checked_mul(row_count)
        .ok_or(Error::ArithmeticOverflow("surface size"))?;

    Ok(SurfaceLayout {
        row_bytes: to_usize(row_bytes, "row pitch")?,
        row_count: to_usize(row_count, "row count")?,
        total_bytes: to_usize(total, "surface size")?,
        width: plane_width,
        height: plane_height,
    })
}

fn to_usize(value: u64, what: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::ArithmeticOverflow(what))
}
