//! Subresource enumeration: where each mip, slice and plane lives in the
//! payload, and where it goes in the image.

use std::ops::Range;

use ash::vk;
use ddsvk_format::{aspect_for_plane, plane_count, surface_layout};
use tracing::{debug, trace};

use crate::texture::TextureDesc;
use crate::{Error, Result};

/// One (mip level, array layer, plane) of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceDescriptor {
    /// Byte offset of the data within the payload.
    pub offset: usize,
    /// Byte size of the data (all depth slices).
    pub size: usize,
    /// Bytes per row (or block row).
    pub row_pitch: usize,
    /// Rows (or block rows) per depth slice.
    pub row_count: usize,
    /// Extent of the subresource in texels of its plane.
    pub extent: vk::Extent3D,
    /// Mip level in the created image.
    pub mip_level: u32,
    /// Mip level in the file.
    pub source_mip_level: u32,
    pub array_layer: u32,
    pub aspect: vk::ImageAspectFlags,
}

impl SubresourceDescriptor {
    /// Byte range of the data within the payload.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }

    /// The data of this subresource, `None` if `payload` is too short.
    pub fn data<'a>(&self, payload: &'a [u8]) -> Option<&'a [u8]> {
        payload.get(self.range())
    }

    /// Copy region for a staging buffer holding the payload at
    /// `base_offset`.
    pub fn buffer_image_copy(&self, base_offset: vk::DeviceSize) -> vk::BufferImageCopy {
        vk::BufferImageCopy {
            buffer_offset: base_offset + self.offset as vk::DeviceSize,
            buffer_row_length: 0,
            buffer_image_height: 0,
            image_subresource: vk::ImageSubresourceLayers {
                aspect_mask: self.aspect,
                mip_level: self.mip_level,
                base_array_layer: self.array_layer,
                layer_count: 1,
            },
            image_offset: vk::Offset3D::default(),
            image_extent: self.extent,
        }
    }
}

/// Input to [`enumerate_subresources`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceRequest {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_count: u32,
    pub array_size: u32,
    pub planes: u32,
    pub format: vk::Format,
    /// Largest allowed dimension of a kept mip, 0 for no cap.
    pub max_size: u32,
}

impl SubresourceRequest {
    /// Request covering every subresource of a described texture.
    pub fn for_texture(desc: &TextureDesc, max_size: u32) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            depth: desc.depth,
            mip_count: desc.mip_count,
            array_size: desc.array_layers,
            planes: desc.format.planes,
            format: desc.format.format,
            max_size,
        }
    }
}

/// Result of [`enumerate_subresources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubresourcePlan {
    /// Kept subresources, ordered by plane, then layer, then mip.
    pub descriptors: Vec<SubresourceDescriptor>,
    /// Leading mips dropped by the size cap.
    pub skipped_mips: u32,
    /// Extent of the first kept mip.
    pub extent: vk::Extent3D,
    /// Payload bytes covered by all subresources, kept or skipped.
    pub consumed: usize,
}

/// Walk every mip, layer and plane of a texture over its payload.
///
/// Data is stored layer by layer, each layer holding its mips from largest
/// to smallest, each mip holding its planes in order. Mips with any
/// dimension above a nonzero `max_size` are skipped (unless the texture has
/// a single mip), but their bytes are still stepped over.
///
/// # Errors
///
/// - [`Error::UnsupportedFormat`] if the format has no layout or no planes.
/// - [`Error::ArithmeticOverflow`] if a depth slice exceeds `u32::MAX` bytes.
/// - [`Error::UnexpectedEndOfFile`] if the payload ends early.
/// - [`Error::NoUsableSubresources`] if every mip was skipped.
pub fn enumerate_subresources(request: &SubresourceRequest, payload: &[u8]) -> Result<SubresourcePlan> {
    let planes = request.planes;
    if planes == 0 || planes != plane_count(request.format) {
        return Err(Error::UnsupportedFormat(format!(
            "{:?} does not have {planes} planes",
            request.format
        )));
    }

    let max_size = request.max_size;
    let capped = request.mip_count > 1 && max_size != 0;

    let mut descriptors = Vec::new();
    let mut skipped_mips = 0;
    let mut extent = None;
    let mut cursor = 0usize;

    for layer in 0..request.array_size {
        let (mut w, mut h, mut d) = (request.width.max(1), request.height.max(1), request.depth.max(1));
        let mut kept_mip = 0;

        for mip in 0..request.mip_count {
            let keep = !capped || (w <= max_size && h <= max_size && d <= max_size);
            if keep && extent.is_none() {
                extent = Some(vk::Extent3D {
                    width: w,
                    height: h,
                    depth: d,
                });
            }
            if !keep && layer == 0 {
                skipped_mips += 1;
            }

            for plane in 0..planes {
                let layout = surface_layout(w, h, request.format, plane)?;
                if u32::try_from(layout.total_bytes).is_err() {
                    return Err(Error::ArithmeticOverflow("subresource size"));
                }
                let size = layout
                    .total_bytes
                    .checked_mul(d as usize)
                    .ok_or(Error::ArithmeticOverflow("subresource size"))?;

                let end = cursor
                    .checked_add(size)
                    .ok_or(Error::ArithmeticOverflow("payload offset"))?;
                if end > payload.len() {
                    return Err(Error::UnexpectedEndOfFile {
                        offset: cursor,
                        needed: size,
                        available: payload.len().saturating_sub(cursor),
                    });
                }

                if keep {
                    let descriptor = SubresourceDescriptor {
                        offset: cursor,
                        size,
                        row_pitch: layout.row_bytes,
                        row_count: layout.row_count,
                        extent: vk::Extent3D {
                            width: layout.width,
                            height: layout.height,
                            depth: d,
                        },
                        mip_level: kept_mip,
                        source_mip_level: mip,
                        array_layer: layer,
                        aspect: aspect_for_plane(request.format, plane),
                    };
                    trace!(?descriptor, "subresource");
                    descriptors.push(descriptor);
                }

                cursor = end;
            }

            if keep {
                kept_mip += 1;
            }
            w = (w >> 1).max(1);
            h = (h >> 1).max(1);
            d = (d >> 1).max(1);
        }
    }

    let Some(extent) = extent else {
        return Err(Error::NoUsableSubresources);
    };
    if descriptors.is_empty() {
        return Err(Error::NoUsableSubresources);
    }

    // Storage order interleaves planes; consumers expect plane-major order.
    descriptors.sort_by_key(|s| plane_index(s.aspect));

    debug!(
        count = descriptors.len(),
        skipped_mips,
        consumed = cursor,
        payload_len = payload.len(),
        "enumerated subresources"
    );

    Ok(SubresourcePlan {
        descriptors,
        skipped_mips,
        extent,
        consumed: cursor,
    })
}

fn plane_index(aspect: vk::ImageAspectFlags) -> u32 {
    if aspect.contains(vk::ImageAspectFlags::PLANE_2) {
        2
    } else if aspect.contains(vk::ImageAspectFlags::PLANE_1) {
        1
    } else {
        0
    }
}
