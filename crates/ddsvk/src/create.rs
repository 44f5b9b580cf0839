//! Device limit checks and image creation.

use std::ffi::CStr;

use ash::vk;
use tracing::{debug, warn};

use crate::factory::ImageFactory;
use crate::texture::TextureDesc;
use crate::{Error, Result};

/// The image limits the loader checks a texture against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    pub max_dimension_1d: u32,
    pub max_dimension_2d: u32,
    pub max_dimension_3d: u32,
    pub max_dimension_cube: u32,
    pub max_array_layers: u32,
}

impl DeviceLimits {
    /// Limits every Vulkan implementation guarantees.
    pub const MINIMUM: Self = Self {
        max_dimension_1d: 4096,
        max_dimension_2d: 4096,
        max_dimension_3d: 256,
        max_dimension_cube: 4096,
        max_array_layers: 256,
    };

    /// Check a texture against these limits.
    ///
    /// # Errors
    ///
    /// [`Error::BelowLimits`] naming the first dimension that does not fit.
    pub fn check(&self, desc: &TextureDesc) -> Result<()> {
        let exceeds = |what, value: u32, limit: u32| {
            if value > limit {
                Err(Error::BelowLimits { what, value, limit })
            } else {
                Ok(())
            }
        };

        match desc.image_type {
            vk::ImageType::TYPE_1D => {
                exceeds("array layers", desc.array_layers, self.max_array_layers)?;
                exceeds("width", desc.width, self.max_dimension_1d)
            }
            vk::ImageType::TYPE_3D => {
                exceeds("array layers", desc.array_layers, 1)?;
                exceeds("width", desc.width, self.max_dimension_3d)?;
                exceeds("height", desc.height, self.max_dimension_3d)?;
                exceeds("depth", desc.depth, self.max_dimension_3d)
            }
            _ => {
                let limit = if desc.is_cube_map {
                    self.max_dimension_cube
                } else {
                    self.max_dimension_2d
                };
                exceeds("array layers", desc.array_layers, self.max_array_layers)?;
                exceeds("width", desc.width, limit)?;
                exceeds("height", desc.height, limit)
            }
        }
    }

    /// Size cap used when an uncapped image fails to create.
    pub fn fallback_max_size(&self, image_type: vk::ImageType) -> u32 {
        if image_type == vk::ImageType::TYPE_3D {
            self.max_dimension_3d
        } else {
            self.max_dimension_2d
        }
    }
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self::MINIMUM
    }
}

impl From<&vk::PhysicalDeviceLimits> for DeviceLimits {
    fn from(limits: &vk::PhysicalDeviceLimits) -> Self {
        Self {
            max_dimension_1d: limits.max_image_dimension1_d,
            max_dimension_2d: limits.max_image_dimension2_d,
            max_dimension_3d: limits.max_image_dimension3_d,
            max_dimension_cube: limits.max_image_dimension_cube,
            max_array_layers: limits.max_image_array_layers,
        }
    }
}

/// Everything needed to create the image for a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescription {
    pub image_type: vk::ImageType,
    pub format: vk::Format,
    pub extent: vk::Extent3D,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub flags: vk::ImageCreateFlags,
    pub usage: vk::ImageUsageFlags,
}

impl ImageDescription {
    /// Single-sampled, optimally tiled, exclusive, in the undefined layout.
    pub fn to_create_info(&self) -> vk::ImageCreateInfo<'static> {
        vk::ImageCreateInfo::default()
            .flags(self.flags)
            .image_type(self.image_type)
            .format(self.format)
            .extent(self.extent)
            .mip_levels(self.mip_levels)
            .array_layers(self.array_layers)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(self.usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
    }
}

/// Create an image through a factory and give it a debug name.
///
/// A failed debug name is logged and otherwise ignored.
///
/// # Errors
///
/// [`Error::OutOfHostMemory`], [`Error::OutOfDeviceMemory`], or
/// [`Error::CreationFailed`] for any other result.
pub fn create_image<F: ImageFactory + ?Sized>(
    factory: &F,
    description: &ImageDescription,
    allocation_callbacks: Option<&vk::AllocationCallbacks<'_>>,
    debug_name: &CStr,
) -> Result<vk::Image> {
    let create_info = description.to_create_info();
    let image = factory
        .create_image(&create_info, allocation_callbacks)
        .map_err(Error::from_vk)?;

    if let Err(result) = factory.set_debug_name(image, debug_name) {
        warn!(?image, ?result, "failed to set image debug name");
    }

    debug!(
        ?image,
        format = ?description.format,
        extent = ?description.extent,
        mip_levels = description.mip_levels,
        array_layers = description.array_layers,
        "created image"
    );
    Ok(image)
}
