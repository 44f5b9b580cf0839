//! DDS texture loading for Vulkan.
//!
//! Parses a DDS file (legacy or DX10 header), resolves its pixel format to
//! a [`vk::Format`](ash::vk::Format), works out where every mip level,
//! array layer and plane lives in the payload, and creates a matching
//! image through an [`ImageFactory`].
//!
//! Uploading the pixel data is left to the caller: the returned
//! [`TextureLayout`] lists each subresource's byte range and a ready
//! `vk::BufferImageCopy` for a staging buffer.
//!
//! # Example
//!
//! ```no_run
//! use ddsvk::prelude::*;
//!
//! # fn run(device: ash::Device) -> ddsvk::Result<()> {
//! let loader = TextureLoader::new(device);
//! let options = LoadOptions::default().with_max_size(2048);
//!
//! let loaded = loader.load_from_file_ex("textures/rock.dds", &options)?;
//! for region in loaded.texture.layout.buffer_image_copies(0) {
//!     println!("mip {} -> {:?}", region.image_subresource.mip_level, region.image_extent);
//! }
//! # Ok(())
//! # }
//! ```

mod create;
mod error;
mod factory;
mod header;
mod loader;
mod subresource;
mod texture;

pub use create::{create_image, DeviceLimits, ImageDescription};
pub use error::{Error, LoadStage, Result, ResultCode};
pub use factory::{DeviceImageFactory, ImageFactory};
pub use header::{
    read_file, Caps2, DdsFile, DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC, HeaderFlags, ResourceDimension,
};
pub use loader::{LoadOptions, LoadedTexture, LoadedTextureFile, TextureLayout, TextureLoader, DEFAULT_DEBUG_NAME};
pub use subresource::{enumerate_subresources, SubresourceDescriptor, SubresourcePlan, SubresourceRequest};
pub use texture::{AlphaMode, TextureDesc};

/// Re-export of the format crate.
pub use ddsvk_format as format;

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        AlphaMode, DeviceImageFactory, DeviceLimits, Error, ImageFactory, LoadOptions, LoadedTexture,
        LoadedTextureFile, ResultCode, TextureLayout, TextureLoader,
    };
}
