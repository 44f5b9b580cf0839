//! Load entry points tying the pipeline together.

use std::ffi::{CStr, CString};
use std::path::Path;

use ash::vk;
use ddsvk_format::{full_mip_count, make_srgb, MAX_MIP_LEVELS};
use tracing::{debug, warn};

use crate::create::{create_image, DeviceLimits, ImageDescription};
use crate::factory::ImageFactory;
use crate::header::{read_file, DdsFile};
use crate::subresource::{enumerate_subresources, SubresourceDescriptor, SubresourcePlan, SubresourceRequest};
use crate::texture::{AlphaMode, TextureDesc};
use crate::{Error, Result};

/// Debug name given to images loaded from memory.
pub const DEFAULT_DEBUG_NAME: &CStr = match CStr::from_bytes_with_nul(b"DDSTextureLoader\0") {
    Ok(name) => name,
    Err(_) => panic!("debug name is not nul-terminated"),
};

/// Options for a single load.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions<'a> {
    /// Usage of the created image.
    pub usage: vk::ImageUsageFlags,
    /// Extra create flags, added to the ones the texture requires.
    pub create_flags: vk::ImageCreateFlags,
    /// Largest dimension of the first kept mip, 0 for no cap.
    pub max_size: u32,
    /// Limits to check against; the guaranteed minimum if unset.
    pub device_limits: Option<DeviceLimits>,
    /// Create the image with the sRGB variant of the format.
    pub force_srgb: bool,
    /// Reserve the full mip chain on the image, not just the stored mips.
    pub mip_reserve: bool,
    pub allocation_callbacks: Option<&'a vk::AllocationCallbacks<'a>>,
    /// Overrides the default debug name.
    pub debug_name: Option<&'a CStr>,
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self {
            usage: vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::TRANSFER_SRC,
            create_flags: vk::ImageCreateFlags::empty(),
            max_size: 0,
            device_limits: None,
            force_srgb: false,
            mip_reserve: false,
            allocation_callbacks: None,
            debug_name: None,
        }
    }
}

impl<'a> LoadOptions<'a> {
    pub fn with_usage(mut self, usage: vk::ImageUsageFlags) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_create_flags(mut self, flags: vk::ImageCreateFlags) -> Self {
        self.create_flags = flags;
        self
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_device_limits(mut self, limits: DeviceLimits) -> Self {
        self.device_limits = Some(limits);
        self
    }

    pub fn with_force_srgb(mut self, force_srgb: bool) -> Self {
        self.force_srgb = force_srgb;
        self
    }

    pub fn with_mip_reserve(mut self, mip_reserve: bool) -> Self {
        self.mip_reserve = mip_reserve;
        self
    }

    pub fn with_allocation_callbacks(mut self, callbacks: &'a vk::AllocationCallbacks<'a>) -> Self {
        self.allocation_callbacks = Some(callbacks);
        self
    }

    pub fn with_debug_name(mut self, name: &'a CStr) -> Self {
        self.debug_name = Some(name);
        self
    }

    fn limits(&self) -> DeviceLimits {
        self.device_limits.unwrap_or(DeviceLimits::MINIMUM)
    }
}

/// How a texture maps onto an image, without the image itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureLayout {
    pub texture: TextureDesc,
    pub description: ImageDescription,
    /// Subresources with offsets relative to the payload.
    pub subresources: Vec<SubresourceDescriptor>,
    pub skipped_mips: u32,
    /// Offset of the payload within the file.
    pub payload_offset: usize,
}

impl TextureLayout {
    pub fn alpha_mode(&self) -> AlphaMode {
        self.texture.alpha_mode
    }

    pub fn is_cube_map(&self) -> bool {
        self.texture.is_cube_map
    }

    pub fn create_info(&self) -> vk::ImageCreateInfo<'static> {
        self.description.to_create_info()
    }

    /// Copy regions for a staging buffer holding the payload at
    /// `base_offset`.
    pub fn buffer_image_copies(&self, base_offset: vk::DeviceSize) -> Vec<vk::BufferImageCopy> {
        self.subresources
            .iter()
            .map(|s| s.buffer_image_copy(base_offset))
            .collect()
    }
}

/// A created image and its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTexture {
    pub image: vk::Image,
    pub layout: TextureLayout,
}

/// A texture loaded from disk, with the file contents the subresources
/// point into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTextureFile {
    pub data: Vec<u8>,
    pub texture: LoadedTexture,
}

impl LoadedTextureFile {
    /// The pixel payload of the file.
    pub fn payload(&self) -> &[u8] {
        self.data
            .get(self.texture.layout.payload_offset..)
            .unwrap_or_default()
    }
}

/// Loads DDS textures into Vulkan images through an [`ImageFactory`].
pub struct TextureLoader {
    factory: Option<Box<dyn ImageFactory + Send + Sync>>,
}

impl TextureLoader {
    pub fn new(factory: impl ImageFactory + Send + Sync + 'static) -> Self {
        Self {
            factory: Some(Box::new(factory)),
        }
    }

    /// A loader with no factory. Loads fail with [`Error::NoImageFactory`].
    pub fn without_factory() -> Self {
        Self { factory: None }
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Load a texture from memory with default options.
    pub fn load_from_memory(&self, data: &[u8]) -> Result<LoadedTexture> {
        self.load_from_memory_ex(data, &LoadOptions::default())
    }

    /// Load a texture from memory.
    ///
    /// If creating the image fails, no size cap was given and the texture
    /// has several mips, the load is retried once capped at the device's
    /// dimension limit and without reserved mips.
    pub fn load_from_memory_ex(&self, data: &[u8], options: &LoadOptions<'_>) -> Result<LoadedTexture> {
        self.load(data, options, options.debug_name.unwrap_or(DEFAULT_DEBUG_NAME))
    }

    /// Load a texture from a file with default options.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<LoadedTextureFile> {
        self.load_from_file_ex(path, &LoadOptions::default())
    }

    /// Load a texture from a file. The image is named after the file
    /// unless the options carry a debug name.
    pub fn load_from_file_ex(&self, path: impl AsRef<Path>, options: &LoadOptions<'_>) -> Result<LoadedTextureFile> {
        let path = path.as_ref();
        let data = read_file(path)?;

        let file_name = path
            .file_name()
            .and_then(|name| CString::new(name.to_string_lossy().into_owned()).ok());
        let debug_name = options
            .debug_name
            .or(file_name.as_deref())
            .unwrap_or(DEFAULT_DEBUG_NAME);

        let texture = self.load(&data, options, debug_name)?;
        Ok(LoadedTextureFile { data, texture })
    }

    /// Run the pipeline up to, but not including, image creation.
    ///
    /// Needs no factory, so it is callable without a loader.
    pub fn describe_from_memory(data: &[u8], options: &LoadOptions<'_>) -> Result<TextureLayout> {
        describe(data, options)
    }

    /// Read a file and describe it. Returns the file contents alongside.
    /// Needs no factory either.
    pub fn describe_from_file(
        path: impl AsRef<Path>,
        options: &LoadOptions<'_>,
    ) -> Result<(Vec<u8>, TextureLayout)> {
        let data = read_file(path)?;
        let layout = describe(&data, options)?;
        Ok((data, layout))
    }

    fn load(&self, data: &[u8], options: &LoadOptions<'_>, debug_name: &CStr) -> Result<LoadedTexture> {
        let (file, texture) = parse(data, options)?;
        let plan = plan_subresources(&file, &texture, options.max_size)?;
        let layout = build_layout(&file, texture, plan, options);

        let factory = self.factory.as_deref().ok_or(Error::NoImageFactory)?;

        match create_image(factory, &layout.description, options.allocation_callbacks, debug_name) {
            Ok(image) => Ok(LoadedTexture { image, layout }),
            Err(err) if options.max_size == 0 && texture.mip_count > 1 => {
                let max_size = options.limits().fallback_max_size(texture.image_type);
                warn!(%err, max_size, "image creation failed, retrying with a size cap");

                // The retry creates only the stored mips.
                let retry = LoadOptions {
                    mip_reserve: false,
                    ..*options
                };
                let plan = plan_subresources(&file, &texture, max_size)?;
                let layout = build_layout(&file, texture, plan, &retry);
                let image = create_image(factory, &layout.description, options.allocation_callbacks, debug_name)?;
                Ok(LoadedTexture { image, layout })
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::without_factory()
    }
}

impl std::fmt::Debug for TextureLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureLoader")
            .field("has_factory", &self.has_factory())
            .finish()
    }
}

fn describe(data: &[u8], options: &LoadOptions<'_>) -> Result<TextureLayout> {
    let (file, texture) = parse(data, options)?;
    let plan = plan_subresources(&file, &texture, options.max_size)?;
    Ok(build_layout(&file, texture, plan, options))
}

fn parse<'a>(data: &'a [u8], options: &LoadOptions<'_>) -> Result<(DdsFile<'a>, TextureDesc)> {
    let file = DdsFile::parse(data)?;
    let texture = TextureDesc::from_dds(&file)?;
    options.limits().check(&texture)?;
    Ok((file, texture))
}

fn plan_subresources(file: &DdsFile<'_>, texture: &TextureDesc, max_size: u32) -> Result<SubresourcePlan> {
    let request = SubresourceRequest::for_texture(texture, max_size);
    enumerate_subresources(&request, file.payload())
}

fn build_layout(file: &DdsFile<'_>, texture: TextureDesc, plan: SubresourcePlan, options: &LoadOptions<'_>) -> TextureLayout {
    let stored_mips = if options.mip_reserve {
        full_mip_count(texture.width, texture.height)
            .min(MAX_MIP_LEVELS)
            .max(texture.mip_count)
    } else {
        texture.mip_count
    };
    let mip_levels = stored_mips.saturating_sub(plan.skipped_mips).max(1);

    let format = if options.force_srgb {
        make_srgb(texture.format.format)
    } else {
        texture.format.format
    };

    let description = ImageDescription {
        image_type: texture.image_type,
        format,
        extent: plan.extent,
        mip_levels,
        array_layers: texture.array_layers,
        flags: texture.flags | options.create_flags,
        usage: options.usage,
    };
    debug!(?description, subresources = plan.descriptors.len(), "planned image");

    TextureLayout {
        texture,
        description,
        subresources: plan.descriptors,
        skipped_mips: plan.skipped_mips,
        payload_offset: file.payload_offset(),
    }
}
