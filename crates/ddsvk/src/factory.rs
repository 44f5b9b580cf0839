//! The seam between the loader and the Vulkan device.

use std::ffi::CStr;

use ash::vk;
use tracing::trace;

/// Creates Vulkan images on behalf of the loader.
///
/// The loader never talks to a device directly; it hands a fully populated
/// create-info to a factory. [`ash::Device`] is a factory, and tests can
/// substitute one that records requests.
pub trait ImageFactory {
    /// Create an image. Errors are the raw Vulkan result.
    fn create_image(
        &self,
        create_info: &vk::ImageCreateInfo<'_>,
        allocation_callbacks: Option<&vk::AllocationCallbacks<'_>>,
    ) -> Result<vk::Image, vk::Result>;

    /// Attach a debug name to a created image. Does nothing by default.
    fn set_debug_name(&self, image: vk::Image, name: &CStr) -> Result<(), vk::Result> {
        let _ = (image, name);
        Ok(())
    }
}

impl ImageFactory for ash::Device {
    fn create_image(
        &self,
        create_info: &vk::ImageCreateInfo<'_>,
        allocation_callbacks: Option<&vk::AllocationCallbacks<'_>>,
    ) -> Result<vk::Image, vk::Result> {
        // SAFETY: the create-info is built by the loader from validated
        // headers and references no external memory.
        unsafe { ash::Device::create_image(self, create_info, allocation_callbacks) }
    }
}

/// A device paired with the debug-utils extension, so created images get
/// their debug names.
#[derive(Clone)]
pub struct DeviceImageFactory {
    device: ash::Device,
    debug_utils: Option<ash::ext::debug_utils::Device>,
}

impl DeviceImageFactory {
    pub fn new(device: ash::Device) -> Self {
        Self {
            device,
            debug_utils: None,
        }
    }

    /// Name images through `VK_EXT_debug_utils`. The instance must have the
    /// extension enabled.
    pub fn with_debug_utils(mut self, instance: &ash::Instance) -> Self {
        self.debug_utils = Some(ash::ext::debug_utils::Device::new(instance, &self.device));
        self
    }

    pub fn device(&self) -> &ash::Device {
        &self.device
    }
}

impl ImageFactory for DeviceImageFactory {
    fn create_image(
        &self,
        create_info: &vk::ImageCreateInfo<'_>,
        allocation_callbacks: Option<&vk::AllocationCallbacks<'_>>,
    ) -> Result<vk::Image, vk::Result> {
        ImageFactory::create_image(&self.device, create_info, allocation_callbacks)
    }

    fn set_debug_name(&self, image: vk::Image, name: &CStr) -> Result<(), vk::Result> {
        let Some(debug_utils) = &self.debug_utils else {
            return Ok(());
        };
        trace!(?image, ?name, "naming image");
        let info = vk::DebugUtilsObjectNameInfoEXT::default()
            .object_handle(image)
            .object_name(name);
        // SAFETY: `image` was created on this device and the name outlives
        // the call.
        unsafe { debug_utils.set_debug_utils_object_name(&info) }
    }
}
