//! End-to-end loads through a recording image factory.

use std::collections::VecDeque;
use std::ffi::{CStr, CString};
use std::sync::{Arc, Mutex};

use ash::vk::{self, Handle};
use ddsvk::format::PixelFormatFlags;
use ddsvk::{
    DdsHeader, DdsHeaderDxt10, DdsPixelFormat, DeviceLimits, Error, FourCC, HeaderFlags, ImageFactory, LoadOptions,
    ResourceDimension, ResultCode, TextureLoader, DDS_MAGIC,
};
use zerocopy::{FromZeros, IntoBytes};

#[derive(Debug, Clone)]
struct CreateCall {
    format: vk::Format,
    extent: vk::Extent3D,
    mip_levels: u32,
    array_layers: u32,
    flags: vk::ImageCreateFlags,
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<CreateCall>>,
    names: Mutex<Vec<CString>>,
    failures: Mutex<VecDeque<vk::Result>>,
}

/// Factory handing out sequential image handles, failing with scripted
/// results first.
#[derive(Clone, Default)]
struct RecordingFactory(Arc<Recorder>);

impl RecordingFactory {
    fn failing_with(results: &[vk::Result]) -> Self {
        let factory = Self::default();
        factory.0.failures.lock().unwrap().extend(results.iter().copied());
        factory
    }

    fn calls(&self) -> Vec<CreateCall> {
        self.0.calls.lock().unwrap().clone()
    }

    fn names(&self) -> Vec<CString> {
        self.0.names.lock().unwrap().clone()
    }
}

impl ImageFactory for RecordingFactory {
    fn create_image(
        &self,
        create_info: &vk::ImageCreateInfo<'_>,
        _allocation_callbacks: Option<&vk::AllocationCallbacks<'_>>,
    ) -> Result<vk::Image, vk::Result> {
        let mut calls = self.0.calls.lock().unwrap();
        calls.push(CreateCall {
            format: create_info.format,
            extent: create_info.extent,
            mip_levels: create_info.mip_levels,
            array_layers: create_info.array_layers,
            flags: create_info.flags,
        });
        if let Some(result) = self.0.failures.lock().unwrap().pop_front() {
            return Err(result);
        }
        Ok(vk::Image::from_raw(calls.len() as u64))
    }

    fn set_debug_name(&self, _image: vk::Image, name: &CStr) -> Result<(), vk::Result> {
        self.0.names.lock().unwrap().push(name.to_owned());
        Ok(())
    }
}

fn header(width: u32, height: u32, mips: u32, pixel_format: DdsPixelFormat) -> DdsHeader {
    let mut header = DdsHeader::new_zeroed();
    header.size = DdsHeader::SIZE;
    header.flags = HeaderFlags::HEIGHT;
    header.width = width;
    header.height = height;
    header.mipmap_count = mips;
    header.pixel_format = pixel_format;
    header
}

fn four_cc(code: FourCC) -> DdsPixelFormat {
    let mut pf = DdsPixelFormat::new_zeroed();
    pf.size = DdsPixelFormat::SIZE;
    pf.flags = PixelFormatFlags::FOURCC;
    pf.four_cc = code;
    pf
}

fn dds(header: &DdsHeader, ext: Option<DdsHeaderDxt10>, payload_len: usize) -> Vec<u8> {
    let mut data = DDS_MAGIC.to_vec();
    data.extend_from_slice(header.as_bytes());
    if let Some(ext) = ext {
        data.extend_from_slice(ext.as_bytes());
    }
    data.resize(data.len() + payload_len, 0);
    data
}

/// DX10 2D texture of `R8_UNORM` (DXGI 61).
fn r8_texture(width: u32, height: u32, mips: u32, payload_len: usize) -> Vec<u8> {
    let hdr = header(width, height, mips, four_cc(FourCC::DX10));
    let ext = DdsHeaderDxt10 {
        dxgi_format: 61,
        resource_dimension: ResourceDimension::TEXTURE2D,
        misc_flag: 0,
        array_size: 1,
        misc_flags2: 0,
    };
    dds(&hdr, Some(ext), payload_len)
}

#[test]
fn test_load_dxt1() {
    let factory = RecordingFactory::default();
    let loader = TextureLoader::new(factory.clone());

    let data = dds(&header(4, 4, 1, four_cc(FourCC::DXT1)), None, 8);
    let loaded = loader.load_from_memory(&data).unwrap();

    assert_eq!(loaded.image.as_raw(), 1);
    assert_eq!(loaded.layout.subresources.len(), 1);
    let calls = factory.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].format, vk::Format::BC1_RGBA_UNORM_BLOCK);
    assert_eq!(calls[0].extent, vk::Extent3D { width: 4, height: 4, depth: 1 });
    assert_eq!(calls[0].mip_levels, 1);
    assert_eq!(factory.names(), [CString::new("DDSTextureLoader").unwrap()]);
}

#[test]
fn test_zero_array_size_never_creates() {
    let factory = RecordingFactory::default();
    let loader = TextureLoader::new(factory.clone());

    let hdr = header(4, 4, 1, four_cc(FourCC::DX10));
    let ext = DdsHeaderDxt10 {
        dxgi_format: 71,
        resource_dimension: ResourceDimension::TEXTURE2D,
        misc_flag: 0,
        array_size: 0,
        misc_flags2: 0,
    };
    let err = loader.load_from_memory(&dds(&hdr, Some(ext), 8)).unwrap_err();

    assert_eq!(err.code(), ResultCode::InvalidData);
    assert!(factory.calls().is_empty());
}

#[test]
fn test_width_above_limit_never_creates() {
    let factory = RecordingFactory::default();
    let loader = TextureLoader::new(factory.clone());
    let options = LoadOptions::default().with_device_limits(DeviceLimits {
        max_dimension_2d: 1024,
        ..DeviceLimits::MINIMUM
    });

    let err = loader.load_from_memory_ex(&r8_texture(2048, 16, 1, 0), &options).unwrap_err();

    assert!(matches!(
        err,
        Error::BelowLimits {
            what: "width",
            value: 2048,
            limit: 1024
        }
    ));
    assert_eq!(err.code(), ResultCode::BelowLimits);
    assert!(factory.calls().is_empty());
}

#[test]
fn test_truncated_second_mip_never_creates() {
    let factory = RecordingFactory::default();
    let loader = TextureLoader::new(factory.clone());

    // 8x8 DXT1: 32 bytes for mip 0, 8 for mip 1.
    let data = dds(&header(8, 8, 2, four_cc(FourCC::DXT1)), None, 36);
    let err = loader.load_from_memory(&data).unwrap_err();

    assert_eq!(err.code(), ResultCode::UnexpectedEof);
    assert!(factory.calls().is_empty());
}

#[test]
fn test_out_of_memory_mapping() {
    let factory = RecordingFactory::failing_with(&[vk::Result::ERROR_OUT_OF_HOST_MEMORY]);
    let loader = TextureLoader::new(factory.clone());

    let err = loader.load_from_memory(&r8_texture(4, 4, 1, 16)).unwrap_err();

    assert!(matches!(err, Error::OutOfHostMemory));
    assert_eq!(err.code(), ResultCode::NoHostMemory);
    // Single-mip textures are not retried.
    assert_eq!(factory.calls().len(), 1);
}

#[test]
fn test_failed_creation_retries_without_reserved_mips() {
    let factory = RecordingFactory::failing_with(&[vk::Result::ERROR_OUT_OF_DEVICE_MEMORY]);
    let loader = TextureLoader::new(factory.clone());
    let options = LoadOptions::default().with_mip_reserve(true);

    // 16x16 R8 with two stored mips: 256 + 64 bytes.
    let loaded = loader.load_from_memory_ex(&r8_texture(16, 16, 2, 320), &options).unwrap();

    let calls = factory.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].mip_levels, 5);
    assert_eq!(calls[1].mip_levels, 2);
    assert_eq!(loaded.layout.description.mip_levels, 2);
    assert_eq!(loaded.image.as_raw(), 2);
}

#[test]
fn test_failed_retry_reports_second_error() {
    let factory = RecordingFactory::failing_with(&[
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY,
        vk::Result::ERROR_FORMAT_NOT_SUPPORTED,
    ]);
    let loader = TextureLoader::new(factory.clone());

    let err = loader.load_from_memory(&r8_texture(16, 16, 2, 320)).unwrap_err();

    assert!(matches!(err, Error::CreationFailed(vk::Result::ERROR_FORMAT_NOT_SUPPORTED)));
    assert_eq!(err.code(), ResultCode::Fail);
    assert_eq!(factory.calls().len(), 2);
}

#[test]
fn test_capped_load_does_not_retry() {
    let factory = RecordingFactory::failing_with(&[vk::Result::ERROR_OUT_OF_DEVICE_MEMORY]);
    let loader = TextureLoader::new(factory.clone());
    let options = LoadOptions::default().with_max_size(16);

    let err = loader.load_from_memory_ex(&r8_texture(16, 16, 2, 320), &options).unwrap_err();

    assert_eq!(err.code(), ResultCode::NoDeviceMemory);
    assert_eq!(factory.calls().len(), 1);
}

#[test]
fn test_force_srgb_and_extra_flags() {
    let factory = RecordingFactory::default();
    let loader = TextureLoader::new(factory.clone());
    let options = LoadOptions::default()
        .with_force_srgb(true)
        .with_create_flags(vk::ImageCreateFlags::EXTENDED_USAGE)
        .with_debug_name(c_name());

    let data = dds(&header(4, 4, 1, four_cc(FourCC::DXT5)), None, 16);
    loader.load_from_memory_ex(&data, &options).unwrap();

    let calls = factory.calls();
    assert_eq!(calls[0].format, vk::Format::BC3_SRGB_BLOCK);
    assert_eq!(calls[0].flags, vk::ImageCreateFlags::EXTENDED_USAGE);
    assert_eq!(factory.names(), [c_name().to_owned()]);
}

fn c_name() -> &'static CStr {
    CStr::from_bytes_with_nul(b"terrain\0").unwrap()
}

#[test]
fn test_cubemap_layers() {
    let factory = RecordingFactory::default();
    let loader = TextureLoader::new(factory.clone());

    let hdr = header(4, 4, 1, four_cc(FourCC::DX10));
    let ext = DdsHeaderDxt10 {
        dxgi_format: 61,
        resource_dimension: ResourceDimension::TEXTURE2D,
        misc_flag: DdsHeaderDxt10::MISC_TEXTURECUBE,
        array_size: 1,
        misc_flags2: 0,
    };
    let loaded = loader.load_from_memory(&dds(&hdr, Some(ext), 6 * 16)).unwrap();

    let calls = factory.calls();
    assert_eq!(calls[0].array_layers, 6);
    assert!(calls[0].flags.contains(vk::ImageCreateFlags::CUBE_COMPATIBLE));
    assert!(loaded.layout.is_cube_map());
    let layers: Vec<_> = loaded.layout.subresources.iter().map(|s| s.array_layer).collect();
    assert_eq!(layers, [0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_no_factory() {
    let err = TextureLoader::without_factory()
        .load_from_memory(&r8_texture(4, 4, 1, 16))
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::NoFunction);
}

#[test]
fn test_load_from_file_names_image() {
    let factory = RecordingFactory::default();
    let loader = TextureLoader::new(factory.clone());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rock_diffuse.dds");
    let data = dds(&header(4, 4, 1, four_cc(FourCC::DXT1)), None, 8);
    std::fs::write(&path, &data).unwrap();

    let loaded = loader.load_from_file(&path).unwrap();

    assert_eq!(loaded.data, data);
    assert_eq!(loaded.payload().len(), 8);
    let region = &loaded.texture.layout.subresources[0];
    assert_eq!(region.data(loaded.payload()).map(<[u8]>::len), Some(8));
    assert_eq!(factory.names(), [CString::new("rock_diffuse.dds").unwrap()]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TextureLoader::new(RecordingFactory::default())
        .load_from_file(dir.path().join("missing.dds"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(err.code(), ResultCode::Fail);
}

#[test]
fn test_describe_from_file_needs_no_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mips.dds");
    // 8x8 DXT1 with two mips: 32 + 8 bytes.
    let data = dds(&header(8, 8, 2, four_cc(FourCC::DXT1)), None, 40);
    std::fs::write(&path, &data).unwrap();

    let (read, layout) = TextureLoader::describe_from_file(&path, &LoadOptions::default()).unwrap();

    assert_eq!(read, data);
    assert_eq!(layout.description.mip_levels, 2);
    assert_eq!(layout.subresources.len(), 2);
    assert_eq!(layout.payload_offset, 128);
}
