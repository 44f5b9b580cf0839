//! Texture description derived from the DDS headers.

use ash::vk;
use ddsvk_format::{is_depth_stencil, resolve, PixelFormatFlags, ResolvedFormat, MAX_MIP_LEVELS};
use tracing::debug;

use crate::header::{Caps2, DdsFile, DdsHeaderDxt10, FourCC, HeaderFlags, ResourceDimension};
use crate::{Error, Result};

/// How the alpha channel of a texture should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum AlphaMode {
    #[default]
    Unknown = 0,
    Straight = 1,
    Premultiplied = 2,
    Opaque = 3,
    Custom = 4,
}

impl AlphaMode {
    /// Alpha mode declared by the headers.
    ///
    /// DX10 files carry it in the low bits of `misc_flags2`; legacy `DXT2`
    /// and `DXT4` files are premultiplied.
    pub fn from_dds(file: &DdsFile<'_>) -> Self {
        if let Some(ext) = file.dx10() {
            let misc_flags2 = ext.misc_flags2;
            return match misc_flags2 & DdsHeaderDxt10::MISC2_ALPHA_MODE_MASK {
                1 => Self::Straight,
                2 => Self::Premultiplied,
                3 => Self::Opaque,
                4 => Self::Custom,
                _ => Self::Unknown,
            };
        }

        let pf = &file.header().pixel_format;
        let flags = pf.flags;
        let four_cc = pf.four_cc;
        if flags & PixelFormatFlags::FOURCC != 0 && (four_cc == FourCC::DXT2 || four_cc == FourCC::DXT4) {
            Self::Premultiplied
        } else {
            Self::Unknown
        }
    }
}

/// Image shape and format of a DDS texture, before any size capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub image_type: vk::ImageType,
    pub format: ResolvedFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Mip levels stored in the file, at least 1.
    pub mip_count: u32,
    /// Array layers, six per cube for cubemaps.
    pub array_layers: u32,
    /// Flags the texture itself requires (`MUTABLE_FORMAT`, `CUBE_COMPATIBLE`).
    pub flags: vk::ImageCreateFlags,
    pub is_cube_map: bool,
    pub alpha_mode: AlphaMode,
}

impl TextureDesc {
    /// Derive the texture description from validated headers.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidData`] for a zero DX10 array size, a 1D texture
    ///   with a height other than 1, or a 3D texture without the volume flag.
    /// - [`Error::UnsupportedFormat`] if the pixel format has no Vulkan
    ///   equivalent, or is a multi-planar depth/stencil format.
    /// - [`Error::UnsupportedLayout`] for unknown resource dimensions, 3D
    ///   arrays, partial cubemaps and more than 15 mips.
    pub fn from_dds(file: &DdsFile<'_>) -> Result<Self> {
        let header = file.header();
        let mut width = header.width;
        let mut height = header.height;
        let mut depth = header.depth;
        let mip_count = header.mip_count();

        let mut flags = vk::ImageCreateFlags::empty();
        let mut is_cube_map = false;

        let (image_type, format, array_layers) = if let Some(ext) = file.dx10() {
            let mut array_size = ext.array_size;
            if array_size == 0 {
                return Err(Error::InvalidData("DX10 array size is zero"));
            }

            let format = resolve(&file.pixel_format_source())?;
            if format.typeless {
                flags |= vk::ImageCreateFlags::MUTABLE_FORMAT;
            }

            let dimension = ext.resource_dimension;
            let image_type = match dimension {
                ResourceDimension::TEXTURE1D => {
                    // 1D textures are written with a fixed height of 1.
                    if header.flags & HeaderFlags::HEIGHT != 0 && height != 1 {
                        return Err(Error::InvalidData("1D texture with height other than 1"));
                    }
                    height = 1;
                    depth = 1;
                    vk::ImageType::TYPE_1D
                }
                ResourceDimension::TEXTURE2D => {
                    if ext.is_cube() {
                        flags |= vk::ImageCreateFlags::CUBE_COMPATIBLE;
                        is_cube_map = true;
                        array_size = array_size
                            .checked_mul(6)
                            .ok_or(Error::ArithmeticOverflow("cube array size"))?;
                    }
                    depth = 1;
                    vk::ImageType::TYPE_2D
                }
                ResourceDimension::TEXTURE3D => {
                    if !header.is_volume() {
                        return Err(Error::InvalidData("3D texture without the volume flag"));
                    }
                    if array_size > 1 {
                        return Err(Error::UnsupportedLayout("3D texture arrays"));
                    }
                    vk::ImageType::TYPE_3D
                }
                _ => return Err(Error::UnsupportedLayout("unknown resource dimension")),
            };

            (image_type, format, array_size)
        } else {
            let format = resolve(&file.pixel_format_source())?;

            if header.is_volume() {
                (vk::ImageType::TYPE_3D, format, 1)
            } else {
                let caps2 = header.caps2;
                let mut array_size = 1;
                if caps2 & Caps2::CUBEMAP != 0 {
                    if caps2 & Caps2::ALL_FACES != Caps2::ALL_FACES {
                        return Err(Error::UnsupportedLayout("cubemap without all six faces"));
                    }
                    array_size = 6;
                    flags |= vk::ImageCreateFlags::CUBE_COMPATIBLE;
                    is_cube_map = true;
                }
                depth = 1;
                // Legacy headers cannot express 1D textures.
                (vk::ImageType::TYPE_2D, format, array_size)
            }
        };

        if mip_count > MAX_MIP_LEVELS {
            return Err(Error::UnsupportedLayout("more than 15 mip levels"));
        }
        if format.planes == 0 {
            return Err(Error::UnsupportedFormat(format!("{:?} has no planes", format.format)));
        }
        if format.planes > 1 && is_depth_stencil(format.format) {
            return Err(Error::UnsupportedFormat(format!(
                "multi-planar depth/stencil format {:?}",
                format.format
            )));
        }

        width = width.max(1);
        height = height.max(1);
        depth = depth.max(1);

        let desc = Self {
            image_type,
            format,
            width,
            height,
            depth,
            mip_count,
            array_layers,
            flags,
            is_cube_map,
            alpha_mode: AlphaMode::from_dds(file),
        };
        debug!(
            image_type = ?desc.image_type,
            format = ?desc.format.format,
            width,
            height,
            depth,
            mip_count,
            array_layers,
            "resolved texture description"
        );
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::tests::{build, dx10, four_cc_format, header};
    use rstest::rstest;

    fn describe(data: &[u8]) -> Result<TextureDesc> {
        TextureDesc::from_dds(&DdsFile::parse(data)?)
    }

    fn dx10_file(ext: DdsHeaderDxt10, flags: u32, height: u32) -> Vec<u8> {
        let mut hdr = header(16, height, 1, four_cc_format(FourCC::DX10));
        hdr.flags |= flags;
        hdr.depth = 4;
        build(&hdr, Some(&ext), &[])
    }

    #[test]
    fn test_legacy_2d() {
        let data = build(&header(8, 4, 0, four_cc_format(FourCC::DXT5)), None, &[]);
        let desc = describe(&data).unwrap();
        assert_eq!(desc.image_type, vk::ImageType::TYPE_2D);
        assert_eq!(desc.format.format, vk::Format::BC3_UNORM_BLOCK);
        assert_eq!((desc.width, desc.height, desc.depth), (8, 4, 1));
        assert_eq!(desc.mip_count, 1);
        assert_eq!(desc.array_layers, 1);
        assert!(desc.flags.is_empty());
        assert_eq!(desc.alpha_mode, AlphaMode::Unknown);
    }

    #[test]
    fn test_legacy_cubemap() {
        let mut hdr = header(8, 8, 1, four_cc_format(FourCC::DXT1));
        hdr.caps2 = Caps2::ALL_FACES;
        let desc = describe(&build(&hdr, None, &[])).unwrap();
        assert!(desc.is_cube_map);
        assert_eq!(desc.array_layers, 6);
        assert!(desc.flags.contains(vk::ImageCreateFlags::CUBE_COMPATIBLE));
    }

    #[test]
    fn test_partial_cubemap_is_unsupported() {
        let mut hdr = header(8, 8, 1, four_cc_format(FourCC::DXT1));
        hdr.caps2 = Caps2::POSITIVE_X | Caps2::NEGATIVE_X | Caps2::POSITIVE_Y;
        let err = describe(&build(&hdr, None, &[])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLayout(_)));
    }

    #[test]
    fn test_legacy_volume() {
        let mut hdr = header(8, 8, 1, four_cc_format(FourCC::DXT1));
        hdr.flags |= HeaderFlags::VOLUME;
        hdr.depth = 4;
        let desc = describe(&build(&hdr, None, &[])).unwrap();
        assert_eq!(desc.image_type, vk::ImageType::TYPE_3D);
        assert_eq!(desc.depth, 4);
    }

    #[test]
    fn test_dx10_zero_array_size() {
        let data = dx10_file(dx10(71, ResourceDimension::TEXTURE2D, 0), 0, 16);
        assert!(matches!(describe(&data), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_dx10_cube_array() {
        let mut ext = dx10(98, ResourceDimension::TEXTURE2D, 2);
        ext.misc_flag = DdsHeaderDxt10::MISC_TEXTURECUBE;
        let desc = describe(&dx10_file(ext, 0, 16)).unwrap();
        assert_eq!(desc.array_layers, 12);
        assert_eq!(desc.depth, 1);
        assert!(desc.is_cube_map);
        assert!(desc.flags.contains(vk::ImageCreateFlags::CUBE_COMPATIBLE));
    }

    #[test]
    fn test_dx10_typeless_is_mutable() {
        let desc = describe(&dx10_file(dx10(27, ResourceDimension::TEXTURE2D, 1), 0, 16)).unwrap();
        assert_eq!(desc.format.format, vk::Format::R8G8B8A8_UINT);
        assert!(desc.flags.contains(vk::ImageCreateFlags::MUTABLE_FORMAT));
    }

    #[rstest]
    #[case(1, 0, true)]
    #[case(1, HeaderFlags::HEIGHT, true)]
    #[case(4, 0, true)]
    #[case(4, HeaderFlags::HEIGHT, false)]
    fn test_dx10_1d_height(#[case] height: u32, #[case] flags: u32, #[case] ok: bool) {
        let mut hdr = header(16, height, 1, four_cc_format(FourCC::DX10));
        hdr.flags = flags;
        let data = build(&hdr, Some(&dx10(28, ResourceDimension::TEXTURE1D, 1)), &[]);
        let result = describe(&data);
        if ok {
            let desc = result.unwrap();
            assert_eq!(desc.image_type, vk::ImageType::TYPE_1D);
            assert_eq!((desc.height, desc.depth), (1, 1));
        } else {
            assert!(matches!(result, Err(Error::InvalidData(_))));
        }
    }

    #[test]
    fn test_dx10_3d_rules() {
        let data = dx10_file(dx10(28, ResourceDimension::TEXTURE3D, 1), 0, 16);
        assert!(matches!(describe(&data), Err(Error::InvalidData(_))));

        let data = dx10_file(dx10(28, ResourceDimension::TEXTURE3D, 2), HeaderFlags::VOLUME, 16);
        assert!(matches!(describe(&data), Err(Error::UnsupportedLayout(_))));

        let desc = describe(&dx10_file(dx10(28, ResourceDimension::TEXTURE3D, 1), HeaderFlags::VOLUME, 16)).unwrap();
        assert_eq!(desc.image_type, vk::ImageType::TYPE_3D);
        assert_eq!(desc.depth, 4);
    }

    #[test]
    fn test_dx10_unknown_dimension_and_format() {
        let data = dx10_file(dx10(28, 9, 1), 0, 16);
        assert!(matches!(describe(&data), Err(Error::UnsupportedLayout(_))));

        let data = dx10_file(dx10(88, ResourceDimension::TEXTURE2D, 1), 0, 16);
        assert!(matches!(describe(&data), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_too_many_mips() {
        let data = build(&header(65536, 4, 16, four_cc_format(FourCC::DXT1)), None, &[]);
        assert!(matches!(describe(&data), Err(Error::UnsupportedLayout(_))));
    }

    #[test]
    fn test_unsupported_legacy_format() {
        let mut pf = four_cc_format(FourCC(*b"????"));
        pf.flags = PixelFormatFlags::FOURCC;
        let data = build(&header(4, 4, 1, pf), None, &[]);
        assert_eq!(describe(&data).unwrap_err().code(), crate::ResultCode::UnsupportedFormat);
    }

    #[rstest]
    #[case(0, AlphaMode::Unknown)]
    #[case(1, AlphaMode::Straight)]
    #[case(2, AlphaMode::Premultiplied)]
    #[case(3, AlphaMode::Opaque)]
    #[case(4, AlphaMode::Custom)]
    #[case(5, AlphaMode::Unknown)]
    #[case(0xF9, AlphaMode::Unknown)]
    fn test_dx10_alpha_mode(#[case] misc_flags2: u32, #[case] expected: AlphaMode) {
        let mut ext = dx10(28, ResourceDimension::TEXTURE2D, 1);
        ext.misc_flags2 = misc_flags2;
        let data = dx10_file(ext, 0, 16);
        assert_eq!(AlphaMode::from_dds(&DdsFile::parse(&data).unwrap()), expected);
    }

    #[test]
    fn test_legacy_premultiplied_alpha() {
        for (code, expected) in [
            (FourCC::DXT2, AlphaMode::Premultiplied),
            (FourCC::DXT4, AlphaMode::Premultiplied),
            (FourCC::DXT5, AlphaMode::Unknown),
        ] {
            let data = build(&header(4, 4, 1, four_cc_format(code)), None, &[]);
            assert_eq!(describe(&data).unwrap().alpha_mode, expected);
        }
    }
}
