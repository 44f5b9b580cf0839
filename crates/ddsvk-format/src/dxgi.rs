//! DXGI format codes and their Vulkan equivalents.
//!
//! Typeless codes map to an unsigned-integer view, except block-compressed
//! typeless codes which map to their UNORM (or BC6H UFLOAT) variant. Codes
//! without a Vulkan counterpart map to [`vk::Format::UNDEFINED`].

use ash::vk;
use ash::vk::Format as F;

use crate::{Error, Result};

/// A DXGI format code as stored in the DX10 extended header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DxgiFormat(pub u32);

/// One row of the DXGI table.
#[derive(Debug, Clone, Copy)]
pub struct DxgiEntry {
    /// DXGI code.
    pub code: u32,
    /// DXGI name without the `DXGI_FORMAT_` prefix.
    pub name: &'static str,
    /// Vulkan equivalent, `UNDEFINED` when there is none.
    pub format: vk::Format,
    /// Whether the code is a typeless format.
    pub typeless: bool,
}

const fn entry(code: u32, name: &'static str, format: vk::Format) -> DxgiEntry {
    DxgiEntry {
        code,
        name,
        format,
        typeless: false,
    }
}

const fn typeless(code: u32, name: &'static str, format: vk::Format) -> DxgiEntry {
    DxgiEntry {
        code,
        name,
        format,
        typeless: true,
    }
}

/// Sorted by code; looked up with a binary search.
static DXGI_TABLE: &[DxgiEntry] = &[
    entry(0, "UNKNOWN", F::UNDEFINED),
    typeless(1, "R32G32B32A32_TYPELESS", F::R32G32B32A32_UINT),
    entry(2, "R32G32B32A32_FLOAT", F::R32G32B32A32_SFLOAT),
    entry(3, "R32G32B32A32_UINT", F::R32G32B32A32_UINT),
    entry(4, "R32G32B32A32_SINT", F::R32G32B32A32_SINT),
    typeless(5, "R32G32B32_TYPELESS", F::R32G32B32_UINT),
    entry(6, "R32G32B32_FLOAT", F::R32G32B32_SFLOAT),
    entry(7, "R32G32B32_UINT", F::R32G32B32_UINT),
    entry(8, "R32G32B32_SINT", F::R32G32B32_SINT),
    typeless(9, "R16G16B16A16_TYPELESS", F::R16G16B16A16_UINT),
    entry(10, "R16G16B16A16_FLOAT", F::R16G16B16A16_SFLOAT),
    entry(11, "R16G16B16A16_UNORM", F::R16G16B16A16_UNORM),
    entry(12, "R16G16B16A16_UINT", F::R16G16B16A16_UINT),
    entry(13, "R16G16B16A16_SNORM", F::R16G16B16A16_SNORM),
    entry(14, "R16G16B16A16_SINT", F::R16G16B16A16_SINT),
    typeless(15, "R32G32_TYPELESS", F::R32G32_UINT),
    entry(16, "R32G32_FLOAT", F::R32G32_SFLOAT),
    entry(17, "R32G32_UINT", F::R32G32_UINT),
    entry(18, "R32G32_SINT", F::R32G32_SINT),
    typeless(19, "R32G8X24_TYPELESS", F::UNDEFINED),
    entry(20, "D32_FLOAT_S8X24_UINT", F::UNDEFINED),
    typeless(21, "R32_FLOAT_X8X24_TYPELESS", F::UNDEFINED),
    entry(22, "X32_TYPELESS_G8X24_UINT", F::UNDEFINED),
    typeless(23, "R10G10B10A2_TYPELESS", F::A2B10G10R10_UINT_PACK32),
    entry(24, "R10G10B10A2_UNORM", F::A2B10G10R10_UNORM_PACK32),
    entry(25, "R10G10B10A2_UINT", F::A2B10G10R10_UINT_PACK32),
    entry(26, "R11G11B10_FLOAT", F::B10G11R11_UFLOAT_PACK32),
    typeless(27, "R8G8B8A8_TYPELESS", F::R8G8B8A8_UINT),
    entry(28, "R8G8B8A8_UNORM", F::R8G8B8A8_UNORM),
    entry(29, "R8G8B8A8_UNORM_SRGB", F::R8G8B8A8_SRGB),
    entry(30, "R8G8B8A8_UINT", F::R8G8B8A8_UINT),
    entry(31, "R8G8B8A8_SNORM", F::R8G8B8A8_SNORM),
    entry(32, "R8G8B8A8_SINT", F::R8G8B8A8_SINT),
    typeless(33, "R16G16_TYPELESS", F::R16G16_UINT),
    entry(34, "R16G16_FLOAT", F::R16G16_SFLOAT),
    entry(35, "R16G16_UNORM", F::R16G16_UNORM),
    entry(36, "R16G16_UINT", F::R16G16_UINT),
    entry(37, "R16G16_SNORM", F::R16G16_SNORM),
    entry(38, "R16G16_SINT", F::R16G16_SINT),
    typeless(39, "R32_TYPELESS", F::R32_UINT),
    entry(40, "D32_FLOAT", F::D32_SFLOAT),
    entry(41, "R32_FLOAT", F::R32_SFLOAT),
    entry(42, "R32_UINT", F::R32_UINT),
    entry(43, "R32_SINT", F::R32_SINT),
    typeless(44, "R24G8_TYPELESS", F::D24_UNORM_S8_UINT),
    entry(45, "D24_UNORM_S8_UINT", F::D24_UNORM_S8_UINT),
    typeless(46, "R24_UNORM_X8_TYPELESS", F::UNDEFINED),
    typeless(47, "X24_TYPELESS_G8_UINT", F::UNDEFINED),
    typeless(48, "R8G8_TYPELESS", F::R8G8_UINT),
    entry(49, "R8G8_UNORM", F::R8G8_UNORM),
    entry(50, "R8G8_UINT", F::R8G8_UINT),
    entry(51, "R8G8_SNORM", F::R8G8_SNORM),
    entry(52, "R8G8_SINT", F::R8G8_SINT),
    typeless(53, "R16_TYPELESS", F::R16_UINT),
    entry(54, "R16_FLOAT", F::R16_SFLOAT),
    entry(55, "D16_UNORM", F::D16_UNORM),
    entry(56, "R16_UNORM", F::R16_UNORM),
    entry(57, "R16_UINT", F::R16_UINT),
    entry(58, "R16_SNORM", F::R16_SNORM),
    entry(59, "R16_SINT", F::R16_SINT),
    typeless(60, "R8_TYPELESS", F::R8_UINT),
    entry(61, "R8_UNORM", F::R8_UNORM),
    entry(62, "R8_UINT", F::R8_UINT),
    entry(63, "R8_SNORM", F::R8_SNORM),
    entry(64, "R8_SINT", F::R8_SINT),
    entry(65, "A8_UNORM", F::UNDEFINED),
    entry(66, "R1_UNORM", F::UNDEFINED),
    entry(67, "R9G9B9E5_SHAREDEXP", F::E5B9G9R9_UFLOAT_PACK32),
    entry(68, "R8G8_B8G8_UNORM", F::G8B8G8R8_422_UNORM),
    entry(69, "G8R8_G8B8_UNORM", F::B8G8R8G8_422_UNORM),
    typeless(70, "BC1_TYPELESS", F::BC1_RGBA_UNORM_BLOCK),
    entry(71, "BC1_UNORM", F::BC1_RGBA_UNORM_BLOCK),
    entry(72, "BC1_UNORM_SRGB", F::BC1_RGBA_SRGB_BLOCK),
    typeless(73, "BC2_TYPELESS", F::BC2_UNORM_BLOCK),
    entry(74, "BC2_UNORM", F::BC2_UNORM_BLOCK),
    entry(75, "BC2_UNORM_SRGB", F::BC2_SRGB_BLOCK),
    typeless(76, "BC3_TYPELESS", F::BC3_UNORM_BLOCK),
    entry(77, "BC3_UNORM", F::BC3_UNORM_BLOCK),
    entry(78, "BC3_UNORM_SRGB", F::BC3_SRGB_BLOCK),
    typeless(79, "BC4_TYPELESS", F::BC4_UNORM_BLOCK),
    entry(80, "BC4_UNORM", F::BC4_UNORM_BLOCK),
    entry(81, "BC4_SNORM", F::BC4_SNORM_BLOCK),
    typeless(82, "BC5_TYPELESS", F::BC5_UNORM_BLOCK),
    entry(83, "BC5_UNORM", F::BC5_UNORM_BLOCK),
    entry(84, "BC5_SNORM", F::BC5_SNORM_BLOCK),
    entry(85, "B5G6R5_UNORM", F::R5G6B5_UNORM_PACK16),
    entry(86, "B5G5R5A1_UNORM", F::A1R5G5B5_UNORM_PACK16),
    entry(87, "B8G8R8A8_UNORM", F::B8G8R8A8_UNORM),
    entry(88, "B8G8R8X8_UNORM", F::UNDEFINED),
    entry(89, "R10G10B10_XR_BIAS_A2_UNORM", F::UNDEFINED),
    typeless(90, "B8G8R8A8_TYPELESS", F::B8G8R8A8_UNORM),
    entry(91, "B8G8R8A8_UNORM_SRGB", F::B8G8R8A8_SRGB),
    typeless(92, "B8G8R8X8_TYPELESS", F::UNDEFINED),
    entry(93, "B8G8R8X8_UNORM_SRGB", F::UNDEFINED),
    typeless(94, "BC6H_TYPELESS", F::BC6H_UFLOAT_BLOCK),
    entry(95, "BC6H_UF16", F::BC6H_UFLOAT_BLOCK),
    entry(96, "BC6H_SF16", F::BC6H_SFLOAT_BLOCK),
    typeless(97, "BC7_TYPELESS", F::BC7_UNORM_BLOCK),
    entry(98, "BC7_UNORM", F::BC7_UNORM_BLOCK),
    entry(99, "BC7_UNORM_SRGB", F::BC7_SRGB_BLOCK),
    entry(100, "AYUV", F::R8G8B8A8_UNORM),
    entry(101, "Y410", F::A2B10G10R10_UNORM_PACK32),
    entry(102, "Y416", F::R16G16B16A16_UNORM),
    entry(103, "NV12", F::G8_B8R8_2PLANE_420_UNORM),
    entry(104, "P010", F::G10X6_B10X6R10X6_2PLANE_420_UNORM_3PACK16),
    entry(105, "P016", F::G16_B16R16_2PLANE_420_UNORM),
    entry(106, "420_OPAQUE", F::G8_B8R8_2PLANE_420_UNORM),
    entry(107, "YUY2", F::G8B8G8R8_422_UNORM),
    entry(108, "Y210", F::G10X6B10X6G10X6R10X6_422_UNORM_4PACK16),
    entry(109, "Y216", F::G16B16G16R16_422_UNORM),
    entry(110, "NV11", F::UNDEFINED),
    entry(111, "AI44", F::UNDEFINED),
    entry(112, "IA44", F::UNDEFINED),
    entry(113, "P8", F::UNDEFINED),
    entry(114, "A8P8", F::UNDEFINED),
    entry(115, "B4G4R4A4_UNORM", F::A4R4G4B4_UNORM_PACK16),
    entry(130, "P208", F::G8_B8R8_2PLANE_422_UNORM),
    entry(131, "V208", F::UNDEFINED),
    entry(132, "V408", F::R8G8B8A8_UNORM),
];

/// Look up the table row for a DXGI code.
pub fn dxgi_entry(code: u32) -> Option<&'static DxgiEntry> {
    DXGI_TABLE
        .binary_search_by_key(&code, |e| e.code)
        .ok()
        .map(|idx| &DXGI_TABLE[idx])
}

/// Map a DXGI code to its Vulkan equivalent.
///
/// Returns [`vk::Format::UNDEFINED`] for unknown codes and for codes with no
/// Vulkan counterpart.
pub fn dxgi_to_vk(code: u32) -> vk::Format {
    dxgi_entry(code).map_or(vk::Format::UNDEFINED, |e| e.format)
}

impl DxgiFormat {
    /// DXGI name, `"UNKNOWN"` for codes outside the table.
    pub fn name(self) -> &'static str {
        dxgi_entry(self.0).map_or("UNKNOWN", |e| e.name)
    }

    /// Whether this is a typeless code. Typeless textures are created with
    /// a mutable format so views can reinterpret them.
    pub fn is_typeless(self) -> bool {
        dxgi_entry(self.0).is_some_and(|e| e.typeless)
    }

    /// Vulkan equivalent, `UNDEFINED` if there is none.
    pub fn to_vk(self) -> vk::Format {
        dxgi_to_vk(self.0)
    }

    /// Vulkan equivalent, failing for codes without one.
    pub fn try_to_vk(self) -> Result<vk::Format> {
        match self.to_vk() {
            vk::Format::UNDEFINED => Err(Error::UnsupportedDxgiFormat {
                code: self.0,
                name: self.name(),
            }),
            format => Ok(format),
        }
    }
}

impl From<u32> for DxgiFormat {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_table_is_sorted() {
        assert!(DXGI_TABLE.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[rstest]
    #[case(2, vk::Format::R32G32B32A32_SFLOAT)]
    #[case(28, vk::Format::R8G8B8A8_UNORM)]
    #[case(29, vk::Format::R8G8B8A8_SRGB)]
    #[case(40, vk::Format::D32_SFLOAT)]
    #[case(55, vk::Format::D16_UNORM)]
    #[case(71, vk::Format::BC1_RGBA_UNORM_BLOCK)]
    #[case(87, vk::Format::B8G8R8A8_UNORM)]
    #[case(96, vk::Format::BC6H_SFLOAT_BLOCK)]
    #[case(99, vk::Format::BC7_SRGB_BLOCK)]
    #[case(103, vk::Format::G8_B8R8_2PLANE_420_UNORM)]
    #[case(115, vk::Format::A4R4G4B4_UNORM_PACK16)]
    fn test_direct_mappings(#[case] code: u32, #[case] expected: vk::Format) {
        assert_eq!(dxgi_to_vk(code), expected);
    }

    #[rstest]
    #[case(1, vk::Format::R32G32B32A32_UINT)]
    #[case(27, vk::Format::R8G8B8A8_UINT)]
    #[case(44, vk::Format::D24_UNORM_S8_UINT)]
    #[case(70, vk::Format::BC1_RGBA_UNORM_BLOCK)]
    #[case(82, vk::Format::BC5_UNORM_BLOCK)]
    #[case(94, vk::Format::BC6H_UFLOAT_BLOCK)]
    #[case(97, vk::Format::BC7_UNORM_BLOCK)]
    fn test_typeless_mappings(#[case] code: u32, #[case] expected: vk::Format) {
        let format = DxgiFormat(code);
        assert!(format.is_typeless());
        assert_eq!(format.to_vk(), expected);
    }

    #[rstest]
    #[case(20)]
    #[case(65)]
    #[case(88)]
    #[case(113)]
    #[case(131)]
    #[case(116)]
    #[case(9999)]
    fn test_unmapped_codes(#[case] code: u32) {
        assert_eq!(dxgi_to_vk(code), vk::Format::UNDEFINED);
        assert!(matches!(
            DxgiFormat(code).try_to_vk(),
            Err(Error::UnsupportedDxgiFormat { .. })
        ));
    }

    #[test]
    fn test_typeless_set() {
        let typeless: Vec<u32> = DXGI_TABLE
            .iter()
            .filter(|e| e.typeless)
            .map(|e| e.code)
            .collect();
        assert_eq!(
            typeless,
            [1, 5, 9, 15, 19, 21, 23, 27, 33, 39, 44, 46, 47, 48, 53, 60, 70, 73, 76, 79, 82, 90, 92, 94, 97]
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(DxgiFormat(71).name(), "BC1_UNORM");
        assert_eq!(DxgiFormat(500).name(), "UNKNOWN");
        assert!(!DxgiFormat(71).is_typeless());
    }
}
