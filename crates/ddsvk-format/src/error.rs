//! Error types for format mapping and layout computation.

use ash::vk;
use thiserror::Error;

/// Errors that can occur when resolving a format or computing a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The DXGI code has no Vulkan equivalent (or is not a DXGI code at all).
    #[error("unsupported DXGI format {code} ({name})")]
    UnsupportedDxgiFormat { code: u32, name: &'static str },

    /// No legacy table entry matches the pixel format block.
    #[error("unsupported legacy pixel format (flags {flags:#x}, fourcc {four_cc:#010x}, {bit_count} bits)")]
    UnsupportedLegacyFormat {
        flags: u32,
        four_cc: u32,
        bit_count: u32,
    },

    /// The Vulkan format has no known bit rate.
    #[error("format {0:?} has no known layout")]
    UnsupportedFormat(vk::Format),

    /// Plane index out of range for the format.
    #[error("format {format:?} has no plane {plane}")]
    InvalidPlane { format: vk::Format, plane: u32 },

    /// A size computation does not fit the native size type.
    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),
}

/// Result type for format operations.
pub type Result<T> = std::result::Result<T, Error>;
