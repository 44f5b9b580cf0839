//! Error types for DDS texture loading.

use std::fmt;

use ash::vk;
use thiserror::Error;

/// Errors that can occur while loading a DDS texture.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The buffer is shorter than magic plus header.
    #[error("buffer too short for a DDS header: {0} bytes")]
    TooShort(usize),

    /// The buffer is larger than a DDS file may be (4 GiB).
    #[error("buffer too large for a DDS file: {0} bytes")]
    TooLarge(usize),

    /// The first four bytes are not `"DDS "`.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    BadMagic([u8; 4]),

    /// The header's self-declared size is not 124.
    #[error("invalid DDS header size {0}")]
    BadHeaderSize(u32),

    /// The pixel format block's self-declared size is not 32.
    #[error("invalid DDS pixel format size {0}")]
    BadPixelFormatSize(u32),

    /// The `DX10` code is present but the extended header is cut off.
    #[error("DX10 extended header truncated: {0} bytes available")]
    TruncatedExtendedHeader(usize),

    /// The header is well-formed but describes something invalid.
    #[error("invalid texture data: {0}")]
    InvalidData(&'static str),

    /// The payload ends before the last required subresource.
    #[error("unexpected end of file: subresource at offset {offset} needs {needed} bytes, {available} available")]
    UnexpectedEndOfFile {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A size computation does not fit the native size type.
    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),

    /// The pixel format has no Vulkan equivalent.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The combination of dimension, array size and mips is not supported.
    #[error("unsupported layout: {0}")]
    UnsupportedLayout(&'static str),

    /// Every subresource was skipped.
    #[error("no usable subresources")]
    NoUsableSubresources,

    /// A dimension or layer count exceeds the device limits.
    #[error("{what} {value} exceeds device limit {limit}")]
    BelowLimits {
        what: &'static str,
        value: u32,
        limit: u32,
    },

    /// Image creation ran out of host memory.
    #[error("out of host memory")]
    OutOfHostMemory,

    /// Image creation ran out of device memory.
    #[error("out of device memory")]
    OutOfDeviceMemory,

    /// No image factory was configured on the loader.
    #[error("no image factory configured")]
    NoImageFactory,

    /// Image creation failed with any other result.
    #[error("image creation failed: {0}")]
    CreationFailed(vk::Result),

    /// An argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl From<ddsvk_format::Error> for Error {
    fn from(err: ddsvk_format::Error) -> Self {
        match err {
            ddsvk_format::Error::ArithmeticOverflow(what) => Self::ArithmeticOverflow(what),
            other => Self::UnsupportedFormat(other.to_string()),
        }
    }
}

/// Result type for DDS loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse result code, numerically compatible with the historical loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ResultCode {
    Success = 0,
    Fail = 1,
    BadPointer = 2,
    InvalidArg = 3,
    InvalidData = 4,
    UnexpectedEof = 5,
    UnsupportedFormat = 6,
    UnsupportedLayout = 7,
    BelowLimits = 8,
    NoHostMemory = 9,
    NoDeviceMemory = 10,
    NoFunction = 11,
    ArithmeticOverflow = 12,
}

impl ResultCode {
    /// Every code, in numeric order.
    pub const ALL: [ResultCode; 13] = [
        Self::Success,
        Self::Fail,
        Self::BadPointer,
        Self::InvalidArg,
        Self::InvalidData,
        Self::UnexpectedEof,
        Self::UnsupportedFormat,
        Self::UnsupportedLayout,
        Self::BelowLimits,
        Self::NoHostMemory,
        Self::NoDeviceMemory,
        Self::NoFunction,
        Self::ArithmeticOverflow,
    ];

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "The operation completed successfully",
            Self::Fail => "The operation failed",
            Self::BadPointer => "A null pointer was passed",
            Self::InvalidArg => "An invalid argument was passed",
            Self::InvalidData => "The file contains invalid data",
            Self::UnexpectedEof => "Unexpected end of file",
            Self::UnsupportedFormat => "The pixel format is not supported",
            Self::UnsupportedLayout => "The texture layout is not supported",
            Self::BelowLimits => "The texture exceeds the device limits",
            Self::NoHostMemory => "Out of host memory",
            Self::NoDeviceMemory => "Out of device memory",
            Self::NoFunction => "No image creation function available",
            Self::ArithmeticOverflow => "An arithmetic overflow occurred",
        }
    }

    /// Collapse a result to its code.
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => err.code(),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Pipeline stage at which a load failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStage {
    HeaderValidation,
    FormatResolution,
    SubresourceEnumeration,
    ResourceCreation,
}

impl Error {
    /// Coarse result code for this error.
    pub fn code(&self) -> ResultCode {
        match self {
            // Header validation failures all collapse to a generic failure.
            Self::Io(_)
            | Self::TooShort(_)
            | Self::TooLarge(_)
            | Self::BadMagic(_)
            | Self::BadHeaderSize(_)
            | Self::BadPixelFormatSize(_)
            | Self::TruncatedExtendedHeader(_)
            | Self::NoUsableSubresources
            | Self::CreationFailed(_) => ResultCode::Fail,
            Self::UnexpectedEndOfFile { .. } => ResultCode::UnexpectedEof,
            Self::InvalidData(_) => ResultCode::InvalidData,
            Self::ArithmeticOverflow(_) => ResultCode::ArithmeticOverflow,
            Self::UnsupportedFormat(_) => ResultCode::UnsupportedFormat,
            Self::UnsupportedLayout(_) => ResultCode::UnsupportedLayout,
            Self::BelowLimits { .. } => ResultCode::BelowLimits,
            Self::OutOfHostMemory => ResultCode::NoHostMemory,
            Self::OutOfDeviceMemory => ResultCode::NoDeviceMemory,
            Self::NoImageFactory => ResultCode::NoFunction,
            Self::InvalidArgument(_) => ResultCode::InvalidArg,
        }
    }

    /// Pipeline stage this error is raised in.
    pub fn stage(&self) -> LoadStage {
        match self {
            Self::Io(_)
            | Self::TooShort(_)
            | Self::TooLarge(_)
            | Self::BadMagic(_)
            | Self::BadHeaderSize(_)
            | Self::BadPixelFormatSize(_)
            | Self::TruncatedExtendedHeader(_) => LoadStage::HeaderValidation,
            Self::InvalidData(_) | Self::UnsupportedFormat(_) | Self::UnsupportedLayout(_) => {
                LoadStage::FormatResolution
            }
            Self::UnexpectedEndOfFile { .. } | Self::ArithmeticOverflow(_) | Self::NoUsableSubresources => {
                LoadStage::SubresourceEnumeration
            }
            Self::BelowLimits { .. }
            | Self::OutOfHostMemory
            | Self::OutOfDeviceMemory
            | Self::NoImageFactory
            | Self::CreationFailed(_)
            | Self::InvalidArgument(_) => LoadStage::ResourceCreation,
        }
    }

    /// Map a Vulkan result from image creation.
    pub(crate) fn from_vk(result: vk::Result) -> Self {
        match result {
            vk::Result::ERROR_OUT_OF_HOST_MEMORY => Self::OutOfHostMemory,
            vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => Self::OutOfDeviceMemory,
            other => Self::CreationFailed(other),
        }
    }
}
