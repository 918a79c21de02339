//! Context bring-up errors

use ash::vk;
use std::ffi::NulError;
use thiserror::Error;

/// Failures that abort [`GraphicsContext`](crate::GraphicsContext) construction
///
/// Every variant is fatal: no partially constructed context is ever returned.
#[derive(Error, Debug)]
pub enum ContextError {
    /// No physical device supports presentation and exposes a graphics queue family
    #[error("No suitable Vulkan physical devices found")]
    NoSuitableDevice,

    /// A Vulkan API call failed
    #[error("{operation} failed: {result:?}")]
    NativeApi {
        /// The Vulkan entry point that failed
        operation: &'static str,
        /// The result code it returned
        result: vk::Result,
    },

    /// The Vulkan loader library could not be loaded
    #[error("Failed to load Vulkan: {0}")]
    Loader(#[from] ash::LoadingError),

    /// An instance extension name contained an interior NUL byte
    #[error("Invalid extension name: {0}")]
    InvalidExtensionName(#[from] NulError),
}

impl ContextError {
    /// Adapter for `map_err` on raw `VkResult`s
    pub(crate) fn native(operation: &'static str) -> impl Fn(vk::Result) -> Self {
        move |result| Self::NativeApi { operation, result }
    }
}

/// Result type for context bring-up
pub type ContextResult<T> = Result<T, ContextError>;
