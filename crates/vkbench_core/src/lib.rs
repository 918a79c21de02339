//! # vkbench core
//!
//! Vulkan context bring-up for the vkbench GPU benchmark.
//!
//! ## Features
//!
//! - **Context bring-up**: instance, physical device, logical device and
//!   command pool in one fallible call
//! - **Deterministic teardown**: every native handle is released exactly once,
//!   in reverse creation order, including on failure
//! - **Window system seam**: presentation requirements come from a
//!   [`WindowSystemInterface`] implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vkbench_core::{GraphicsContext, HeadlessWsi};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     vkbench_core::logging::init(vkbench_core::logging::LevelFilter::Info);
//!     let context = GraphicsContext::new(&HeadlessWsi)?;
//!     context.log_info();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod resource;
pub mod selection;
pub mod wsi;

pub use config::{BenchConfig, Config, ConfigError, WindowConfig};
pub use context::{GraphicsContext, APPLICATION_NAME};
pub use diagnostics::DeviceIdentity;
pub use error::{ContextError, ContextResult};
pub use resource::OwningResource;
pub use wsi::{HeadlessWsi, PhysicalDeviceRef, WindowSystemInterface};
