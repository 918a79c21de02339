//! vkbench: bring up a Vulkan context and report the selected device
//!
//! Usage: `vkbench [config.toml|config.ron]`. Without an argument,
//! `vkbench.toml` in the working directory is used if it exists.

mod glfw_wsi;

use std::path::Path;
use thiserror::Error;
use vkbench_core::{
    BenchConfig, Config, ConfigError, ContextError, GraphicsContext, HeadlessWsi, WindowSystemInterface,
};

use glfw_wsi::GlfwWsi;

const DEFAULT_CONFIG_PATH: &str = "vkbench.toml";

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vulkan context bring-up failed
    #[error("Vulkan initialization failed: {0}")]
    Context(#[from] ContextError),

    /// The window system could not be set up
    #[error("Window system error: {0}")]
    Window(String),
}

fn load_config(path: Option<String>) -> Result<BenchConfig, ConfigError> {
    let config = match path {
        Some(path) => BenchConfig::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => BenchConfig::load_from_file(DEFAULT_CONFIG_PATH)?,
        None => BenchConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Pick the window system for `config`, opening a window into `window` if needed
///
/// The window lives in the caller's slot so it outlives any context created
/// against it.
fn select_wsi<'a>(
    config: &BenchConfig,
    window: &'a mut Option<GlfwWsi>,
) -> Result<&'a dyn WindowSystemInterface, AppError> {
    if config.headless {
        log::debug!("Bringing up headless context");
        return Ok(&HeadlessWsi);
    }
    let wsi: &'a dyn WindowSystemInterface = window.insert(GlfwWsi::new(&config.window)?);
    Ok(wsi)
}

fn run(config: &BenchConfig) -> Result<(), AppError> {
    let mut window = None;
    let wsi = select_wsi(config, &mut window)?;
    let context = GraphicsContext::new(wsi)?;

    log::info!("=======================================================");
    log::info!("    vkbench");
    log::info!("=======================================================");
    context.log_info();
    log::info!("=======================================================");

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(std::env::args().nth(1))?;
    vkbench_core::logging::init(config.level_filter()?);

    match run(&config) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("{e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_default_config_falls_back_to_defaults() {
        assert!(!Path::new(DEFAULT_CONFIG_PATH).exists());
        assert_eq!(load_config(None).unwrap(), BenchConfig::default());
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let result = load_config(Some("does-not-exist.toml".to_string()));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_headless_config_opens_no_window() {
        let config = BenchConfig {
            headless: true,
            ..BenchConfig::default()
        };
        let mut window = None;

        let wsi = select_wsi(&config, &mut window).unwrap();

        assert!(wsi.required_instance_extensions().is_empty());
        assert!(window.is_none());
    }

    #[test]
    fn test_context_errors_convert() {
        let error: AppError = ContextError::NoSuitableDevice.into();
        assert_eq!(
            error.to_string(),
            "Vulkan initialization failed: No suitable Vulkan physical devices found"
        );
    }
}
