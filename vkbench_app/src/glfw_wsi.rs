//! GLFW-backed window system
//!
//! GLFW knows which instance extensions the platform surface needs and can
//! answer per-queue-family presentation queries without a surface, which is
//! everything the context asks of a window system.

use ash::vk::{self, Handle};
use vkbench_core::{PhysicalDeviceRef, WindowConfig, WindowSystemInterface};

use crate::AppError;

/// GLFW window configured for Vulkan (no client API)
pub struct GlfwWsi {
    glfw: glfw::Glfw,
    _window: glfw::PWindow,
    _events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlfwWsi {
    /// Initialize GLFW and open the benchmark window
    pub fn new(config: &WindowConfig) -> Result<Self, AppError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| AppError::Window(format!("GLFW initialization failed: {e:?}")))?;

        if !glfw.vulkan_supported() {
            return Err(AppError::Window("GLFW reports no Vulkan loader".to_string()));
        }

        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| AppError::Window("Window creation failed".to_string()))?;

        Ok(Self {
            glfw,
            _window: window,
            _events: events,
        })
    }

    fn presenting_families(&self, device: PhysicalDeviceRef<'_>) -> Vec<u32> {
        let instance = device.instance().handle();
        let physical_device = device.handle();
        presenting_family_indices(&device.queue_families(), |family| {
            self.glfw
                .get_physical_device_presentation_support_raw(instance, physical_device, family)
        })
    }
}

/// Indices of the families in `families` for which `supports_presentation` holds
fn presenting_family_indices(
    families: &[vk::QueueFamilyProperties],
    mut supports_presentation: impl FnMut(u32) -> bool,
) -> Vec<u32> {
    families
        .iter()
        .enumerate()
        .filter_map(|(index, _)| u32::try_from(index).ok())
        .filter(|&family| supports_presentation(family))
        .collect()
}

impl WindowSystemInterface for GlfwWsi {
    fn required_instance_extensions(&self) -> Vec<String> {
        self.glfw.get_required_instance_extensions().unwrap_or_default()
    }

    fn is_device_supported(&self, device: PhysicalDeviceRef<'_>) -> bool {
        log::trace!(
            "GlfwWsi: querying presentation support on device 0x{:x}",
            device.handle().as_raw()
        );
        !self.presenting_families(device).is_empty()
    }

    fn presentation_queue_families(&self, device: PhysicalDeviceRef<'_>) -> Vec<u32> {
        self.presenting_families(device).into_iter().take(1).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn families(count: usize) -> Vec<vk::QueueFamilyProperties> {
        vec![vk::QueueFamilyProperties::default(); count]
    }

    #[test]
    fn test_presenting_family_indices_keeps_supported_indices_in_order() {
        let presenting = presenting_family_indices(&families(4), |family| family % 2 == 1);
        assert_eq!(presenting, vec![1, 3]);
    }

    #[test]
    fn test_presenting_family_indices_asks_once_per_family() {
        let mut asked = Vec::new();
        let presenting = presenting_family_indices(&families(3), |family| {
            asked.push(family);
            false
        });
        assert!(presenting.is_empty());
        assert_eq!(asked, vec![0, 1, 2]);
    }

    #[test]
    fn test_presenting_family_indices_without_families_is_empty() {
        let presenting = presenting_family_indices(&[], |_| true);
        assert!(presenting.is_empty());
    }
}
