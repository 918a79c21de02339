//! Window system integration seam
//!
//! The context does not know how frames reach the screen. Whatever does
//! (an X11/Wayland window, GLFW, or nothing at all) implements
//! [`WindowSystemInterface`] and is consulted during bring-up for instance
//! extensions, per-device presentation support and presentation queue families.

use crate::diagnostics::DeviceIdentity;
use ash::vk;

/// Non-owned view of a physical device
///
/// Physical devices are never destroyed, and every query against them goes
/// through the instance dispatch table, so the two travel together.
#[derive(Clone, Copy)]
pub struct PhysicalDeviceRef<'a> {
    instance: &'a ash::Instance,
    handle: vk::PhysicalDevice,
}

impl<'a> PhysicalDeviceRef<'a> {
    /// Pair a raw physical device handle with the instance it was enumerated from
    pub const fn new(instance: &'a ash::Instance, handle: vk::PhysicalDevice) -> Self {
        Self { instance, handle }
    }

    /// The raw handle
    pub const fn handle(&self) -> vk::PhysicalDevice {
        self.handle
    }

    /// The instance this device was enumerated from
    pub const fn instance(&self) -> &'a ash::Instance {
        self.instance
    }

    /// Device properties, queried fresh on every call
    pub fn properties(&self) -> vk::PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(self.handle) }
    }

    /// Queue family properties in index order
    pub fn queue_families(&self) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(self.handle)
        }
    }

    /// Identification fields for diagnostics
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::from_properties(&self.properties())
    }
}

impl std::fmt::Debug for PhysicalDeviceRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PhysicalDeviceRef").field(&self.handle).finish()
    }
}

/// Presentation requirements supplied by the windowing layer
pub trait WindowSystemInterface {
    /// Instance extensions the window system needs to present
    ///
    /// `VK_KHR_surface` is always added by the context and need not be listed.
    fn required_instance_extensions(&self) -> Vec<String>;

    /// Whether frames rendered on `device` can be presented
    fn is_device_supported(&self, device: PhysicalDeviceRef<'_>) -> bool;

    /// Queue family indices needed for presentation on `device`, in order
    ///
    /// May be empty when presentation needs no dedicated queue.
    fn presentation_queue_families(&self, device: PhysicalDeviceRef<'_>) -> Vec<u32>;
}

/// Window system for offscreen runs
///
/// Needs no extensions, accepts every device and asks for no presentation
/// queues, so the context ends up with the graphics queue family only.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessWsi;

impl WindowSystemInterface for HeadlessWsi {
    fn required_instance_extensions(&self) -> Vec<String> {
        Vec::new()
    }

    fn is_device_supported(&self, _device: PhysicalDeviceRef<'_>) -> bool {
        true
    }

    fn presentation_queue_families(&self, _device: PhysicalDeviceRef<'_>) -> Vec<u32> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_requires_no_extensions() {
        assert!(HeadlessWsi.required_instance_extensions().is_empty());
    }

    #[test]
    fn test_wsi_is_object_safe() {
        let wsi: Box<dyn WindowSystemInterface> = Box::new(HeadlessWsi);
        assert!(wsi.required_instance_extensions().is_empty());
    }
}
