//! Vulkan context bring-up
//!
//! [`GraphicsContext::new`] runs four stages, each consuming the previous one:
//!
//! 1. instance, with the window system's extensions plus `VK_KHR_surface`
//! 2. physical device and graphics queue family (see [`crate::selection`])
//! 3. logical device with one queue per required family
//! 4. command pool on the graphics family
//!
//! Every owned handle lives in an [`OwningResource`], so a failure at any stage
//! tears down what the earlier stages created before the error reaches the
//! caller, and a finished context tears down in reverse creation order.

use ash::extensions::khr::{Surface, Swapchain};
use ash::{vk, Device, Entry, Instance};
use std::ffi::CString;
use std::os::raw::c_char;

use crate::diagnostics::DeviceIdentity;
use crate::error::{ContextError, ContextResult};
use crate::resource::OwningResource;
use crate::selection::{merge_queue_families, queue_create_infos, select_device};
use crate::wsi::{PhysicalDeviceRef, WindowSystemInterface};

/// Application name reported to the driver
pub const APPLICATION_NAME: &str = "vkmark";

/// Instance, device, graphics queue and command pool for one GPU
///
/// Construction is all-or-nothing. Drop order is command pool, device,
/// instance, loader.
pub struct GraphicsContext {
    command_pool: OwningResource<vk::CommandPool>,
    device: OwningResource<Device>,
    instance: OwningResource<Instance>,
    entry: Entry,
    physical_device: vk::PhysicalDevice,
    graphics_queue_family_index: u32,
    graphics_queue: vk::Queue,
    queue_family_indices: Vec<u32>,
}

impl GraphicsContext {
    /// Bring up a context for the given window system
    pub fn new(wsi: &dyn WindowSystemInterface) -> ContextResult<Self> {
        let entry = unsafe { Entry::load()? };
        Self::with_entry(entry, wsi)
    }

    /// Bring up a context using an already loaded Vulkan entry
    ///
    /// The stages fill in an otherwise empty context; if one fails, dropping
    /// the partial context releases whatever the earlier stages created.
    pub fn with_entry(entry: Entry, wsi: &dyn WindowSystemInterface) -> ContextResult<Self> {
        let mut context = Self {
            command_pool: OwningResource::empty(),
            device: OwningResource::empty(),
            instance: OwningResource::empty(),
            entry,
            physical_device: vk::PhysicalDevice::null(),
            graphics_queue_family_index: 0,
            graphics_queue: vk::Queue::null(),
            queue_family_indices: Vec::new(),
        };

        context.create_instance(wsi)?;
        context.choose_physical_device(wsi)?;
        context.create_device(wsi)?;
        context.create_command_pool()?;

        Ok(context)
    }

    fn create_instance(&mut self, wsi: &dyn WindowSystemInterface) -> ContextResult<()> {
        let app_name = CString::new(APPLICATION_NAME)?;
        let app_info = vk::ApplicationInfo::builder().application_name(&app_name);

        let mut extension_names = wsi
            .required_instance_extensions()
            .into_iter()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()?;
        extension_names.push(Surface::name().to_owned());

        let extension_ptrs: Vec<*const c_char> =
            extension_names.iter().map(|name| name.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs);

        let instance = unsafe {
            self.entry
                .create_instance(&create_info, None)
                .map_err(ContextError::native("vkCreateInstance"))?
        };

        self.instance.replace(instance, |instance: &mut Instance| unsafe {
            instance.destroy_instance(None);
        });
        Ok(())
    }

    fn choose_physical_device(&mut self, wsi: &dyn WindowSystemInterface) -> ContextResult<()> {
        let instance = self.instance();
        let physical_devices = unsafe {
            instance
                .enumerate_physical_devices()
                .map_err(ContextError::native("vkEnumeratePhysicalDevices"))?
        };

        let (physical_device, graphics_queue_family_index) = select_device(
            physical_devices,
            |&pd| wsi.is_device_supported(PhysicalDeviceRef::new(instance, pd)),
            |&pd| PhysicalDeviceRef::new(instance, pd).queue_families(),
        )
        .ok_or(ContextError::NoSuitableDevice)?;

        self.physical_device = physical_device;
        self.graphics_queue_family_index = graphics_queue_family_index;
        Ok(())
    }

    fn create_device(&mut self, wsi: &dyn WindowSystemInterface) -> ContextResult<()> {
        let graphics_family = self.graphics_queue_family_index;

        let presentation = wsi.presentation_queue_families(self.physical_device_ref());
        if let Some(family) = presentation.first() {
            log::debug!("GraphicsContext: Using queue family index {family} for WSI operations");
        }

        let queue_family_indices = merge_queue_families(&presentation, graphics_family);
        let queue_infos = queue_create_infos(&queue_family_indices);

        log::debug!("GraphicsContext: Using queue family index {graphics_family} for rendering");

        let enabled_extensions = [Swapchain::name().as_ptr()];
        let device_features = vk::PhysicalDeviceFeatures::builder()
            .sampler_anisotropy(true)
            .build();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&enabled_extensions)
            .enabled_features(&device_features);

        let device = unsafe {
            self.instance()
                .create_device(self.physical_device, &create_info, None)
                .map_err(ContextError::native("vkCreateDevice"))?
        };

        self.graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };
        self.queue_family_indices = queue_family_indices;
        self.device.replace(device, |device: &mut Device| unsafe {
            let _ = device.device_wait_idle();
            device.destroy_device(None);
        });
        Ok(())
    }

    fn create_command_pool(&mut self) -> ContextResult<()> {
        let create_info = vk::CommandPoolCreateInfo::builder()
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
            .queue_family_index(self.graphics_queue_family_index);

        let device = self.device().clone();
        let command_pool = unsafe {
            device
                .create_command_pool(&create_info, None)
                .map_err(ContextError::native("vkCreateCommandPool"))?
        };

        self.command_pool.replace(command_pool, move |pool: &mut vk::CommandPool| unsafe {
            device.destroy_command_pool(*pool, None);
        });
        Ok(())
    }

    /// Write the selected device report at info level
    pub fn log_info(&self) {
        self.device_identity().log();
    }

    /// Identification fields of the selected device
    pub fn device_identity(&self) -> DeviceIdentity {
        self.physical_device_ref().identity()
    }

    /// The Vulkan loader entry
    pub const fn entry(&self) -> &Entry {
        &self.entry
    }

    /// The Vulkan instance
    pub fn instance(&self) -> &Instance {
        self.instance
            .get()
            .expect("instance is owned for the whole context lifetime")
    }

    /// The selected physical device
    pub const fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// The selected physical device together with its instance
    pub fn physical_device_ref(&self) -> PhysicalDeviceRef<'_> {
        PhysicalDeviceRef::new(self.instance(), self.physical_device)
    }

    /// The logical device
    pub fn device(&self) -> &Device {
        self.device
            .get()
            .expect("device is owned for the whole context lifetime")
    }

    /// Queue 0 of the graphics queue family
    pub const fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Index of the queue family used for rendering
    pub const fn graphics_queue_family_index(&self) -> u32 {
        self.graphics_queue_family_index
    }

    /// Every queue family the device was created with, one queue each
    pub fn queue_family_indices(&self) -> &[u32] {
        &self.queue_family_indices
    }

    /// Command pool on the graphics family; buffers can be reset individually
    pub fn command_pool(&self) -> vk::CommandPool {
        self.command_pool
            .get()
            .copied()
            .unwrap_or_else(vk::CommandPool::null)
    }
}

impl Drop for GraphicsContext {
    fn drop(&mut self) {
        self.command_pool.reset();
        self.device.reset();
        self.instance.reset();
    }
}

impl std::fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("physical_device", &self.physical_device)
            .field("graphics_queue_family_index", &self.graphics_queue_family_index)
            .field("queue_family_indices", &self.queue_family_indices)
            .finish_non_exhaustive()
    }
}
