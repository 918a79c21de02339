//! Physical device and queue family selection
//!
//! These are the decision rules of context bring-up, kept free of any Vulkan
//! calls so they can be exercised without a driver:
//!
//! - **Device**: first candidate in enumeration order that the window system
//!   supports *and* that has a usable graphics queue family. No scoring.
//! - **Queue family**: lowest index with a nonzero queue count and the
//!   `GRAPHICS` bit.
//! - **Device queues**: the window system's presentation families, plus the
//!   graphics family if it is not already among them, without duplicates.

use ash::vk;

/// Priority given to every queue the context creates
pub static QUEUE_PRIORITIES: [f32; 1] = [1.0];

/// Index of the first queue family able to run graphics work
pub fn graphics_queue_family(families: &[vk::QueueFamilyProperties]) -> Option<u32> {
    families
        .iter()
        .position(|family| {
            family.queue_count > 0 && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
        })
        .and_then(|index| u32::try_from(index).ok())
}

/// Pick the first supported candidate exposing a graphics queue family
///
/// `is_supported` is consulted once per candidate, and `queue_families` only
/// for candidates that passed it. Returns the candidate together with its
/// graphics queue family index.
pub fn select_device<D, S, Q>(
    candidates: impl IntoIterator<Item = D>,
    mut is_supported: S,
    mut queue_families: Q,
) -> Option<(D, u32)>
where
    S: FnMut(&D) -> bool,
    Q: FnMut(&D) -> Vec<vk::QueueFamilyProperties>,
{
    candidates.into_iter().find_map(|candidate| {
        if !is_supported(&candidate) {
            return None;
        }
        let family = graphics_queue_family(&queue_families(&candidate))?;
        Some((candidate, family))
    })
}

/// Queue families to instantiate on the logical device
///
/// Keeps the window system's order and appends `graphics_family` when absent.
/// Repeated entries in `presentation` are dropped.
pub fn merge_queue_families(presentation: &[u32], graphics_family: u32) -> Vec<u32> {
    let mut families = Vec::with_capacity(presentation.len() + 1);
    for &family in presentation.iter().chain(std::iter::once(&graphics_family)) {
        if !families.contains(&family) {
            families.push(family);
        }
    }
    families
}

/// One single-queue create info per family, all at priority 1.0
pub fn queue_create_infos(families: &[u32]) -> Vec<vk::DeviceQueueCreateInfo> {
    families
        .iter()
        .map(|&family| {
            vk::DeviceQueueCreateInfo::builder()
                .queue_family_index(family)
                .queue_priorities(&QUEUE_PRIORITIES)
                .build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(flags: vk::QueueFlags, queue_count: u32) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count,
            ..Default::default()
        }
    }

    struct FakeDevice {
        name: &'static str,
        supported: bool,
        families: Vec<vk::QueueFamilyProperties>,
    }

    fn pick(devices: &[FakeDevice]) -> Option<(&'static str, u32)> {
        select_device(devices.iter(), |d| d.supported, |d| d.families.clone())
            .map(|(d, index)| (d.name, index))
    }

    #[test]
    fn test_graphics_family_lowest_index_wins() {
        let families = [
            family(vk::QueueFlags::TRANSFER, 2),
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, 1),
            family(vk::QueueFlags::GRAPHICS, 4),
        ];
        assert_eq!(graphics_queue_family(&families), Some(1));
    }

    #[test]
    fn test_graphics_family_requires_queues() {
        let families = [
            family(vk::QueueFlags::GRAPHICS, 0),
            family(vk::QueueFlags::COMPUTE, 1),
            family(vk::QueueFlags::GRAPHICS, 1),
        ];
        assert_eq!(graphics_queue_family(&families), Some(2));
        assert_eq!(graphics_queue_family(&families[..2]), None);
        assert_eq!(graphics_queue_family(&[]), None);
    }

    #[test]
    fn test_unsupported_device_skipped() {
        let devices = [
            FakeDevice {
                name: "A",
                supported: false,
                families: vec![family(vk::QueueFlags::GRAPHICS, 1)],
            },
            FakeDevice {
                name: "B",
                supported: true,
                families: vec![
                    family(vk::QueueFlags::COMPUTE, 1),
                    family(vk::QueueFlags::TRANSFER, 1),
                    family(vk::QueueFlags::GRAPHICS, 1),
                ],
            },
        ];
        assert_eq!(pick(&devices), Some(("B", 2)));
    }

    #[test]
    fn test_first_qualifying_device_wins() {
        let devices = [
            FakeDevice {
                name: "integrated",
                supported: true,
                families: vec![family(vk::QueueFlags::GRAPHICS, 1)],
            },
            FakeDevice {
                name: "discrete",
                supported: true,
                families: vec![family(vk::QueueFlags::GRAPHICS, 16)],
            },
        ];
        assert_eq!(pick(&devices), Some(("integrated", 0)));
    }

    #[test]
    fn test_supported_device_without_graphics_skipped() {
        let devices = [
            FakeDevice {
                name: "compute-only",
                supported: true,
                families: vec![family(vk::QueueFlags::COMPUTE, 8)],
            },
            FakeDevice {
                name: "gpu",
                supported: true,
                families: vec![family(vk::QueueFlags::GRAPHICS, 1)],
            },
        ];
        assert_eq!(pick(&devices), Some(("gpu", 0)));
    }

    #[test]
    fn test_no_presentation_support_selects_nothing() {
        let devices = [
            FakeDevice {
                name: "A",
                supported: false,
                families: vec![family(vk::QueueFlags::GRAPHICS, 1)],
            },
            FakeDevice {
                name: "B",
                supported: false,
                families: vec![family(vk::QueueFlags::GRAPHICS, 1)],
            },
        ];
        assert_eq!(pick(&devices), None);
        assert_eq!(pick(&[]), None);
    }

    #[test]
    fn test_queries_stop_after_selection() {
        let mut support_queries = Vec::new();
        let mut family_queries = Vec::new();

        let selected = select_device(
            0..5_u32,
            |&d| {
                support_queries.push(d);
                d != 0
            },
            |&d| {
                family_queries.push(d);
                if d == 1 {
                    vec![family(vk::QueueFlags::TRANSFER, 1)]
                } else {
                    vec![family(vk::QueueFlags::GRAPHICS, 1)]
                }
            },
        );

        assert_eq!(selected, Some((2, 0)));
        assert_eq!(support_queries, vec![0, 1, 2]);
        assert_eq!(family_queries, vec![1, 2]);
    }

    #[test]
    fn test_merge_appends_missing_graphics_family() {
        assert_eq!(merge_queue_families(&[1], 2), vec![1, 2]);
    }

    #[test]
    fn test_merge_shared_family_appears_once() {
        assert_eq!(merge_queue_families(&[2], 2), vec![2]);
    }

    #[test]
    fn test_merge_empty_presentation_list() {
        assert_eq!(merge_queue_families(&[], 3), vec![3]);
    }

    #[test]
    fn test_merge_never_duplicates() {
        let presentation_lists: [&[u32]; 5] = [&[0, 1], &[1, 0], &[2, 2], &[0, 2, 1], &[3, 0, 3]];
        for presentation in presentation_lists {
            for graphics in 0..4 {
                let merged = merge_queue_families(presentation, graphics);
                let mut deduped = merged.clone();
                deduped.sort_unstable();
                deduped.dedup();
                assert_eq!(deduped.len(), merged.len(), "{presentation:?} + {graphics}");
                assert!(merged.contains(&graphics));
                assert!(presentation.iter().all(|f| merged.contains(f)));
            }
        }
    }

    #[test]
    fn test_queue_create_infos_one_queue_per_family() {
        let infos = queue_create_infos(&merge_queue_families(&[1], 2));
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].queue_family_index, 1);
        assert_eq!(infos[1].queue_family_index, 2);
        for info in &infos {
            assert_eq!(info.queue_count, 1);
            assert_eq!(info.p_queue_priorities, QUEUE_PRIORITIES.as_ptr());
        }

        let shared = queue_create_infos(&merge_queue_families(&[2], 2));
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].queue_family_index, 2);
    }
}
