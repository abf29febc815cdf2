use igptemp_raw::chipset::{ChipsetFamily, INTEL_VENDOR_ID, SUPPORTED_DEVICE_IDS};
use igptemp_raw::mchbar;

use crate::common::mmio::WindowDescriptor;
use crate::common::pci::DeviceEnumerator;
use crate::error::{IgpTempError, Result};

/// Identity of the located chipset, fixed for the instance lifetime.
#[derive(Debug, Clone, Copy)]
pub struct ChipsetIdentity {
    pub device_id: u16,
    pub family: ChipsetFamily,
}

/// Find the first supported GMCH and derive its register window.
///
/// Candidate ids are tried strictly in [`SUPPORTED_DEVICE_IDS`] order and
/// the first present device wins; there is no ranking and no fallback
/// probing. The MCHBAR window is enabled if firmware left it disabled.
pub fn locate(pci: &dyn DeviceEnumerator) -> Result<(ChipsetIdentity, WindowDescriptor)> {
    for &device_id in &SUPPORTED_DEVICE_IDS {
        let family = match ChipsetFamily::of(device_id) {
            Ok(family) => family,
            Err(_) => continue,
        };

        let Some(config) = pci.probe(INTEL_VENDOR_ID, device_id)? else {
            tracing::debug!("no device with id {:#06x}", device_id);
            continue;
        };

        let low = config.read_u32(mchbar::MCHBAR_OFFSET).map_err(|e| {
            IgpTempError::ConfigReadFailed(format!("MCHBAR low dword of {device_id:#06x}: {e}"))
        })?;

        if low & mchbar::MCHBAR_ENABLE == 0 {
            // Firmware normally leaves the window enabled; set the bit
            // and carry on even if the write does not stick.
            if let Err(e) = config.write_u32(mchbar::MCHBAR_OFFSET, low | mchbar::MCHBAR_ENABLE) {
                tracing::warn!("failed to enable MCHBAR window: {}", e);
            }
        }

        let high = config.read_u32(mchbar::MCHBAR_OFFSET + 4).map_err(|e| {
            IgpTempError::ConfigReadFailed(format!("MCHBAR high dword of {device_id:#06x}: {e}"))
        })?;

        let descriptor = WindowDescriptor {
            base: mchbar::window_base(low, high),
            len: mchbar::WINDOW_LEN,
        };

        tracing::info!(
            "found GMCH {:#06x} ({:?}), register window at {:#x}",
            device_id,
            family,
            descriptor.base
        );

        return Ok((ChipsetIdentity { device_id, family }, descriptor));
    }

    Err(IgpTempError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::pci::ConfigSpace;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeConfigState {
        regs: HashMap<u64, u32>,
        writes: Vec<(u64, u32)>,
        fail_reads: bool,
    }

    #[derive(Clone, Default)]
    struct FakeConfig {
        state: Arc<Mutex<FakeConfigState>>,
    }

    impl FakeConfig {
        fn with_mchbar(low: u32, high: u32) -> Self {
            let config = Self::default();
            {
                let mut state = config.state.lock();
                state.regs.insert(mchbar::MCHBAR_OFFSET, low);
                state.regs.insert(mchbar::MCHBAR_OFFSET + 4, high);
            }
            config
        }

        fn failing() -> Self {
            let config = Self::default();
            config.state.lock().fail_reads = true;
            config
        }

        fn writes(&self) -> Vec<(u64, u32)> {
            self.state.lock().writes.clone()
        }
    }

    impl ConfigSpace for FakeConfig {
        fn read_u32(&self, offset: u64) -> Result<u32> {
            let state = self.state.lock();
            if state.fail_reads {
                return Err(IgpTempError::PciError("read refused".into()));
            }
            Ok(state.regs.get(&offset).copied().unwrap_or(0))
        }

        fn write_u32(&self, offset: u64, value: u32) -> Result<()> {
            let mut state = self.state.lock();
            state.writes.push((offset, value));
            state.regs.insert(offset, value);
            Ok(())
        }
    }

    struct FakeBus {
        devices: HashMap<u16, FakeConfig>,
    }

    impl FakeBus {
        fn new(devices: Vec<(u16, FakeConfig)>) -> Self {
            Self {
                devices: devices.into_iter().collect(),
            }
        }
    }

    impl DeviceEnumerator for FakeBus {
        fn probe(&self, vendor: u16, device: u16) -> Result<Option<Box<dyn ConfigSpace>>> {
            assert_eq!(vendor, INTEL_VENDOR_ID);
            Ok(self
                .devices
                .get(&device)
                .map(|config| Box::new(config.clone()) as Box<dyn ConfigSpace>))
        }
    }

    #[test]
    fn takes_first_candidate_in_list_order() {
        // Both a mobile and a desktop part present: the mobile id comes
        // first in the candidate list and must win.
        let bus = FakeBus::new(vec![
            (0x2E20, FakeConfig::with_mchbar(0xFED1_4001, 0)),
            (0x2A00, FakeConfig::with_mchbar(0xFED1_8001, 0)),
        ]);

        let (identity, _) = locate(&bus).unwrap();
        assert_eq!(identity.device_id, 0x2A00);
        assert_eq!(identity.family, ChipsetFamily::Mobile);
    }

    #[test]
    fn candidate_order_applies_within_desktop_parts_too() {
        let bus = FakeBus::new(vec![
            (0x2E20, FakeConfig::with_mchbar(0xFED1_4001, 0)),
            (0x29B0, FakeConfig::with_mchbar(0xFED1_8001, 0)),
        ]);

        let (identity, _) = locate(&bus).unwrap();
        assert_eq!(identity.device_id, 0x29B0);
        assert_eq!(identity.family, ChipsetFamily::Desktop);
    }

    #[test]
    fn no_candidate_present_is_not_found() {
        let bus = FakeBus::new(vec![]);
        assert!(matches!(locate(&bus), Err(IgpTempError::NotFound)));
    }

    #[test]
    fn config_read_failure_aborts_discovery() {
        let bus = FakeBus::new(vec![(0x2A40, FakeConfig::failing())]);
        assert!(matches!(
            locate(&bus),
            Err(IgpTempError::ConfigReadFailed(_))
        ));
    }

    #[test]
    fn assembles_and_masks_the_window_base() {
        let bus = FakeBus::new(vec![(0x2A40, FakeConfig::with_mchbar(0x0000_0001, 0x0000_0002))]);

        let (_, descriptor) = locate(&bus).unwrap();
        assert_eq!(descriptor.base, 0x2_0000_0000);
        assert_eq!(descriptor.len, 16384);
    }

    #[test]
    fn enables_a_disabled_window() {
        let config = FakeConfig::with_mchbar(0xFED1_4000, 0);
        let bus = FakeBus::new(vec![(0x2A40, config.clone())]);

        locate(&bus).unwrap();
        assert_eq!(
            config.writes(),
            vec![(mchbar::MCHBAR_OFFSET, 0xFED1_4001)]
        );
    }

    #[test]
    fn leaves_an_enabled_window_alone() {
        let config = FakeConfig::with_mchbar(0xFED1_4001, 0);
        let bus = FakeBus::new(vec![(0x2A40, config.clone())]);

        locate(&bus).unwrap();
        assert!(config.writes().is_empty());
    }
}
