pub mod hwmon;
pub mod locator;
pub mod monitor;

pub use hwmon::{SensorEndpoint, DRIVER_NAME};
pub use locator::{locate, ChipsetIdentity};
pub use monitor::ThermalMonitor;

use igptemp_raw::decode::MobileDecode;

use crate::common::delay::{Delay, SleepDelay};
use crate::common::mmio::{MmioWindow, Registers};
use crate::common::pci::DeviceEnumerator;
use crate::error::Result;

/// One detected GMCH: its identity, its mapped register window and the
/// monitor that drives the thermal sensor.
///
/// The window and the monitor state are owned exclusively by this
/// instance; nothing is process-global, so independent instances (over
/// fake hardware, say) can coexist.
pub struct IgpDevice {
    identity: ChipsetIdentity,
    monitor: ThermalMonitor,
}

impl IgpDevice {
    /// Discover the chipset, map its register window and build the
    /// monitor. Any failure aborts initialization outright; there is no
    /// degraded mode, and a failed device must be re-probed externally.
    pub fn probe(pci: &dyn DeviceEnumerator, strategy: MobileDecode) -> Result<Self> {
        let (identity, descriptor) = locator::locate(pci)?;
        let window = MmioWindow::open(&descriptor)?;
        Ok(Self::with_registers(
            identity,
            strategy,
            Box::new(window),
            Box::new(SleepDelay),
        ))
    }

    /// Build a device over explicit register and delay implementations.
    /// This is how tests run against scripted hardware.
    pub fn with_registers(
        identity: ChipsetIdentity,
        strategy: MobileDecode,
        regs: Box<dyn Registers>,
        delay: Box<dyn Delay>,
    ) -> Self {
        Self {
            identity,
            monitor: ThermalMonitor::new(identity.family, strategy, regs, delay),
        }
    }

    pub fn identity(&self) -> ChipsetIdentity {
        self.identity
    }

    pub fn monitor(&self) -> &ThermalMonitor {
        &self.monitor
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use igptemp_raw::chipset::ChipsetFamily;
    use igptemp_raw::mobile;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Always-enabled, always-ready mobile register bank with fixed
    /// RTR1/TOF1 readings and a release counter bumped on drop.
    pub(crate) struct FixedRegisters {
        rtr1: u8,
        tof1: u8,
        releases: Arc<AtomicU32>,
    }

    impl Registers for FixedRegisters {
        fn read_u8(&self, offset: u64) -> u8 {
            match offset {
                mobile::RTR1 => self.rtr1,
                mobile::TOF1 => self.tof1,
                _ => 0,
            }
        }

        fn read_u16(&self, offset: u64) -> u16 {
            match offset {
                mobile::TSC1 => mobile::TSE,
                mobile::TSS1 => mobile::TMOV,
                _ => 0,
            }
        }

        fn read_u32(&self, _offset: u64) -> u32 {
            0
        }

        fn write_u16(&self, _offset: u64, _value: u16) {}
    }

    impl Drop for FixedRegisters {
        fn drop(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct NoDelay;

    impl Delay for NoDelay {
        fn pause(&self, _interval: Duration) {}
    }

    pub(crate) fn fake_mobile_device(rtr1: u8, tof1: u8) -> IgpDevice {
        fake_mobile_device_counting(rtr1, tof1, Arc::new(AtomicU32::new(0)))
    }

    pub(crate) fn fake_mobile_device_counting(
        rtr1: u8,
        tof1: u8,
        releases: Arc<AtomicU32>,
    ) -> IgpDevice {
        IgpDevice::with_registers(
            ChipsetIdentity {
                device_id: 0x2A40,
                family: ChipsetFamily::Mobile,
            },
            MobileDecode::RegisterPair,
            Box::new(FixedRegisters {
                rtr1,
                tof1,
                releases,
            }),
            Box::new(NoDelay),
        )
    }

    #[test]
    fn device_reads_through_its_monitor() {
        let device = fake_mobile_device(60, 40);
        assert_eq!(device.monitor().read_temperature(), 66_340);
        assert_eq!(device.identity().device_id, 0x2A40);
    }

    #[test]
    fn teardown_releases_the_window_exactly_once() {
        let releases = Arc::new(AtomicU32::new(0));
        let device = fake_mobile_device_counting(60, 40, Arc::clone(&releases));

        assert_eq!(releases.load(Ordering::SeqCst), 0);
        drop(device);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
