use parking_lot::Mutex;
use std::time::Duration;

use igptemp_raw::chipset::{ChipsetFamily, RegisterBank, RegisterWidth};
use igptemp_raw::decode::{self, MobileDecode};
use igptemp_raw::{desktop, mobile};

use crate::common::delay::Delay;
use crate::common::mmio::Registers;

/// Maximum status re-reads while waiting for a conversion to finish
pub const MAX_RETRIES: u32 = 36;

/// Fixed pause between ready-bit checks: 1 ms + 300 us
pub const POLL_INTERVAL: Duration = Duration::from_micros(1300);

/// Drives the enable/poll/read/decode sequence against the register
/// window.
///
/// One mutex serializes the entire sequence, register I/O included, so a
/// concurrent reader queues behind an in-flight poll loop (worst case
/// 36 * ~1.3 ms). The register bank is resolved from the family once at
/// construction; nothing re-dispatches on the family per call.
pub struct ThermalMonitor {
    family: ChipsetFamily,
    bank: RegisterBank,
    strategy: MobileDecode,
    regs: Box<dyn Registers>,
    delay: Box<dyn Delay>,
    /// Last decoded value in millidegrees; 0 until the first good sample.
    temp: Mutex<u32>,
}

impl ThermalMonitor {
    pub fn new(
        family: ChipsetFamily,
        strategy: MobileDecode,
        regs: Box<dyn Registers>,
        delay: Box<dyn Delay>,
    ) -> Self {
        Self {
            family,
            bank: family.bank(),
            strategy,
            regs,
            delay,
            temp: Mutex::new(0),
        }
    }

    fn read_control(&self) -> u16 {
        match self.bank.width {
            RegisterWidth::Word => self.regs.read_u16(self.bank.control),
            RegisterWidth::Byte => self.regs.read_u8(self.bank.control) as u16,
        }
    }

    fn read_status(&self) -> u16 {
        match self.bank.width {
            RegisterWidth::Word => self.regs.read_u16(self.bank.status),
            RegisterWidth::Byte => self.regs.read_u8(self.bank.status) as u16,
        }
    }

    fn sample(&self) -> Option<i32> {
        match self.family {
            ChipsetFamily::Mobile => match self.strategy {
                MobileDecode::RegisterPair => {
                    let measured = self.regs.read_u8(mobile::RTR1);
                    let offset = self.regs.read_u8(mobile::TOF1);
                    tracing::debug!("read values RTR1: {} and TOF1: {}", measured, offset);
                    decode::mobile_pair(measured, offset)
                }
                MobileDecode::SingleRegister => {
                    let raw = self.regs.read_u8(mobile::TR1);
                    tracing::debug!("read value TR1: {}", raw);
                    decode::mobile_single(raw)
                }
            },
            ChipsetFamily::Desktop => {
                let raw = self.regs.read_u32(desktop::TSTTP);
                tracing::debug!(
                    "read values RELT: {}, HTPS: {} and CTPS: {}",
                    (raw & desktop::RELT_MASK) >> 24,
                    (raw & desktop::HTPS_MASK) >> 8,
                    raw & desktop::CTPS_MASK
                );
                Some(decode::desktop(raw))
            }
        }
    }

    /// Run one full read sequence and return the current reading in
    /// millidegrees Celsius.
    ///
    /// If the sensor was disabled, it is enabled (with one confirming
    /// re-read) before polling. If the conversion never becomes ready
    /// within the retry bound, or a mobile sensor reports an uncalibrated
    /// code, the previous (possibly zero) reading is returned unchanged;
    /// neither case is an error to the caller.
    pub fn read_temperature(&self) -> u32 {
        let mut temp = self.temp.lock();

        let control = self.read_control();
        if control & self.bank.enable == 0 {
            self.regs.write_u16(self.bank.control, control | self.bank.enable);
            if self.read_control() & self.bank.enable == 0 {
                tracing::warn!("thermal sensor did not latch the enable bit");
            }
        }

        let mut status = self.read_status();
        let mut retries = MAX_RETRIES;
        while status & self.bank.ready == 0 && retries > 0 {
            self.delay.pause(POLL_INTERVAL);
            status = self.read_status();
            retries -= 1;
        }

        if status & self.bank.ready != 0 {
            if let Some(millidegrees) = self.sample() {
                *temp = millidegrees as u32;
            }
        } else {
            tracing::debug!("conversion never became ready; keeping previous reading");
        }

        *temp
    }

    /// Last stored reading, without touching the hardware.
    pub fn last_temperature(&self) -> u32 {
        *self.temp.lock()
    }
}
