//! Supported chipset device ids and register-layout families
//!
//! The thermal sensor lives behind the MCHBAR window on every supported
//! GMCH, but the register layout comes in two flavours: the mobile parts
//! expose 16-bit control/status registers at 0x1001/0x1004, the desktop
//! 3-/4-series parts expose 8-bit registers at 0xCD8/0xCDA plus a 32-bit
//! combined reading at 0xCDC.

use thiserror::Error;

use crate::{desktop, mobile};

/// PCI vendor id shared by every supported device
pub const INTEL_VENDOR_ID: u16 = 0x8086;

/// Mobile series, read from TR1/RTR1
pub const DEVICE_ID_82965GM: u16 = 0x2A00;
pub const DEVICE_ID_82965GME: u16 = 0x2A10;
pub const DEVICE_ID_GM45: u16 = 0x2A40;

/// 3 series, read from TSTTP.RELT
pub const DEVICE_ID_Q35: u16 = 0x29B0;
pub const DEVICE_ID_G33: u16 = 0x29C0;
pub const DEVICE_ID_Q33: u16 = 0x29D0;

/// 4 series, read from TSTTP.RELT
pub const DEVICE_ID_Q45: u16 = 0x2E10;
pub const DEVICE_ID_G45: u16 = 0x2E20;
pub const DEVICE_ID_G41: u16 = 0x2E30;
pub const DEVICE_ID_B43_BASE: u16 = 0x2E40;
pub const DEVICE_ID_B43_SOFT_SKU: u16 = 0x2E90;

/// Candidate device ids in probe order: mobile parts first, then the
/// desktop 3-/4-series parts. Discovery takes the first present match.
pub const SUPPORTED_DEVICE_IDS: [u16; 11] = [
    DEVICE_ID_82965GM,
    DEVICE_ID_82965GME,
    DEVICE_ID_GM45,
    DEVICE_ID_Q35,
    DEVICE_ID_G33,
    DEVICE_ID_Q33,
    DEVICE_ID_Q45,
    DEVICE_ID_G45,
    DEVICE_ID_G41,
    DEVICE_ID_B43_BASE,
    DEVICE_ID_B43_SOFT_SKU,
];

#[derive(Debug, Error)]
#[error("device id {0:#06x} is not a supported GMCH")]
pub struct UnsupportedChipset(pub u16);

/// Register-layout family of a supported chipset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipsetFamily {
    /// 82965GM/82965GME/GM45, 16-bit thermal registers
    Mobile,
    /// 3-/4-series desktop parts, 8-bit control/status plus 32-bit TSTTP
    Desktop,
}

/// Access width of the control and status registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWidth {
    Byte,
    Word,
}

/// The per-family thermal register bank, resolved once at discovery time
/// and carried in the device instance.
#[derive(Debug, Clone, Copy)]
pub struct RegisterBank {
    /// Thermal sensor control register offset
    pub control: u64,
    /// Thermal sensor status register offset
    pub status: u64,
    /// Sensor-enable bit in the control register
    pub enable: u16,
    /// Measurement-ready bit in the status register
    pub ready: u16,
    /// Control/status access width
    pub width: RegisterWidth,
}

impl ChipsetFamily {
    /// Classify a device id from [`SUPPORTED_DEVICE_IDS`].
    pub fn of(device_id: u16) -> Result<Self, UnsupportedChipset> {
        if !SUPPORTED_DEVICE_IDS.contains(&device_id) {
            return Err(UnsupportedChipset(device_id));
        }

        match device_id {
            DEVICE_ID_82965GM | DEVICE_ID_82965GME | DEVICE_ID_GM45 => Ok(ChipsetFamily::Mobile),
            _ => Ok(ChipsetFamily::Desktop),
        }
    }

    /// Thermal register bank for this family.
    pub const fn bank(self) -> RegisterBank {
        match self {
            ChipsetFamily::Mobile => RegisterBank {
                control: mobile::TSC1,
                status: mobile::TSS1,
                enable: mobile::TSE,
                ready: mobile::TMOV,
                width: RegisterWidth::Word,
            },
            ChipsetFamily::Desktop => RegisterBank {
                control: desktop::TSC1,
                status: desktop::TSS,
                enable: desktop::TSE,
                ready: desktop::TMOV,
                width: RegisterWidth::Byte,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_ids_classify_as_mobile() {
        for id in [DEVICE_ID_82965GM, DEVICE_ID_82965GME, DEVICE_ID_GM45] {
            assert_eq!(ChipsetFamily::of(id).unwrap(), ChipsetFamily::Mobile);
        }
    }

    #[test]
    fn remaining_ids_classify_as_desktop() {
        for id in SUPPORTED_DEVICE_IDS {
            if ChipsetFamily::of(id).unwrap() == ChipsetFamily::Mobile {
                continue;
            }
            assert_eq!(ChipsetFamily::of(id).unwrap(), ChipsetFamily::Desktop);
        }
    }

    #[test]
    fn unlisted_id_is_rejected() {
        assert!(ChipsetFamily::of(0x1234).is_err());
    }

    #[test]
    fn probe_order_lists_mobile_parts_first() {
        let first_desktop = SUPPORTED_DEVICE_IDS
            .iter()
            .position(|&id| ChipsetFamily::of(id).unwrap() == ChipsetFamily::Desktop)
            .unwrap();
        assert!(SUPPORTED_DEVICE_IDS[..first_desktop]
            .iter()
            .all(|&id| ChipsetFamily::of(id).unwrap() == ChipsetFamily::Mobile));
        assert_eq!(first_desktop, 3);
    }

    #[test]
    fn banks_match_family_layouts() {
        let mobile = ChipsetFamily::Mobile.bank();
        assert_eq!(mobile.control, 0x1001);
        assert_eq!(mobile.width, RegisterWidth::Word);

        let desktop = ChipsetFamily::Desktop.bank();
        assert_eq!(desktop.control, 0xCD8);
        assert_eq!(desktop.width, RegisterWidth::Byte);
    }
}
