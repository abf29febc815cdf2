//! Calibration curve mapping raw sensor codes to millidegrees Celsius
//!
//! The curve is the quadratic degree fit published in the chipset
//! datasheet (p. 358, 313053): T = (16*S^2 - 11071*S + 1610500) / 10
//! millidegrees, with integer division truncating toward zero. The
//! desktop TSTTP path feeds the curve asymmetrically (relt multiplies the
//! quadratic term, temp_val the linear one) and has no sentinel check;
//! both quirks come straight from the datasheet formulas and are kept.

use crate::desktop::{HTPS_MASK, RELT_MASK};

/// Fixed critical temperature reported alongside the live reading,
/// in millidegrees Celsius. Not read from hardware.
pub const CRITICAL_MILLIDEGREES: u32 = 110_000;

/// Sensor label. The original driver reports this string on every
/// supported chipset, GM965 or not; kept as-is.
pub const SENSOR_LABEL: &str = "GM965 IGP";

/// Mobile decode strategy, selectable at construction.
///
/// The register-pair variant sums the relative reading with its
/// calibration offset; the single-register variant reads the uncorrected
/// TR1 byte directly. Both feed the same curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MobileDecode {
    /// RTR1 + TOF1 (default)
    #[default]
    RegisterPair,
    /// TR1 only
    SingleRegister,
}

const fn curve(s: i32) -> i32 {
    (16 * s * s - 11071 * s + 1_610_500) / 10
}

/// Decode a mobile reading from the RTR1/TOF1 register pair.
///
/// The two bytes are summed with 8-bit wraparound, exactly as the
/// hardware's fixed-point arithmetic does. A sum of 0x00 or 0xFF marks an
/// uncalibrated or out-of-range sensor and yields `None`; the caller must
/// leave its previous reading in place.
pub fn mobile_pair(measured: u8, offset: u8) -> Option<i32> {
    mobile_code(measured.wrapping_add(offset))
}

/// Decode a mobile reading from the TR1 register alone, the alternate
/// strategy. Same sentinels, same curve.
pub fn mobile_single(raw: u8) -> Option<i32> {
    mobile_code(raw)
}

fn mobile_code(code: u8) -> Option<i32> {
    if code == 0x00 || code == 0xFF {
        return None;
    }
    Some(curve(code as i32))
}

/// Decode a desktop TSTTP dword.
///
/// relt occupies bits 31:24 and is sign-extended (the hardware reports it
/// as a signed byte), htps bits 15:8; bits 7:0 carry the catastrophic
/// trip point and do not enter the curve. Always produces a value, even
/// for zero fields.
pub fn desktop(raw: u32) -> i32 {
    let relt = ((raw & RELT_MASK) >> 24) as u8 as i8 as i32;
    let htps = ((raw & HTPS_MASK) >> 8) as i32;
    let temp_val = htps + relt;
    (16 * temp_val * relt - 11071 * temp_val + 1_610_500) / 10
}
