//! Thermal register offsets for the mobile series (82965GM/82965GME/GM45)
//!
//! Control and status are 16-bit registers; the raw readings are single
//! bytes. Offsets are relative to the MCHBAR window base.
//!
//! ## References
//!
//! - Intel 965 Express Chipset Family datasheet, thermal sensor registers

/// Thermal Sensor Control 1 (16 bits)
pub const TSC1: u64 = 0x1001;

/// Thermal Sensor Status 1 (16 bits)
pub const TSS1: u64 = 0x1004;

/// Thermal Reading 1, uncorrected sensor code (8 bits)
pub const TR1: u64 = 0x1006;

/// Thermal Offset 1, calibration offset added to RTR1 (8 bits)
pub const TOF1: u64 = 0x1007;

/// Relative Thermal Reading 1 (8 bits)
pub const RTR1: u64 = 0x1008;

/// Sensor-enable bit in TSC1
pub const TSE: u16 = 0x8000;

/// Measurement-ready bit in TSS1
pub const TMOV: u16 = 1 << 10;
