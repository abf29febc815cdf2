//! Thermal register offsets for the desktop 3-/4-series parts
//!
//! Control and status are 8-bit registers; the reading comes back as one
//! 32-bit TSTTP dword carrying the relative and hardware trip-point
//! fields. Offsets are relative to the MCHBAR window base.

/// Thermal Sensor Control 1 (8 bits)
pub const TSC1: u64 = 0xCD8;

/// Thermal Sensor Status (8 bits)
pub const TSS: u64 = 0xCDA;

/// Thermal Sensor Temperature Trip Point (32 bits)
pub const TSTTP: u64 = 0xCDC;

/// Sensor-enable bit in TSC1
pub const TSE: u16 = 0x80;

/// Measurement-ready bit in TSS
pub const TMOV: u16 = 1 << 4;

/// Relative temperature, TSTTP bits 31:24
pub const RELT_MASK: u32 = 0xFF00_0000;

/// Hardware trip point setting, TSTTP bits 15:8
pub const HTPS_MASK: u32 = 0xFF00;

/// Catastrophic trip point setting, TSTTP bits 7:0 (logged, not decoded)
pub const CTPS_MASK: u32 = 0xFF;
