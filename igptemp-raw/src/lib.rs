//! # igptemp-raw
//!
//! Hardware register definitions for the thermal sensors embedded in the
//! Intel GM/GME965 family of integrated-graphics chipsets (GMCH), covering
//! the mobile 965/GM45 parts and the desktop 3-/4-series parts.
//!
//! This crate is pure data and arithmetic: device-id tables, register
//! offsets and bit masks, MCHBAR window assembly, and the vendor
//! calibration curve that turns raw sensor codes into millidegrees
//! Celsius. All I/O lives in `igptemp-agent`.
//!
//! ## Usage
//!
//! ```
//! use igptemp_raw::chipset::ChipsetFamily;
//! use igptemp_raw::decode;
//!
//! let family = ChipsetFamily::of(0x2A40).unwrap();
//! assert_eq!(family, ChipsetFamily::Mobile);
//!
//! // Raw sensor code 100 decodes to 66.34 degrees Celsius
//! assert_eq!(decode::mobile_pair(60, 40), Some(66_340));
//! ```

pub mod chipset;
pub mod decode;
pub mod desktop;
pub mod mchbar;
pub mod mobile;

// Re-export for convenience
pub use chipset::{ChipsetFamily, RegisterBank, RegisterWidth, UnsupportedChipset};
pub use decode::MobileDecode;
