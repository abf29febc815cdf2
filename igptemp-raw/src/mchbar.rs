//! MCHBAR: the GMCH memory-mapped register base-address window
//!
//! The thermal registers sit inside a 16 KiB window whose physical base is
//! programmed into the MCHBAR configuration register pair at 0x48/0x4C.
//! Bit 0 of the low dword enables the window; the base occupies bits
//! 35:14, so the window is always 16 KiB aligned.

/// Configuration-space offset of the MCHBAR low dword; high dword is at +4
pub const MCHBAR_OFFSET: u64 = 0x48;

/// Window-enable bit in the MCHBAR low dword
pub const MCHBAR_ENABLE: u32 = 1;

/// Base-address mask, bits 35:14
pub const MCHBAR_MASK: u64 = 0xF_FFFF_C000;

/// Window length in bytes, fixed by the address mask granularity
pub const WINDOW_LEN: u64 = 16 * 1024;

/// Assemble the physical window base from the two MCHBAR dwords.
pub const fn window_base(low: u32, high: u32) -> u64 {
    (((high as u64) << 32) | low as u64) & MCHBAR_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_masks_enable_bit_and_low_bits() {
        // Enable bit set in the low dword must not leak into the base
        assert_eq!(window_base(0x0000_0001, 0x0000_0002), 0x2_0000_0000);
    }

    #[test]
    fn base_keeps_bits_35_to_14() {
        assert_eq!(window_base(0xFFFF_FFFF, 0xFFFF_FFFF), MCHBAR_MASK);
        assert_eq!(window_base(0xFED1_4001, 0), 0xFED1_4000);
    }

    #[test]
    fn window_is_16k() {
        assert_eq!(WINDOW_LEN, 16384);
    }
}
