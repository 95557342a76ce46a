//! 512-bit unsigned integer for double-width intermediates

use crate::u256::U256;
use crate::uint::construct_uint;

construct_uint! {
    /// 512-bit unsigned integer (8 little-endian limbs)
    pub struct U512(8);
}

impl U512 {
    /// Low 256 bits, truncating the high half
    pub const fn low_u256(&self) -> U256 {
        U256([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Check whether the high half is zero
    pub fn fits_u256(&self) -> bool {
        self.0[4..].iter().all(|&limb| limb == 0)
    }
}

impl From<U256> for U512 {
    /// Zero-extend a 256-bit value
    fn from(value: U256) -> Self {
        let [a, b, c, d] = value.0;
        U512([a, b, c, d, 0, 0, 0, 0])
    }
}

impl From<primitive_types::U512> for U512 {
    fn from(value: primitive_types::U512) -> Self {
        U512(value.0)
    }
}

impl From<U512> for primitive_types::U512 {
    fn from(value: U512) -> Self {
        primitive_types::U512(value.0)
    }
}
