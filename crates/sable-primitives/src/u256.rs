//! 256-bit machine word and its two's complement helpers

use crate::u512::U512;
use crate::uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer (4 little-endian limbs)
    pub struct U256(4);
}

impl U256 {
    /// Check the sign bit under two's complement
    pub fn is_negative(&self) -> bool {
        self.bit(255)
    }

    /// Two's complement negation: `!v + 1`
    pub fn twos_complement(self) -> Self {
        !self + Self::ONE
    }

    fn abs(self) -> Self {
        if self.is_negative() {
            self.twos_complement()
        } else {
            self
        }
    }

    /// Signed division truncating toward zero; zero divisor yields zero
    pub fn signed_div(self, divisor: Self) -> Self {
        let Some((quotient, _)) = self.abs().div_rem(divisor.abs()) else {
            return Self::ZERO;
        };
        if self.is_negative() != divisor.is_negative() {
            quotient.twos_complement()
        } else {
            quotient
        }
    }

    /// Signed remainder taking the sign of the dividend; zero divisor yields zero
    pub fn signed_rem(self, divisor: Self) -> Self {
        let Some((_, remainder)) = self.abs().div_rem(divisor.abs()) else {
            return Self::ZERO;
        };
        if self.is_negative() {
            remainder.twos_complement()
        } else {
            remainder
        }
    }

    /// Signed less-than
    pub fn signed_lt(&self, other: &Self) -> bool {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => true,
            (false, true) => false,
            _ => self < other,
        }
    }

    /// Arithmetic shift right, filling with the sign bit
    pub fn arithmetic_shr(self, shift: usize) -> Self {
        if self.is_negative() {
            !((!self).shift_right(shift))
        } else {
            self.shift_right(shift)
        }
    }

    /// Sign-extend from byte `byte_index` (0 = least significant byte).
    ///
    /// Indices of 31 and above leave the value unchanged.
    pub fn sign_extend(self, byte_index: Self) -> Self {
        match byte_index.to_usize() {
            Some(index) if index < 31 => {
                let sign_bit = index * 8 + 7;
                let mask = Self::ONE.shift_left(sign_bit + 1) - Self::ONE;
                if self.bit(sign_bit) {
                    self | !mask
                } else {
                    self & mask
                }
            }
            _ => self,
        }
    }

    /// Byte `index` counted from the most significant end, zero when out of range
    pub fn byte(self, index: Self) -> Self {
        match index.to_usize() {
            Some(i) if i < 32 => Self::from_u64(self.shift_right(8 * (31 - i)).low_u64() & 0xff),
            _ => Self::ZERO,
        }
    }

    /// `(self + other) % modulus` without losing the carry; zero modulus yields zero
    pub fn add_mod(self, other: Self, modulus: Self) -> Self {
        let sum = U512::from(self) + U512::from(other);
        match sum.div_rem(U512::from(modulus)) {
            Some((_, remainder)) => remainder.low_u256(),
            None => Self::ZERO,
        }
    }

    /// `(self * other) % modulus` over the exact 512-bit product; zero modulus yields zero
    pub fn mul_mod(self, other: Self, modulus: Self) -> Self {
        let product = U512::from(self).wrapping_mul(U512::from(other));
        match product.div_rem(U512::from(modulus)) {
            Some((_, remainder)) => remainder.low_u256(),
            None => Self::ZERO,
        }
    }

    /// Number of bytes needed to represent the value
    pub fn byte_len(&self) -> usize {
        self.bits().div_ceil(8)
    }
}

impl From<[u8; 32]> for U256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self::from_big_endian(&bytes)
    }
}

impl From<U256> for [u8; 32] {
    fn from(value: U256) -> Self {
        value.to_big_endian()
    }
}

impl From<primitive_types::U256> for U256 {
    fn from(value: primitive_types::U256) -> Self {
        U256(value.0)
    }
}

impl From<U256> for primitive_types::U256 {
    fn from(value: U256) -> Self {
        primitive_types::U256(value.0)
    }
}
