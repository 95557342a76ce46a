//! Fixed-width unsigned integers built from 64-bit limbs.
//!
//! Limbs are stored least-significant first. Every width is generated by the
//! same [`construct_uint!`] expansion, so `U256` and `U512` share one
//! arithmetic core and differ only in their limb count.

/// Multiply-accumulate on one limb.
///
/// Computes `x * y + carry + *acc`, stores the low 64 bits back into `acc` and
/// returns the high 64 bits as the next carry. The sum never exceeds
/// `u128::MAX`, so the intermediate cannot overflow.
#[inline(always)]
pub fn mac(acc: &mut u64, x: u64, y: u64, carry: u64) -> u64 {
    let wide = (x as u128) * (y as u128) + (carry as u128) + (*acc as u128);
    *acc = wide as u64;
    (wide >> 64) as u64
}

macro_rules! construct_uint {
    ($(#[$attr:meta])* pub struct $name:ident($n_limbs:expr);) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub [u64; $n_limbs]);

        impl $name {
            /// Number of 64-bit limbs
            pub const LIMBS: usize = $n_limbs;
            /// Width in bits
            pub const BITS: usize = $n_limbs * 64;
            /// Width in bytes
            pub const BYTES: usize = $n_limbs * 8;

            /// Zero value
            pub const ZERO: Self = Self([0u64; $n_limbs]);
            /// One value
            pub const ONE: Self = {
                let mut limbs = [0u64; $n_limbs];
                limbs[0] = 1;
                Self(limbs)
            };
            /// Max value
            pub const MAX: Self = Self([u64::MAX; $n_limbs]);

            /// Create from limbs, least-significant first
            pub const fn from_limbs(limbs: [u64; $n_limbs]) -> Self {
                Self(limbs)
            }

            /// Create from a limb slice; the slice must hold exactly `LIMBS` limbs
            pub fn from_limb_slice(limbs: &[u64]) -> Result<Self, crate::PrimitiveError> {
                if limbs.len() != $n_limbs {
                    return Err(crate::PrimitiveError::InvalidLimbCount {
                        expected: $n_limbs,
                        got: limbs.len(),
                    });
                }
                let mut result = [0u64; $n_limbs];
                result.copy_from_slice(limbs);
                Ok(Self(result))
            }

            /// Borrow the limbs, least-significant first
            pub const fn as_limbs(&self) -> &[u64; $n_limbs] {
                &self.0
            }

            /// Create from a u64
            pub const fn from_u64(value: u64) -> Self {
                let mut limbs = [0u64; $n_limbs];
                limbs[0] = value;
                Self(limbs)
            }

            /// Check if zero
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|&limb| limb == 0)
            }

            /// Lowest limb, truncating the rest
            pub const fn low_u64(&self) -> u64 {
                self.0[0]
            }

            /// Convert to u64 if the value fits
            pub fn to_u64(&self) -> Option<u64> {
                if self.0[1..].iter().any(|&limb| limb != 0) {
                    return None;
                }
                Some(self.0[0])
            }

            /// Convert to usize if the value fits the host pointer width
            pub fn to_usize(&self) -> Option<usize> {
                self.to_u64().and_then(|value| usize::try_from(value).ok())
            }

            /// Value of bit `index` (0 = least significant); false past the width
            pub fn bit(&self, index: usize) -> bool {
                if index >= Self::BITS {
                    return false;
                }
                self.0[index / 64] & (1u64 << (index % 64)) != 0
            }

            /// Number of significant bits
            pub fn bits(&self) -> usize {
                for i in (0..$n_limbs).rev() {
                    if self.0[i] != 0 {
                        return i * 64 + 64 - self.0[i].leading_zeros() as usize;
                    }
                }
                0
            }

            /// Number of leading zero bits
            pub fn leading_zeros(&self) -> usize {
                Self::BITS - self.bits()
            }

            /// Create from big-endian bytes, left-padding short input with zeros.
            ///
            /// Input longer than `BYTES` keeps only its least significant bytes.
            pub fn from_big_endian(bytes: &[u8]) -> Self {
                let bytes = if bytes.len() > Self::BYTES {
                    &bytes[bytes.len() - Self::BYTES..]
                } else {
                    bytes
                };
                let mut limbs = [0u64; $n_limbs];
                for (i, &byte) in bytes.iter().rev().enumerate() {
                    limbs[i / 8] |= (byte as u64) << (8 * (i % 8));
                }
                Self(limbs)
            }

            /// Big-endian byte representation
            pub fn to_big_endian(&self) -> [u8; $n_limbs * 8] {
                let mut out = [0u8; $n_limbs * 8];
                for (i, limb) in self.0.iter().enumerate() {
                    let end = Self::BYTES - 8 * i;
                    out[end - 8..end].copy_from_slice(&limb.to_be_bytes());
                }
                out
            }

            /// Add with carry-out reporting
            pub fn overflowing_add(self, other: Self) -> (Self, bool) {
                let mut result = [0u64; $n_limbs];
                let mut carry = false;
                for i in 0..$n_limbs {
                    let (sum, overflow_a) = self.0[i].overflowing_add(other.0[i]);
                    let (sum, overflow_b) = sum.overflowing_add(carry as u64);
                    result[i] = sum;
                    carry = overflow_a || overflow_b;
                }
                (Self(result), carry)
            }

            /// Subtract with borrow-out reporting; the flag is set iff `self < other`
            pub fn overflowing_sub(self, other: Self) -> (Self, bool) {
                let mut result = [0u64; $n_limbs];
                let mut borrow = false;
                for i in 0..$n_limbs {
                    let (diff, overflow_a) = self.0[i].overflowing_sub(other.0[i]);
                    let (diff, overflow_b) = diff.overflowing_sub(borrow as u64);
                    result[i] = diff;
                    borrow = overflow_a || overflow_b;
                }
                (Self(result), borrow)
            }

            /// Full schoolbook multiplication.
            ///
            /// Accumulates the double-width product and returns its low half; the
            /// flag is set when any limb of the high half is nonzero.
            pub fn overflowing_mul(self, other: Self) -> (Self, bool) {
                let mut wide = [0u64; $n_limbs * 2];
                for i in 0..$n_limbs {
                    let mut carry = 0u64;
                    for j in 0..$n_limbs {
                        carry = crate::uint::mac(&mut wide[i + j], self.0[i], other.0[j], carry);
                    }
                    wide[i + $n_limbs] = carry;
                }
                let overflow = wide[$n_limbs..].iter().any(|&limb| limb != 0);
                let mut low = [0u64; $n_limbs];
                low.copy_from_slice(&wide[..$n_limbs]);
                (Self(low), overflow)
            }

            /// Wrapping multiplication.
            ///
            /// Only limb pairs landing in the low half are accumulated, so the
            /// overflow flag is not available here.
            pub fn wrapping_mul(self, other: Self) -> Self {
                let mut result = [0u64; $n_limbs];
                for i in 0..$n_limbs {
                    let mut carry = 0u64;
                    for j in 0..($n_limbs - i) {
                        carry = crate::uint::mac(&mut result[i + j], self.0[i], other.0[j], carry);
                    }
                }
                Self(result)
            }

            /// Logical shift left by `shift` bits; shifting by the width or more yields zero
            pub fn shift_left(self, shift: usize) -> Self {
                if shift >= Self::BITS {
                    return Self::ZERO;
                }
                let mut result = [0u64; $n_limbs];
                let limb_shift = shift / 64;
                let bit_shift = shift % 64;

                for i in limb_shift..$n_limbs {
                    result[i] = self.0[i - limb_shift] << bit_shift;
                }
                if bit_shift > 0 {
                    for i in limb_shift + 1..$n_limbs {
                        result[i] |= self.0[i - 1 - limb_shift] >> (64 - bit_shift);
                    }
                }
                Self(result)
            }

            /// Logical shift right by `shift` bits; shifting by the width or more yields zero
            pub fn shift_right(self, shift: usize) -> Self {
                if shift >= Self::BITS {
                    return Self::ZERO;
                }
                let mut result = [0u64; $n_limbs];
                let limb_shift = shift / 64;
                let bit_shift = shift % 64;

                for i in limb_shift..$n_limbs {
                    result[i - limb_shift] = self.0[i] >> bit_shift;
                }
                if bit_shift > 0 {
                    for i in limb_shift + 1..$n_limbs {
                        result[i - limb_shift - 1] |= self.0[i] << (64 - bit_shift);
                    }
                }
                Self(result)
            }

            /// Quotient and remainder, `None` for a zero divisor
            pub fn div_rem(self, divisor: Self) -> Option<(Self, Self)> {
                if divisor.is_zero() {
                    return None;
                }
                if self < divisor {
                    return Some((Self::ZERO, self));
                }
                if let (Some(a), Some(b)) = (self.to_u64(), divisor.to_u64()) {
                    return Some((Self::from_u64(a / b), Self::from_u64(a % b)));
                }

                // Shift-subtract long division over the dividend's significant bits.
                let mut quotient = Self::ZERO;
                let mut remainder = Self::ZERO;
                for i in (0..self.bits()).rev() {
                    let top = remainder.bit(Self::BITS - 1);
                    remainder = remainder.shift_left(1);
                    if self.bit(i) {
                        remainder.0[0] |= 1;
                    }
                    if top || remainder >= divisor {
                        remainder = remainder.overflowing_sub(divisor).0;
                        quotient.0[i / 64] |= 1u64 << (i % 64);
                    }
                }
                Some((quotient, remainder))
            }

            /// Wrapping exponentiation by squaring
            pub fn pow(self, exponent: Self) -> Self {
                let mut result = Self::ONE;
                let mut base = self;
                for i in 0..exponent.bits() {
                    if exponent.bit(i) {
                        result = result.wrapping_mul(base);
                    }
                    base = base.wrapping_mul(base);
                }
                result
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self::from_u64(value)
            }
        }

        impl From<u128> for $name {
            fn from(value: u128) -> Self {
                let mut limbs = [0u64; $n_limbs];
                limbs[0] = value as u64;
                limbs[1] = (value >> 64) as u64;
                Self(limbs)
            }
        }

        impl From<bool> for $name {
            fn from(value: bool) -> Self {
                if value { Self::ONE } else { Self::ZERO }
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                for i in (0..$n_limbs).rev() {
                    match self.0[i].cmp(&other.0[i]) {
                        std::cmp::Ordering::Equal => continue,
                        ordering => return ordering,
                    }
                }
                std::cmp::Ordering::Equal
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                self.overflowing_add(rhs).0
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                self.overflowing_sub(rhs).0
            }
        }

        impl std::ops::Mul for $name {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
        }

        impl std::ops::Shl<usize> for $name {
            type Output = Self;

            fn shl(self, shift: usize) -> Self {
                self.shift_left(shift)
            }
        }

        impl std::ops::Shr<usize> for $name {
            type Output = Self;

            fn shr(self, shift: usize) -> Self {
                self.shift_right(shift)
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                let mut result = self.0;
                for (limb, other) in result.iter_mut().zip(rhs.0) {
                    *limb &= other;
                }
                Self(result)
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                let mut result = self.0;
                for (limb, other) in result.iter_mut().zip(rhs.0) {
                    *limb |= other;
                }
                Self(result)
            }
        }

        impl std::ops::BitXor for $name {
            type Output = Self;

            fn bitxor(self, rhs: Self) -> Self {
                let mut result = self.0;
                for (limb, other) in result.iter_mut().zip(rhs.0) {
                    *limb ^= other;
                }
                Self(result)
            }
        }

        impl std::ops::Not for $name {
            type Output = Self;

            fn not(self) -> Self {
                let mut result = self.0;
                for limb in result.iter_mut() {
                    *limb = !*limb;
                }
                Self(result)
            }
        }

        impl std::fmt::LowerHex for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let encoded = hex::encode(self.to_big_endian());
                let digits = encoded.trim_start_matches('0');
                f.pad_integral(true, "0x", if digits.is_empty() { "0" } else { digits })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:#x}", self)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self)
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::PrimitiveError;

            /// Parse a hex string, with or without a `0x` prefix
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(s);
                if digits.is_empty() {
                    return Err(crate::PrimitiveError::InvalidHex(s.to_string()));
                }
                if digits.len() > Self::BYTES * 2 {
                    return Err(crate::PrimitiveError::InvalidLength {
                        expected: Self::BYTES,
                        got: digits.len().div_ceil(2),
                    });
                }
                let bytes = if digits.len() % 2 == 1 {
                    hex::decode(format!("0{}", digits))
                } else {
                    hex::decode(digits)
                }
                .map_err(|e| crate::PrimitiveError::InvalidHex(e.to_string()))?;
                Ok(Self::from_big_endian(&bytes))
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use construct_uint;
