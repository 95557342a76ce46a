//! # sable-primitives
//!
//! Fixed-width unsigned integers for the Sable interpreter.
//!
//! [`U256`] is the machine word; [`U512`] holds double-width intermediates
//! for modular arithmetic. Both are little-endian limb arrays and convert
//! losslessly to and from the `primitive-types` equivalents.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod u256;
mod u512;
mod uint;

pub use error::PrimitiveError;
pub use u256::U256;
pub use u512::U512;
pub use uint::mac;
