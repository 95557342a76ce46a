//! Machine configuration

use crate::gas::max_refund_quotient;

/// Default stack limit
pub const STACK_LIMIT: usize = 1024;

/// Default memory limit in bytes
pub const MEMORY_LIMIT: usize = u32::MAX as usize;

/// Limits and ruleset flags for one machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of stack items
    pub stack_limit: usize,
    /// Maximum memory size in bytes
    pub memory_limit: usize,
    /// London refund rules (EIP-3529)
    pub london: bool,
}

impl Config {
    /// London ruleset
    pub const fn london() -> Self {
        Self {
            stack_limit: STACK_LIMIT,
            memory_limit: MEMORY_LIMIT,
            london: true,
        }
    }

    /// Ruleset before London
    pub const fn pre_london() -> Self {
        Self {
            london: false,
            ..Self::london()
        }
    }

    /// Refund cap divisor for this ruleset
    pub const fn max_refund_quotient(&self) -> u64 {
        max_refund_quotient(self.london)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::london()
    }
}
