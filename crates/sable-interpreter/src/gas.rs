//! Gas ledger and cost calculations

use sable_primitives::U256;

use crate::opcode::Opcode;

/// Gas costs
pub mod cost {
    /// Zero gas
    pub const ZERO: u64 = 0;
    /// Base gas
    pub const BASE: u64 = 2;
    /// Very low gas
    pub const VERYLOW: u64 = 3;
    /// Low gas
    pub const LOW: u64 = 5;
    /// Mid gas
    pub const MID: u64 = 8;
    /// High gas
    pub const HIGH: u64 = 10;

    /// Jump dest gas
    pub const JUMPDEST: u64 = 1;
    /// Exp gas
    pub const EXP: u64 = 10;
    /// Exp gas per exponent byte
    pub const EXP_BYTE: u64 = 50;
    /// SHA3 base gas
    pub const SHA3: u64 = 30;
    /// SHA3 gas per word
    pub const SHA3_WORD: u64 = 6;
    /// BLOCKHASH gas
    pub const BLOCKHASH: u64 = 20;
    /// Warm storage read (TLOAD, TSTORE)
    pub const WARM_STORAGE_READ: u64 = 100;

    /// Memory gas per word
    pub const MEMORY: u64 = 3;
    /// Copy gas per word
    pub const COPY: u64 = 3;

    /// Refund cap divisor since London (EIP-3529)
    pub const MAX_REFUND_QUOTIENT_LONDON: u64 = 5;
    /// Refund cap divisor before London
    pub const MAX_REFUND_QUOTIENT_PRE_LONDON: u64 = 2;
}

/// Gas accounting for one execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gas {
    limit: u64,
    remaining: u64,
    refunded: i64,
}

impl Gas {
    /// Create a ledger with the full limit available
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
            refunded: 0,
        }
    }

    /// Create a ledger with nothing left to spend
    pub const fn without_remaining(limit: u64) -> Self {
        Self {
            limit,
            remaining: 0,
            refunded: 0,
        }
    }

    /// Gas limit
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas left
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Gas spent so far
    pub const fn spent(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Accumulated refund; only final after [`Gas::set_final_refund`]
    pub const fn refunded(&self) -> i64 {
        self.refunded
    }

    /// Charge `cost`. Returns false and leaves the ledger untouched when
    /// there is not enough gas left.
    #[must_use]
    pub fn record_cost(&mut self, cost: u64) -> bool {
        match self.remaining.checked_sub(cost) {
            Some(remaining) => {
                self.remaining = remaining;
                true
            }
            None => false,
        }
    }

    /// Add to the refund counter; may go negative
    pub fn record_refund(&mut self, refund: i64) {
        self.refunded = self.refunded.saturating_add(refund);
    }

    /// Clamp the refund to `[0, spent / quotient]`. Call once when the
    /// top-level execution ends.
    pub fn set_final_refund(&mut self, is_london: bool) {
        let cap = self.spent() / max_refund_quotient(is_london);
        let refunded = u64::try_from(self.refunded.max(0)).unwrap_or(0);
        self.refunded = i64::try_from(refunded.min(cap)).unwrap_or(i64::MAX);
    }
}

/// Refund cap divisor for the active ruleset
pub const fn max_refund_quotient(is_london: bool) -> u64 {
    if is_london {
        cost::MAX_REFUND_QUOTIENT_LONDON
    } else {
        cost::MAX_REFUND_QUOTIENT_PRE_LONDON
    }
}

/// Static gas charged by the machine before an opcode runs.
///
/// Variable parts (memory expansion, hashed words, exponent bytes) are charged
/// by the instruction itself. Copies are priced entirely by the instruction
/// through [`very_low_copy`], and host-priced opcodes cost nothing here.
pub fn static_gas(opcode: Opcode) -> u64 {
    use Opcode::*;

    match opcode {
        STOP | RETURN | REVERT | INVALID => cost::ZERO,

        ADDRESS | ORIGIN | CALLER | CALLVALUE | CALLDATASIZE | CODESIZE | GASPRICE
        | COINBASE | TIMESTAMP | NUMBER | PREVRANDAO | GASLIMIT | CHAINID | RETURNDATASIZE
        | POP | PC | MSIZE | GAS | BASEFEE | BLOBBASEFEE | PUSH0 => cost::BASE,

        ADD | SUB | NOT | LT | GT | SLT | SGT | EQ | ISZERO | AND | OR | XOR | BYTE | SHL
        | SHR | SAR | CALLDATALOAD | MLOAD | MSTORE | MSTORE8 | BLOBHASH => cost::VERYLOW,

        MUL | DIV | SDIV | MOD | SMOD | SIGNEXTEND | SELFBALANCE => cost::LOW,

        ADDMOD | MULMOD | JUMP => cost::MID,

        JUMPI => cost::HIGH,

        JUMPDEST => cost::JUMPDEST,

        EXP => cost::EXP,
        SHA3 => cost::SHA3,
        BLOCKHASH => cost::BLOCKHASH,
        TLOAD | TSTORE => cost::WARM_STORAGE_READ,

        op if op.is_push() || op.dup_depth() > 0 || op.swap_depth() > 0 => cost::VERYLOW,

        // Priced by the host
        _ => cost::ZERO,
    }
}

/// Number of 32-byte words covering `size` bytes
pub const fn num_words(size: usize) -> usize {
    size.div_ceil(32)
}

/// Per-word copy cost; `None` on overflow
pub fn copy_cost(size: usize) -> Option<u64> {
    cost::COPY.checked_mul(u64::try_from(num_words(size)).ok()?)
}

/// Total cost of a very-low-tier copy: `VERYLOW + COPY * words`
pub fn very_low_copy(size: usize) -> Option<u64> {
    cost::VERYLOW.checked_add(copy_cost(size)?)
}

/// Total memory cost for `words` words: `3 * words + words^2 / 512`
pub fn memory_cost(words: usize) -> Option<u64> {
    let words = u64::try_from(words).ok()?;
    let linear = cost::MEMORY.checked_mul(words)?;
    let quadratic = words.checked_mul(words)? / 512;
    linear.checked_add(quadratic)
}

/// Cost of growing memory from `current_len` bytes to cover `offset..offset + size`.
///
/// Zero when `size` is zero or the range is already covered.
pub fn memory_expansion(current_len: usize, offset: usize, size: usize) -> Option<u64> {
    if size == 0 {
        return Some(0);
    }
    let end = offset.checked_add(size)?;
    if end <= current_len {
        return Some(0);
    }
    let new_cost = memory_cost(num_words(end))?;
    let old_cost = memory_cost(num_words(current_len))?;
    Some(new_cost.saturating_sub(old_cost))
}

/// Per-word hashing cost on top of the static SHA3 charge
pub fn sha3_cost(size: usize) -> Option<u64> {
    cost::SHA3_WORD.checked_mul(u64::try_from(num_words(size)).ok()?)
}

/// Exponent-size cost on top of the static EXP charge
pub fn exp_cost(exponent: &U256) -> u64 {
    cost::EXP_BYTE * exponent.byte_len() as u64
}
