//! Bounded word stack

use sable_primitives::U256;

use crate::config::STACK_LIMIT;
use crate::error::ExitError;

/// Machine stack of 256-bit words
#[derive(Clone, Debug)]
pub struct Stack {
    data: Vec<U256>,
    limit: usize,
}

impl Stack {
    /// Create an empty stack holding at most `limit` items
    pub fn new(limit: usize) -> Self {
        Self {
            data: Vec::with_capacity(limit.min(STACK_LIMIT)),
            limit,
        }
    }

    /// Push a value; fails without side effects when full
    #[inline]
    pub fn push(&mut self, value: U256) -> Result<(), ExitError> {
        if self.data.len() >= self.limit {
            return Err(ExitError::StackOverflow);
        }
        self.data.push(value);
        Ok(())
    }

    /// Pop the top value; fails without side effects when empty
    #[inline]
    pub fn pop(&mut self) -> Result<U256, ExitError> {
        self.data.pop().ok_or(ExitError::StackUnderflow)
    }

    /// Value at `depth` (0 = top)
    #[inline]
    pub fn peek(&self, depth: usize) -> Result<U256, ExitError> {
        if depth >= self.data.len() {
            return Err(ExitError::StackUnderflow);
        }
        Ok(self.data[self.data.len() - 1 - depth])
    }

    /// Overwrite the value at `depth` (0 = top)
    #[inline]
    pub fn set(&mut self, depth: usize, value: U256) -> Result<(), ExitError> {
        if depth >= self.data.len() {
            return Err(ExitError::StackUnderflow);
        }
        let index = self.data.len() - 1 - depth;
        self.data[index] = value;
        Ok(())
    }

    /// Fail unless at least `n` items are present
    #[inline]
    pub fn require(&self, n: usize) -> Result<(), ExitError> {
        if self.data.len() < n {
            return Err(ExitError::StackUnderflow);
        }
        Ok(())
    }

    /// Push a copy of the item at `depth` (1 = top)
    pub fn dup(&mut self, depth: usize) -> Result<(), ExitError> {
        if depth == 0 {
            return Err(ExitError::StackUnderflow);
        }
        let value = self.peek(depth - 1)?;
        self.push(value)
    }

    /// Swap the top with the item at `depth` (1 = second item)
    pub fn swap(&mut self, depth: usize) -> Result<(), ExitError> {
        if depth == 0 || depth >= self.data.len() {
            return Err(ExitError::StackUnderflow);
        }
        let len = self.data.len();
        self.data.swap(len - 1, len - 1 - depth);
        Ok(())
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maximum number of items
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Items, bottom first
    pub fn data(&self) -> &[U256] {
        &self.data
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new(STACK_LIMIT)
    }
}
