//! Word-expanding byte memory

use sable_primitives::U256;

use crate::config::MEMORY_LIMIT;
use crate::error::ExitError;

/// Byte-addressable memory that grows in 32-byte words and never shrinks
#[derive(Clone, Debug)]
pub struct Memory {
    data: Vec<u8>,
    limit: usize,
}

impl Memory {
    /// Create empty memory bounded by `limit` bytes
    pub fn new(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
        }
    }

    /// Current size in bytes, always a multiple of 32
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing has been allocated
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maximum size in bytes
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Raw contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check that `offset..offset + size` can be covered without passing the
    /// limit. A zero `size` always fits.
    pub fn can_resize(&self, offset: usize, size: usize) -> bool {
        size == 0 || self.required_len(offset, size).is_some()
    }

    /// Grow to cover `offset..offset + size`, rounded up to whole words.
    ///
    /// Returns false when the end does not fit `usize` or would pass the
    /// limit. A zero `size` never grows memory.
    pub fn resize(&mut self, offset: usize, size: usize) -> bool {
        if size == 0 {
            return true;
        }
        match self.required_len(offset, size) {
            Some(new_len) => {
                if new_len > self.data.len() {
                    self.data.resize(new_len, 0);
                }
                true
            }
            None => false,
        }
    }

    /// Word-aligned length covering `offset..offset + size`, `None` past the limit
    fn required_len(&self, offset: usize, size: usize) -> Option<usize> {
        let end = offset.checked_add(size)?;
        if end <= self.data.len() {
            return Some(self.data.len());
        }
        let new_len = end.checked_next_multiple_of(32)?;
        (new_len <= self.limit).then_some(new_len)
    }

    /// Read `size` bytes at `offset`; bytes past the end read as zero
    pub fn get(&self, offset: usize, size: usize) -> Vec<u8> {
        let mut out = vec![0u8; size];
        if offset < self.data.len() {
            let end = offset.saturating_add(size).min(self.data.len());
            out[..end - offset].copy_from_slice(&self.data[offset..end]);
        }
        out
    }

    /// Read the big-endian word at `offset`
    pub fn get_word(&self, offset: usize) -> U256 {
        U256::from_big_endian(&self.get(offset, 32))
    }

    /// Write `size` bytes at `offset` from the front of `value`, zero-padding
    /// when `value` is shorter. The range must already be allocated.
    pub fn set(&mut self, offset: usize, value: &[u8], size: usize) -> Result<(), ExitError> {
        if size == 0 {
            return Ok(());
        }
        let end = offset.checked_add(size).ok_or(ExitError::InvalidRange)?;
        if end > self.data.len() {
            return Err(ExitError::InvalidRange);
        }
        let copied = value.len().min(size);
        self.data[offset..offset + copied].copy_from_slice(&value[..copied]);
        self.data[offset + copied..end].fill(0);
        Ok(())
    }

    /// Copy `size` bytes of `data` starting at `data_offset` into memory at
    /// `memory_offset`, zero-filling past the end of `data`
    pub fn copy_data(
        &mut self,
        memory_offset: usize,
        data_offset: usize,
        size: usize,
        data: &[u8],
    ) -> Result<(), ExitError> {
        if size == 0 {
            return Ok(());
        }
        let end = memory_offset.checked_add(size).ok_or(ExitError::InvalidRange)?;
        if end > self.data.len() {
            return Err(ExitError::InvalidRange);
        }
        let source = data.get(data_offset..).unwrap_or_default();
        let copied = source.len().min(size);
        self.data[memory_offset..memory_offset + copied].copy_from_slice(&source[..copied]);
        self.data[memory_offset + copied..end].fill(0);
        Ok(())
    }

    /// Copy `size` bytes from `src` to `dst` within memory; ranges may overlap
    pub fn copy_within(&mut self, dst: usize, src: usize, size: usize) -> Result<(), ExitError> {
        if size == 0 {
            return Ok(());
        }
        let src_end = src.checked_add(size).ok_or(ExitError::InvalidRange)?;
        let dst_end = dst.checked_add(size).ok_or(ExitError::InvalidRange)?;
        if src_end > self.data.len() || dst_end > self.data.len() {
            return Err(ExitError::InvalidRange);
        }
        self.data.copy_within(src..src_end, dst);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(MEMORY_LIMIT)
    }
}
