//! Jump destination analysis

use crate::opcode::Opcode;

/// Bitmap of legal jump targets, built once per code buffer.
///
/// A position is valid only if it starts an instruction (is not PUSH
/// immediate data) and that instruction is JUMPDEST.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Valids(Vec<bool>);

impl Valids {
    /// Scan `code`, skipping PUSH1..PUSH32 immediates
    pub fn new(code: &[u8]) -> Self {
        let mut valids = vec![false; code.len()];
        let mut i = 0;
        while i < code.len() {
            let byte = code[i];
            if byte == Opcode::JUMPDEST.as_u8() {
                valids[i] = true;
                i += 1;
            } else if let Some(op) = Opcode::from_byte(byte) {
                i += 1 + op.push_size();
            } else {
                i += 1;
            }
        }
        Self(valids)
    }

    /// Number of code positions covered
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if built from empty code
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether `position` is a legal jump target
    pub fn is_valid(&self, position: usize) -> bool {
        self.0.get(position).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_jumpdest() {
        // JUMPDEST STOP JUMPDEST
        let valids = Valids::new(&[0x5b, 0x00, 0x5b]);
        assert!(valids.is_valid(0));
        assert!(!valids.is_valid(1));
        assert!(valids.is_valid(2));
        assert!(!valids.is_valid(3));
        assert_eq!(valids.len(), 3);
    }

    #[test]
    fn test_push_data_is_skipped() {
        // PUSH1 0x5b JUMPDEST
        let valids = Valids::new(&[0x60, 0x5b, 0x5b]);
        assert!(!valids.is_valid(1));
        assert!(valids.is_valid(2));
    }

    #[test]
    fn test_push32_data_is_skipped() {
        let mut code = vec![0x7f];
        code.extend_from_slice(&[0x5b; 32]);
        code.push(0x5b);
        let valids = Valids::new(&code);
        for i in 0..33 {
            assert!(!valids.is_valid(i), "position {}", i);
        }
        assert!(valids.is_valid(33));
    }

    #[test]
    fn test_truncated_push() {
        // PUSH4 with only two immediate bytes
        let valids = Valids::new(&[0x63, 0x5b, 0x5b]);
        assert!(!valids.is_valid(1));
        assert!(!valids.is_valid(2));
    }

    #[test]
    fn test_push0_has_no_immediate() {
        // PUSH0 JUMPDEST
        let valids = Valids::new(&[0x5f, 0x5b]);
        assert!(valids.is_valid(1));
    }

    #[test]
    fn test_empty_code() {
        let valids = Valids::new(&[]);
        assert!(valids.is_empty());
        assert!(!valids.is_valid(0));
    }
}
