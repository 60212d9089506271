//! Named registers: contiguous spans of qubits or classical bits.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A named, contiguous span of circuit-wide indices.
///
/// Register `b` of width 4 allocated after a 4-qubit register `a` spans
/// `4..8`; qubit 5 prints as `b[1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    name: String,
    span: Range<u32>,
}

impl Register {
    /// A register covering `span`.
    pub fn new(name: impl Into<String>, span: Range<u32>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// The register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Circuit-wide indices covered by the register.
    pub fn span(&self) -> Range<u32> {
        self.span.clone()
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Whether the register is empty.
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// `name[offset]` for a circuit-wide index inside the register.
    pub fn label(&self, index: u32) -> Option<String> {
        self.span
            .contains(&index)
            .then(|| format!("{}[{}]", self.name, index - self.span.start))
    }
}

/// Label `index` by the first register containing it.
pub(crate) fn label_in(registers: &[Register], index: u32) -> Option<String> {
    registers.iter().find_map(|reg| reg.label(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_offset_within_span() {
        let b = Register::new("b", 4..8);
        assert_eq!(b.len(), 4);
        assert_eq!(b.label(5).as_deref(), Some("b[1]"));
        assert_eq!(b.label(3), None);
        assert_eq!(b.label(8), None);
    }

    #[test]
    fn test_label_in_searches_every_register() {
        let regs = [Register::new("a", 0..2), Register::new("b", 2..4)];
        assert_eq!(label_in(&regs, 0).as_deref(), Some("a[0]"));
        assert_eq!(label_in(&regs, 3).as_deref(), Some("b[1]"));
        assert_eq!(label_in(&regs, 4), None);
        assert!(Register::new("empty", 2..2).is_empty());
    }
}
