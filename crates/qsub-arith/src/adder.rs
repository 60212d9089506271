//! In-place ripple-carry addition.
//!
//! Implements the ancilla-free adder of Takahashi, Tani and Kunihiro
//! (arXiv:0910.2530). Carries ripple from the least to the most significant
//! position along the addend wires, so a pair of `n`-qubit registers needs no
//! extra qubits. The addend register is restored when the adder finishes.
//!
//! Gate count for `n` bits: `7n - 8` for `n >= 2` (`2n - 2` Toffolis), and a
//! single `CX` for `n = 1`.

use qsub_ir::{CircuitBuilder, IrError, IrResult, QubitId};

/// Append gates computing `target += addend (mod 2^n)`.
///
/// Both slices are little-endian (`[0]` is the least significant bit) and must
/// have the same length. An empty pair appends nothing.
pub fn ripple_carry_add(
    builder: &mut CircuitBuilder,
    addend: &[QubitId],
    target: &[QubitId],
) -> IrResult<()> {
    if addend.len() != target.len() {
        return Err(IrError::QubitCountMismatch {
            gate_name: "ripple_carry_add".into(),
            expected: target.len() as u32,
            got: addend.len() as u32,
        });
    }
    let n = addend.len();
    if n == 0 {
        return Ok(());
    }
    let (a, b) = (addend, target);

    for i in 1..n {
        builder.cx(a[i], b[i])?;
    }
    for i in (1..n.saturating_sub(1)).rev() {
        builder.cx(a[i], a[i + 1])?;
    }
    // Carry chain.
    for i in 0..n - 1 {
        builder.ccx(a[i], b[i], a[i + 1])?;
    }
    // Uncompute carries while writing sum bits, most significant first.
    for i in (1..n).rev() {
        builder.cx(a[i], b[i])?;
        builder.ccx(a[i - 1], b[i - 1], a[i])?;
    }
    for i in 1..n.saturating_sub(1) {
        builder.cx(a[i], a[i + 1])?;
    }
    for i in 0..n {
        builder.cx(a[i], b[i])?;
    }
    Ok(())
}
