//! Two's-complement subtraction circuits.
//!
//! `a - b` is computed as `a + !b + 1` on two `w`-qubit registers:
//!
//! 1. **encode**: `X` on the 1-bits of `a` (register `a`) and `b` (register `b`)
//! 2. **negate**: `X` on every qubit of register `b`
//! 3. **add**: ripple-carry add register `b` into register `a` with carry-in 1
//!
//! The carry-in is realized by conjugating a carry-in-0 adder with `X` on both
//! registers, since `a + d + 1 = !(!a + !d) (mod 2^w)`. Register `a` ends
//! holding the difference and is measured into `c`; register `b` ends holding
//! `!b`.

use tracing::debug;

use qsub_ir::{Circuit, CircuitBuilder, ClbitId, IrResult, QubitId};

use crate::adder::ripple_carry_add;
use crate::error::{ArithError, ArithResult};

/// Widest register the subtractor builds. Results decode into `i64`.
pub const MAX_WIDTH: u32 = 32;

/// Label carried by the operand-encoding gates.
pub const STAGE_ENCODE: &str = "encode";
/// Label carried by the bitwise-NOT gates on register `b`.
pub const STAGE_NEGATE: &str = "negate";
/// Label carried by the adder gates, including the carry-in conjugation.
pub const STAGE_ADD: &str = "add";

/// Number of bits needed to write `value` in unsigned binary (0 for 0).
pub fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// Width chosen when the caller does not supply one:
/// `max(1, bit_length(max(|a|, |b|)) + 1)`, one sign bit above the magnitude.
pub fn auto_width(a: i64, b: i64) -> u32 {
    let magnitude = a.unsigned_abs().max(b.unsigned_abs());
    (bit_length(magnitude) + 1).max(1)
}

/// The `width`-bit two's-complement encoding of `value`.
///
/// Callers are expected to check that `value` fits; excess high bits are
/// discarded.
pub fn to_twos_complement(value: i64, width: u32) -> u64 {
    (value as u64) & width_mask(width)
}

/// Whether `value` is representable as a signed `width`-bit integer.
pub fn fits_width(value: i64, width: u32) -> bool {
    if width == 0 {
        return false;
    }
    if width >= i64::BITS {
        return true;
    }
    let half = 1_i64 << (width - 1);
    (-half..half).contains(&value)
}

fn width_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1_u64 << width) - 1
    }
}

/// Validate an explicit width against the supported range.
pub fn check_width(width: u32) -> ArithResult<u32> {
    if width == 0 || width > MAX_WIDTH {
        return Err(ArithError::InvalidBitWidth {
            width,
            max: MAX_WIDTH,
        });
    }
    Ok(width)
}

/// Builds the circuit computing `a - b`.
///
/// The circuit uses `2w` qubits. Widths up to [`MAX_WIDTH`] build, but the
/// default [`SimulatorConfig`](qsub_sim::SimulatorConfig) simulates at most 24
/// qubits, so widths above 12 need a raised `max_qubits` to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtractorBuilder {
    a: i64,
    b: i64,
    width: Option<u32>,
}

impl SubtractorBuilder {
    /// Subtract `b` from `a` with an automatically chosen width.
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b, width: None }
    }

    /// Use a fixed register width.
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// The register width that [`build`](Self::build) will use, validated.
    pub fn width(&self) -> ArithResult<u32> {
        let width = check_width(self.width.unwrap_or_else(|| auto_width(self.a, self.b)))?;
        for operand in [self.a, self.b] {
            if !fits_width(operand, width) {
                return Err(ArithError::OperandOutOfRange { operand, width });
            }
        }
        Ok(width)
    }

    /// Construct the circuit. The same inputs always give the same circuit.
    pub fn build(&self) -> ArithResult<SubtractionCircuit> {
        let width = self.width()?;

        let mut builder = CircuitBuilder::new(format!("subtract({}, {})", self.a, self.b));
        let reg_a = builder.add_qreg("a", width);
        let reg_b = builder.add_qreg("b", width);
        let creg = builder.add_creg("c", width);

        builder.stage(STAGE_ENCODE);
        encode(&mut builder, &reg_a, to_twos_complement(self.a, width))?;
        encode(&mut builder, &reg_b, to_twos_complement(self.b, width))?;

        builder.stage(STAGE_NEGATE);
        flip_all(&mut builder, &reg_b)?;

        builder.stage(STAGE_ADD);
        flip_all(&mut builder, &reg_a)?;
        flip_all(&mut builder, &reg_b)?;
        ripple_carry_add(&mut builder, &reg_b, &reg_a)?;
        flip_all(&mut builder, &reg_a)?;
        flip_all(&mut builder, &reg_b)?;

        builder.clear_stage();
        builder.measure_register(&reg_a, &creg)?;

        let circuit = builder.build();
        debug!(
            a = self.a,
            b = self.b,
            width,
            gates = circuit.gate_count(),
            "built subtraction circuit"
        );

        Ok(SubtractionCircuit {
            circuit,
            width,
            minuend: reg_a,
            subtrahend: reg_b,
            result: creg,
        })
    }
}

fn encode(builder: &mut CircuitBuilder, register: &[QubitId], bits: u64) -> IrResult<()> {
    for (i, &qubit) in register.iter().enumerate() {
        if (bits >> i) & 1 == 1 {
            builder.x(qubit)?;
        }
    }
    Ok(())
}

fn flip_all(builder: &mut CircuitBuilder, register: &[QubitId]) -> IrResult<()> {
    for &qubit in register {
        builder.x(qubit)?;
    }
    Ok(())
}

/// A built subtraction circuit and the registers it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtractionCircuit {
    circuit: Circuit,
    width: u32,
    minuend: Vec<QubitId>,
    subtrahend: Vec<QubitId>,
    result: Vec<ClbitId>,
}

impl SubtractionCircuit {
    /// The circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Register width `w`; the circuit has `2w` qubits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Register `a`, which ends holding `a - b`.
    pub fn minuend(&self) -> &[QubitId] {
        &self.minuend
    }

    /// Register `b`, which ends holding `!b`.
    pub fn subtrahend(&self) -> &[QubitId] {
        &self.subtrahend
    }

    /// Classical bits receiving the result, `c[i]` measuring `a[i]`.
    pub fn result_bits(&self) -> &[ClbitId] {
        &self.result
    }
}
