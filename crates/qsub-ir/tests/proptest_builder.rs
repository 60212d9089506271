//! Property-based tests for circuit construction.
//!
//! Builder validation must be all-or-nothing: a rejected gate leaves the
//! instruction list untouched, and an accepted one is appended verbatim.

use proptest::prelude::*;
use qsub_ir::{CircuitBuilder, IrError, QubitId, StandardGate};

/// A gate with arbitrary (possibly invalid) operands.
#[derive(Debug, Clone)]
struct GateOp {
    kind: StandardGate,
    qubits: Vec<u32>,
}

fn arb_gate_op(max_index: u32) -> impl Strategy<Value = GateOp> {
    let kind = prop_oneof![
        Just(StandardGate::X),
        Just(StandardGate::CZ),
        Just(StandardGate::CX),
        Just(StandardGate::CCX),
    ];
    kind.prop_flat_map(move |kind| {
        prop::collection::vec(0..max_index, kind.num_qubits() as usize)
            .prop_map(move |qubits| GateOp { kind, qubits })
    })
}

proptest! {
    #[test]
    fn rejected_gates_leave_builder_untouched(
        num_qubits in 1_u32..=6,
        ops in prop::collection::vec(arb_gate_op(8), 1..=20),
    ) {
        let mut builder = CircuitBuilder::with_size("prop", num_qubits, 0);
        let mut accepted = 0_usize;

        for op in &ops {
            let before = builder.clone().build();
            let qubits: Vec<_> = op.qubits.iter().copied().map(QubitId).collect();
            let outcome = builder.gate(op.kind, qubits.clone()).map(|_| ());
            match outcome {
                Ok(_) => {
                    accepted += 1;
                    prop_assert!(qubits.iter().all(|q| q.0 < num_qubits));
                }
                Err(IrError::InvalidQubitIndex { qubit, num_qubits: n, .. }) => {
                    prop_assert!(qubit.0 >= n);
                    prop_assert_eq!(builder.clone().build(), before);
                }
                Err(IrError::DuplicateQubit { .. }) => {
                    prop_assert_eq!(builder.clone().build(), before);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }

        prop_assert_eq!(builder.build().gate_count(), accepted);
    }

    #[test]
    fn identical_inputs_build_identical_circuits(
        ops in prop::collection::vec(arb_gate_op(4), 0..=20),
    ) {
        let build = || {
            let mut builder = CircuitBuilder::with_size("prop", 4, 0);
            for op in &ops {
                let _ = builder.gate(op.kind, op.qubits.iter().copied().map(QubitId));
            }
            builder.build()
        };
        prop_assert_eq!(build(), build());
    }
}
