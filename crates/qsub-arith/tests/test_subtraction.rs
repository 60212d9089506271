//! End-to-end subtraction scenarios.

use qsub_arith::{
    ArithError, STAGE_ENCODE, Subtraction, SubtractorBuilder, decode_counts, subtract,
};
use qsub_ir::StandardGate;
use qsub_sim::{SimError, Simulator, SimulatorConfig};

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn ten_minus_five() {
    let exact = Subtraction::new(10, 5).exact().unwrap();
    assert_eq!(exact.value, 5);
    assert!(exact.width >= 5, "width must cover values up to 15");
    assert!(!exact.overflow);
}

#[test]
fn three_minus_two_with_1024_shots() {
    let outcome = Subtraction::new(3, 2).seed(2024).run().unwrap();
    assert_eq!(outcome.value, 1);
    assert_eq!(outcome.counts.total(), 1024);

    let (top, _) = outcome.counts.most_frequent().unwrap();
    assert_eq!(top, "001");
}

#[test]
fn zero_minus_zero_encodes_nothing() {
    let sub = SubtractorBuilder::new(0, 0).build().unwrap();
    assert_eq!(sub.circuit().stage(STAGE_ENCODE).count(), 0);

    let outcome = subtract(0, 0, 100).unwrap();
    assert_eq!(outcome.value, 0);
    assert_eq!(outcome.counts.get("0"), 100);
}

#[test]
fn two_minus_five_is_negative() {
    let outcome = Subtraction::new(2, 5).seed(5).run().unwrap();
    assert_eq!(outcome.value, -3);
    assert_eq!(outcome.width, 4);
    assert_eq!(outcome.counts.get("1101"), 1024);
    assert!(!outcome.overflow);
}

#[test]
fn zero_shots_is_an_empty_histogram_error() {
    let err = Subtraction::new(3, 2).shots(0).run().unwrap_err();
    assert!(matches!(err, ArithError::EmptyHistogram));
}

// ---------------------------------------------------------------------------
// Widths and overflow
// ---------------------------------------------------------------------------

#[test]
fn overflow_wraps_and_is_flagged() {
    let outcome = Subtraction::new(3, -3).exact().unwrap();
    assert_eq!(outcome.width, 3);
    assert_eq!(outcome.value, -2);
    assert!(outcome.overflow);
}

#[test]
fn explicit_width_avoids_overflow() {
    let outcome = Subtraction::new(3, -3).width(4).exact().unwrap();
    assert_eq!(outcome.value, 6);
    assert!(!outcome.overflow);
}

#[test]
fn width_zero_is_rejected() {
    assert!(matches!(
        Subtraction::new(1, 0).width(0).run(),
        Err(ArithError::InvalidBitWidth { width: 0, .. })
    ));
}

#[test]
fn operand_outside_width_is_rejected() {
    assert!(matches!(
        Subtraction::new(-9, 0).width(4).exact(),
        Err(ArithError::OperandOutOfRange { operand: -9, .. })
    ));
}

#[test]
fn simulator_limits_surface_as_sim_errors() {
    let config = SimulatorConfig::new().with_max_qubits(4);
    let err = Subtraction::new(10, 5).config(config).exact().unwrap_err();
    assert!(matches!(err, ArithError::Sim(_)));
}

#[test]
fn default_qubit_limit_caps_automatic_width_at_twelve() {
    assert_eq!(SubtractorBuilder::new(2047, 0).build().unwrap().width(), 12);
    assert_eq!(SubtractorBuilder::new(2048, 0).build().unwrap().width(), 13);

    let err = subtract(2048, 0, 1).unwrap_err();
    assert!(matches!(
        err,
        ArithError::Sim(SimError::CircuitTooLarge {
            num_qubits: 26,
            max_qubits: 24
        })
    ));
}

// ---------------------------------------------------------------------------
// Circuit structure
// ---------------------------------------------------------------------------

#[test]
fn circuit_has_two_registers_of_width() {
    for (a, b) in [(0, 0), (1, 1), (10, 5), (-100, 27), (1_000, -1)] {
        let sub = SubtractorBuilder::new(a, b).build().unwrap();
        assert_eq!(sub.circuit().num_qubits(), 2 * sub.width() as usize);
        assert_eq!(sub.circuit().num_clbits(), sub.width() as usize);
    }
}

#[test]
fn only_permutation_gates_are_emitted() {
    let sub = SubtractorBuilder::new(-13, 6).build().unwrap();
    for inst in sub.circuit().gates() {
        let kind = inst.as_gate().map(|g| g.kind);
        assert!(matches!(
            kind,
            Some(StandardGate::X | StandardGate::CX | StandardGate::CCX)
        ));
    }
}

#[test]
fn subtrahend_register_ends_complemented() {
    let sub = SubtractorBuilder::new(5, 3).with_width(4).build().unwrap();
    let sv = Simulator::new().statevector(sub.circuit()).unwrap();
    let index = sv
        .probabilities()
        .iter()
        .position(|&p| p > 0.5)
        .unwrap();

    assert_eq!(index & 0b1111, 2);
    assert_eq!(index >> 4, !3 & 0b1111);
}

#[test]
fn sampled_histogram_decodes_like_pipeline() {
    let sub = SubtractorBuilder::new(-6, -6).build().unwrap();
    let sim = Simulator::with_config(SimulatorConfig::new().with_seed(3)).unwrap();
    let result = sim.execute(sub.circuit(), 333).unwrap();

    assert_eq!(result.counts.total(), 333);
    let decoded = decode_counts(&result.counts, sub.width()).unwrap();
    assert_eq!(decoded.value, 0);
    assert_eq!(decoded.count, 333);
}

#[test]
fn outcome_serializes_to_json() {
    let outcome = subtract(7, 2, 8).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["value"], 5);
    assert_eq!(json["counts"]["0101"], 8);
    assert_eq!(json["overflow"], false);
}
