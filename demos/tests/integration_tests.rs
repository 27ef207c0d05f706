//! Integration tests for the demo suite.

use std::path::Path;

use qarith_demos::modexp::{MAX_SWEEP_BITS, op_counts, order, sweep, sweep_len};
use qarith_ir::{Backend, BasisStateBackend, Counts, IrResult, Program};
use qarith_synth::{SynthConfig, SynthError};

/// Reports a fixed, non-binary outcome for every program.
struct GarbledBackend;

impl Backend for GarbledBackend {
    fn name(&self) -> &str {
        "garbled"
    }

    fn run(&self, program: &Program) -> IrResult<Counts> {
        let mut counts = Counts::new();
        counts.record("01x1", u64::from(program.shots));
        Ok(counts)
    }
}

fn config_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

/// The bundled YAML config describes 7^x mod 15.
#[test]
fn test_shor15_config_sweep() {
    let config = SynthConfig::from_file(config_path("shor15.yaml")).unwrap();
    assert_eq!(config.resolved_bit_width(), 4);

    let gate = config.build_gate().unwrap();
    let rows = sweep(&config, &gate, &BasisStateBackend::new(), None).unwrap();
    assert_eq!(rows.len(), 16);
    assert!(rows.iter().all(|row| row.is_correct()));
    assert_eq!(rows[1].bitstring, "0111");
    assert_eq!(order(&rows), Some(4));
}

/// The bundled JSON config relies on defaults.
#[test]
fn test_json_config_defaults() {
    let config = SynthConfig::from_file(config_path("shor21.json")).unwrap();
    assert_eq!(config.resolved_bit_width(), 5);
    assert!(config.seed_with_one);
    assert_eq!(config.shots, 256);
}

#[test]
fn test_unseeded_sweep_stays_zero() {
    let config = SynthConfig {
        seed_with_one: false,
        ..SynthConfig::new(2, 3)
    };
    let gate = config.build_gate().unwrap();
    let rows = sweep(&config, &gate, &BasisStateBackend::new(), None).unwrap();
    assert!(rows.iter().all(|row| row.value == 0 && row.is_correct()));
    assert_eq!(order(&rows), None);
}

#[test]
fn test_op_counts_sorted() {
    let gate = SynthConfig::new(2, 3).build_gate().unwrap();
    let counts = op_counts(&gate);
    assert!(counts.windows(2).all(|w| w[0].1 >= w[1].1));
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), gate.num_ops());
}

#[test]
fn test_sweep_width_limit() {
    let config = SynthConfig {
        bit_width: Some(MAX_SWEEP_BITS + 1),
        ..SynthConfig::new(3, 5)
    };
    assert!(matches!(sweep_len(&config), Err(SynthError::Config(_))));
    let gate = config.build_gate().unwrap();
    assert!(matches!(
        sweep(&config, &gate, &BasisStateBackend::new(), None),
        Err(SynthError::Config(_))
    ));

    let config = SynthConfig::new(7, 15);
    assert_eq!(sweep_len(&config).unwrap(), 16);
}

#[test]
fn test_unreadable_bitstring_is_an_error() {
    let config = SynthConfig::new(2, 3);
    let gate = config.build_gate().unwrap();
    let err = sweep(&config, &gate, &GarbledBackend, None).unwrap_err();
    match err {
        SynthError::Config(message) => assert!(message.contains("garbled")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_config_file() {
    assert!(matches!(
        SynthConfig::from_file(config_path("missing.yaml")),
        Err(SynthError::Config(_))
    ));
}
