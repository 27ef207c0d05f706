//! Hand-off to an execution backend.
//!
//! A [`Program`] is everything an execution collaborator needs: the total
//! wire count, the flat operation list, the measured wires and a shot count.
//! A [`Backend`] runs a program and returns [`Counts`], a histogram of the
//! observed bitstrings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::operation::Operation;
use crate::state::BitState;
use crate::wire::Wire;

/// A flattened circuit ready for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Total number of wires.
    pub num_wires: u32,
    /// Operations in execution order.
    pub operations: Vec<Operation>,
    /// Wires to measure; the first wire is the least significant bit of the
    /// reported bitstring.
    pub measured: Vec<Wire>,
    /// Number of repetitions.
    pub shots: u32,
}

impl Program {
    /// Flatten `gate` into a program measuring `measured`.
    pub fn from_gate(
        gate: &Gate,
        measured: impl IntoIterator<Item = Wire>,
        shots: u32,
    ) -> IrResult<Self> {
        let measured: Vec<Wire> = measured.into_iter().collect();
        for &wire in &measured {
            if wire.0 >= gate.arity() {
                return Err(IrError::WireOutOfRange {
                    wire,
                    arity: gate.arity(),
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }
        Ok(Self {
            num_wires: gate.arity(),
            operations: gate.flatten(),
            measured,
            shots,
        })
    }

    /// Prepend inversions so execution starts from the basis state with
    /// exactly `wires` set.
    pub fn prepare(&mut self, wires: impl IntoIterator<Item = Wire>) -> IrResult<&mut Self> {
        let mut prep = vec![];
        for wire in wires {
            if wire.0 >= self.num_wires {
                return Err(IrError::WireOutOfRange {
                    wire,
                    arity: self.num_wires,
                    gate_name: None,
                });
            }
            prep.push(Operation::Not { target: wire });
        }
        prep.append(&mut self.operations);
        self.operations = prep;
        Ok(self)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Histogram of measured bitstrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n` observations of `bitstring`.
    pub fn record(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Occurrences of `bitstring`.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The most frequent bitstring, ties broken by lexical order.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// Iterate over `(bitstring, count)` pairs in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// An execution collaborator.
pub trait Backend: Send + Sync {
    /// Backend name used in logs and errors.
    fn name(&self) -> &str;

    /// Execute `program` and return the measurement histogram.
    fn run(&self, program: &Program) -> IrResult<Counts>;
}

/// Executes permutation programs on the all-zero basis state.
///
/// Without superposition the outcome is deterministic, so every shot lands
/// on the same bitstring.
#[derive(Debug, Clone)]
pub struct BasisStateBackend {
    max_wires: u32,
}

impl BasisStateBackend {
    /// Create a backend accepting programs of any width.
    pub fn new() -> Self {
        Self {
            max_wires: u32::MAX,
        }
    }

    /// Limit the number of wires a program may use.
    #[must_use]
    pub fn with_max_wires(mut self, max_wires: u32) -> Self {
        self.max_wires = max_wires;
        self
    }
}

impl Default for BasisStateBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for BasisStateBackend {
    fn name(&self) -> &str {
        "basis_state"
    }

    fn run(&self, program: &Program) -> IrResult<Counts> {
        if program.num_wires > self.max_wires {
            return Err(IrError::Backend {
                backend: self.name().to_string(),
                reason: format!(
                    "program uses {} wires, backend supports {}",
                    program.num_wires, self.max_wires
                ),
            });
        }
        debug!(
            "Running {} operations on {} wires, {} shots",
            program.operations.len(),
            program.num_wires,
            program.shots
        );

        let mut state = BitState::zeros(program.num_wires);
        for op in &program.operations {
            for wire in op.wires() {
                if wire.0 >= program.num_wires {
                    return Err(IrError::WireOutOfRange {
                        wire,
                        arity: program.num_wires,
                        gate_name: None,
                    });
                }
            }
            state.apply_op(op);
        }

        let mut counts = Counts::new();
        if program.shots > 0 {
            counts.record(state.bitstring(&program.measured), u64::from(program.shots));
        }
        Ok(counts)
    }
}
