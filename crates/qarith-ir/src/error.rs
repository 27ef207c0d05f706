//! Error types for the IR crate.

use crate::wire::Wire;
use thiserror::Error;

/// Errors that can occur while building or evaluating gates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A step references a wire outside the enclosing gate.
    #[error("Wire {wire} out of range for {arity}-wire gate{}", format_gate_context(.gate_name))]
    WireOutOfRange {
        /// The offending wire.
        wire: Wire,
        /// Arity of the enclosing gate.
        arity: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// The same wire appears twice in one operation or binding.
    #[error("Duplicate wire {wire} in operation{}", format_gate_context(.gate_name))]
    DuplicateWire {
        /// The duplicate wire.
        wire: Wire,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A sub-gate was bound to the wrong number of wires.
    #[error("Gate '{gate_name}' requires {expected} wires, got {got}")]
    WireCountMismatch {
        /// Name of the embedded gate.
        gate_name: String,
        /// Declared arity of the embedded gate.
        expected: u32,
        /// Length of the supplied binding.
        got: u32,
    },

    /// A state vector does not match the gate it is applied to.
    #[error("State has {got} wires but gate '{gate_name}' needs {expected}")]
    StateWidthMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Arity of the gate.
        expected: u32,
        /// Width of the state.
        got: u32,
    },

    /// A classical value does not fit into a register.
    #[error("Value {value} does not fit into {bits}-wire register '{register}'")]
    ValueTooWide {
        /// The value to store.
        value: u64,
        /// Width of the register.
        bits: u32,
        /// Register name.
        register: String,
    },

    /// The execution collaborator rejected or failed a program.
    #[error("Backend '{backend}' failed: {reason}")]
    Backend {
        /// Backend name.
        backend: String,
        /// Failure description.
        reason: String,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_gate_context() {
        let err = IrError::WireOutOfRange {
            wire: Wire(7),
            arity: 4,
            gate_name: Some("carry".into()),
        };
        assert_eq!(
            err.to_string(),
            "Wire w7 out of range for 4-wire gate (gate: carry)"
        );

        let err = IrError::DuplicateWire {
            wire: Wire(1),
            gate_name: None,
        };
        assert_eq!(err.to_string(), "Duplicate wire w1 in operation");
    }
}
