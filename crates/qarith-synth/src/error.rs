//! Error types for the synth crate.

use thiserror::Error;

/// Errors produced while synthesizing arithmetic gates.
///
/// Every variant is a construction-time failure: a gate is either built
/// completely or not at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Bit width is too small for the gate or too large for the constant
    /// arithmetic.
    #[error("Bit width must be between {min} and {max}, got {got}")]
    InvalidBitWidth {
        /// The rejected width.
        got: u32,
        /// Smallest width the gate accepts.
        min: u32,
        /// Largest supported width.
        max: u32,
    },

    /// Modulus must be at least 2.
    #[error("Modulus must be greater than 1, got {0}")]
    InvalidModulus(u64),

    /// Modulus does not fit the register it must be encoded in.
    #[error("Modulus {modulus} does not fit a {bits}-wire register")]
    ModulusTooWide {
        /// The modulus.
        modulus: u64,
        /// Register width.
        bits: u32,
    },

    /// A constant has no inverse modulo the modulus.
    #[error("{value} has no inverse modulo {modulus}")]
    NoModularInverse {
        /// The non-invertible constant.
        value: u64,
        /// The modulus.
        modulus: u64,
    },

    /// Configuration could not be parsed or is inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qarith_ir::IrError),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
