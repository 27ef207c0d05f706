//! The two fixed building blocks of the ripple-carry adder.
//!
//! ```text
//! carry (c_in, a, b, c_out):        sum (c_in, a, b):
//!   c_out ^= a & b                    b ^= a
//!   b     ^= a                        b ^= c_in
//!   c_out ^= c_in & b
//! ```
//!
//! After `carry`, `c_out` holds the full-adder carry and `b` holds `a ^ b`;
//! the caller restores `b` with an inverse `carry` or a compensating CNOT.

use std::sync::Arc;

use qarith_ir::{Gate, GateBuilder, Wire};

use crate::error::SynthResult;
use crate::synthesizer::Synthesizer;

/// Wires of the carry gate.
pub const CARRY_ARITY: u32 = 4;

/// Wires of the sum gate.
pub const SUM_ARITY: u32 = 3;

pub(crate) fn build_carry() -> SynthResult<Arc<Gate>> {
    let (c_in, a, b, c_out) = (Wire(0), Wire(1), Wire(2), Wire(3));
    let mut g = GateBuilder::new("carry", CARRY_ARITY);
    g.ccx(a, b, c_out)?.cx(a, b)?.ccx(c_in, b, c_out)?;
    Ok(g.build())
}

pub(crate) fn build_sum() -> SynthResult<Arc<Gate>> {
    let (c_in, a, b) = (Wire(0), Wire(1), Wire(2));
    let mut g = GateBuilder::new("sum", SUM_ARITY);
    g.cx(a, b)?.cx(c_in, b)?;
    Ok(g.build())
}

/// The 4-wire carry gate over `(c_in, a, b, c_out)`.
pub fn carry_gate() -> SynthResult<Arc<Gate>> {
    Synthesizer::new().carry()
}

/// The 3-wire sum gate over `(c_in, a, b)`.
pub fn sum_gate() -> SynthResult<Arc<Gate>> {
    Synthesizer::new().sum()
}
