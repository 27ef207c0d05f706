//! Ripple-carry adder.
//!
//! Maps `(A, B, 0)` to `(A, A + B, 0)` where `A` has `n` wires, `B` has
//! `n + 1` wires (the extra wire receives the final carry) and `C` holds
//! `n` scratch carries. The forward pass propagates carries upwards, the
//! second pass walks back down undoing every carry while writing the sum
//! bits, so `C` ends at zero.
//!
//! Running the gate inverted computes `B - A` modulo `2^(n+1)`; the modular
//! adder uses that as its subtractor.

use std::sync::Arc;

use qarith_ir::{Gate, GateBuilder, Layout, Register};

use crate::constants::check_bit_width;
use crate::error::SynthResult;
use crate::synthesizer::Synthesizer;

/// Register layout of an `n`-bit adder.
#[derive(Debug, Clone)]
pub struct AdderLayout {
    /// Addend, `n` wires.
    pub a: Register,
    /// Accumulator and result, `n + 1` wires.
    pub b: Register,
    /// Scratch carries, `n` wires.
    pub c: Register,
}

impl AdderLayout {
    /// Layout for `bits`-bit operands.
    pub fn new(bits: u32) -> Self {
        let mut layout = Layout::new();
        Self {
            a: layout.alloc("a", bits),
            b: layout.alloc("b", bits + 1),
            c: layout.alloc("c", bits),
        }
    }

    /// Total number of wires, `3n + 1`.
    pub fn width(&self) -> u32 {
        self.c.range().end
    }
}

pub(crate) fn build(synth: &mut Synthesizer, bits: u32) -> SynthResult<Arc<Gate>> {
    check_bit_width(bits)?;
    let carry = synth.carry()?;
    let sum = synth.sum()?;

    let AdderLayout { a, b, c } = AdderLayout::new(bits);
    let top = bits - 1;
    let mut g = GateBuilder::new(format!("adder(n={bits})"), 3 * bits + 1);

    for i in 0..top {
        g.append(&carry, [c.wire(i), a.wire(i), b.wire(i), c.wire(i + 1)])?;
    }
    g.append(&carry, [c.wire(top), a.wire(top), b.wire(top), b.wire(bits)])?;
    g.cx(a.wire(top), b.wire(top))?;
    g.append(&sum, [c.wire(top), a.wire(top), b.wire(top)])?;

    for i in (0..top).rev() {
        g.append_inverse(&carry, [c.wire(i), a.wire(i), b.wire(i), c.wire(i + 1)])?;
        g.append(&sum, [c.wire(i), a.wire(i), b.wire(i)])?;
    }

    Ok(g.build())
}

/// The `bits`-bit ripple-carry adder over `3 * bits + 1` wires.
pub fn adder_gate(bits: u32) -> SynthResult<Arc<Gate>> {
    Synthesizer::new().adder(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use qarith_ir::BitState;

    fn add(bits: u32, x: u64, y: u64) -> BitState {
        let layout = AdderLayout::new(bits);
        let gate = adder_gate(bits).unwrap();
        let mut state = BitState::zeros(layout.width());
        state.store(&layout.a, x).unwrap();
        state.store(&layout.b, y).unwrap();
        state.apply_gate(&gate).unwrap();
        state
    }

    #[test]
    fn test_two_bit_scenario() {
        // 3 + 1 = 4: b = 001 becomes 100, a stays 11
        let layout = AdderLayout::new(2);
        let state = add(2, 3, 1);
        assert_eq!(state.load(&layout.b), 4);
        assert_eq!(state.load(&layout.a), 3);
        assert_eq!(state.load(&layout.c), 0);
        assert_eq!(state.bitstring(&layout.b.wires().collect::<Vec<_>>()), "100");
    }

    #[test]
    fn test_exhaustive_three_bits() {
        let layout = AdderLayout::new(3);
        for x in 0..8 {
            for y in 0..8 {
                let state = add(3, x, y);
                assert_eq!(state.load(&layout.b), x + y, "{x} + {y}");
                assert_eq!(state.load(&layout.a), x);
                assert_eq!(state.load(&layout.c), 0);
            }
        }
    }

    #[test]
    fn test_one_bit_adder() {
        let layout = AdderLayout::new(1);
        assert_eq!(layout.width(), 4);
        for x in 0..2 {
            for y in 0..2 {
                assert_eq!(add(1, x, y).load(&layout.b), x + y);
            }
        }
    }

    #[test]
    fn test_inverse_subtracts() {
        let layout = AdderLayout::new(3);
        let gate = adder_gate(3).unwrap().inverse();
        let mut state = BitState::zeros(layout.width());
        state.store(&layout.a, 5).unwrap();
        state.store(&layout.b, 2).unwrap();
        state.apply_gate(&gate).unwrap();
        // 2 - 5 mod 16
        assert_eq!(state.load(&layout.b), 13);
        assert_eq!(state.load(&layout.c), 0);
    }

    #[test]
    fn test_arity() {
        for bits in 1..6 {
            let gate = adder_gate(bits).unwrap();
            assert_eq!(gate.arity(), 3 * bits + 1);
            assert_eq!(AdderLayout::new(bits).width(), gate.arity());
        }
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(matches!(
            adder_gate(0),
            Err(SynthError::InvalidBitWidth { got: 0, .. })
        ));
    }
}
