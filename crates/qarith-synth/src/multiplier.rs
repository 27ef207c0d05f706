//! Controlled multiplier by a compile-time constant modulo `M`.
//!
//! With the control set, `(x, 0)` becomes `(x, a·x mod M)`: for each bit
//! `x[i]` the constant `a·2^i mod M` is written into the `xx` register
//! under the double condition `ctrl & x[i]`, added into `y` modulo `M`, and
//! erased again by the same conditional writes. With the control clear the
//! additions see `xx = 0` and a final anti-controlled copy leaves `y = x`.
//!
//! The inner modular adder runs at width `2n - 1` so the accumulator `y`
//! gets `2n` wires.

use std::sync::Arc;

use qarith_ir::{Gate, GateBuilder, Layout, Register, Wire};

use crate::constants::{
    MIN_MULTIPLIER_BITS, bits_set, check_bit_width_from, check_residues_fit, mod_inverse, mod_mul,
};
use crate::error::SynthResult;
use crate::synthesizer::Synthesizer;

/// Register layout of an `n`-bit controlled multiplier.
#[derive(Debug, Clone)]
pub struct MultiplierLayout {
    /// Control, 1 wire.
    pub ctrl: Register,
    /// Multiplicand, `n` wires.
    pub x: Register,
    /// Product, `2n` wires.
    pub y: Register,
    /// Partial-product scratch, `2n - 1` wires.
    pub xx: Register,
    /// Carry scratch, `2n - 1` wires.
    pub c: Register,
    /// Modulus scratch, `2n - 1` wires.
    pub m: Register,
    /// Underflow flag, 1 wire.
    pub t: Register,
}

impl MultiplierLayout {
    /// Layout for `bits`-bit operands.
    pub fn new(bits: u32) -> Self {
        let inner = 2 * bits - 1;
        let mut layout = Layout::new();
        Self {
            ctrl: layout.alloc("ctrl", 1),
            x: layout.alloc("x", bits),
            y: layout.alloc("y", 2 * bits),
            xx: layout.alloc("xx", inner),
            c: layout.alloc("c", inner),
            m: layout.alloc("m", inner),
            t: layout.alloc("t", 1),
        }
    }

    /// Total number of wires, `9n - 1`.
    pub fn width(&self) -> u32 {
        self.t.range().end
    }

    /// Operand width of the embedded modular adder.
    pub fn inner_bits(&self) -> u32 {
        self.xx.len()
    }

    /// Wires the modular adder is applied to, in its own `(a, b, c, m, t)`
    /// order.
    pub fn adder_wires(&self) -> Vec<Wire> {
        Layout::concat(&[&self.xx, &self.y, &self.c, &self.m, &self.t])
    }
}

pub(crate) fn build(
    synth: &mut Synthesizer,
    factor: u64,
    modulus: u64,
    bits: u32,
) -> SynthResult<Arc<Gate>> {
    check_bit_width_from(bits, MIN_MULTIPLIER_BITS)?;
    check_residues_fit(modulus, bits)?;

    let l = MultiplierLayout::new(bits);
    let add_mod = synth.modular_adder(modulus, l.inner_bits())?;
    let adder_wires = l.adder_wires();
    let ctrl = l.ctrl.wire(0);

    let mut g = GateBuilder::new(
        format!("cmul_mod(a={factor},M={modulus},n={bits})"),
        l.width(),
    );

    // partial = factor * 2^i mod M
    let mut partial = factor % modulus;
    for i in 0..bits {
        let xi = l.x.wire(i);
        let targets: Vec<Wire> = bits_set(partial).into_iter().map(|j| l.xx.wire(j)).collect();

        for &w in &targets {
            g.ccx(ctrl, xi, w)?;
        }
        g.append(&add_mod, adder_wires.iter().copied())?;
        for &w in &targets {
            g.ccx(ctrl, xi, w)?;
        }

        partial = mod_mul(partial, 2, modulus);
    }

    g.x(ctrl)?;
    for i in 0..bits {
        g.ccx(ctrl, l.x.wire(i), l.y.wire(i))?;
    }
    g.x(ctrl)?;

    Ok(g.build())
}

/// Inverse of the forward multiplier for the inverse of `factor`.
///
/// Maps `(x, factor⁻¹·x mod M)` back to `(x, 0)` under a set control.
pub(crate) fn build_inverse(
    synth: &mut Synthesizer,
    factor: u64,
    modulus: u64,
    bits: u32,
) -> SynthResult<Arc<Gate>> {
    check_bit_width_from(bits, MIN_MULTIPLIER_BITS)?;
    check_residues_fit(modulus, bits)?;
    let inverse_factor = mod_inverse(factor, modulus)?;
    let forward = synth.controlled_modular_multiplier(inverse_factor, modulus, bits)?;
    Ok(Arc::new(forward.inverse()))
}

/// Controlled multiplication by `multiplier` modulo `modulus` over
/// `9 * bits - 1` wires.
///
/// Requires `1 < modulus <= 2^bits` and `bits >= 2`.
pub fn controlled_modular_multiplier_gate(
    multiplier: u64,
    modulus: u64,
    bits: u32,
) -> SynthResult<Arc<Gate>> {
    Synthesizer::new().controlled_modular_multiplier(multiplier, modulus, bits)
}

/// Inverse of the controlled multiplier by `multiplier⁻¹ mod modulus`.
///
/// Fails when `multiplier` is not invertible modulo `modulus`.
pub fn inverse_controlled_modular_multiplier_gate(
    multiplier: u64,
    modulus: u64,
    bits: u32,
) -> SynthResult<Arc<Gate>> {
    Synthesizer::new().inverse_controlled_modular_multiplier(multiplier, modulus, bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use qarith_ir::BitState;

    fn multiply(gate: &Gate, bits: u32, ctrl: bool, x: u64, y: u64) -> (BitState, MultiplierLayout) {
        let layout = MultiplierLayout::new(bits);
        let mut state = BitState::zeros(layout.width());
        state.store(&layout.ctrl, u64::from(ctrl)).unwrap();
        state.store(&layout.x, x).unwrap();
        state.store(&layout.y, y).unwrap();
        state.apply_gate(gate).unwrap();
        (state, layout)
    }

    #[test]
    fn test_two_times_two_mod_three() {
        let gate = controlled_modular_multiplier_gate(2, 3, 2).unwrap();
        let (state, l) = multiply(&gate, 2, true, 2, 0);
        assert_eq!(state.load(&l.y), 1);
        assert_eq!(state.load(&l.x), 2);
        assert_eq!(state.load(&l.ctrl), 1);
    }

    #[test]
    fn test_clear_control_copies() {
        let gate = controlled_modular_multiplier_gate(2, 3, 2).unwrap();
        for x in 0..4 {
            let (state, l) = multiply(&gate, 2, false, x, 0);
            assert_eq!(state.load(&l.y), x);
            assert_eq!(state.load(&l.x), x);
        }
    }

    #[test]
    fn test_exhaustive_three_bits() {
        for modulus in 2..=8u64 {
            for factor in 0..modulus {
                let gate = controlled_modular_multiplier_gate(factor, modulus, 3).unwrap();
                for x in 0..8 {
                    let (state, l) = multiply(&gate, 3, true, x, 0);
                    assert_eq!(
                        state.load(&l.y),
                        mod_mul(factor, x, modulus),
                        "{factor} * {x} mod {modulus}"
                    );
                    assert!(state.is_zero_outside(&[&l.ctrl, &l.x, &l.y]));
                }
            }
        }
    }

    #[test]
    fn test_inverse_uncomputes_product() {
        // 7 * 13 = 1 mod 15
        let inverse = inverse_controlled_modular_multiplier_gate(7, 15, 4).unwrap();
        for x in 0..15 {
            let y = mod_mul(13, x, 15);
            let (state, l) = multiply(&inverse, 4, true, x, y);
            assert_eq!(state.load(&l.y), 0, "x = {x}");
            assert_eq!(state.load(&l.x), x);

            let (state, l) = multiply(&inverse, 4, false, x, x);
            assert_eq!(state.load(&l.y), 0);
        }
    }

    #[test]
    fn test_arity() {
        let gate = controlled_modular_multiplier_gate(2, 3, 2).unwrap();
        assert_eq!(gate.arity(), 17);
        assert_eq!(MultiplierLayout::new(4).width(), 35);
        assert_eq!(MultiplierLayout::new(4).inner_bits(), 7);
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            inverse_controlled_modular_multiplier_gate(6, 15, 4),
            Err(SynthError::NoModularInverse { value: 6, modulus: 15 })
        ));
        assert!(matches!(
            controlled_modular_multiplier_gate(2, 9, 3),
            Err(SynthError::ModulusTooWide { modulus: 9, bits: 3 })
        ));
        assert!(matches!(
            controlled_modular_multiplier_gate(1, 0, 3),
            Err(SynthError::InvalidModulus(0))
        ));
    }

    #[test]
    fn test_one_bit_is_rejected() {
        assert!(matches!(
            controlled_modular_multiplier_gate(1, 2, 1),
            Err(SynthError::InvalidBitWidth { got: 1, min: 2, .. })
        ));
        assert!(matches!(
            inverse_controlled_modular_multiplier_gate(1, 2, 1),
            Err(SynthError::InvalidBitWidth { got: 1, min: 2, .. })
        ));
    }
}
