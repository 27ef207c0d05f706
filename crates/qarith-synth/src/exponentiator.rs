//! Modular exponentiation by a compile-time base.
//!
//! Maps the exponent register `x` and a scratch register holding `s` to
//! `(x, s·a^x mod M)`. Each exponent bit `x[i]` controls one round:
//!
//! ```text
//! y        = a^(2^i) · scratch            multiply into the clean register
//! scratch <-> y                           only if x[i] is set
//! y        = 0                            inverse multiply by a^(-2^i)
//! ```
//!
//! With `x[i]` clear the multiplier copies `scratch` into `y`, nothing is
//! swapped and the inverse multiplier erases the copy. Either way `y` is
//! zero after every round, so all other registers stay clean.

use std::sync::Arc;

use tracing::instrument;

use qarith_ir::{Gate, GateBuilder, Layout, Register, Wire};

use crate::constants::{
    MIN_MULTIPLIER_BITS, check_bit_width_from, check_residues_fit, mod_inverse, mod_pow2k,
};
use crate::error::SynthResult;
use crate::synthesizer::Synthesizer;

/// Register layout of an `n`-bit modular exponentiator.
#[derive(Debug, Clone)]
pub struct ExponentiatorLayout {
    /// Exponent, `n` wires.
    pub x: Register,
    /// Accumulator holding the result, `n` wires.
    pub scratch: Register,
    /// Multiplier product, `2n` wires. Zero between rounds.
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

impl ExponentiatorLayout {
    /// Layout for a `bits`-bit exponent and modulus.
    pub fn new(bits: u32) -> Self {
        let inner = 2 * bits - 1;
        let mut layout = Layout::new();
        Self {
            x: layout.alloc("x", bits),
            scratch: layout.alloc("scratch", bits),
            y: layout.alloc("y", 2 * bits),
            xx: layout.alloc("xx", inner),
            c: layout.alloc("c", inner),
            m: layout.alloc("m", inner),
            t: layout.alloc("t", 1),
        }
    }

    /// Total number of wires, `10n - 2`.
    pub fn width(&self) -> u32 {
        self.t.range().end
    }

    /// Wires a round's multiplier is applied to, in
    /// [`MultiplierLayout`](crate::multiplier::MultiplierLayout)
    /// order, controlled by exponent bit `i`.
    pub fn multiplier_wires(&self, i: u32) -> Vec<Wire> {
        let mut wires = vec![self.x.wire(i)];
        wires.extend(Layout::concat(&[
            &self.scratch,
            &self.y,
            &self.xx,
            &self.c,
            &self.m,
            &self.t,
        ]));
        wires
    }
}

pub(crate) fn build(
    synth: &mut Synthesizer,
    base: u64,
    modulus: u64,
    bits: u32,
    seed_with_one: bool,
) -> SynthResult<Arc<Gate>> {
    check_bit_width_from(bits, MIN_MULTIPLIER_BITS)?;
    check_residues_fit(modulus, bits)?;
    mod_inverse(base, modulus)?;

    let l = ExponentiatorLayout::new(bits);

    let mut g = GateBuilder::new(
        format!("modexp(a={base},M={modulus},n={bits})"),
        l.width(),
    );

    if seed_with_one {
        g.x(l.scratch.wire(0))?;
    }

    for i in 0..bits {
        let factor = mod_pow2k(base, i, modulus);
        let wires = l.multiplier_wires(i);
        let forward = synth.controlled_modular_multiplier(factor, modulus, bits)?;
        let backward = synth.inverse_controlled_modular_multiplier(factor, modulus, bits)?;

        g.append(&forward, wires.iter().copied())?;
        let ctrl = l.x.wire(i);
        for j in 0..bits {
            g.cswap(ctrl, l.scratch.wire(j), l.y.wire(j))?;
        }
        g.append(&backward, wires)?;
    }

    Ok(g.build())
}

/// The modular exponentiator for `base` modulo `modulus` over
/// `10 * bit_width - 2` wires.
///
/// With `seed_with_one` the scratch register starts at 1 and ends at
/// `base^x mod modulus`; otherwise it is left as the caller prepared it and
/// ends multiplied by `base^x`. Requires `gcd(base, modulus) = 1`,
/// `1 < modulus <= 2^bit_width` and `bit_width >= 2`.
#[instrument(level = "info")]
pub fn modular_exponentiation_gate(
    base: u64,
    modulus: u64,
    bit_width: u32,
    seed_with_one: bool,
) -> SynthResult<Arc<Gate>> {
    Synthesizer::new().modular_exponentiation(base, modulus, bit_width, seed_with_one)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::mod_pow;
    use crate::error::SynthError;
    use qarith_ir::BitState;

    fn exponentiate(gate: &Gate, bits: u32, x: u64) -> (BitState, ExponentiatorLayout) {
        let layout = ExponentiatorLayout::new(bits);
        let mut state = BitState::zeros(layout.width());
        state.store(&layout.x, x).unwrap();
        state.apply_gate(gate).unwrap();
        (state, layout)
    }

    #[test]
    fn test_two_cubed_mod_three() {
        let gate = modular_exponentiation_gate(2, 3, 2, true).unwrap();
        let (state, l) = exponentiate(&gate, 2, 3);
        assert_eq!(state.load(&l.scratch), 2);
        assert_eq!(state.load(&l.x), 3);
        assert!(state.is_zero_outside(&[&l.x, &l.scratch]));
    }

    #[test]
    fn test_every_exponent() {
        for (base, modulus, bits) in [(2, 3, 2), (7, 15, 4), (2, 5, 3), (4, 7, 3)] {
            let gate = modular_exponentiation_gate(base, modulus, bits, true).unwrap();
            for x in 0..(1u64 << bits) {
                let (state, l) = exponentiate(&gate, bits, x);
                assert_eq!(
                    state.load(&l.scratch),
                    mod_pow(base, x, modulus),
                    "{base}^{x} mod {modulus}"
                );
                assert_eq!(state.load(&l.y), 0);
                assert!(state.is_zero_outside(&[&l.x, &l.scratch]));
            }
        }
    }

    #[test]
    fn test_unseeded_scratch_is_multiplied() {
        let gate = modular_exponentiation_gate(7, 15, 4, false).unwrap();
        let (state, l) = exponentiate(&gate, 4, 5);
        assert_eq!(state.load(&l.scratch), 0);

        let layout = ExponentiatorLayout::new(4);
        let mut state = BitState::zeros(layout.width());
        state.store(&layout.x, 2).unwrap();
        state.store(&layout.scratch, 2).unwrap();
        state.apply_gate(&gate).unwrap();
        // 2 * 7^2 mod 15
        assert_eq!(state.load(&layout.scratch), 8);
    }

    #[test]
    fn test_arity() {
        let gate = modular_exponentiation_gate(2, 3, 2, true).unwrap();
        assert_eq!(gate.arity(), 18);
        assert_eq!(ExponentiatorLayout::new(4).width(), 38);
        assert!(gate.is_classical());
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            modular_exponentiation_gate(6, 15, 4, true),
            Err(SynthError::NoModularInverse { value: 6, modulus: 15 })
        ));
        assert!(matches!(
            modular_exponentiation_gate(2, 21, 4, true),
            Err(SynthError::ModulusTooWide { modulus: 21, bits: 4 })
        ));
        assert!(matches!(
            modular_exponentiation_gate(2, 3, 0, true),
            Err(SynthError::InvalidBitWidth { got: 0, .. })
        ));
        assert!(matches!(
            modular_exponentiation_gate(1, 2, 1, true),
            Err(SynthError::InvalidBitWidth { got: 1, min: 2, .. })
        ));
    }
}
