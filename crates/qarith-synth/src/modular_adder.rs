//! Adder modulo a compile-time constant.
//!
//! Maps `(A, B)` to `(A, (A + B) mod M)` for `0 <= A, B < M` by the
//! add / subtract `M` / test sign / conditionally restore scheme:
//!
//! ```text
//! encode M into Mreg
//! B += A
//! B -= Mreg                    sign wire B[n] set  <=>  A + B < M
//! t  = sign, with polarity FLAG_UNDERFLOWED
//! mask Mreg by t               Mreg = M if underflowed, else 0
//! B += Mreg
//! unmask Mreg
//! B -= A                       sign wire now mirrors t
//! reset t from the sign
//! B += A
//! decode M
//! ```
//!
//! The result is exact whenever `A + B < 2M`, which `A, B < M` guarantees.
//! Every wire except `B` leaves the gate with the value it entered with.

use std::sync::Arc;

use qarith_ir::{Gate, GateBuilder, Layout, Register, Wire};

use crate::constants::{FLAG_UNDERFLOWED, bits_set, check_bit_width, check_modulus, fits};
use crate::error::{SynthError, SynthResult};
use crate::synthesizer::Synthesizer;

/// Register layout of an `n`-bit modular adder.
#[derive(Debug, Clone)]
pub struct ModularAdderLayout {
    /// Addend, `n` wires.
    pub a: Register,
    /// Accumulator and result, `n + 1` wires.
    pub b: Register,
    /// Scratch carries, `n` wires.
    pub c: Register,
    /// Scratch register the modulus is encoded into, `n` wires.
    pub m: Register,
    /// Underflow flag, 1 wire.
    pub t: Register,
}

impl ModularAdderLayout {
    /// Layout for `bits`-bit operands.
    pub fn new(bits: u32) -> Self {
        let mut layout = Layout::new();
        Self {
            a: layout.alloc("a", bits),
            b: layout.alloc("b", bits + 1),
            c: layout.alloc("c", bits),
            m: layout.alloc("m", bits),
            t: layout.alloc("t", 1),
        }
    }

    /// Total number of wires, `4n + 2`.
    pub fn width(&self) -> u32 {
        self.t.range().end
    }
}

pub(crate) fn build(synth: &mut Synthesizer, modulus: u64, bits: u32) -> SynthResult<Arc<Gate>> {
    check_bit_width(bits)?;
    check_modulus(modulus)?;
    if !fits(modulus, bits) {
        return Err(SynthError::ModulusTooWide { modulus, bits });
    }
    let adder = synth.adder(bits)?;

    let l = ModularAdderLayout::new(bits);
    let modulus_wires: Vec<Wire> = bits_set(modulus).into_iter().map(|i| l.m.wire(i)).collect();
    let a_b_c = Layout::concat(&[&l.a, &l.b, &l.c]);
    let m_b_c = Layout::concat(&[&l.m, &l.b, &l.c]);
    let sign = l.b.wire(bits);
    let flag = l.t.wire(0);

    let mut g = GateBuilder::new(format!("add_mod(M={modulus},n={bits})"), l.width());

    for &w in &modulus_wires {
        g.x(w)?;
    }

    g.append(&adder, a_b_c.iter().copied())?;
    g.append_inverse(&adder, m_b_c.iter().copied())?;

    // flag = FLAG_UNDERFLOWED exactly when the sign wire is set
    copy_bit(&mut g, sign, flag, !FLAG_UNDERFLOWED)?;

    mask_modulus(&mut g, flag, &modulus_wires)?;
    g.append(&adder, m_b_c.iter().copied())?;
    mask_modulus(&mut g, flag, &modulus_wires)?;

    // After B -= A the sign wire is the complement of its first reading.
    g.append_inverse(&adder, a_b_c.iter().copied())?;
    copy_bit(&mut g, sign, flag, FLAG_UNDERFLOWED)?;
    g.append(&adder, a_b_c)?;

    for &w in &modulus_wires {
        g.x(w)?;
    }

    Ok(g.build())
}

/// `target ^= source`, or `target ^= !source` when `negate` is set.
fn copy_bit(g: &mut GateBuilder, source: Wire, target: Wire, negate: bool) -> SynthResult<()> {
    if negate {
        g.x(source)?;
    }
    g.cx(source, target)?;
    if negate {
        g.x(source)?;
    }
    Ok(())
}

/// Toggle the encoded modulus bits unless `flag` reads as underflowed.
fn mask_modulus(g: &mut GateBuilder, flag: Wire, modulus_wires: &[Wire]) -> SynthResult<()> {
    if FLAG_UNDERFLOWED {
        g.x(flag)?;
    }
    for &w in modulus_wires {
        g.cx(flag, w)?;
    }
    if FLAG_UNDERFLOWED {
        g.x(flag)?;
    }
    Ok(())
}

/// The adder modulo `modulus` over `4 * bits + 2` wires.
///
/// Requires `1 < modulus < 2^bits`.
pub fn modular_adder_gate(modulus: u64, bits: u32) -> SynthResult<Arc<Gate>> {
    Synthesizer::new().modular_adder(modulus, bits)
}
