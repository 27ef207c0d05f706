//! Classical basis-state evaluation.
//!
//! Every operation except a phase rotation maps a computational basis state
//! to another basis state, so a gate built from them can be evaluated on a
//! plain bit vector. A phase rotation only multiplies the amplitude of a
//! basis state; it leaves the bits, and therefore every measurement outcome,
//! unchanged.

use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::operation::Operation;
use crate::wire::{Register, Wire};

/// A computational basis state over a fixed number of wires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitState {
    bits: Vec<bool>,
}

impl BitState {
    /// All-zero state over `width` wires.
    pub fn zeros(width: u32) -> Self {
        Self {
            bits: vec![false; width as usize],
        }
    }

    /// Number of wires.
    pub fn width(&self) -> u32 {
        u32::try_from(self.bits.len()).unwrap_or(u32::MAX)
    }

    /// Read one wire.
    #[inline]
    pub fn get(&self, wire: Wire) -> bool {
        self.bits[wire.index()]
    }

    /// Write one wire.
    #[inline]
    pub fn set(&mut self, wire: Wire, value: bool) {
        self.bits[wire.index()] = value;
    }

    /// Store `value` in `register`, least significant bit on its first wire.
    pub fn store(&mut self, register: &Register, value: u64) -> IrResult<()> {
        if register.len() < 64 && value >> register.len() != 0 {
            return Err(IrError::ValueTooWide {
                value,
                bits: register.len(),
                register: register.name().to_string(),
            });
        }
        for (i, wire) in register.wires().enumerate() {
            let bit = i < 64 && (value >> i) & 1 == 1;
            self.set(wire, bit);
        }
        Ok(())
    }

    /// Read the value held by `register`.
    ///
    /// Bits above the 64th are ignored.
    pub fn load(&self, register: &Register) -> u64 {
        register
            .wires()
            .take(64)
            .enumerate()
            .fold(0, |acc, (i, wire)| acc | (u64::from(self.get(wire)) << i))
    }

    /// Check if every wire outside `keep` is zero.
    pub fn is_zero_outside(&self, keep: &[&Register]) -> bool {
        self.bits.iter().enumerate().all(|(i, &bit)| {
            !bit || keep
                .iter()
                .any(|r| r.range().contains(&u32::try_from(i).unwrap_or(u32::MAX)))
        })
    }

    /// Apply one operation.
    pub fn apply_op(&mut self, op: &Operation) {
        match *op {
            Operation::Not { target } => self.bits[target.index()] ^= true,
            Operation::CNot { control, target } => {
                if self.get(control) {
                    self.bits[target.index()] ^= true;
                }
            }
            Operation::Toffoli {
                controls: [c1, c2],
                target,
            } => {
                if self.get(c1) && self.get(c2) {
                    self.bits[target.index()] ^= true;
                }
            }
            Operation::CSwap { control, a, b } => {
                if self.get(control) {
                    self.bits.swap(a.index(), b.index());
                }
            }
            Operation::Phase { .. } => {}
        }
    }

    /// Apply every operation of `gate` in order.
    pub fn apply_gate(&mut self, gate: &Gate) -> IrResult<()> {
        if gate.arity() != self.width() {
            return Err(IrError::StateWidthMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.arity(),
                got: self.width(),
            });
        }
        gate.for_each_op(|op| self.apply_op(&op));
        Ok(())
    }

    /// Bitstring of the given wires, the last wire printed first.
    pub fn bitstring(&self, wires: &[Wire]) -> String {
        wires
            .iter()
            .rev()
            .map(|&w| if self.get(w) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for BitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all: Vec<Wire> = (0..self.width()).map(Wire).collect();
        write!(f, "|{}⟩", self.bitstring(&all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateBuilder;
    use crate::wire::Layout;

    #[test]
    fn test_store_and_load() {
        let mut layout = Layout::new();
        let a = layout.alloc("a", 3);
        let b = layout.alloc("b", 4);
        let mut state = BitState::zeros(layout.width());

        state.store(&a, 5).unwrap();
        state.store(&b, 9).unwrap();
        assert_eq!(state.load(&a), 5);
        assert_eq!(state.load(&b), 9);
        assert_eq!(format!("{state}"), "|1001101⟩");
        assert!(state.store(&a, 8).is_err());
    }

    #[test]
    fn test_apply_elementary_ops() {
        let mut state = BitState::zeros(3);
        state.apply_op(&Operation::Not { target: Wire(0) });
        state.apply_op(&Operation::CNot {
            control: Wire(0),
            target: Wire(1),
        });
        state.apply_op(&Operation::Toffoli {
            controls: [Wire(0), Wire(1)],
            target: Wire(2),
        });
        assert_eq!(state.bitstring(&[Wire(0), Wire(1), Wire(2)]), "111");

        state.apply_op(&Operation::Not { target: Wire(1) });
        state.apply_op(&Operation::CSwap {
            control: Wire(0),
            a: Wire(1),
            b: Wire(2),
        });
        assert!(state.get(Wire(1)));
        assert!(!state.get(Wire(2)));

        let before = state.clone();
        state.apply_op(&Operation::Phase {
            target: Wire(0),
            angle: 1.0,
        });
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_gate_checks_width() {
        let mut b = GateBuilder::new("g", 2);
        b.cx(Wire(0), Wire(1)).unwrap();
        let gate = b.build();
        let mut state = BitState::zeros(3);
        assert!(matches!(
            state.apply_gate(&gate),
            Err(IrError::StateWidthMismatch { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_is_zero_outside() {
        let mut layout = Layout::new();
        let a = layout.alloc("a", 2);
        let b = layout.alloc("b", 2);
        let mut state = BitState::zeros(layout.width());
        state.store(&a, 3).unwrap();
        assert!(state.is_zero_outside(&[&a]));
        state.set(b.wire(1), true);
        assert!(!state.is_zero_outside(&[&a]));
        assert!(state.is_zero_outside(&[&a, &b]));
    }
}
