//! Wires, registers and register layouts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Index of a wire within an enclosing gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Wire(pub u32);

impl Wire {
    /// The wire index as a `usize`, for indexing state vectors.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl From<u32> for Wire {
    fn from(id: u32) -> Self {
        Wire(id)
    }
}

impl From<usize> for Wire {
    fn from(id: usize) -> Self {
        Wire(u32::try_from(id).expect("Wire overflow: exceeds u32::MAX"))
    }
}

/// A named, contiguous run of wires.
///
/// Bit `i` of the value held by the register lives on `wire(i)`, so index 0
/// is the least significant bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    name: String,
    start: u32,
    len: u32,
}

impl Register {
    /// Create a register covering `start..start + len`.
    pub fn new(name: impl Into<String>, start: u32, len: u32) -> Self {
        Self {
            name: name.into(),
            start,
            len,
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of wires.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Check if the register has no wires.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First wire index.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Wire index range covered by this register.
    pub fn range(&self) -> Range<u32> {
        self.start..self.start + self.len
    }

    /// Wire holding bit `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`; layouts are computed from the bit width, so an
    /// out-of-range bit is a synthesis bug rather than a user error.
    #[inline]
    pub fn wire(&self, i: u32) -> Wire {
        assert!(
            i < self.len,
            "bit {i} out of range for register '{}' of {} wires",
            self.name,
            self.len
        );
        Wire(self.start + i)
    }

    /// Highest wire of the register.
    pub fn msb(&self) -> Option<Wire> {
        self.len.checked_sub(1).map(|i| Wire(self.start + i))
    }

    /// All wires, least significant first.
    pub fn wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.range().map(Wire)
    }

    /// Check if two registers share a wire.
    pub fn overlaps(&self, other: &Register) -> bool {
        self.start < other.start + other.len && other.start < self.start + self.len
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.name, self.start, self.start + self.len)
    }
}

/// Sequential register allocator.
///
/// Allocation is pure address arithmetic: each call to [`Layout::alloc`]
/// returns the next contiguous block, so registers from one layout never
/// overlap and the final [`Layout::width`] is the arity of the gate.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    next: u32,
    registers: Vec<Register>,
}

impl Layout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a register of `len` wires.
    pub fn alloc(&mut self, name: impl Into<String>, len: u32) -> Register {
        let register = Register::new(name, self.next, len);
        self.next += len;
        self.registers.push(register.clone());
        register
    }

    /// Total number of wires allocated so far.
    pub fn width(&self) -> u32 {
        self.next
    }

    /// Registers in allocation order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Look up a register by name.
    pub fn get(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Concatenate the wires of several registers into a binding list.
    pub fn concat(registers: &[&Register]) -> Vec<Wire> {
        registers.iter().flat_map(|r| r.wires()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_display() {
        assert_eq!(format!("{}", Wire(3)), "w3");
        assert_eq!(Wire::from(5usize), Wire(5));
    }

    #[test]
    fn test_layout_allocates_disjoint_registers() {
        let mut layout = Layout::new();
        let a = layout.alloc("a", 3);
        let b = layout.alloc("b", 4);
        let c = layout.alloc("c", 3);

        assert_eq!(layout.width(), 10);
        assert_eq!(b.start(), 3);
        assert_eq!(c.wire(0), Wire(7));
        assert_eq!(b.msb(), Some(Wire(6)));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&c));
        assert_eq!(layout.get("c"), Some(&c));
    }

    #[test]
    fn test_concat_preserves_order() {
        let mut layout = Layout::new();
        let a = layout.alloc("a", 2);
        let b = layout.alloc("b", 1);
        let wires = Layout::concat(&[&b, &a]);
        assert_eq!(wires, vec![Wire(2), Wire(0), Wire(1)]);
    }

    #[test]
    fn test_overlap_detection() {
        let r1 = Register::new("r1", 0, 4);
        let r2 = Register::new("r2", 3, 2);
        let r3 = Register::new("r3", 4, 2);
        assert!(r1.overlaps(&r2));
        assert!(!r1.overlaps(&r3));
        assert_eq!(r3.range(), 4..6);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_register_bit_out_of_range() {
        Register::new("x", 0, 2).wire(2);
    }
}
