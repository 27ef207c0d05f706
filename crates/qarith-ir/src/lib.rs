//! qarith circuit intermediate representation
//!
//! This crate provides the data structures the arithmetic synthesizer
//! lowers into: wires, registers, elementary reversible operations and
//! composable, invertible gates.
//!
//! # Core Components
//!
//! - **Wires and Registers**: [`Wire`], [`Register`] and the [`Layout`]
//!   allocator that partitions a gate's wires into disjoint registers
//! - **Operations**: [`Operation`] for the elementary actions (X, CX, CCX,
//!   CSWAP, phase)
//! - **Gates**: [`Gate`] bodies built with [`GateBuilder`]; sub-gates are
//!   embedded by reference with an explicit wire binding
//! - **Execution hand-off**: [`Program`], [`Backend`], [`Counts`] and the
//!   [`BasisStateBackend`] for permutation circuits
//!
//! # Example: Composing Gates
//!
//! ```rust
//! use qarith_ir::{BitState, GateBuilder, Wire};
//!
//! // A 3-wire majority-style gate
//! let mut b = GateBuilder::new("maj", 3);
//! b.cx(Wire(2), Wire(1))?.cx(Wire(2), Wire(0))?.ccx(Wire(0), Wire(1), Wire(2))?;
//! let maj = b.build();
//!
//! // Embed it twice on a 4-wire gate, then undo it
//! let mut outer = GateBuilder::new("outer", 4);
//! outer.append(&maj, [Wire(0), Wire(1), Wire(2)])?;
//! outer.append_inverse(&maj, [Wire(0), Wire(1), Wire(2)])?;
//! let outer = outer.build();
//!
//! let mut state = BitState::zeros(4);
//! state.set(Wire(2), true);
//! let before = state.clone();
//! state.apply_gate(&outer)?;
//! assert_eq!(state, before);
//! # Ok::<(), qarith_ir::IrError>(())
//! ```
//!
//! # Supported Operations
//!
//! | Operation | Wires | Inverse |
//! |-----------|-------|---------|
//! | `x` | 1 | self |
//! | `cx` | 2 | self |
//! | `ccx` | 3 | self |
//! | `cswap` | 3 | self |
//! | `p(θ)` | 1 | `p(-θ)` |

pub mod error;
pub mod gate;
pub mod operation;
pub mod program;
pub mod state;
pub mod wire;

pub use error::{IrError, IrResult};
pub use gate::{Call, Gate, GateBuilder, Step};
pub use operation::Operation;
pub use program::{Backend, BasisStateBackend, Counts, Program};
pub use state::BitState;
pub use wire::{Layout, Register, Wire};
