//! `qarith-synth`: reversible modular arithmetic for Shor-style circuits.
//!
//! Lowers modular exponentiation `x -> a^x mod M`, with `a` and `M` fixed at
//! construction time, into a hierarchy of reversible gates over
//! [`qarith_ir`]:
//!
//! - **Primitives**: the 4-wire `carry` and 3-wire `sum` gates
//! - **Adder**: ripple-carry `(A, B) -> (A, A + B)` over `3n + 1` wires
//! - **Modular adder**: `(A, B) -> (A, (A + B) mod M)` over `4n + 2` wires
//! - **Controlled modular multiplier**: `(ctrl, x, 0) -> (ctrl, x, a·x mod M)`
//!   over `9n - 1` wires, and its inverse for `a⁻¹`
//! - **Modular exponentiator**: `(x, 1) -> (x, a^x mod M)` over `10n - 2`
//!   wires
//!
//! Every gate returns its scratch wires to zero. Sub-gates are shared through
//! a [`Synthesizer`] cache, so a gate is built once per parameter set.
//!
//! # Quick start
//!
//! ```rust
//! use qarith_ir::BitState;
//! use qarith_synth::exponentiator::{ExponentiatorLayout, modular_exponentiation_gate};
//!
//! let gate = modular_exponentiation_gate(2, 3, 2, true)?;
//! let layout = ExponentiatorLayout::new(2);
//! assert_eq!(gate.arity(), layout.width());
//!
//! let mut state = BitState::zeros(gate.arity());
//! state.store(&layout.x, 3)?;
//! state.apply_gate(&gate)?;
//! assert_eq!(state.load(&layout.scratch), 2); // 2^3 mod 3
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adder;
pub mod config;
pub mod constants;
pub mod error;
pub mod exponentiator;
pub mod modular_adder;
pub mod multiplier;
pub mod primitive;
pub mod synthesizer;

pub use adder::{AdderLayout, adder_gate};
pub use config::SynthConfig;
pub use error::{SynthError, SynthResult};
pub use exponentiator::{ExponentiatorLayout, modular_exponentiation_gate};
pub use modular_adder::{ModularAdderLayout, modular_adder_gate};
pub use multiplier::{
    MultiplierLayout, controlled_modular_multiplier_gate,
    inverse_controlled_modular_multiplier_gate,
};
pub use primitive::{carry_gate, sum_gate};
pub use synthesizer::{CacheStats, Synthesizer};
