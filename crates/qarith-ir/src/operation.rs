//! Elementary reversible operations.

use serde::{Deserialize, Serialize};

use crate::wire::Wire;

/// One elementary action on one to three wires.
///
/// Every variant except [`Operation::Phase`] is its own inverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Operation {
    /// Invert `target`.
    #[serde(rename = "x")]
    Not {
        /// The inverted wire.
        target: Wire,
    },
    /// Invert `target` when `control` is set.
    #[serde(rename = "cx")]
    CNot {
        /// Control wire.
        control: Wire,
        /// Target wire.
        target: Wire,
    },
    /// Invert `target` when both controls are set.
    #[serde(rename = "ccx")]
    Toffoli {
        /// Control wires.
        controls: [Wire; 2],
        /// Target wire.
        target: Wire,
    },
    /// Exchange `a` and `b` when `control` is set.
    #[serde(rename = "cswap")]
    CSwap {
        /// Control wire.
        control: Wire,
        /// First swapped wire.
        a: Wire,
        /// Second swapped wire.
        b: Wire,
    },
    /// Phase rotation by `angle` radians on the `|1⟩` component of `target`.
    #[serde(rename = "p")]
    Phase {
        /// Target wire.
        target: Wire,
        /// Rotation angle in radians.
        angle: f64,
    },
}

impl Operation {
    /// Short name of the operation.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Not { .. } => "x",
            Operation::CNot { .. } => "cx",
            Operation::Toffoli { .. } => "ccx",
            Operation::CSwap { .. } => "cswap",
            Operation::Phase { .. } => "p",
        }
    }

    /// Wires touched by the operation, controls first.
    pub fn wires(&self) -> Vec<Wire> {
        match *self {
            Operation::Not { target } | Operation::Phase { target, .. } => vec![target],
            Operation::CNot { control, target } => vec![control, target],
            Operation::Toffoli {
                controls: [c1, c2],
                target,
            } => vec![c1, c2, target],
            Operation::CSwap { control, a, b } => vec![control, a, b],
        }
    }

    /// The operation undoing this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match *self {
            Operation::Phase { target, angle } => Operation::Phase {
                target,
                angle: -angle,
            },
            ref op => op.clone(),
        }
    }

    /// Rewrite every wire through `f`.
    #[must_use]
    pub fn map_wires(&self, mut f: impl FnMut(Wire) -> Wire) -> Self {
        match *self {
            Operation::Not { target } => Operation::Not { target: f(target) },
            Operation::CNot { control, target } => Operation::CNot {
                control: f(control),
                target: f(target),
            },
            Operation::Toffoli {
                controls: [c1, c2],
                target,
            } => Operation::Toffoli {
                controls: [f(c1), f(c2)],
                target: f(target),
            },
            Operation::CSwap { control, a, b } => Operation::CSwap {
                control: f(control),
                a: f(a),
                b: f(b),
            },
            Operation::Phase { target, angle } => Operation::Phase {
                target: f(target),
                angle,
            },
        }
    }

    /// Check if the operation permutes basis states without adding phases.
    pub fn is_classical(&self) -> bool {
        !matches!(self, Operation::Phase { .. })
    }
}
