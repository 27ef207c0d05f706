//! Reusable, invertible gates.
//!
//! A [`Gate`] is an ordered list of [`Step`]s over its own wires
//! `0..arity`. A step is either an elementary [`Operation`] or a [`Call`]
//! embedding another gate by shared reference; the call carries the wire
//! binding that maps the callee's wires onto the caller's. Gates never own a
//! global wire cursor, so the same `Arc<Gate>` can be embedded any number of
//! times at different positions.

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::operation::Operation;
use crate::wire::Wire;

/// An embedded sub-gate together with its wire binding.
#[derive(Clone)]
pub struct Call {
    gate: Arc<Gate>,
    wires: Vec<Wire>,
    inverted: bool,
}

impl Call {
    /// The embedded gate.
    pub fn gate(&self) -> &Arc<Gate> {
        &self.gate
    }

    /// Caller wires, indexed by the callee's wire number.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Whether the callee runs inverted.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("gate", &self.gate.name)
            .field("wires", &self.wires)
            .field("inverted", &self.inverted)
            .finish()
    }
}

/// One step of a gate body.
#[derive(Debug, Clone)]
pub enum Step {
    /// An elementary operation on the gate's own wires.
    Op(Operation),
    /// An embedded gate.
    Call(Call),
}

impl Step {
    #[must_use]
    fn inverse(&self) -> Self {
        match self {
            Step::Op(op) => Step::Op(op.inverse()),
            Step::Call(call) => Step::Call(Call {
                gate: Arc::clone(&call.gate),
                wires: call.wires.clone(),
                inverted: !call.inverted,
            }),
        }
    }
}

/// An immutable sequence of steps over a fixed number of wires.
#[derive(Debug, Clone)]
pub struct Gate {
    name: String,
    arity: u32,
    steps: Vec<Step>,
}

impl Gate {
    /// Name of the gate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of wires the gate acts on.
    #[inline]
    pub fn arity(&self) -> u32 {
        self.arity
    }

    /// The gate body.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The inverse gate: steps reversed, each step inverted.
    ///
    /// Embedded gates are shared with `self`; only the `inverted` flag of
    /// each call flips.
    #[must_use]
    pub fn inverse(&self) -> Gate {
        Gate {
            name: inverse_name(&self.name),
            arity: self.arity,
            steps: self.steps.iter().rev().map(Step::inverse).collect(),
        }
    }

    /// Visit every elementary operation in execution order, with all calls
    /// inlined and wires expressed in this gate's numbering.
    pub fn for_each_op(&self, mut f: impl FnMut(Operation)) {
        let identity: Vec<Wire> = (0..self.arity).map(Wire).collect();
        self.walk(&identity, false, &mut f);
    }

    /// Lower the gate to a flat list of elementary operations.
    pub fn flatten(&self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(self.num_ops());
        self.for_each_op(|op| ops.push(op));
        ops
    }

    /// Number of elementary operations after flattening.
    pub fn num_ops(&self) -> usize {
        self.count_ops().values().sum()
    }

    /// Elementary operation counts by name after flattening.
    ///
    /// Shared sub-gates are counted once and scaled by their number of
    /// embeddings, so this is cheap even for deeply nested gates.
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        let mut memo = FxHashMap::default();
        self.count_ops_memo(&mut memo)
    }

    /// Check if no operation anywhere in the gate adds a phase.
    pub fn is_classical(&self) -> bool {
        self.steps.iter().all(|step| match step {
            Step::Op(op) => op.is_classical(),
            Step::Call(call) => call.gate.is_classical(),
        })
    }

    fn count_ops_memo(
        &self,
        memo: &mut FxHashMap<*const Gate, FxHashMap<&'static str, usize>>,
    ) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for step in &self.steps {
            match step {
                Step::Op(op) => *counts.entry(op.name()).or_insert(0) += 1,
                Step::Call(call) => {
                    let key = Arc::as_ptr(&call.gate);
                    let inner = match memo.get(&key) {
                        Some(inner) => inner.clone(),
                        None => {
                            let inner = call.gate.count_ops_memo(memo);
                            memo.insert(key, inner.clone());
                            inner
                        }
                    };
                    for (name, n) in inner {
                        *counts.entry(name).or_insert(0) += n;
                    }
                }
            }
        }
        counts
    }

    fn walk(&self, map: &[Wire], inverted: bool, f: &mut dyn FnMut(Operation)) {
        if inverted {
            for step in self.steps.iter().rev() {
                Self::walk_step(step, map, true, f);
            }
        } else {
            for step in &self.steps {
                Self::walk_step(step, map, false, f);
            }
        }
    }

    fn walk_step(step: &Step, map: &[Wire], inverted: bool, f: &mut dyn FnMut(Operation)) {
        match step {
            Step::Op(op) => {
                let op = if inverted { op.inverse() } else { op.clone() };
                f(op.map_wires(|w| map[w.index()]));
            }
            Step::Call(call) => {
                let inner: Vec<Wire> = call.wires.iter().map(|w| map[w.index()]).collect();
                call.gate.walk(&inner, inverted ^ call.inverted, f);
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} wires, {} steps)", self.name, self.arity, self.steps.len())
    }
}

fn inverse_name(name: &str) -> String {
    match name.strip_suffix("_dg") {
        Some(base) => base.to_string(),
        None => format!("{name}_dg"),
    }
}

/// Builder validating every step against the gate's arity.
///
/// ```rust
/// use qarith_ir::{GateBuilder, Wire};
///
/// let mut b = GateBuilder::new("toggle_pair", 3);
/// b.cx(Wire(0), Wire(1))?.cx(Wire(0), Wire(2))?;
/// let gate = b.build();
///
/// assert_eq!(gate.arity(), 3);
/// assert_eq!(gate.num_ops(), 2);
/// # Ok::<(), qarith_ir::IrError>(())
/// ```
#[derive(Debug)]
pub struct GateBuilder {
    name: String,
    arity: u32,
    steps: Vec<Step>,
}

impl GateBuilder {
    /// Start a gate over `arity` wires.
    pub fn new(name: impl Into<String>, arity: u32) -> Self {
        Self {
            name: name.into(),
            arity,
            steps: vec![],
        }
    }

    /// Declared arity.
    pub fn arity(&self) -> u32 {
        self.arity
    }

    /// Number of steps added so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no step has been added.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Add an elementary operation.
    pub fn op(&mut self, op: Operation) -> IrResult<&mut Self> {
        self.check_wires(&op.wires())?;
        self.steps.push(Step::Op(op));
        Ok(self)
    }

    /// Invert a wire.
    pub fn x(&mut self, target: Wire) -> IrResult<&mut Self> {
        self.op(Operation::Not { target })
    }

    /// Controlled inversion.
    pub fn cx(&mut self, control: Wire, target: Wire) -> IrResult<&mut Self> {
        self.op(Operation::CNot { control, target })
    }

    /// Doubly-controlled inversion.
    pub fn ccx(&mut self, c1: Wire, c2: Wire, target: Wire) -> IrResult<&mut Self> {
        self.op(Operation::Toffoli {
            controls: [c1, c2],
            target,
        })
    }

    /// Controlled swap.
    pub fn cswap(&mut self, control: Wire, a: Wire, b: Wire) -> IrResult<&mut Self> {
        self.op(Operation::CSwap { control, a, b })
    }

    /// Phase rotation.
    pub fn phase(&mut self, angle: f64, target: Wire) -> IrResult<&mut Self> {
        self.op(Operation::Phase { target, angle })
    }

    /// Embed `gate` with its wire `i` bound to the `i`-th supplied wire.
    pub fn append(
        &mut self,
        gate: &Arc<Gate>,
        wires: impl IntoIterator<Item = Wire>,
    ) -> IrResult<&mut Self> {
        self.call(gate, wires, false)
    }

    /// Embed the inverse of `gate`.
    pub fn append_inverse(
        &mut self,
        gate: &Arc<Gate>,
        wires: impl IntoIterator<Item = Wire>,
    ) -> IrResult<&mut Self> {
        self.call(gate, wires, true)
    }

    /// Finish the gate.
    pub fn build(self) -> Arc<Gate> {
        Arc::new(Gate {
            name: self.name,
            arity: self.arity,
            steps: self.steps,
        })
    }

    fn call(
        &mut self,
        gate: &Arc<Gate>,
        wires: impl IntoIterator<Item = Wire>,
        inverted: bool,
    ) -> IrResult<&mut Self> {
        let wires: Vec<Wire> = wires.into_iter().collect();
        if wires.len() != gate.arity as usize {
            return Err(IrError::WireCountMismatch {
                gate_name: gate.name.clone(),
                expected: gate.arity,
                got: u32::try_from(wires.len()).unwrap_or(u32::MAX),
            });
        }
        self.check_wires(&wires)?;
        self.steps.push(Step::Call(Call {
            gate: Arc::clone(gate),
            wires,
            inverted,
        }));
        Ok(self)
    }

    fn check_wires(&self, wires: &[Wire]) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for &wire in wires {
            if wire.0 >= self.arity {
                return Err(IrError::WireOutOfRange {
                    wire,
                    arity: self.arity,
                    gate_name: Some(self.name.clone()),
                });
            }
            if !seen.insert(wire) {
                return Err(IrError::DuplicateWire {
                    wire,
                    gate_name: Some(self.name.clone()),
                });
            }
        }
        Ok(())
    }
}
