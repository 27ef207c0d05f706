//! Memoizing gate factory.
//!
//! Building a gate is a deterministic function of its constants and bit
//! width, so every gate is built once per [`Synthesizer`] and handed out as
//! a shared `Arc<Gate>` afterwards. The multiplier alone embeds the same
//! modular adder `n` times and the exponentiator embeds `2n` multipliers,
//! which makes the cache the difference between linear and quadratic
//! construction work.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use qarith_ir::Gate;

use crate::error::SynthResult;
use crate::{adder, exponentiator, modular_adder, multiplier, primitive};

/// Cache key: gate family plus every parameter the gate depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GateKey {
    Carry,
    Sum,
    Adder {
        bits: u32,
    },
    ModularAdder {
        modulus: u64,
        bits: u32,
    },
    Multiplier {
        multiplier: u64,
        modulus: u64,
        bits: u32,
    },
    InverseMultiplier {
        multiplier: u64,
        modulus: u64,
        bits: u32,
    },
    Exponentiator {
        base: u64,
        modulus: u64,
        bits: u32,
        seed_with_one: bool,
    },
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from the cache.
    pub hits: u64,
    /// Requests that built a new gate.
    pub misses: u64,
}

/// Builds arithmetic gates and caches them by parameters.
#[derive(Debug, Default)]
pub struct Synthesizer {
    cache: FxHashMap<GateKey, Arc<Gate>>,
    stats: CacheStats,
}

impl Synthesizer {
    /// Create a synthesizer with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache statistics so far.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of distinct gates built.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if nothing has been built yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every cached gate.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// The 4-wire carry gate.
    pub fn carry(&mut self) -> SynthResult<Arc<Gate>> {
        self.cached(GateKey::Carry, |_| primitive::build_carry())
    }

    /// The 3-wire sum gate.
    pub fn sum(&mut self) -> SynthResult<Arc<Gate>> {
        self.cached(GateKey::Sum, |_| primitive::build_sum())
    }

    /// Ripple-carry adder over `3 * bits + 1` wires.
    pub fn adder(&mut self, bits: u32) -> SynthResult<Arc<Gate>> {
        self.cached(GateKey::Adder { bits }, |s| adder::build(s, bits))
    }

    /// Modular adder over `4 * bits + 2` wires.
    pub fn modular_adder(&mut self, modulus: u64, bits: u32) -> SynthResult<Arc<Gate>> {
        self.cached(GateKey::ModularAdder { modulus, bits }, |s| {
            modular_adder::build(s, modulus, bits)
        })
    }

    /// Controlled modular multiplier over `9 * bits - 1` wires.
    ///
    /// `multiplier` is reduced modulo `modulus` first.
    pub fn controlled_modular_multiplier(
        &mut self,
        multiplier: u64,
        modulus: u64,
        bits: u32,
    ) -> SynthResult<Arc<Gate>> {
        let factor = multiplier % modulus.max(1);
        let key = GateKey::Multiplier {
            multiplier: factor,
            modulus,
            bits,
        };
        self.cached(key, |s| multiplier::build(s, factor, modulus, bits))
    }

    /// Inverse of the controlled multiplier for `multiplier⁻¹ mod modulus`.
    ///
    /// Fails when `multiplier` has no inverse modulo `modulus`.
    pub fn inverse_controlled_modular_multiplier(
        &mut self,
        multiplier: u64,
        modulus: u64,
        bits: u32,
    ) -> SynthResult<Arc<Gate>> {
        let factor = multiplier % modulus.max(1);
        let key = GateKey::InverseMultiplier {
            multiplier: factor,
            modulus,
            bits,
        };
        self.cached(key, |s| multiplier::build_inverse(s, factor, modulus, bits))
    }

    /// Modular exponentiator over `10 * bits - 2` wires.
    pub fn modular_exponentiation(
        &mut self,
        base: u64,
        modulus: u64,
        bits: u32,
        seed_with_one: bool,
    ) -> SynthResult<Arc<Gate>> {
        let key = GateKey::Exponentiator {
            base,
            modulus,
            bits,
            seed_with_one,
        };
        self.cached(key, |s| {
            exponentiator::build(s, base, modulus, bits, seed_with_one)
        })
    }

    fn cached(
        &mut self,
        key: GateKey,
        build: impl FnOnce(&mut Self) -> SynthResult<Arc<Gate>>,
    ) -> SynthResult<Arc<Gate>> {
        if let Some(gate) = self.cache.get(&key) {
            self.stats.hits += 1;
            trace!("Cache hit: {key:?}");
            return Ok(Arc::clone(gate));
        }

        let gate = build(self)?;
        self.stats.misses += 1;
        debug!(
            "Built {} ({} wires, {} steps) for {key:?}",
            gate.name(),
            gate.arity(),
            gate.steps().len()
        );
        self.cache.insert(key, Arc::clone(&gate));
        Ok(gate)
    }
}
