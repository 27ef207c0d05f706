//! Exponent sweeps over a modular exponentiation gate.

use indicatif::ProgressBar;
use tracing::debug;

use qarith_ir::{Backend, Gate};
use qarith_synth::constants::mod_pow;
use qarith_synth::{SynthConfig, SynthError, SynthResult};

/// Widest exponent register [`sweep`] will enumerate.
pub const MAX_SWEEP_BITS: u32 = 16;

/// Outcome of running the exponentiator for one exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentRow {
    /// Classical exponent loaded into the `x` register.
    pub exponent: u64,
    /// Most frequent measured bitstring of the scratch register.
    pub bitstring: String,
    /// `bitstring` read as an integer.
    pub value: u64,
    /// `base^exponent mod modulus` computed classically, or 0 when the
    /// scratch register is not seeded.
    pub expected: u64,
}

impl ExponentRow {
    /// Check if the circuit agrees with the classical power.
    pub fn is_correct(&self) -> bool {
        self.value == self.expected
    }
}

/// Number of exponents [`sweep`] runs for `config`.
///
/// Fails when the exponent register is wider than [`MAX_SWEEP_BITS`].
pub fn sweep_len(config: &SynthConfig) -> SynthResult<u64> {
    let bits = config.resolved_bit_width();
    if bits > MAX_SWEEP_BITS {
        return Err(SynthError::Config(format!(
            "sweeping {bits}-bit exponents is limited to {MAX_SWEEP_BITS} bits"
        )));
    }
    Ok(1 << bits)
}

/// Run `gate` on `backend` for every exponent the register can hold.
pub fn sweep(
    config: &SynthConfig,
    gate: &Gate,
    backend: &dyn Backend,
    progress: Option<&ProgressBar>,
) -> SynthResult<Vec<ExponentRow>> {
    let count = sweep_len(config)?;
    let mut rows = Vec::with_capacity(usize::try_from(count).unwrap_or(0));

    for exponent in 0..count {
        let program = config.program_for(gate, exponent)?;
        let counts = backend.run(&program)?;
        let bitstring = counts
            .most_frequent()
            .map(|(bits, _)| bits.to_string())
            .unwrap_or_default();
        let value = u64::from_str_radix(&bitstring, 2).map_err(|e| {
            SynthError::Config(format!(
                "{} returned unreadable bitstring {bitstring:?}: {e}",
                backend.name()
            ))
        })?;
        let expected = if config.seed_with_one {
            mod_pow(config.base, exponent, config.modulus)
        } else {
            0
        };

        debug!("x = {exponent}: measured {bitstring}, expected {expected}");
        rows.push(ExponentRow {
            exponent,
            bitstring,
            value,
            expected,
        });
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    Ok(rows)
}

/// Smallest positive exponent in `rows` whose power is 1.
pub fn order(rows: &[ExponentRow]) -> Option<u64> {
    rows.iter()
        .find(|row| row.exponent > 0 && row.value == 1)
        .map(|row| row.exponent)
}

/// Flattened operation counts of `gate`, most frequent first.
pub fn op_counts(gate: &Gate) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<_> = gate.count_ops().into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    counts
}
