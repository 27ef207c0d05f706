//! Exponentiator configuration.
//!
//! A [`SynthConfig`] names one modular exponentiation problem and can be
//! loaded from YAML or JSON:
//!
//! ```yaml
//! base: 7
//! modulus: 15
//! bit_width: 4        # optional, defaults to max(2, ceil(log2(modulus)))
//! seed_with_one: true # optional
//! shots: 1024         # optional
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use qarith_ir::{Gate, Program};

use crate::constants::{
    MIN_MULTIPLIER_BITS, check_bit_width_from, check_residues_fit, fits, min_bit_width,
};
use crate::error::{SynthError, SynthResult};
use crate::exponentiator::ExponentiatorLayout;
use crate::synthesizer::Synthesizer;

/// Parameters of a modular exponentiation circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Base `a`, coprime to the modulus.
    pub base: u64,

    /// Modulus `M`.
    pub modulus: u64,

    /// Register width; `None` picks the smallest width of at least 2 that
    /// holds every residue.
    #[serde(default)]
    pub bit_width: Option<u32>,

    /// Initialize the scratch register to 1.
    #[serde(default = "default_true")]
    pub seed_with_one: bool,

    /// Shots per program.
    #[serde(default = "default_shots")]
    pub shots: u32,
}

fn default_true() -> bool {
    true
}

fn default_shots() -> u32 {
    1024
}

impl SynthConfig {
    /// Configuration with default width, seeding and shots.
    pub fn new(base: u64, modulus: u64) -> Self {
        Self {
            base,
            modulus,
            bit_width: None,
            seed_with_one: default_true(),
            shots: default_shots(),
        }
    }

    /// Parse YAML and validate.
    pub fn from_yaml_str(yaml: &str) -> SynthResult<Self> {
        let config: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| SynthError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON and validate.
    pub fn from_json_str(json: &str) -> SynthResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SynthError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, as JSON when the extension is `.json` and as YAML
    /// otherwise.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SynthResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SynthError::Config(format!("{}: {e}", path.display())))?;

        debug!("Loading configuration from {}", path.display());
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> SynthResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| SynthError::Config(e.to_string()))
    }

    /// Check the parameters without building anything.
    pub fn validate(&self) -> SynthResult<()> {
        let bits = self.resolved_bit_width();
        check_bit_width_from(bits, MIN_MULTIPLIER_BITS)?;
        check_residues_fit(self.modulus, bits)?;
        if self.shots == 0 {
            return Err(SynthError::Config("shots must be positive".into()));
        }
        Ok(())
    }

    /// Register width in use.
    pub fn resolved_bit_width(&self) -> u32 {
        self.bit_width.unwrap_or_else(|| min_bit_width(self.modulus).max(2))
    }

    /// Register layout of the configured exponentiator.
    pub fn layout(&self) -> SynthResult<ExponentiatorLayout> {
        let bits = self.resolved_bit_width();
        check_bit_width_from(bits, MIN_MULTIPLIER_BITS)?;
        Ok(ExponentiatorLayout::new(bits))
    }

    /// Build the exponentiator with `synth`.
    pub fn build_gate_with(&self, synth: &mut Synthesizer) -> SynthResult<Arc<Gate>> {
        self.validate()?;
        synth.modular_exponentiation(
            self.base,
            self.modulus,
            self.resolved_bit_width(),
            self.seed_with_one,
        )
    }

    /// Build the exponentiator.
    pub fn build_gate(&self) -> SynthResult<Arc<Gate>> {
        self.build_gate_with(&mut Synthesizer::new())
    }

    /// Program that loads `exponent` into the exponent register, runs `gate`
    /// and measures the scratch register.
    ///
    /// `gate` must be the gate built from this configuration.
    pub fn program_for(&self, gate: &Gate, exponent: u64) -> SynthResult<Program> {
        let layout = self.layout()?;
        if !fits(exponent, layout.x.len()) {
            return Err(SynthError::Config(format!(
                "exponent {exponent} does not fit {} bits",
                layout.x.len()
            )));
        }
        let mut program = Program::from_gate(gate, layout.scratch.wires(), self.shots)?;
        program.prepare(
            layout
                .x
                .wires()
                .enumerate()
                .filter(|(i, _)| (exponent >> i) & 1 == 1)
                .map(|(_, wire)| wire),
        )?;
        Ok(program)
    }

    /// Build the exponentiator and wrap it in a program for `exponent`.
    pub fn program(&self, exponent: u64) -> SynthResult<Program> {
        let gate = self.build_gate()?;
        self.program_for(&gate, exponent)
    }
}
