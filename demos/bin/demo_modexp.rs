//! Modular Exponentiation Demo
//!
//! Builds the reversible circuit for `x -> a^x mod M` and checks it against
//! classical arithmetic for every exponent.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qarith_demos::modexp::{op_counts, order, sweep, sweep_len};
use qarith_demos::{
    create_progress_bar, print_failure, print_header, print_info, print_result, print_row,
    print_row_header, print_section, print_success,
};
use qarith_ir::{Backend, BasisStateBackend};
use qarith_synth::{ExponentiatorLayout, SynthConfig, Synthesizer};

#[derive(Parser, Debug)]
#[command(name = "demo-modexp")]
#[command(about = "Synthesize and check a modular exponentiation circuit")]
struct Args {
    /// YAML or JSON configuration file (overrides the flags below)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base a, coprime to the modulus
    #[arg(short, long, default_value = "7")]
    base: u64,

    /// Modulus M
    #[arg(short, long, default_value = "15")]
    modulus: u64,

    /// Register width (default: smallest width holding every residue)
    #[arg(short = 'n', long)]
    bit_width: Option<u32>,

    /// Leave the scratch register at zero instead of seeding it with 1
    #[arg(long)]
    no_seed: bool,

    /// Shots per program
    #[arg(short, long, default_value = "1024")]
    shots: u32,

    /// Print the JSON program for this exponent and exit
    #[arg(long, value_name = "EXPONENT")]
    emit_program: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn synth_config(&self) -> anyhow::Result<SynthConfig> {
        let config = if let Some(path) = &self.config {
            SynthConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?
        } else {
            let config = SynthConfig {
                bit_width: self.bit_width,
                seed_with_one: !self.no_seed,
                shots: self.shots,
                ..SynthConfig::new(self.base, self.modulus)
            };
            config.validate()?;
            config
        };
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = args.synth_config()?;
    let bits = config.resolved_bit_width();

    let mut synth = Synthesizer::new();
    let gate = synth.modular_exponentiation(
        config.base,
        config.modulus,
        bits,
        config.seed_with_one,
    )?;

    if let Some(exponent) = args.emit_program {
        let program = config.program_for(&gate, exponent)?;
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }
    let count = sweep_len(&config)?;

    print_header(
        "Modular Exponentiation Demo",
        &format!("x -> {}^x mod {}", config.base, config.modulus),
    );

    print_section("Problem Setup");
    print_result("Base", config.base);
    print_result("Modulus", config.modulus);
    print_result("Bit width", bits);
    print_result("Seed scratch with 1", config.seed_with_one);

    print_section("Circuit Synthesis");
    let layout = ExponentiatorLayout::new(bits);
    print_result("Gate", gate.name());
    print_result("Wires", gate.arity());
    print_result("Exponent wires", layout.x);
    print_result("Result wires", layout.scratch);
    print_result("Top-level steps", gate.steps().len());
    print_result("Elementary operations", gate.num_ops());
    for (name, count) in op_counts(&gate) {
        print_result(&format!("  {name}"), count);
    }
    let stats = synth.stats();
    print_result(
        "Distinct sub-gates",
        format!("{} ({} cache hits)", synth.len(), stats.hits),
    );

    print_section("Basis-State Execution");
    let backend = BasisStateBackend::new();
    print_info(&format!(
        "Running {count} programs on the {} backend",
        backend.name()
    ));
    let pb = create_progress_bar(count, "exponents");
    let rows = sweep(&config, &gate, &backend, Some(&pb))?;
    pb.finish_and_clear();

    print_row_header(bits);
    for row in &rows {
        print_row(row, bits);
    }

    print_section("Result");
    let wrong = rows.iter().filter(|row| !row.is_correct()).count();
    if config.seed_with_one {
        match order(&rows) {
            Some(r) => print_result("Order of a modulo M", r),
            None => print_result("Order of a modulo M", format!("> {}", rows.len() - 1)),
        }
    }
    println!();
    if wrong > 0 {
        print_failure(&format!("{wrong} exponents disagree with the classical result"));
        bail!("circuit check failed");
    }
    if config.seed_with_one {
        print_success("Every exponent matches a^x mod M");
    } else {
        print_success("Unseeded scratch stays at zero for every exponent");
    }

    Ok(())
}
