//! qarith Demo Suite
//!
//! Demonstrations of the modular-arithmetic synthesizer:
//!
//! - **Modular exponentiation**: builds `x -> a^x mod M`, reports its size
//!   and evaluates it on the basis-state backend for every exponent
//!
//! ```ignore
//! use qarith_demos::modexp::sweep;
//! use qarith_synth::SynthConfig;
//!
//! let config = SynthConfig::new(7, 15);
//! let gate = config.build_gate()?;
//! let rows = sweep(&config, &gate, &BasisStateBackend::new(), None)?;
//! ```

pub mod modexp;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(template) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(template.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Width of the header rule.
const RULE_WIDTH: usize = 60;

/// Column the values of [`print_result`] start at.
const LABEL_WIDTH: usize = 24;

/// Print a demo header with the problem it solves underneath.
pub fn print_header(title: &str, problem: &str) {
    let rule = style("═".repeat(RULE_WIDTH)).cyan();
    println!();
    println!("{rule}");
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("  {}", style(problem).dim());
    println!("{rule}");
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(RULE_WIDTH / 2)).dim());
}

/// Print a `label: value` line with values aligned in one column.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    let label = format!("{label}:");
    println!("  {} {value}", style(format!("{label:<width$}", width = LABEL_WIDTH)).dim());
}

/// Print the header of the exponent table for a `bits`-wide scratch
/// register.
pub fn print_row_header(bits: u32) {
    let width = bits as usize + 2;
    println!();
    println!(
        "  {:>8}  {:>width$}  {:>8}",
        style("x").bold(),
        style("scratch").bold(),
        style("value").bold()
    );
}

/// Print one exponent row, highlighting a disagreement with the classical
/// result.
pub fn print_row(row: &modexp::ExponentRow, bits: u32) {
    let width = bits as usize;
    let line = format!(
        "  {:>8}  |{:>width$}⟩  {:>8}",
        row.exponent, row.bitstring, row.value
    );
    if row.is_correct() {
        println!("{line}");
    } else {
        println!(
            "{} {}",
            style(line).red(),
            style(format!("expected {}", row.expected)).red().bold()
        );
    }
}

fn print_status(symbol: console::StyledObject<&str>, message: &str) {
    println!("{symbol} {message}");
}

/// Print a success message.
pub fn print_success(message: &str) {
    print_status(style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    print_status(style("ℹ").blue(), message);
}

/// Print a failure message.
pub fn print_failure(message: &str) {
    print_status(style("✗").red().bold(), message);
}
