//! Floatlab command line tool.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a number into a 64-bit mantissa and an exponent
//! floatlab normalize 8.2
//!
//! # Neighbours of 2.3 with 53 significant bits
//! floatlab bracket 2.3 --precision 53
//!
//! # Error of the forward and central differences of sin at x = 1
//! floatlab sweep --x 1 --decades 16
//!
//! # Measured error of all the schemes, as JSON
//! floatlab compare --steps 0.1,0.01,0.001 --json
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use floatlab::{
    bracket, function_by_name, normalize, significand, CompareConfig, Function,
    Semantics, SweepConfig, COMPACT, REFERENCE,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "floatlab")]
#[command(version)]
#[command(about = "Binary normalization and finite difference error analysis")]
struct Cli {
    /// Print the results as JSON
    #[arg(long, global = true, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// 64-bit mantissa, 70 fractional digits
    Reference,
    /// 52-bit mantissa, 56 fractional digits
    Compact,
}

#[derive(clap::Args)]
struct SemanticsArgs {
    /// Preset semantics
    #[arg(long, value_enum, default_value = "reference")]
    preset: Preset,

    /// Override the mantissa length of the preset
    #[arg(long)]
    mantissa_len: Option<usize>,

    /// Override the fractional digit cap of the preset
    #[arg(long)]
    fraction_cap: Option<usize>,
}

impl SemanticsArgs {
    fn semantics(&self) -> Semantics {
        let mut sem = match self.preset {
            Preset::Reference => REFERENCE,
            Preset::Compact => COMPACT,
        };
        if let Some(len) = self.mantissa_len {
            sem = sem.with_mantissa_len(len);
        }
        if let Some(cap) = self.fraction_cap {
            sem = sem.with_fraction_cap(cap);
        }
        sem
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a number into a fixed-length mantissa and an exponent
    Normalize {
        /// The number to normalize
        #[arg(allow_negative_numbers = true)]
        value: f64,

        #[command(flatten)]
        sem: SemanticsArgs,
    },

    /// Print every significant binary digit of a number
    Significand {
        /// The number to expand
        #[arg(allow_negative_numbers = true)]
        value: f64,

        #[command(flatten)]
        sem: SemanticsArgs,
    },

    /// Print the neighbours of a number at a binary precision
    Bracket {
        /// The number to bracket
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Number of significant bits
        #[arg(short, long, default_value = "53")]
        precision: usize,

        #[command(flatten)]
        sem: SemanticsArgs,
    },

    /// Sweep the step size of the forward and central differences
    Sweep {
        /// The point where the derivative is approximated
        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        x: f64,

        /// Number of decades of step sizes, starting at 0.1 (at most 300)
        #[arg(short, long, default_value = "16")]
        decades: usize,

        /// The function to differentiate (sin or exp)
        #[arg(short, long, default_value = "sin")]
        function: String,
    },

    /// Compare the measured error of all the difference schemes
    Compare {
        /// The point where the derivative is approximated (default: pi/4)
        #[arg(long, allow_negative_numbers = true)]
        x: Option<f64>,

        /// Comma separated step sizes
        #[arg(short, long, value_delimiter = ',', default_values_t = [0.1, 0.01, 0.001, 0.0001])]
        steps: Vec<f64>,

        /// The function to differentiate (sin or exp)
        #[arg(short, long, default_value = "sin")]
        function: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FLOATLAB_LOG")
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { value, sem } => {
            run_normalize(value, sem.semantics(), cli.json)?;
        }
        Commands::Significand { value, sem } => {
            run_significand(value, sem.semantics(), cli.json)?;
        }
        Commands::Bracket {
            value,
            precision,
            sem,
        } => {
            run_bracket(value, precision, sem.semantics(), cli.json)?;
        }
        Commands::Sweep {
            x,
            decades,
            function,
        } => {
            let config = SweepConfig {
                x,
                decades,
                function: lookup_function(&function)?,
                ..Default::default()
            };
            run_sweep(&config, cli.json)?;
        }
        Commands::Compare { x, steps, function } => {
            let defaults = CompareConfig::default();
            let config = CompareConfig {
                x: x.unwrap_or(defaults.x),
                steps,
                function: lookup_function(&function)?,
            };
            run_compare(&config, cli.json)?;
        }
    }

    Ok(())
}

fn lookup_function(name: &str) -> Result<&'static dyn Function> {
    function_by_name(name).ok_or_else(|| anyhow!("unknown function {:?} (expected sin or exp)", name))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_normalize(value: f64, sem: Semantics, json: bool) -> Result<()> {
    info!(value, ?sem, "normalize");
    let n = normalize(value, sem).with_context(|| format!("normalizing {}", value))?;
    if json {
        return print_json(&n);
    }
    println!("{}", n);
    println!("  Mantissa:     {}", n.get_mantissa());
    println!("  Exponent:     {}", n.get_exp());
    println!("  Termination:  {:?}", n.get_termination());
    println!("  Exact:        {}", if n.is_exact() { "Yes" } else { "No" });
    println!("  Rebuilt:      {}", n.to_f64());
    Ok(())
}

fn run_significand(value: f64, sem: Semantics, json: bool) -> Result<()> {
    let s = significand(value, sem).with_context(|| format!("expanding {}", value))?;
    if json {
        return print_json(&s);
    }
    println!("Digits:       {}", s.digits);
    println!("Length:       {}", s.digits.len());
    println!("Exponent:     {}", s.exponent);
    println!("Termination:  {:?}", s.termination);
    Ok(())
}

fn run_bracket(value: f64, precision: usize, sem: Semantics, json: bool) -> Result<()> {
    let b = bracket(value, precision, sem).with_context(|| format!("bracketing {}", value))?;
    if json {
        return print_json(&b);
    }
    println!("x-:           {:e}", b.lower);
    println!("x+:           {:e}", b.upper);
    println!("Gap:          {:e}", b.gap());
    println!("Relative gap: {:e}", b.relative_gap());
    println!("Exact:        {}", if b.exact { "Yes" } else { "No" });
    Ok(())
}

fn run_sweep(config: &SweepConfig, json: bool) -> Result<()> {
    let sweeps = config.run().context("running the step size sweep")?;
    if json {
        return print_json(&sweeps);
    }
    for sweep in &sweeps {
        println!("{} difference of {} at x = {}", sweep.scheme, sweep.function, sweep.x);
        println!(
            "{:<10}{:<14}{:<14}{:<14}{:<14}{:<14}",
            "h", "approx", "truncation", "rounding", "total", "observed"
        );
        for s in &sweep.samples {
            println!(
                "{:<10.1e}{:<14.6e}{:<14.1e}{:<14.1e}{:<14.1e}{:<14.1e}",
                s.h, s.approximation, s.truncation, s.rounding, s.total, s.observed
            );
        }
        if let Some((idx, best)) = sweep.optimal() {
            println!(
                "Optimal h: {:.1e} at iteration {} (total error {:.1e})",
                best.h,
                idx + 1,
                best.total
            );
        }
        if let Some((idx, best)) = sweep.best_observed() {
            println!(
                "Best observed h: {:.1e} at iteration {} (error {:.1e})",
                best.h,
                idx + 1,
                best.observed
            );
        }
        println!();
    }
    Ok(())
}

fn run_compare(config: &CompareConfig, json: bool) -> Result<()> {
    let rows = config.run().context("comparing the difference schemes")?;
    if json {
        return print_json(&rows);
    }
    println!(
        "{:<10}{:<20}{:<20}{:<20}",
        "h", "Forward Error", "Backward Error", "Central Error"
    );
    for row in &rows {
        println!(
            "{:<10}{:<20e}{:<20e}{:<20e}",
            row.h, row.forward, row.backward, row.central
        );
    }
    Ok(())
}
