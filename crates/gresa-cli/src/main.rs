mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gresa_core::{Formatter, FormatterConfig};

use commands::catalogue::{DescribeArgs, FormulasArgs};
use commands::evaluate::EvaluateArgs;
use commands::format::FormatArgs;
use commands::stocks::CompareYieldsArgs;

/// Step-by-step business math with the GRESA method
#[derive(Parser)]
#[command(
    name = "gresa",
    version,
    about = "Step-by-step business math with the GRESA method",
    long_about = "Evaluates simple and compound interest, simple, general and deferred \
                  annuities, loans, bonds and stocks with decimal precision. Every answer \
                  comes with its Given, Required, Equation, Solution and Answer stages."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Currency symbol used for money values
    #[arg(long, default_value = "₱", global = true)]
    currency_symbol: String,

    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula and show its worked solution
    Evaluate(EvaluateArgs),
    /// List the formula catalogue
    Formulas(FormulasArgs),
    /// Show one formula's inputs, derived quantities and equation
    Describe(DescribeArgs),
    /// Compare the stock yield ratio of two companies
    CompareYields(CompareYieldsArgs),
    /// Format a number as currency, decimal, percent or integer
    Format(FormatArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    /// Given / Required / Equation / Solution / Answer
    Gresa,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "gresa_core=debug,warn" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter = Formatter::new(FormatterConfig {
        currency_symbol: cli.currency_symbol.clone(),
    });

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::evaluate::run_evaluate(args, &formatter),
        Commands::Formulas(args) => commands::catalogue::run_formulas(args),
        Commands::Describe(args) => commands::catalogue::run_describe(args),
        Commands::CompareYields(args) => commands::stocks::run_compare_yields(args, &formatter),
        Commands::Format(args) => commands::format::run_format(args, &formatter),
        Commands::Version => {
            println!("gresa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
