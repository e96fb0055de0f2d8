//! `narrow`: classify values and replay narrowing scenarios from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use narrow_core::boundary;
use narrow_core::guards::combine;
use narrow_core::scenario::validate_scenario_schema;
use narrow_core::{catalog, classify_traced, RunReport, Scenario, TaggedValue};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single JSON value
    Classify {
        /// Input as JSON, e.g. '"hello"', '42', '[true, false]', '{"$date": "2025-01-01"}'
        input: String,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Run every case of a scenario file (.yaml, .yml or .json)
    Run {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Run the built-in narrowing walkthrough
    Demo {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Combine two JSON operands with `+` along the narrowed combinations
    Combine { left: String, right: String },
    /// Check a scenario file against the schema without running it
    Validate { file: PathBuf },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Classify { input, format } => classify_command(&input, format),
        Commands::Run { file, format } => {
            tracing::debug!(file = %file.display(), "Loading scenario");
            let scenario = Scenario::from_file(&file)
                .with_context(|| format!("Failed to load scenario {}", file.display()))?;
            run_command(&scenario, format)
        }
        Commands::Demo { format } => run_command(&catalog::demonstrations(), format),
        Commands::Combine { left, right } => combine_command(&left, &right),
        Commands::Validate { file } => validate_command(&file),
    }
}

/// Logs go to stderr so stdout carries only results.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn classify_command(input: &str, format: Format) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(input).with_context(|| format!("Input is not valid JSON: {}", input))?;
    let tagged = TaggedValue::from_unchecked(&value)?;
    let classification = classify_traced(&tagged);

    match format {
        Format::Text => println!("{}", classification.result),
        Format::Json => println!("{}", serde_json::to_string_pretty(&classification)?),
    }

    Ok(())
}

fn combine_command(left: &str, right: &str) -> Result<()> {
    let parse = |raw: &str| -> Result<narrow_core::Operand> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .with_context(|| format!("Operand is not valid JSON: {}", raw))?;
        Ok(boundary::operand(&value)?)
    };

    println!("{}", combine(&parse(left)?, &parse(right)?));
    Ok(())
}

fn run_command(scenario: &Scenario, format: Format) -> Result<()> {
    let report = narrow_core::run(scenario)?;

    match format {
        Format::Text => print_report(&report),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!("{}", report.scenario);
    for outcome in &report.outcomes {
        match &outcome.note {
            Some(note) => println!(
                "  {:<4} {:<13} {}    # {}",
                outcome.id,
                outcome.shape.to_string(),
                outcome.rendered,
                note
            ),
            None => println!(
                "  {:<4} {:<13} {}",
                outcome.id,
                outcome.shape.to_string(),
                outcome.rendered
            ),
        }
    }
    println!("{}", report.summary);
}

fn validate_command(file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let is_json = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let document: serde_json::Value = if is_json {
        serde_json::from_str(&contents)?
    } else {
        serde_yaml::from_str(&contents)?
    };

    if let Err(errors) = validate_scenario_schema(&document) {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        anyhow::bail!("{} schema violation(s) in {}", errors.len(), file.display());
    }

    let scenario = Scenario::from_file(file)?;
    println!(
        "{}: {} case(s), valid",
        scenario.name,
        scenario.cases.len()
    );
    Ok(())
}
