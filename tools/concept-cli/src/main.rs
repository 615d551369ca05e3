use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueHint};
use spiral_config::{readout, tracing as config_tracing, OutputFormat, ReadoutConfig};
use st_concept::{Concept, ConceptRegistry, PhaseShift};
use tracing::{debug, info};

mod error;
mod input;
mod render;
mod session;

use error::CliResult;
use input::{parse_concept, parse_shift};
use render::{render, Report};
use session::Session;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Quantum-inspired concept combination: amplitudes, Born probabilities and interference"
)]
struct Cli {
    /// Output format (text or json); defaults to SPIRAL_CONCEPT_FORMAT or text
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Decimal digits in text output; defaults to SPIRAL_CONCEPT_PRECISION or 4
    #[arg(long, global = true)]
    precision: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a fixed set of concepts once
    Evaluate(EvaluateArgs),

    /// Evaluate the canonical "Pet" + "Fish" example
    Demo(DemoArgs),

    /// Read edit commands from stdin and recompute after every change
    Session,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Concept as name:magnitude:phase[:#rrggbb]; repeat for each concept
    #[arg(long = "concept", required = true, value_parser = parse_concept)]
    concepts: Vec<Concept>,

    /// Extra phase applied to one member before summation, as index:angle
    #[arg(long, value_parser = parse_shift)]
    shift: Option<PhaseShift>,

    /// Write the readout to this file instead of stdout
    #[arg(long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DemoArgs {
    /// Write the readout to this file instead of stdout
    #[arg(long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> CliResult<()> {
    let cli = Cli::parse();
    // Dropped when this function returns, before `main` can exit.
    let _guard = match config_tracing::ensure_tracing("warn") {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: {err}");
            None
        }
    };
    let config = resolve_config(&cli);
    debug!(?config, "resolved readout configuration");

    match &cli.command {
        Command::Evaluate(args) => {
            let mut registry = ConceptRegistry::new();
            for concept in &args.concepts {
                registry.insert(concept.clone())?;
            }
            let report = Report::from_registry(&registry, args.shift)?;
            emit(&report, &config, args.output.as_deref())
        }
        Command::Demo(args) => {
            let composite = st_concept::pet_fish()?;
            let mut registry = ConceptRegistry::new();
            for concept in composite.members() {
                registry.insert(concept.clone())?;
            }
            let report = Report::from_registry(&registry, None)?;
            emit(&report, &config, args.output.as_deref())
        }
        Command::Session => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            Session::new(config).run(stdin.lock(), io::stdout().lock(), prompt)
        }
    }
}

fn resolve_config(cli: &Cli) -> ReadoutConfig {
    let mut config = readout::config().clone();
    if let Some(format) = cli.format {
        config = config.with_format(format);
    }
    if let Some(precision) = cli.precision {
        config = config.with_precision(precision);
    }
    config
}

fn emit(report: &Report, config: &ReadoutConfig, destination: Option<&Path>) -> CliResult<()> {
    let rendered = render(report, config)?;
    match destination {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered.trim_end()))?;
            info!(path = %path.display(), "wrote concept readout");
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}
