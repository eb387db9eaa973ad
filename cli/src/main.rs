//! Command-line front end for the tabumip solver: owns argument parsing and
//! JSON loading/printing only, contains no solver logic (§2.1 "CLI boundary").

mod problem;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use problem::ProblemSpec;
use tabumip::Options;
use tracing_subscriber::EnvFilter;

/// Solves a mixed-integer program described as JSON and prints the result as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the problem JSON file (variables, objective, constraints).
    problem: PathBuf,

    /// Path to an `Options` JSON file; fields not present fall back to defaults.
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Pretty-print the result JSON instead of emitting it on one line.
    #[arg(long)]
    pretty: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_options(path: Option<&PathBuf>) -> Result<Options> {
    match path {
        None => Ok(Options::default()),
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading options file {path:?}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing options file {path:?}"))
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let problem_text =
        fs::read_to_string(&args.problem).with_context(|| format!("reading problem file {:?}", args.problem))?;
    let spec: ProblemSpec =
        serde_json::from_str(&problem_text).with_context(|| format!("parsing problem file {:?}", args.problem))?;
    let mut model = spec.into_model().context("building the model from the problem file")?;

    let options = load_options(args.options.as_ref())?;

    let result = tabumip::solve(&mut model, &options).context("solving the model")?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("serializing the result")?;
    println!("{rendered}");

    if !result.is_feasible {
        std::process::exit(1);
    }
    Ok(())
}
