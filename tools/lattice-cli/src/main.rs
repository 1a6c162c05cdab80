use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use num_complex::Complex64;
use serde::Serialize;
use spiral_config::lattice::LatticeConfig;
use st_lattice::{DecoherenceAudit, LatticeTransformer, StateVector};
use std::error::Error;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

type DynError = Box<dyn Error>;

type Result<T> = std::result::Result<T, DynError>;

/// Exit status used by `audit --fail-on-decoherence`.
const DECOHERED_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Triple-mirror lattice transforms and decoherence audits"
)]
struct Cli {
    /// TOML file with `frequency_degrees` / `decoherence_tokens`
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline (or a single stage) over a state vector
    Mirror(MirrorArgs),

    /// Classify an interference description
    Audit(AuditArgs),
}

#[derive(Args)]
struct MirrorArgs {
    /// Phase anchor in degrees; overrides the configuration
    #[arg(long, allow_hyphen_values = true)]
    frequency: Option<f64>,

    /// Comma-separated amplitudes, e.g. "0.5, 0.5i, 1-2i"
    #[arg(long, conflicts_with = "input", allow_hyphen_values = true)]
    vector: Option<String>,

    /// JSON file holding a list of [re, im] pairs
    #[arg(long, value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Which part of the pipeline to run
    #[arg(long, value_enum, default_value_t = StageSelection::Full)]
    stage: StageSelection,

    /// Write the JSON report here instead of STDOUT
    #[arg(long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct AuditArgs {
    /// Free-form interference description
    text: String,

    /// Replace the configured flag tokens (repeatable)
    #[arg(long = "token", action = ArgAction::Append)]
    tokens: Vec<String>,

    /// Exit with status 2 when the description is decohered
    #[arg(long)]
    fail_on_decoherence: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
enum StageSelection {
    Full,
    Phase,
    Equilibrium,
    Anchor,
}

#[derive(Serialize)]
struct MirrorReport {
    frequency_degrees: f64,
    stage: StageSelection,
    input: StateVector,
    output: StateVector,
}

#[derive(Serialize)]
struct AuditReport<'a> {
    text: &'a str,
    verdict: st_lattice::AuditResult,
    status: &'static str,
    matched_tokens: Vec<&'a str>,
}

fn main() {
    if let Err(err) = spiral_config::tracing::ensure_tracing() {
        eprintln!("warning: {err}");
    }
    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn try_main() -> Result<i32> {
    let cli = Cli::parse();
    let config = LatticeConfig::load(cli.config.as_deref())?;
    debug!(
        ?config,
        chrome_trace = spiral_config::tracing::chrome_trace_active(),
        "resolved lattice configuration"
    );
    match &cli.command {
        Command::Mirror(args) => {
            run_mirror(&config, args)?;
            Ok(0)
        }
        Command::Audit(args) => run_audit(&config, args),
    }
}

fn run_mirror(config: &LatticeConfig, args: &MirrorArgs) -> Result<()> {
    let mut config = config.clone();
    if let Some(frequency) = args.frequency {
        config.frequency_degrees = frequency;
    }
    let lattice = LatticeTransformer::from_config(&config)?;
    let input = read_vector(args)?;
    let output = match args.stage {
        StageSelection::Full => lattice.run_triple_mirror(&input)?,
        StageSelection::Phase => lattice.phase_align(&input)?,
        StageSelection::Equilibrium => lattice.equilibrium_gate(&input)?,
        StageSelection::Anchor => lattice.entanglement_anchor(&input)?,
    };
    let report = MirrorReport {
        frequency_degrees: lattice.frequency_degrees(),
        stage: args.stage,
        input,
        output,
    };
    let payload = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            ensure_parent_dir(path)?;
            fs::write(path, payload)?;
        }
        None => println!("{payload}"),
    }
    Ok(())
}

fn run_audit(config: &LatticeConfig, args: &AuditArgs) -> Result<i32> {
    let audit = if args.tokens.is_empty() {
        DecoherenceAudit::with_tokens(config.decoherence_tokens.iter().cloned())?
    } else {
        DecoherenceAudit::with_tokens(args.tokens.iter().cloned())?
    };
    let verdict = audit.classify(&args.text);
    let report = AuditReport {
        text: &args.text,
        verdict,
        status: verdict.status_label(),
        matched_tokens: audit.matched_tokens(&args.text),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    if args.fail_on_decoherence && verdict.is_decohered() {
        Ok(DECOHERED_EXIT_CODE)
    } else {
        Ok(0)
    }
}

fn read_vector(args: &MirrorArgs) -> Result<StateVector> {
    if let Some(raw) = &args.vector {
        return Ok(raw.parse::<StateVector>()?);
    }
    if let Some(path) = &args.input {
        let contents = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&contents)?);
    }
    Ok(demo_vector())
}

/// `[1/√2, i/√2, 0, 0]`
fn demo_vector() -> StateVector {
    StateVector::new(vec![
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(0.0, FRAC_1_SQRT_2),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
    ])
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
