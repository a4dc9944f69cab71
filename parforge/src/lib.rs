//! Command-line front end for parforge.
//!
//! The argument types and [`execute`] live here so the integration tests
//! can drive the CLI without spawning the binary. `main.rs` only sets up
//! logging, prints the [`Outcome`] and picks the exit code.

pub mod output;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use parforge_core::security::redact_parfile;
use parforge_core::{ParfileConfig, ParforgeError, build_job, initialize_job_schema, validate};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Top-level command line.
#[derive(Parser)]
#[command(name = "parforge")]
#[command(about = "Oracle Data Pump parameter-file validator and generator")]
#[command(version)]
#[command(long_about = "
parforge - Oracle Data Pump job checker and parameter-file generator

Reads a JSON job file describing an expdp/impdp job, checks it against
Data Pump's parameter compatibility rules and generates either a parameter
file (for PARFILE=) or an equivalent single-line background command.

Nothing is ever executed and no database is contacted.

EXAMPLES:
  parforge template export > hr_export.json
  parforge validate hr_export.json
  parforge generate hr_export.json -o hr_export.par
  parforge generate --emit command --redact hr_export.json
")]
pub struct Cli {
    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Logging and verbosity options.
#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress logs, warnings and suggestions; errors are still shown"
    )]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, help = "Write logs to stderr as JSON lines")]
    pub log_json: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Check a job file and report errors, warnings and suggestions
    Validate(ValidateArgs),
    /// Generate the parameter file and command for a job file
    Generate(GenerateArgs),
    /// Print a starter job file
    Template(TemplateArgs),
}

/// Arguments for `validate`.
#[derive(Args)]
pub struct ValidateArgs {
    /// Job file path
    #[arg(env = "PARFORGE_JOB", help = "JSON job file")]
    pub job: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `generate`.
#[derive(Args)]
pub struct GenerateArgs {
    /// Job file path
    #[arg(env = "PARFORGE_JOB", help = "JSON job file")]
    pub job: PathBuf,

    /// Parameter file destination
    #[arg(short, long, help = "Write the parameter file here instead of printing it")]
    pub output: Option<PathBuf>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Both)]
    pub emit: Emit,

    /// Mask credentials in printed output
    #[arg(
        long,
        help = "Mask the USERID password and ENCRYPTION_PASSWORD in printed output"
    )]
    pub redact: bool,

    /// Read ENCRYPTION_PASSWORD from the terminal
    #[arg(
        long,
        help = "Prompt for ENCRYPTION_PASSWORD instead of keeping it in the job file"
    )]
    pub prompt_encryption_password: bool,
}

/// Arguments for `template`.
#[derive(Args)]
pub struct TemplateArgs {
    /// Which starter job to print
    #[arg(value_enum)]
    pub kind: TemplateKind,
}

/// Validation report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Prefixed lines with a summary
    Text,
    /// The report object as pretty JSON
    Json,
}

/// Generated text to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// Parameter file only
    Parfile,
    /// Background command only
    Command,
    /// Parameter file, blank line, command
    Both,
}

/// Starter job kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateKind {
    /// Schema export to `DATA_PUMP_DIR`
    Export,
    /// Standard import that skips existing tables
    Import,
}

/// Result of running one subcommand.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Text for stdout
    pub output: String,
    /// Blocking findings, always shown on stderr
    pub errors: Vec<String>,
    /// Warnings, suggestions and status lines for stderr; hidden by `--quiet`
    pub notes: Vec<String>,
    /// Whether the process should exit successfully
    pub success: bool,
}

/// Runs the parsed command line.
///
/// A job with blocking errors is not a failure of the tool itself: it
/// yields an unsuccessful [`Outcome`] listing the errors. `Err` is reserved
/// for I/O, malformed job files and similar problems.
pub async fn execute(cli: &Cli) -> anyhow::Result<Outcome> {
    match &cli.command {
        Command::Validate(args) => validate_job(args).await,
        Command::Generate(args) => generate_job(args).await,
        Command::Template(args) => template(args.kind),
    }
}

async fn validate_job(args: &ValidateArgs) -> anyhow::Result<Outcome> {
    initialize_job_schema().context("Failed to initialize job file schema")?;
    let config = output::read_job(&args.job)
        .await
        .with_context(|| format!("Failed to load job {}", args.job.display()))?;

    let report = validate(&config);
    info!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "job validated"
    );

    Ok(Outcome {
        output: output::render_report(&report, args.format)?,
        success: !report.is_blocking(),
        ..Outcome::default()
    })
}

async fn generate_job(args: &GenerateArgs) -> anyhow::Result<Outcome> {
    initialize_job_schema().context("Failed to initialize job file schema")?;
    let mut config = output::read_job(&args.job)
        .await
        .with_context(|| format!("Failed to load job {}", args.job.display()))?;

    if args.prompt_encryption_password {
        let password = prompt_encryption_password()?;
        config.encryption_password.clone_from(&*password);
    }

    let outcome = generate_outcome(&config, args).await;
    config.clear_secrets();
    outcome
}

async fn generate_outcome(config: &ParfileConfig, args: &GenerateArgs) -> anyhow::Result<Outcome> {
    let job = match build_job(config) {
        Ok(job) => job,
        Err(ParforgeError::Blocked { errors, .. }) => {
            return Ok(Outcome {
                errors,
                ..Outcome::default()
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut notes = output::finding_lines(&job.report);
    let shown = |text: &str| {
        if args.redact {
            redact_parfile(text)
        } else {
            text.to_string()
        }
    };

    let mut sections = Vec::new();
    if let Some(path) = &args.output {
        output::write_parfile(path, &job.parfile).await?;
        notes.push(format!("Parameter file written to {}", path.display()));
    } else if args.emit != Emit::Command {
        sections.push(shown(&job.parfile));
    }
    if args.emit != Emit::Parfile {
        sections.push(shown(&job.command));
    }

    Ok(Outcome {
        output: sections.join("\n\n"),
        errors: Vec::new(),
        notes,
        success: true,
    })
}

fn template(kind: TemplateKind) -> anyhow::Result<Outcome> {
    let config = match kind {
        TemplateKind::Export => ParfileConfig::export_template(),
        TemplateKind::Import => ParfileConfig::import_template(),
    };

    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ParforgeError::serialization("Failed to render template", e))?;

    Ok(Outcome {
        output: json,
        success: true,
        ..Outcome::default()
    })
}

/// Reads the encryption password from the terminal, with confirmation.
fn prompt_encryption_password() -> anyhow::Result<Zeroizing<String>> {
    print!("Enter encryption password: ");
    io::stdout()
        .flush()
        .context("Failed to flush stdout before reading password")?;
    let password = Zeroizing::new(rpassword::read_password().context("Failed to read password")?);

    if password.is_empty() {
        return Err(ParforgeError::configuration("Password cannot be empty").into());
    }

    // Confirm password to prevent typos
    print!("Confirm encryption password: ");
    io::stdout()
        .flush()
        .context("Failed to flush stdout before reading password confirmation")?;
    let password_confirm =
        Zeroizing::new(rpassword::read_password().context("Failed to read password confirmation")?);

    if password != password_confirm {
        warn!("encryption password confirmation did not match");
        return Err(ParforgeError::configuration("Passwords do not match").into());
    }

    Ok(password)
}
