//! compatlint CLI - keeps wrangler.toml and tsconfig.json compatibility dates in sync

mod github;
mod json;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use compatlint_core::{
    config::DEFAULT_CONFIG_FILE, run_check, CheckConfig, CheckFailure, CheckReport, DateLookup,
    Diagnostic, DiagnosticLevel, Mode, Outcome,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "compatlint")]
#[command(author, version)]
#[command(
    about = "Check that wrangler.toml and tsconfig.json agree on the compatibility date",
    long_about = "Compare `compatibility_date` in wrangler.toml with the dated \
                  @cloudflare/workers-types entry in tsconfig.json.\n\n\
                  Inputs can also be given as GitHub Actions style environment \
                  variables (INPUT_BASEDIR, INPUT_WRANGLER-TOML, INPUT_TSCONFIG-JSON, INPUT_MODE)."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    inputs: InputArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Config file path (defaults to .compatlint.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug, Default)]
struct InputArgs {
    /// Directory both config paths are relative to
    #[arg(long, env = "INPUT_BASEDIR", global = true)]
    basedir: Option<PathBuf>,

    /// Path to wrangler.toml, relative to basedir
    #[arg(long = "wrangler-toml", env = "INPUT_WRANGLER-TOML", global = true)]
    wrangler_toml: Option<PathBuf>,

    /// Path to tsconfig.json, relative to basedir
    #[arg(long = "tsconfig-json", env = "INPUT_TSCONFIG-JSON", global = true)]
    tsconfig_json: Option<PathBuf>,

    /// fail, edit-wrangler-toml, edit-tsconfig or edit-old
    #[arg(short, long, env = "INPUT_MODE", global = true)]
    mode: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the compatibility dates (default)
    Check,

    /// Write a default config file
    Init {
        /// Output path for config
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Github,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Init { output, force }) => init_command(output, *force),
        Some(Commands::Check) | None => check_command(&cli),
    };

    if let Err(e) = result {
        report_failure(&cli, &e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Treat empty values as unset; Actions passes unset inputs as empty strings.
fn non_empty_path(value: &Option<PathBuf>) -> Option<&PathBuf> {
    value.as_ref().filter(|p| !p.as_os_str().is_empty())
}

/// Layer CLI flags and environment inputs over the loaded config.
fn apply_inputs(config: &mut CheckConfig, inputs: &InputArgs) -> anyhow::Result<()> {
    if let Some(basedir) = non_empty_path(&inputs.basedir) {
        config.basedir = basedir.clone();
    }
    if let Some(wrangler) = non_empty_path(&inputs.wrangler_toml) {
        config.wrangler_toml = wrangler.clone();
    }
    if let Some(tsconfig) = non_empty_path(&inputs.tsconfig_json) {
        config.tsconfig_json = tsconfig.clone();
    }
    if let Some(mode) = inputs.mode.as_deref().filter(|m| !m.trim().is_empty()) {
        config.mode = mode.parse::<Mode>()?;
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<CheckConfig> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let mut config = CheckConfig::load_or_default(cli.config.as_deref(), &cwd)?;
    apply_inputs(&mut config, &cli.inputs)?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn check_command(cli: &Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli)?;
    let report = run_check(&config)?;

    match cli.format {
        OutputFormat::Text => print_text_report(&report, cli.verbose),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json::report_to_json(&report))?);
        }
        OutputFormat::Github => {
            for line in github::report_to_commands(&report) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn describe(lookup: &DateLookup) -> ColoredString {
    match lookup {
        DateLookup::Found(date) => date.normal(),
        DateLookup::NotFound => "not set".dimmed(),
        DateLookup::Malformed(_) => "unreadable".yellow(),
    }
}

fn format_diagnostic(diag: &Diagnostic, verbose: bool) -> String {
    let level_str = match diag.level {
        DiagnosticLevel::Error => "error".red().bold(),
        DiagnosticLevel::Warning => "warning".yellow().bold(),
        DiagnosticLevel::Info => "info".blue().bold(),
    };

    let mut out = match &diag.file {
        Some(file) => format!(
            "{} {}: {}",
            file.display().to_string().dimmed(),
            level_str,
            diag.message
        ),
        None => format!("{}: {}", level_str, diag.message),
    };

    if verbose {
        out.push_str(&format!("\n  {} {}", "rule:".dimmed(), diag.rule.dimmed()));
        if let Some(suggestion) = &diag.suggestion {
            out.push_str(&format!("\n  {} {}", "help:".cyan(), suggestion));
        }
    }
    out
}

fn print_text_report(report: &CheckReport, verbose: bool) {
    println!(
        "{} {} {}",
        "Checking:".cyan().bold(),
        report.wrangler_path.display(),
        report.tsconfig_path.display()
    );
    println!("  {:<16} {}", "wrangler config:", describe(&report.wrangler_date));
    println!("  {:<16} {}", "tsconfig:", describe(&report.tsconfig_date));
    println!();

    for diag in &report.diagnostics {
        println!("{}", format_diagnostic(diag, verbose));
    }

    match &report.outcome {
        Outcome::InSync { date } => {
            println!(
                "{}",
                format!("✓ Compatibility dates match ({date})").green().bold()
            );
        }
        Outcome::Drift { .. } | Outcome::MissingDate { .. } | Outcome::InvalidDate { .. } => {
            println!();
            println!(
                "{}",
                format!("No action taken (mode {})", report.mode).yellow()
            );
        }
    }
}

fn report_failure(cli: &Cli, error: &anyhow::Error) {
    match cli.format {
        OutputFormat::Text => {
            if let Some(failure) = error.downcast_ref::<CheckFailure>() {
                for diag in &failure.diagnostics {
                    eprintln!("{}", format_diagnostic(diag, cli.verbose));
                }
            }
            eprintln!("{} {}", "Error:".red().bold(), error);
            if cli.verbose {
                for cause in error.chain().skip(1) {
                    eprintln!("  {} {}", "caused by:".dimmed(), cause);
                }
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&json::failure_to_json(error)) {
            Ok(out) => println!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        },
        OutputFormat::Github => {
            for line in github::failure_commands(error) {
                println!("{line}");
            }
        }
    }
}

fn init_command(output: &Path, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let toml_content = toml::to_string_pretty(&CheckConfig::default())?;
    std::fs::write(output, toml_content)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Created config file: {}",
        "✓".green().bold(),
        output.display()
    );

    Ok(())
}
