//! WireCheck CLI - wiring checks, routing and auto-wire suggestions from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wirecheck::matcher::{ambiguous_aliases, SIGNAL_GROUPS};
use wirecheck::{
    ConnectorType, DiagramSnapshot, DrcEngine, DrcIssue, EngineConfig, Severity,
    ValidationResult, WireCheckCore,
};

#[derive(Parser)]
#[command(name = "wirecheck")]
#[command(about = "Device wiring diagram checker: DRC, orthogonal routing and auto-wire suggestions", long_about = None)]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr; `rules` also prints descriptions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every wire of a diagram snapshot
    Check {
        /// Path to a JSON diagram snapshot
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if issues found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Engine configuration file (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Check every snapshot in a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if issues found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Engine configuration file (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Route every wire of a snapshot around the device bodies
    Route {
        /// Path to a JSON diagram snapshot
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also print SVG path data (rounded corners, jumps over crossings) in
        /// human output; JSON output always carries `pathData`
        #[arg(long)]
        svg: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: ListFormat,

        /// Engine configuration file (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Suggest wires for a newly placed device
    Suggest {
        /// Path to a JSON diagram snapshot
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Id of the newly placed instance
        #[arg(short, long)]
        instance: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: ListFormat,

        /// Engine configuration file (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// List compatibility rules (`--verbose` adds descriptions)
    Rules,

    /// List known connector families
    Connectors,

    /// List signal groups used for auto-wiring, and overlapping aliases
    Groups,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
    /// GitLab CI format
    Gitlab,
}

#[derive(Clone, ValueEnum)]
enum ListFormat {
    Human,
    Json,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli.command, cli.verbose) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

/// `--verbose` forces debug; otherwise `RUST_LOG`, falling back to warnings only.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(command: Commands, verbose: bool) -> Result<i32> {
    match command {
        Commands::Check {
            file,
            format,
            fail_on,
            config,
        } => handle_check(&file, format, fail_on, config.as_deref()),
        Commands::Project {
            dir,
            format,
            fail_on,
            config,
        } => handle_project(&dir, format, fail_on, config.as_deref()),
        Commands::Route {
            file,
            svg,
            format,
            config,
        } => handle_route(&file, svg, format, config.as_deref()).map(|_| 0),
        Commands::Suggest {
            file,
            instance,
            format,
            config,
        } => handle_suggest(&file, &instance, format, config.as_deref()).map(|_| 0),
        Commands::Rules => {
            handle_rules(verbose);
            Ok(0)
        }
        Commands::Connectors => {
            handle_connectors();
            Ok(0)
        }
        Commands::Groups => {
            handle_groups();
            Ok(0)
        }
    }
}

fn load_core(config: Option<&Path>) -> Result<WireCheckCore> {
    match config {
        Some(path) => {
            tracing::debug!("Using engine config {}", path.display());
            let config = EngineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            Ok(WireCheckCore::new(config))
        }
        None => Ok(WireCheckCore::default()),
    }
}

fn load_snapshot(file: &Path) -> Result<DiagramSnapshot> {
    DiagramSnapshot::from_json_file(file)
        .with_context(|| format!("Failed to load snapshot {}", file.display()))
}

fn handle_check(
    file: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    config: Option<&Path>,
) -> Result<i32> {
    let core = load_core(config)?;
    let result = core
        .check_snapshot(file)
        .with_context(|| format!("Failed to check {}", file.display()))?;

    output_results(std::slice::from_ref(&result), &format)?;
    match fail_on {
        Some(severity) if should_fail(&result, &severity) => Ok(1),
        _ => Ok(0),
    }
}

fn handle_project(
    dir: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    config: Option<&Path>,
) -> Result<i32> {
    let core = load_core(config)?;
    let results = core
        .check_project(dir)
        .with_context(|| format!("Failed to check project {}", dir.display()))?;

    output_results(&results, &format)?;
    if let Some(severity) = fail_on {
        if results.iter().any(|r| should_fail(r, &severity)) {
            return Ok(1);
        }
    }
    Ok(0)
}

fn should_fail(result: &ValidationResult, severity: &FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Error => result.has_errors(),
        FailOnSeverity::Warning => result.total_issues() > 0,
    }
}

fn output_results(results: &[ValidationResult], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            output_human(results);
            Ok(())
        }
        OutputFormat::Json => output_json(results),
        OutputFormat::Github => {
            output_github(results);
            Ok(())
        }
        OutputFormat::Gitlab => output_gitlab(results),
    }
}

fn print_issue(issue: &DrcIssue) {
    println!("    - [{}] {}", issue.kind.code(), issue.message);
    println!(
        "      Wire: {} ({}:{} -> {}:{})",
        issue.connection_id,
        issue.from_port.instance_id,
        issue.from_port.port_id,
        issue.to_port.instance_id,
        issue.to_port.port_id
    );
}

fn output_human(results: &[ValidationResult]) {
    for result in results {
        println!("\nFile: {}", result.file.display());
        println!("{}", "─".repeat(60));

        if result.total_issues() == 0 {
            println!("  No issues found");
        }

        if !result.report.errors.is_empty() {
            println!("\n  ERRORS:");
            for issue in &result.report.errors {
                print_issue(issue);
            }
        }
        if !result.report.warnings.is_empty() {
            println!("\n  WARNINGS:");
            for issue in &result.report.warnings {
                print_issue(issue);
            }
        }

        println!("\n  Summary:");
        println!("    Errors:   {}", result.stats.errors);
        println!("    Warnings: {}", result.stats.warnings);
        println!("    Checked:  {}", result.stats.connections_checked);
        if result.stats.connections_skipped > 0 {
            println!("    Skipped:  {} (dangling)", result.stats.connections_skipped);
        }
    }
}

fn output_json(results: &[ValidationResult]) -> Result<()> {
    let output = serde_json::json!({
        "results": results.iter().map(|r| {
            serde_json::json!({
                "file": r.file.display().to_string(),
                "errors": r.report.errors,
                "warnings": r.report.warnings,
                "stats": r.stats,
            })
        }).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.len(),
            "total_issues": results.iter().map(|r| r.total_issues()).sum::<usize>(),
            "errors": results.iter().map(|r| r.stats.errors).sum::<usize>(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn severity_to_github(issue: &DrcIssue) -> &'static str {
    match issue.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn output_github(results: &[ValidationResult]) {
    for result in results {
        for issue in result.report.issues() {
            let level = severity_to_github(issue);
            println!(
                "::{} file={},title={}::{}",
                level,
                result.file.display(),
                issue.kind.code(),
                issue.message.replace('\n', " ")
            );
        }
    }
}

fn severity_to_gitlab(issue: &DrcIssue) -> &'static str {
    match issue.severity {
        Severity::Error => "blocker",
        Severity::Warning => "major",
    }
}

fn output_gitlab(results: &[ValidationResult]) -> Result<()> {
    let mut reports = Vec::new();
    for result in results {
        for issue in result.report.issues() {
            reports.push(serde_json::json!({
                "description": issue.message,
                "check_name": issue.kind.code(),
                "fingerprint": format!("{}:{}:{}", result.file.display(), issue.connection_id, issue.kind.code()),
                "severity": severity_to_gitlab(issue),
                "location": {
                    "path": result.file.display().to_string(),
                }
            }));
        }
    }
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn handle_route(file: &Path, svg: bool, format: ListFormat, config: Option<&Path>) -> Result<()> {
    let core = load_core(config)?;
    let snapshot = load_snapshot(file)?;
    let rendered = core.render(&snapshot);

    match format {
        ListFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        ListFormat::Human => {
            if rendered.is_empty() {
                println!("No routable wires");
            }
            for wire in &rendered {
                let points: Vec<String> = wire
                    .points
                    .iter()
                    .map(|p| format!("({}, {})", p.x, p.y))
                    .collect();
                println!("{}: {}", wire.connection_id, points.join(" -> "));
                if svg {
                    println!("  d=\"{}\"", wire.path_data);
                }
            }
        }
    }
    Ok(())
}

fn handle_suggest(file: &Path, instance: &str, format: ListFormat, config: Option<&Path>) -> Result<()> {
    let core = load_core(config)?;
    let snapshot = load_snapshot(file)?;
    if !snapshot.instances.iter().any(|i| i.id == instance) {
        bail!("No instance '{}' in {}", instance, file.display());
    }

    let suggestions = core.suggest(&snapshot, instance);
    match format {
        ListFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        ListFormat::Human => {
            if suggestions.is_empty() {
                println!("No suggestions for {}", instance);
            }
            for s in &suggestions {
                println!(
                    "  [{:>3}] {}:{} -> {}:{}  ({})",
                    s.confidence, s.from_instance_id, s.from_port_id, s.to_instance_id, s.to_port_id, s.reason
                );
            }
        }
    }
    Ok(())
}

fn handle_rules(verbose: bool) {
    println!("Available compatibility rules:\n");

    let engine = DrcEngine::with_default_rules();
    for rule in engine.rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.name());
        if verbose {
            println!("    {}", rule.description());
        }
        println!();
    }
}

fn handle_connectors() {
    for connector in ConnectorType::ALL {
        println!("  {:<28} {}", connector.id(), connector.label());
    }
}

fn handle_groups() {
    println!("Signal groups (checked in this order):\n");
    for (group, aliases) in SIGNAL_GROUPS {
        println!("  {:<10} {}", group, aliases.join(", "));
    }

    let overlaps = ambiguous_aliases();
    if !overlaps.is_empty() {
        println!("\nAmbiguous aliases:");
        for overlap in overlaps {
            println!(
                "  {} ({}) is contained in {} ({})",
                overlap.alias, overlap.group, overlap.other_alias, overlap.other_group
            );
        }
    }
}
