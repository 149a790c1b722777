//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use toolcard_extract::{has_block, parse_tool_results, strip_blocks};
use toolcard_shared::{
    AppConfig, ScanConfig, ToolResultRecord, init_config, load_config, load_config_from,
};
use tracing::{info, warn};
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Toolcard: pull structured tool results out of chat transcripts.
#[derive(Parser)]
#[command(
    name = "toolcard",
    version,
    about = "Extract structured tool-result records from chat transcripts.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the default location.
    #[arg(long, env = "TOOLCARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Parse a transcript and print its tool-result records as JSON.
    Parse {
        /// Transcript file to read ("-" or absent reads stdin).
        file: Option<PathBuf>,

        /// Output format (defaults to the configured format).
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Emit compact JSON regardless of the configured default.
        #[arg(long)]
        compact: bool,
    },

    /// Print the transcript with tool-result segments removed.
    Strip {
        /// Transcript file to read ("-" or absent reads stdin).
        file: Option<PathBuf>,
    },

    /// Report whether a transcript contains tool-result segments.
    ///
    /// Exits non-zero when it contains none, so it composes in scripts.
    Check {
        /// Transcript file to read ("-" or absent reads stdin).
        file: Option<PathBuf>,
    },

    /// Scan a directory of transcripts and summarize extracted records.
    Scan {
        /// Directory to walk for transcript files.
        dir: PathBuf,

        /// Emit the full report as json or jsonl instead of a summary.
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Output format for parsed records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// One JSON array holding every record.
    Json,
    /// One JSON object per line.
    Jsonl,
}

impl OutputFormat {
    /// Resolve the configured default format name. Unknown names fall
    /// back to json.
    fn from_config(name: &str) -> Self {
        if name.eq_ignore_ascii_case("jsonl") {
            OutputFormat::Jsonl
        } else {
            OutputFormat::Json
        }
    }
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "toolcard=info",
        1 => "toolcard=debug",
        _ => "toolcard=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command. Config is only loaded for the commands that
/// consult it, so `strip` and `check` work even with a broken config
/// file.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_override = cli.config.as_deref();

    match cli.command {
        Command::Parse {
            file,
            format,
            compact,
        } => {
            let config = resolve_config(config_override)?;
            cmd_parse(&config, file.as_deref(), format, compact)
        }
        Command::Strip { file } => cmd_strip(file.as_deref()),
        Command::Check { file } => cmd_check(file.as_deref()),
        Command::Scan { dir, format } => {
            let config = resolve_config(config_override)?;
            cmd_scan(&config, &dir, format)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => {
                let config = resolve_config(config_override)?;
                cmd_config_show(&config)
            }
        },
    }
}

/// Load the config honoring the `--config` override.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(load_config()?),
    }
}

/// Read the transcript from a file, or stdin when absent or "-".
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| eyre!("cannot read '{}': {e}", path.display())),
        _ => std::io::read_to_string(std::io::stdin())
            .map_err(|e| eyre!("cannot read stdin: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_parse(
    config: &AppConfig,
    file: Option<&Path>,
    format: Option<OutputFormat>,
    compact: bool,
) -> Result<()> {
    let text = read_input(file)?;
    let records = parse_tool_results(&text);
    info!(records = records.len(), "parsed transcript");

    let format = format.unwrap_or_else(|| OutputFormat::from_config(&config.defaults.format));
    let pretty = config.defaults.pretty && !compact;
    print_records(&records, format, pretty)
}

fn print_records(records: &[ToolResultRecord], format: OutputFormat, pretty: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let out = if pretty {
                serde_json::to_string_pretty(records)?
            } else {
                serde_json::to_string(records)?
            };
            println!("{out}");
        }
        OutputFormat::Jsonl => {
            for record in records {
                println!("{}", serde_json::to_string(record)?);
            }
        }
    }
    Ok(())
}

fn cmd_strip(file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let stripped = strip_blocks(&text);

    print!("{stripped}");
    if !stripped.is_empty() && !stripped.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cmd_check(file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    if !has_block(&text) {
        println!("no tool-result segments");
        std::process::exit(1);
    }

    let records = parse_tool_results(&text);
    println!("{} tool-result segment(s)", records.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Directory scan
// ---------------------------------------------------------------------------

/// Records extracted from one transcript file.
#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    records: Vec<ToolResultRecord>,
}

/// Aggregate result of a directory scan.
#[derive(Debug, Serialize)]
struct ScanReport {
    scanned_at: DateTime<Utc>,
    files_scanned: usize,
    files_with_results: usize,
    total_records: usize,
    files: Vec<FileReport>,
}

fn cmd_scan(config: &AppConfig, dir: &Path, format: Option<OutputFormat>) -> Result<()> {
    if !dir.is_dir() {
        return Err(eyre!("'{}' is not a directory", dir.display()));
    }

    let files = collect_scan_files(dir, &config.scan);
    info!(files = files.len(), dir = %dir.display(), "scanning transcripts");

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(80));

    let mut reports = Vec::new();
    let mut files_with_results = 0;
    let mut total_records = 0;

    for path in &files {
        progress.set_message(path.display().to_string());
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                progress.inc(1);
                continue;
            }
        };

        let records = parse_tool_results(&text);
        if !records.is_empty() {
            files_with_results += 1;
            total_records += records.len();
            reports.push(FileReport {
                path: path.clone(),
                records,
            });
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let report = ScanReport {
        scanned_at: Utc::now(),
        files_scanned: files.len(),
        files_with_results,
        total_records,
        files: reports,
    };

    match format {
        Some(format) => print_scan_report(&report, format, config.defaults.pretty),
        None => {
            print_scan_summary(&report);
            Ok(())
        }
    }
}

/// Walk `dir` for transcript files matching the configured extensions.
/// Unreadable entries are logged and skipped; results come back sorted so
/// reports are stable across runs.
fn collect_scan_files(dir: &Path, scan: &ScanConfig) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(scan.follow_links);
    if scan.max_depth > 0 {
        walker = walker.max_depth(scan.max_depth);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    scan.extensions
                        .iter()
                        .any(|want| want.eq_ignore_ascii_case(ext))
                })
        })
        .collect();

    files.sort();
    files
}

fn print_scan_summary(report: &ScanReport) {
    println!();
    println!("  Scan complete!");
    println!("  Files scanned: {}", report.files_scanned);
    println!("  With results:  {}", report.files_with_results);
    println!("  Records:       {}", report.total_records);
    if !report.files.is_empty() {
        println!();
        for file in &report.files {
            println!("    {} ({})", file.path.display(), file.records.len());
        }
    }
    println!();
}

fn print_scan_report(report: &ScanReport, format: OutputFormat, pretty: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let out = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{out}");
        }
        OutputFormat::Jsonl => {
            for file in &report.files {
                println!("{}", serde_json::to_string(file)?);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
