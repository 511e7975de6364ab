//! style-guard CLI - Command-line interface for style guide enforcement
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like config discovery, process exit codes, and terminal output
//! - Exit codes: 0 when no error-severity violation exists, 1 otherwise, 2 when the run cannot start

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use style_guard::rules::catalog::catalog;
use style_guard::{
    AnalysisOptions, OutputFormat, ReportFormatter, ReportOptions, Severity, StyleGuardConfig,
    StyleGuardResult, StyleValidator, ValidationOptions, PARSE_ERROR_RULE_ID, READ_ERROR_RULE_ID,
};
use tracing_subscriber::EnvFilter;

/// Exit code for runs that could not start (bad configuration, conflicting rules)
const EXIT_FATAL: i32 = 2;

/// style-guard - House style enforcement
#[derive(Parser)]
#[command(name = "style-guard")]
#[command(version)]
#[command(about = "Style guide enforcement for layout, naming and documentation rules")]
#[command(
    long_about = "style-guard checks source files against a configurable house style: line length, indentation, whitespace, naming conventions and doc comments. Exits non-zero when any error-severity violation is found."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files for style violations
    Check(CheckArgs),

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// List available rules
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,
    },
}

#[derive(Args, Default)]
struct CheckArgs {
    /// Paths to analyze (files or directories)
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormatArg,

    /// Minimum severity level to report
    #[arg(short, long, value_enum)]
    severity: Option<SeverityArg>,

    /// Maximum number of violations to report
    #[arg(long)]
    max_violations: Option<usize>,

    /// Maximum number of files to analyze
    #[arg(long)]
    max_files: Option<usize>,

    /// Additional exclude patterns
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Ignore .styleguardignore files
    #[arg(long)]
    no_ignore: bool,

    /// Disable parallel processing
    #[arg(long)]
    no_parallel: bool,
}

#[derive(Copy, Clone, ValueEnum, PartialEq, Default)]
enum OutputFormatArg {
    #[default]
    Text,
    Human,
    Json,
    Sarif,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Sarif => OutputFormat::Sarif,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum SeverityArg {
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FATAL);
        }
    }
}

fn run_command(cli: Cli) -> StyleGuardResult<i32> {
    let use_colors = !cli.no_color && io::stdout().is_terminal();

    match cli.command {
        Commands::Check(args) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run_check(cli.config, args, use_colors, &mut out)
        }
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Explain { rule_id } => run_explain(cli.config, &rule_id),
        Commands::Rules { enabled_only } => run_list_rules(cli.config, enabled_only),
    }
}

/// Explicit config file, else the first known config name in the working directory, else defaults
fn load_config(config_path: Option<PathBuf>) -> StyleGuardResult<StyleGuardConfig> {
    if let Some(path) = config_path {
        return StyleGuardConfig::load_from_file(path);
    }

    let discovered = std::env::current_dir()
        .ok()
        .and_then(|cwd| StyleGuardConfig::discover(&cwd));

    match discovered {
        Some(path) => {
            tracing::debug!("Using configuration {}", path.display());
            StyleGuardConfig::load_from_file(path)
        }
        None => Ok(StyleGuardConfig::default()),
    }
}

fn run_check<W: Write>(
    config_path: Option<PathBuf>,
    args: CheckArgs,
    use_colors: bool,
    out: &mut W,
) -> StyleGuardResult<i32> {
    let config = load_config(config_path)?;

    let report_options = ReportOptions {
        use_colors,
        max_violations: args.max_violations,
        min_severity: args.severity.map(Severity::from),
        ..Default::default()
    };

    let validator = StyleValidator::new_with_config(config)?
        .with_report_formatter(ReportFormatter::new(report_options.clone()));

    // Use current directory if no paths specified
    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths
    };

    let validation_options = ValidationOptions {
        output_format: args.format.into(),
        report_options,
        analysis_options: AnalysisOptions {
            parallel: !args.no_parallel,
            max_files: args.max_files,
            exclude_patterns: args.exclude,
            ignore_ignore_files: args.no_ignore,
        },
    };

    let report = validator.validate_with_options(paths, &validation_options)?;

    let format = validation_options.output_format;
    validator.write_report(&report, format, &mut *out)?;
    if matches!(format, OutputFormat::Json | OutputFormat::Sarif) {
        writeln!(out)?;
    }
    out.flush()?;

    // Text output stays one line per violation; totals go to stderr
    if format == OutputFormat::Text {
        eprintln!("{}", validator.summary_line(&report));
    }

    Ok(report.verdict().exit_code())
}

fn run_validate_config(config_path: Option<PathBuf>) -> StyleGuardResult<i32> {
    let config_path = match config_path {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()?;
            match StyleGuardConfig::discover(&cwd) {
                Some(path) => path,
                None => {
                    eprintln!("No configuration file found in {}", cwd.display());
                    return Ok(1);
                }
            }
        }
    };

    println!("Validating configuration: {}", config_path.display());

    let config = match StyleGuardConfig::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration validation failed: {}", e);
            return Ok(1);
        }
    };

    // Rule construction also catches custom rules that collide with built-in ids
    let stats = match StyleValidator::new_with_config(config.clone()).and_then(|v| v.rule_statistics()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Configuration validation failed: {}", e);
            return Ok(1);
        }
    };

    println!("Configuration is valid");
    println!("Configuration summary:");
    println!(
        "  Rules: {} total, {} enabled, {} custom",
        stats.total_rules(),
        stats.enabled_rules,
        stats.custom_rules
    );
    println!("  Path patterns: {}", config.paths.patterns.len());
    println!("  Fingerprint: {}", config.fingerprint());

    Ok(0)
}

fn run_explain(config_path: Option<PathBuf>, rule_id: &str) -> StyleGuardResult<i32> {
    if rule_id == PARSE_ERROR_RULE_ID || rule_id == READ_ERROR_RULE_ID {
        println!("Rule: {}", rule_id);
        println!("Severity: {}", Severity::Error.as_str());
        println!();
        println!("Description:");
        if rule_id == PARSE_ERROR_RULE_ID {
            println!("   Reported once for a file whose syntax could not be parsed.");
        } else {
            println!("   Reported once for a file that could not be read.");
        }
        return Ok(0);
    }

    let config = load_config(config_path)?;
    let entries = catalog(&config)?;

    if let Some(entry) = entries.iter().find(|e| e.rule.id() == rule_id) {
        println!("Rule: {}", entry.rule.id());
        println!("Severity: {}", entry.severity.as_str());
        println!("Enabled: {}", entry.enabled);
        println!();
        println!("Description:");
        println!("   {}", entry.rule.description());

        if let Some(custom) = config.custom_rules.iter().find(|r| r.id == rule_id) {
            println!();
            println!("Pattern:");
            println!("   {}", custom.pattern);
            if let Some(exclude) = &custom.exclude_if {
                println!();
                println!("Exclusions:");
                if exclude.in_tests {
                    println!("   Excluded in test files");
                }
                if let Some(patterns) = &exclude.file_patterns {
                    println!("   File patterns: {}", patterns.join(", "));
                }
            }
        }
        return Ok(0);
    }

    eprintln!("Rule '{}' not found", rule_id);
    println!();
    println!("Available rules:");
    for entry in &entries {
        println!("  - {}", entry.rule.id());
    }

    Ok(1)
}

fn run_list_rules(config_path: Option<PathBuf>, enabled_only: bool) -> StyleGuardResult<i32> {
    let config = load_config(config_path)?;

    println!("Available Rules\n");

    for entry in catalog(&config)? {
        if enabled_only && !entry.enabled {
            continue;
        }

        let status = if entry.enabled { "on " } else { "off" };
        println!(
            "  [{}] {} ({}) - {}",
            status,
            entry.rule.id(),
            entry.severity.as_str(),
            entry.rule.description()
        );
    }

    Ok(0)
}

fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
