//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qhelpkit_core::compiler::CompileOutcome;
use qhelpkit_core::pipeline::{
    self, BuildOptions, BuildResult, ProgressReporter, SilentProgress,
};
use qhelpkit_shared::{
    AppConfig, CONFIG_FILE_NAME, IndexFormat, IndexSource, ProductConfig, init_config,
    load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// qhelpkit — turn legacy HTML documentation into Qt help collections.
#[derive(Parser)]
#[command(
    name = "qhelpkit",
    version,
    about = "Build Qt help projects (.qhp/.qhcp) with keyword indexes from legacy HTML documentation.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the project config file.
    #[arg(short, long, default_value = CONFIG_FILE_NAME, global = true, env = "QHELPKIT_CONFIG")]
    pub config: PathBuf,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

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
    /// Extract keywords and write help descriptors for configured products.
    Build {
        /// Product(s) to build (repeatable). Defaults to all.
        #[arg(short, long)]
        product: Vec<String>,

        /// Write descriptors only; do not run the help compiler.
        #[arg(long)]
        no_compile: bool,

        /// Do not link the product stylesheet into pages.
        #[arg(long)]
        no_styles: bool,
    },

    /// Re-run the help compiler over previously written descriptors.
    Compile {
        /// Product(s) to compile (repeatable). Defaults to all.
        #[arg(short, long)]
        product: Vec<String>,
    },

    /// Extract and print the keywords of a single index document.
    Keywords {
        /// Index document to read.
        file: PathBuf,

        /// Index format: paired-line-list, anchor-scan, code-in-anchor-scan, table-row-scan.
        #[arg(short, long)]
        format: IndexFormat,

        /// Reference target to drop (repeatable).
        #[arg(long)]
        exclude: Vec<String>,

        /// Print keywords as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List configured products.
    List,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a sample config file.
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
        0 => "qhelpkit=info",
        1 => "qhelpkit=debug",
        _ => "qhelpkit=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            product,
            no_compile,
            no_styles,
        } => cmd_build(&cli.config, &product, !no_compile, !no_styles),
        Command::Compile { product } => cmd_compile(&cli.config, &product),
        Command::Keywords {
            file,
            format,
            exclude,
            json,
        } => cmd_keywords(&file, format, exclude, json),
        Command::List => cmd_list(&cli.config),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&cli.config),
            ConfigAction::Show => cmd_config_show(&cli.config),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn load(config_path: &Path) -> Result<AppConfig> {
    if !config_path.exists() {
        return Err(eyre!(
            "no config found at '{}'. Create one with `qhelpkit config init`.",
            config_path.display()
        ));
    }
    Ok(load_config_from(config_path)?)
}

/// Products named on the command line, or every configured product.
fn select<'a>(config: &'a AppConfig, names: &[String]) -> Result<Vec<&'a ProductConfig>> {
    if names.is_empty() {
        if config.products.is_empty() {
            return Err(eyre!("no [[products]] configured"));
        }
        return Ok(config.products.iter().collect());
    }
    names
        .iter()
        .map(|name| config.product(name).map_err(Into::into))
        .collect()
}

fn cmd_build(config_path: &Path, products: &[String], compile: bool, styles: bool) -> Result<()> {
    let config = load(config_path)?;
    let selected = select(&config, products)?;

    let options = BuildOptions {
        inject_styles: styles,
        compile,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    for product in selected {
        info!(product = %product.name, compile, styles, "building help project");

        let reporter = CliProgress::new();
        let result = pipeline::build_product(&config, product, &options, &reporter)?;
        print_summary(&product.name, &result);
    }

    Ok(())
}

fn print_summary(name: &str, result: &BuildResult) {
    let report = &result.report;

    println!();
    println!("  Help project written: {name}");
    println!("  Run:       {}", report.run_id);
    println!("  Keywords:  {}", report.keyword_count);
    println!("  Dropped:   {} (empty after normalization)", report.dropped_empty);
    for source in &report.sources {
        println!(
            "  Source:    {} [{}] {} kept, {} skipped, {} excluded{}",
            source.path.display(),
            source.format,
            source.extracted,
            source.skipped,
            source.excluded,
            if source.truncated { ", truncated" } else { "" }
        );
    }
    if let Some(styles) = result.styles {
        println!("  Styles:    {}/{} pages updated", styles.updated, styles.scanned);
    }
    println!("  Compiler:  {}", describe(&report.compiler));
    if let Some(hint) = retry_hint(name, &report.compiler) {
        println!("  Retry:     {hint}");
    }
    println!("  Path:      {}", result.doc_root.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

fn describe(outcome: &CompileOutcome) -> String {
    match outcome {
        CompileOutcome::Skipped => "skipped".into(),
        CompileOutcome::Succeeded => "ok".into(),
        CompileOutcome::Failed { code, .. } => match code {
            Some(code) => format!("failed (exit {code})"),
            None => "failed (terminated by signal)".into(),
        },
        CompileOutcome::NotFound { program } => format!("'{program}' not found"),
    }
}

/// Command that re-runs a compile that did not succeed.
fn retry_hint(name: &str, outcome: &CompileOutcome) -> Option<String> {
    if outcome.is_success() || *outcome == CompileOutcome::Skipped {
        return None;
    }
    Some(format!("qhelpkit compile --product {name}"))
}

fn cmd_compile(config_path: &Path, products: &[String]) -> Result<()> {
    let config = load(config_path)?;

    for product in select(&config, products)? {
        let outcome = pipeline::recompile(&config.compiler, &config.output, product)?;
        println!("{}: {}", product.name, describe(&outcome));
    }

    Ok(())
}

fn cmd_keywords(file: &Path, format: IndexFormat, exclude: Vec<String>, json: bool) -> Result<()> {
    let source = IndexSource {
        format,
        path: file.to_path_buf(),
        exclude_refs: exclude,
    };

    let (consolidated, reports) =
        pipeline::collect_keywords(std::slice::from_ref(&source), Path::new(""), &SilentProgress)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&consolidated.entries)?);
    } else {
        for entry in &consolidated.entries {
            println!("{}\t{}", entry.name, entry.reference);
        }
    }

    if let Some(report) = reports.first() {
        info!(
            kept = consolidated.entries.len(),
            skipped = report.skipped,
            excluded = report.excluded,
            dropped_empty = consolidated.dropped_empty,
            truncated = report.truncated,
            "keywords extracted"
        );
    }

    Ok(())
}

fn cmd_list(config_path: &Path) -> Result<()> {
    let config = load(config_path)?;

    if config.products.is_empty() {
        println!("No products configured.");
        return Ok(());
    }

    for product in &config.products {
        println!(
            "{:<16} {:<28} {} source(s)  {}",
            product.name,
            product.namespace,
            product.sources.len(),
            product.doc_root.display()
        );
    }

    Ok(())
}

fn cmd_config_init(config_path: &Path) -> Result<()> {
    let path = init_config(config_path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: &Path) -> Result<()> {
    let config = load(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_extracted(&self, path: &Path, records: usize, current: usize, total: usize) {
        self.spinner.set_message(format!(
            "Extracted [{current}/{total}] {} ({records} records)",
            path.display()
        ));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
