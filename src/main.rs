//! blueprint-tools: blueprint extraction and semantic version diff for
//! low-code application packages.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use blueprint_tools::{
    cli,
    config::{AppConfig, ConfigPreset, Validatable},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blueprint-tools")]
#[command(version)]
#[command(about = "Blueprint extraction and version diff for low-code packages", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Changes detected (with --fail-on-change)
    2  Conflicts detected (with --fail-on-conflict)
    3  Error occurred

EXAMPLES:
    # Blueprint of one package
    blueprint-tools blueprint app-v1.zip -O blueprint.json

    # Compare two versions, readable summary
    blueprint-tools diff app-v1.zip app-v2.zip -o summary

    # Merge check for a customized package against a vendor upgrade
    blueprint-tools three-way base.zip customer.zip vendor.zip --fail-on-conflict

    # Process flow changes since a saved blueprint
    blueprint-tools flows blueprint.json app-v2.zip")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "BLUEPRINT_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Named preset applied before the config file (default, strict, fast, ci-cd)
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output and behavior flags shared by every report-producing command
#[derive(Args, Clone)]
struct ReportArgs {
    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// Maximum items listed per section in summary output
    #[arg(long)]
    max_items: Option<usize>,

    /// Analyze documents on a single thread
    #[arg(long)]
    sequential: bool,

    /// Skip reference resolution in process-model expressions
    #[arg(long)]
    raw_expressions: bool,
}

/// Comparison flags
#[derive(Args, Clone)]
struct CompareArgs {
    /// Compare version identifiers only, without content-hash refinement
    #[arg(long)]
    no_refinement: bool,

    /// Exit with code 1 if any changes are detected
    #[arg(long)]
    fail_on_change: bool,

    /// Exit with code 2 if conflicts are detected
    #[arg(long)]
    fail_on_conflict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the blueprint of one package
    Blueprint {
        /// Package ZIP file or extracted directory
        package: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Compare two versions of a package
    Diff {
        /// Old package
        old: PathBuf,

        /// New package
        new: PathBuf,

        #[command(flatten)]
        report: ReportArgs,

        #[command(flatten)]
        compare: CompareArgs,
    },

    /// Classify changes of a customized package against a vendor upgrade
    ThreeWay {
        /// Common ancestor package
        base: PathBuf,

        /// Customer-modified package
        customer: PathBuf,

        /// Vendor upgrade package
        vendor: PathBuf,

        #[command(flatten)]
        report: ReportArgs,

        #[command(flatten)]
        compare: CompareArgs,
    },

    /// Compare process nodes and flows against a saved blueprint
    Flows {
        /// Blueprint JSON written by an earlier `blueprint` run
        previous: PathBuf,

        /// Current package
        package: PathBuf,

        #[command(flatten)]
        report: ReportArgs,

        /// Exit with code 1 if any node or flow changed
        #[arg(long)]
        fail_on_change: bool,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .blueprint-tools.yaml in the current directory
    Init,
    /// Print the JSON Schema of the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List named presets
    Presets,
}

impl ReportArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(format) = self.output {
            config.output.format = format;
        }
        config.output.file.clone_from(&self.output_file);
        config.output.pretty = !self.compact;
        config.output.max_items = self.max_items;
        config.analysis.parallel = !self.sequential;
        config.analysis.format_expressions = !self.raw_expressions;
    }
}

impl CompareArgs {
    fn apply(&self, config: &mut AppConfig) {
        config.comparison.content_hash_refinement = !self.no_refinement;
        config.behavior.fail_on_change = self.fail_on_change;
        config.behavior.fail_on_conflict = self.fail_on_conflict;
    }
}

/// Effective configuration: preset, then config file, then CLI flags.
fn resolve_config(cli: &Cli, overrides: &AppConfig) -> Result<AppConfig> {
    let (config, loaded_from) = match &cli.preset {
        None => AppConfig::from_file_with_overrides(cli.config.as_deref(), overrides),
        Some(name) => {
            let preset = ConfigPreset::from_name(name)
                .with_context(|| format!("unknown preset '{name}'"))?;
            let (file_config, loaded_from) =
                blueprint_tools::config::load_or_default(cli.config.as_deref());
            let mut config = AppConfig::from_preset(preset);
            config.merge(&file_config);
            config.merge(overrides);
            (config, loaded_from)
        }
    };
    if let Some(path) = &loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(code) if code != exit_codes::SUCCESS => std::process::exit(code),
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let mut overrides = AppConfig::builder()
        .quiet(cli.quiet)
        .no_color(cli.no_color)
        .build();

    match &cli.command {
        Commands::Blueprint { package, report } => {
            report.apply(&mut overrides);
            let config = resolve_config(cli, &overrides)?;
            cli::run_blueprint(package, &config)
        }

        Commands::Diff {
            old,
            new,
            report,
            compare,
        } => {
            report.apply(&mut overrides);
            compare.apply(&mut overrides);
            let config = resolve_config(cli, &overrides)?;
            cli::run_diff(old, new, &config)
        }

        Commands::ThreeWay {
            base,
            customer,
            vendor,
            report,
            compare,
        } => {
            report.apply(&mut overrides);
            compare.apply(&mut overrides);
            let config = resolve_config(cli, &overrides)?;
            cli::run_three_way(base, customer, vendor, &config)
        }

        Commands::Flows {
            previous,
            package,
            report,
            fail_on_change,
        } => {
            report.apply(&mut overrides);
            overrides.behavior.fail_on_change = *fail_on_change;
            let config = resolve_config(cli, &overrides)?;
            cli::run_flows(previous, package, &config)
        }

        Commands::Config { action } => run_config(cli, action).map(|()| exit_codes::SUCCESS),
    }
}

fn run_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) =
                blueprint_tools::config::load_or_default(cli.config.as_deref());
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                dirs::config_dir().map(|p| p.join("blueprint-tools").display().to_string()),
                dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            match blueprint_tools::config::discover_config_file(cli.config.as_deref()) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".blueprint-tools.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            let content = blueprint_tools::config::generate_full_example_config();
            std::fs::write(&target, content)
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
        ConfigAction::Schema { output } => {
            let schema = blueprint_tools::config::generate_json_schema()
                .context("failed to serialize schema")?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
        ConfigAction::Presets => {
            for preset in ConfigPreset::all() {
                println!("{:<10} {}", preset.name(), preset.description());
            }
        }
    }
    Ok(())
}
