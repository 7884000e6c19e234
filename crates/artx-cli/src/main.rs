//! ArtX - host node tools
//!
//! Usage:
//!   artx list [PATH]            # List a directory under the host base
//!   artx models                 # List model directories
//!   artx install <URL>          # Clone a GitHub repository
//!   artx nodes                  # Show the node registry
//!   artx run <NODE_ID> -i k=v   # Run a node by id

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use artx_core::config::{ArtxConfig, ConfigStore};
use artx_core::context::AppContext;
use artx_core::listing::ListError;
use artx_core::nodes::{InputKind, NodeInputs, NodeRegistry};
use artx_core::types::Category;

#[derive(Parser)]
#[command(name = "artx")]
#[command(about = "Directory listing and GitHub installer for the host application", long_about = None)]
struct Cli {
    /// Host installation root (default: config value, then the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Host model storage root (default: <base-dir>/models)
    #[arg(long, global = true, value_name = "DIR")]
    models_dir: Option<PathBuf>,

    /// Path to artx.toml (default: ~/.config/artx/artx.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Clone timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the contents of a directory under the host base directory
    #[command(alias = "ls")]
    List {
        /// Path relative to the base directory
        path: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the subdirectories of the models directory
    Models {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Clone a GitHub repository as a node package or model asset
    Install {
        /// Repository URL (https://github.com/<owner>/<repo>)
        url: String,

        /// Install category (custom_nodes or models)
        #[arg(long, short, default_value = "custom_nodes")]
        category: String,

        /// Remove the partial checkout if the clone times out
        #[arg(long)]
        cleanup_on_timeout: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the registered nodes
    Nodes {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Run a registered node by id
    Run {
        /// Node id (see `artx nodes`)
        node_id: String,

        /// Node input (KEY=VALUE)
        #[arg(long = "input", short, value_name = "KEY=VALUE")]
        inputs: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable text
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// No output; only the exit status
    Quiet,
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only the result text.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artx_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let success = match cli.command {
        Commands::List { path, format } => {
            let ctx = AppContext::from_config(&config, &cwd);
            run_list(&ctx, path.as_deref().unwrap_or(""), format)?
        }
        Commands::Models { format } => {
            let ctx = AppContext::from_config(&config, &cwd);
            run_models(&ctx, format)?
        }
        Commands::Install {
            url,
            category,
            cleanup_on_timeout,
            format,
        } => {
            let mut config = config;
            if cleanup_on_timeout {
                config.clone.cleanup_on_timeout = true;
            }
            let ctx = AppContext::from_config(&config, &cwd);
            run_install(&ctx, &url, &category, format)?
        }
        Commands::Nodes { format } => {
            run_nodes(&NodeRegistry::builtin(), format)?;
            true
        }
        Commands::Run {
            node_id,
            inputs,
            format,
        } => {
            let ctx = AppContext::from_config(&config, &cwd);
            run_node(&ctx, &node_id, &inputs, format)?
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Load artx.toml and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<ArtxConfig> {
    let store = match &cli.config {
        Some(path) => ConfigStore::from_path(path),
        None => ConfigStore::from_default_location()?,
    };
    let mut config = store.load()?;

    if let Some(base_dir) = &cli.base_dir {
        config.paths.base_dir = Some(base_dir.clone());
    }
    if let Some(models_dir) = &cli.models_dir {
        config.paths.models_dir = Some(models_dir.clone());
    }
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            anyhow::bail!("--timeout must be greater than zero");
        }
        config.clone.timeout_secs = timeout;
    }

    tracing::debug!(
        config_path = %store.config_path().display(),
        base_dir = ?config.paths.base_dir,
        models_dir = ?config.paths.models_dir,
        program = %config.clone.program.display(),
        timeout_secs = config.clone.timeout_secs,
        "resolved configuration"
    );
    Ok(config)
}

fn run_list(ctx: &AppContext, path: &str, format: OutputFormat) -> Result<bool> {
    match ctx.path_lister().list(path) {
        Ok(listing) => {
            match format {
                OutputFormat::Table => println!("{}", listing.render()),
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "requested_path": listing.requested_path,
                        "resolved_path": listing.resolved_path,
                        "directories": listing.directories,
                        "files": listing.files,
                        "directory_count": listing.directory_count(),
                        "file_count": listing.file_count(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Quiet => {}
            }
            Ok(true)
        }
        Err(err) => {
            print_list_error(&err, format)?;
            Ok(false)
        }
    }
}

fn run_models(ctx: &AppContext, format: OutputFormat) -> Result<bool> {
    match ctx.path_lister().list_models() {
        Ok(listing) => {
            match format {
                OutputFormat::Table => println!("{}", listing.render()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
                OutputFormat::Quiet => {}
            }
            Ok(true)
        }
        Err(err) => {
            print_list_error(&err, format)?;
            Ok(false)
        }
    }
}

fn print_list_error(err: &ListError, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{} {}", style("✗").red(), err),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "error": err.to_string(),
                "kind": err.kind(),
                "path": err.path(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn run_install(ctx: &AppContext, url: &str, category: &str, format: OutputFormat) -> Result<bool> {
    let category: Category = category.parse().map_err(anyhow::Error::msg)?;
    let report = ctx.installer().install_report(url, category);

    match format {
        OutputFormat::Table => {
            let text = report.render();
            if report.is_success() {
                println!("{}", text);
                println!("{} Installed '{}'", style("✓").green(), report.url);
            } else {
                println!("{}", text);
                println!("{} Install failed", style("✗").red());
            }
        }
        OutputFormat::Json => {
            let mut output = serde_json::to_value(&report)?;
            output["kind"] = serde_json::to_value(report.outcome.kind())?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }

    Ok(report.is_success())
}

fn run_nodes(registry: &NodeRegistry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                style(format!("{:<22} {:<24} Inputs", "Id", "Display name")).bold()
            );
            println!("{}", "-".repeat(70));
            for entry in registry.all() {
                let inputs: Vec<String> = entry
                    .inputs
                    .iter()
                    .map(|input| match input.kind {
                        InputKind::String { .. } => input.name.to_string(),
                        InputKind::Choice { choices } => {
                            format!("{} [{}]", input.name, choices.join("|"))
                        }
                    })
                    .collect();
                println!(
                    "{:<22} {:<24} {}",
                    entry.id,
                    entry.display_name,
                    if inputs.is_empty() {
                        "-".to_string()
                    } else {
                        inputs.join(", ")
                    }
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&registry.to_json())?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn run_node(
    ctx: &AppContext,
    node_id: &str,
    raw_inputs: &[String],
    format: OutputFormat,
) -> Result<bool> {
    let registry = ctx.node_registry();
    let node = registry.instantiate(node_id, ctx).ok_or_else(|| {
        let known: Vec<_> = registry.all().iter().map(|e| e.id).collect();
        anyhow::anyhow!(
            "Unknown node: '{}'. Available nodes: {}",
            node_id,
            known.join(", ")
        )
    })?;
    let inputs = parse_inputs(raw_inputs)?;

    let output = node.run(&inputs);

    match format {
        OutputFormat::Table => println!("{}", output.text),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Quiet => {}
    }
    Ok(output.success)
}

fn parse_inputs(raw: &[String]) -> Result<NodeInputs> {
    let mut inputs = NodeInputs::new();
    for pair in raw {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid input '{}'. Use KEY=VALUE", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Invalid input '{}'. Key must not be empty", pair);
        }
        inputs.insert(key.to_string(), value.to_string());
    }
    Ok(inputs)
}
