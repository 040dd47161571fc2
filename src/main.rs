//! Route conventions CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!     manifest.toml
//!          │
//!          ▼
//!   ┌──────────────┐    ┌──────────────┐    ┌─────────────────────┐
//!   │    config    │───▶│    types     │───▶│     conventions     │
//!   │ load/validate│    │ TypeCatalog  │    │ ConventionRegistry  │
//!   └──────────────┘    └──────────────┘    └──────────┬──────────┘
//!                                                      │ apply (registration order)
//!                                                      ▼
//!                                           ┌─────────────────────┐
//!                                           │       routing       │
//!                                           │ MatchSet + prefix   │
//!                                           │ engine per group    │
//!                                           └──────────┬──────────┘
//!                                                      ▼
//!                                               RouteTable (text/json)
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use route_conventions::config::validation::validate_log_level;
use route_conventions::config::{load_manifest, LogFormat, Manifest, ManifestError, ManifestWatcher};
use route_conventions::conventions::{PassReport, RouteTable};
use route_conventions::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "route-conventions")]
#[command(about = "Apply route prefix and access conventions to endpoint groups", long_about = None)]
struct Cli {
    /// Overrides the manifest log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Overrides the manifest log format
    #[arg(long, global = true, value_enum)]
    log_format: Option<FormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the convention pass and print the resulting route table
    Apply {
        #[arg(short, long)]
        manifest: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputArg::Table)]
        output: OutputArg,
    },
    /// Parse, validate and register conventions without running the pass
    Validate {
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Re-run the pass whenever the manifest changes
    Watch {
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Pretty,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputArg {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let path = match &cli.command {
        Commands::Apply { manifest, .. } | Commands::Validate { manifest } | Commands::Watch { manifest } => {
            manifest.clone()
        }
    };

    let loaded = load_manifest(&path);
    let mut observability = loaded
        .as_ref()
        .map(|m| m.observability.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        validate_log_level(level)?;
        observability.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        observability.log_format = match format {
            FormatArg::Pretty => LogFormat::Pretty,
            FormatArg::Json => LogFormat::Json,
        };
    }
    init_logging(&observability);

    let manifest = loaded.map_err(|e| {
        tracing::error!(path = ?path, error = %e, "Failed to load manifest");
        e
    })?;

    match cli.command {
        Commands::Apply { output, .. } => {
            let (table, report) = run_pass(&manifest)?;
            match output {
                OutputArg::Table => print!("{table}"),
                OutputArg::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "report": report, "routes": table }))?
                ),
            }
        }
        Commands::Validate { .. } => {
            let (_, groups, registry) = manifest.build()?;
            println!(
                "Manifest OK: {} group(s), {} convention(s)",
                groups.len(),
                registry.len()
            );
        }
        Commands::Watch { .. } => watch(&path, manifest).await?,
    }

    Ok(())
}

/// Build everything from `manifest` and run one convention pass.
fn run_pass(manifest: &Manifest) -> Result<(RouteTable, PassReport), ManifestError> {
    let (_, mut groups, registry) = manifest.build()?;
    let report = registry.apply(&mut groups)?;
    Ok((RouteTable::from_groups(&groups), report))
}

async fn watch(path: &Path, manifest: Manifest) -> Result<(), Box<dyn std::error::Error>> {
    let (mut current, _) = run_pass(&manifest)?;
    print!("{current}");

    let (_watcher, mut updates) = ManifestWatcher::start(path)?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(manifest) = updates.recv() => match run_pass(&manifest) {
                Ok((table, report)) => {
                    tracing::info!(
                        routes = table.route_count(),
                        previous_routes = current.route_count(),
                        matched = report.matched,
                        "Route table updated"
                    );
                    current = table;
                    print!("{current}");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Convention pass failed, keeping last good route table");
                }
            },
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    tracing::error!(error = %e, "Failed to listen for interrupt");
                }
                break;
            }
        }
    }

    tracing::info!("Watch stopped");
    Ok(())
}
