//! CLI entry point for the tablelink join-route engine.
//!
//! This binary loads a `.links` declarative file describing which fields
//! across which databases hold the same identifiers, then answers join
//! questions about it.
//!
//! # Usage
//!
//! ```bash
//! tablelink [OPTIONS] <COMMAND>
//!
//! # Load a links file and print a model summary
//! tablelink check --file all.links
//!
//! # List every table pub.transcript can join to
//! tablelink relate --file all.links pub transcript
//!
//! # Find a join route between two (or more) tables
//! tablelink route --file all.links pub.transcript pub.probe
//! tablelink route --file all.links --format json pub.t1 pub.t2 pub.t3
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use tl_core::{Dtf, JoinPair, LinkModel};
use tl_engine::{dump_pairs, find_route, find_route_through_all, relate};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// CLI tool for querying join routes across databases from a `.links` file.
#[derive(Parser)]
#[command(name = "tablelink", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the .links file.
    ///
    /// Defaults to `./all.links` if not specified.
    #[arg(short, long, global = true, env = "TABLELINK_FILE")]
    file: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Load the links file and print a model summary.
    Check,

    /// List every declared join partner of one table.
    Relate {
        /// Database the table lives in.
        database: String,

        /// Table name.
        table: String,

        /// Output format.
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Find a join route connecting two or more tables.
    ///
    /// Tables are dotted `db.table` references (a field component is
    /// accepted and ignored). With more than two tables, the route connects
    /// the first table to all the others.
    Route {
        /// Tables to connect, `db.table` or `db.table.field`.
        #[arg(num_args = 2.., required = true)]
        tables: Vec<String>,

        /// Output format.
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Query output format.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Loads the model named by `--file`, defaulting to `./all.links`.
fn load_model(cli: &Cli) -> color_eyre::Result<LinkModel> {
    let path = cli
        .file
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("./all.links"));
    tl_engine::load(&path).map_err(|e| color_eyre::eyre::eyre!("{e}"))
}

/// Parses a dotted table reference argument.
fn parse_table_arg(text: &str) -> color_eyre::Result<Dtf> {
    Dtf::from_dotted(text).map_err(|e| color_eyre::eyre::eyre!("bad table reference: {e}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Loads the links file and prints a summary of the compiled model.
fn run_check(model: &LinkModel) -> color_eyre::Result<()> {
    let field_count: usize = model.sets().map(|(_, set)| set.fields.len()).sum();

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", model.file_name())?;
    writeln!(handle, "  identifier sets:    {}", model.set_count())?;
    writeln!(handle, "  fields:             {field_count}")?;
    writeln!(
        handle,
        "  exclusivity groups: {}",
        model.exclusivity_groups().len()
    )?;
    writeln!(handle, "  dependencies:       {}", model.dependencies().len())?;
    writeln!(handle, "  type groups:        {}", model.type_groups().len())?;
    writeln!(handle, "  ignore rules:       {}", model.ignore_rules().len())?;
    Ok(())
}

/// Lists the join partners of one table.
fn run_relate(
    model: &LinkModel,
    database: &str,
    table: &str,
    format: OutputFormat,
) -> color_eyre::Result<()> {
    info!(database, table, "relate");
    let pairs = relate(model, database, table);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => {
            if pairs.is_empty() {
                writeln!(handle, "no relations for {database}.{table}")?;
            } else {
                dump_pairs(model, &pairs, &mut handle)?;
            }
        }
        OutputFormat::Json => write_pairs_json(model, &pairs, &mut handle)?,
    }
    Ok(())
}

/// Finds a route between the given tables and prints it.
fn run_route(model: &LinkModel, tables: &[String], format: OutputFormat) -> color_eyre::Result<()> {
    let parsed: Vec<Dtf> = tables
        .iter()
        .map(|text| parse_table_arg(text))
        .collect::<Result<_, _>>()?;

    let route = if let [a, b] = parsed.as_slice() {
        find_route(model, a, b)
    } else {
        find_route_through_all(model, &parsed)
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match route {
        None => writeln!(handle, "no route")?,
        Some(pairs) => match format {
            OutputFormat::Text => {
                if pairs.is_empty() {
                    writeln!(handle, "already connected")?;
                } else {
                    dump_pairs(model, &pairs, &mut handle)?;
                }
            }
            OutputFormat::Json => write_pairs_json(model, &pairs, &mut handle)?,
        },
    }
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Serializes a pair list as JSON with resolved identifier-set names.
fn write_pairs_json<W: Write>(
    model: &LinkModel,
    pairs: &[JoinPair],
    out: &mut W,
) -> color_eyre::Result<()> {
    #[derive(serde::Serialize)]
    struct Step<'a> {
        source: &'a Dtf,
        target: &'a Dtf,
        via: &'a str,
    }

    let steps: Vec<Step<'_>> = pairs
        .iter()
        .map(|pair| Step {
            source: &pair.source,
            target: &pair.target,
            via: model.set(pair.via).display_name(),
        })
        .collect();

    let json = serde_json::to_string_pretty(&steps)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize JSON: {e}"))?;
    writeln!(out, "{json}")?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // Install color-eyre first, before any potential panics
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let model = load_model(&cli)?;
    match &cli.command {
        Commands::Check => run_check(&model),
        Commands::Relate {
            database,
            table,
            format,
        } => run_relate(&model, database, table, *format),
        Commands::Route { tables, format } => run_route(&model, tables, *format),
    }
}
