#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use warshall_core::config::load_config;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "fw: all-pairs shortest paths with absorbing-cycle detection",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format. Defaults to pretty on a terminal, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Directory holding graph files (overrides `graphs.dir`).
    #[arg(long, global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List graph files",
        long_about = "List the graph files in the graph directory, numbered from 1.\n\nThe number can be used in place of a GRAPH path in other commands.",
        after_help = "EXAMPLES:\n    # List files in ./tested_graph\n    fw list\n\n    # List another directory\n    fw list --dir graphs\n\n    # Emit machine-readable output\n    fw list --format json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        about = "Show a graph",
        long_about = "Print a graph's vertex count, edge count and weight matrix.",
        after_help = "EXAMPLES:\n    # Show a graph by path\n    fw show tested_graph/graph1.txt\n\n    # Show the second file of `fw list`\n    fw show 2"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        about = "Compute all shortest paths",
        long_about = "Run Floyd-Warshall on a graph and print the final distance and predecessor tables.\n\nThe run stops early when an absorbing (negative) cycle appears; the partial tables and the step are reported.",
        after_help = "EXAMPLES:\n    # Solve and print the tables\n    fw solve graph.txt\n\n    # Print every intermediate step\n    fw solve graph.txt --trace\n\n    # Also reconstruct two paths\n    fw solve graph.txt --path 0:2 --path 2:0\n\n    # Emit machine-readable output\n    fw solve graph.txt --format json"
    )]
    Solve(cmd::solve::SolveArgs),

    #[command(
        about = "Find one shortest path",
        long_about = "Solve a graph and reconstruct the minimum-cost path between two vertices.\n\nExits non-zero if the vertices are out of range, the target is unreachable, or an absorbing cycle was detected.",
        after_help = "EXAMPLES:\n    # Path from vertex 0 to vertex 2\n    fw path graph.txt 0 2\n\n    # Emit machine-readable output\n    fw path 1 0 2 --format json"
    )]
    Path(cmd::path::PathArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("WARSHALL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "warshall=debug,fw=debug,info"
        } else {
            "warshall=info,fw=info,warn"
        })
    });

    let format = env::var("WARSHALL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = match load_config(&project_root) {
        Ok(config) => config,
        Err(e) => {
            let mode = output::resolve_output_mode(cli.format, cli.json, None);
            output::render_error(
                mode,
                &output::CliError::from_code(warshall_core::ErrorCode::ConfigParseError, format!("{e:#}")),
            )?;
            return Err(e);
        }
    };

    let output = output::resolve_output_mode(cli.format, cli.json, config.output.format.as_deref());
    let graph_dir = cli.dir.clone().unwrap_or_else(|| config.graphs.dir.clone());

    match cli.command {
        Commands::List(ref args) => cmd::list::run_list(args, output, &graph_dir),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &graph_dir),
        Commands::Solve(ref args) => cmd::solve::run_solve(args, output, &graph_dir, &config.solve),
        Commands::Path(ref args) => cmd::path::run_path(args, output, &graph_dir),
    }
}
