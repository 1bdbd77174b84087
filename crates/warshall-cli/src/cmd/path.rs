//! `fw path`: one shortest-path query.

use std::io::Write;
use std::path::Path;

use clap::Args;
use warshall_core::engine::solve;
use warshall_core::{ShortestPath, Solution, Vertex};

use crate::cmd::open_graph;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Graph file path, or its number in `fw list`.
    pub graph: String,

    /// Start vertex.
    pub source: Vertex,

    /// End vertex.
    pub target: Vertex,
}

pub fn run_path(args: &PathArgs, output: OutputMode, graph_dir: &Path) -> anyhow::Result<()> {
    let (_, weights) = open_graph(&args.graph, graph_dir, output)?;

    let solution = match solve(&weights) {
        Ok(solution) => solution,
        Err(e) => {
            render_error(output, &CliError::from_code(e.code(), e.to_string()))?;
            anyhow::bail!("{e}");
        }
    };

    let path = match query(&solution, args.source, args.target) {
        Ok(path) => path,
        Err(e) => {
            render_error(output, &e)?;
            anyhow::bail!("{}", e.message);
        }
    };

    render_mode(
        output,
        &path,
        |p, w| writeln!(w, "{}", join_vertices(&p.vertices)),
        render_path_pretty,
    )
}

fn query(solution: &Solution, source: Vertex, target: Vertex) -> Result<ShortestPath, CliError> {
    solution
        .path(source, target)
        .map_err(|e| CliError::from_code(e.code(), e.to_string()))
}

fn join_vertices(vertices: &[Vertex]) -> String {
    vertices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_path_pretty(path: &ShortestPath, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Path {} -> {}", path.source, path.target))?;
    pretty_kv(w, "Route", path.to_string())?;
    pretty_kv(w, "Cost", path.cost.to_string())?;
    pretty_kv(w, "Edges", path.edge_count().to_string())
}
