//! `fw show`: print a graph's weight matrix and edge list.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use warshall_core::{SquareMatrix, Vertex, Weight, WeightMatrix};

use crate::cmd::open_graph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, write_matrix};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Graph file path, or its number in `fw list`.
    pub graph: String,
}

/// Graph description as returned in JSON output.
#[derive(Debug, Serialize)]
pub struct ShowGraph<'a> {
    pub path: String,
    pub vertices: usize,
    pub edges: usize,
    /// `weights[from][to]`, `null` where there is no edge.
    pub weights: &'a SquareMatrix<Option<Weight>>,
    pub edge_list: Vec<ShowEdge>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ShowEdge {
    pub from: Vertex,
    pub to: Vertex,
    pub weight: Weight,
}

pub fn run_show(args: &ShowArgs, output: OutputMode, graph_dir: &Path) -> anyhow::Result<()> {
    let (path, weights) = open_graph(&args.graph, graph_dir, output)?;
    let shown = describe(&path, &weights);

    render_mode(output, &shown, render_show_text, render_show_pretty)
}

fn describe<'a>(path: &Path, weights: &'a WeightMatrix) -> ShowGraph<'a> {
    ShowGraph {
        path: path.display().to_string(),
        vertices: weights.vertex_count(),
        edges: weights.edge_count(),
        weights: weights.as_matrix(),
        edge_list: weights
            .edges()
            .map(|(from, to, weight)| ShowEdge { from, to, weight })
            .collect(),
    }
}

/// Text output is itself a valid graph description.
fn render_show_text(graph: &ShowGraph<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", graph.vertices)?;
    writeln!(w, "{}", graph.edge_list.len())?;
    for edge in &graph.edge_list {
        writeln!(w, "{} {} {}", edge.from, edge.to, edge.weight)?;
    }
    Ok(())
}

fn render_show_pretty(graph: &ShowGraph<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Graph {}", graph.path))?;
    pretty_kv(w, "Vertices", graph.vertices.to_string())?;
    pretty_kv(w, "Edges", graph.edges.to_string())?;
    writeln!(w)?;
    pretty_section(w, "Weights (row = from, column = to)")?;
    write_matrix(w, graph.weights, |weight| weight.map_or_else(String::new, |x| x.to_string()))
}
