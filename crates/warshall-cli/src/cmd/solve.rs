//! `fw solve`: run the all-pairs relaxation on one graph.
//!
//! Prints the final distance and predecessor tables, why the run ended, and
//! optionally every intermediate snapshot and a set of path queries.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use warshall_core::config::SolveConfig;
use warshall_core::cycle::absorbing_vertices;
use warshall_core::engine::{RecordedSnapshot, solve_with_observer};
use warshall_core::{
    DistanceMatrix, PredecessorMatrix, ShortestPath, SnapshotRecorder, Solution, Termination,
    Vertex,
};

use crate::cmd::open_graph;
use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_rule, pretty_section, render_error, render_mode, write_matrix,
};

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Graph file path, or its number in `fw list`.
    pub graph: String,

    /// Print the tables before every relaxation step.
    #[arg(long)]
    pub trace: bool,

    /// Reconstruct the path SOURCE:TARGET after solving. Repeatable.
    #[arg(long = "path", value_name = "S:T", value_parser = parse_query)]
    pub paths: Vec<(Vertex, Vertex)>,
}

/// Parse a `SOURCE:TARGET` pair.
pub fn parse_query(raw: &str) -> Result<(Vertex, Vertex), String> {
    let (source, target) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SOURCE:TARGET, got '{raw}'"))?;
    let vertex = |token: &str| {
        token
            .trim()
            .parse::<Vertex>()
            .map_err(|_| format!("'{token}' is not a vertex index"))
    };
    Ok((vertex(source)?, vertex(target)?))
}

/// Full solve report as returned in JSON output.
#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub graph: String,
    pub vertices: usize,
    pub termination: Termination,
    pub iterations_completed: usize,
    /// Vertices with a negative self-distance when the run stopped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub absorbing_vertices: Vec<Vertex>,
    pub distances: DistanceMatrix,
    pub predecessors: PredecessorMatrix,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snapshots: Vec<RecordedSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathOutcome>,
}

/// Result of one `--path` query.
#[derive(Debug, Serialize)]
pub struct PathOutcome {
    pub source: Vertex,
    pub target: Vertex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<ShortestPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

/// One-line description of how a run ended.
pub fn termination_line(termination: Termination, iterations: usize) -> String {
    match termination {
        Termination::Completed => format!("completed after {iterations} step(s)"),
        Termination::AbsorbingCycle { step } => {
            format!("stops at step {step} due to an absorbing cycle")
        }
    }
}

pub fn run_solve(
    args: &SolveArgs,
    output: OutputMode,
    graph_dir: &Path,
    defaults: &SolveConfig,
) -> anyhow::Result<()> {
    let (path, weights) = open_graph(&args.graph, graph_dir, output)?;
    let trace = args.trace || defaults.trace;

    let mut recorder = SnapshotRecorder::new();
    let result = if trace {
        solve_with_observer(&weights, &mut recorder)
    } else {
        solve_with_observer(&weights, &mut ())
    };

    let solution = match result {
        Ok(solution) => solution,
        Err(e) => {
            render_error(output, &CliError::from_code(e.code(), e.to_string()))?;
            anyhow::bail!("{e}");
        }
    };

    let report = build_report(path.display().to_string(), solution, recorder.into_snapshots(), &args.paths);
    render_mode(output, &report, render_solve_text, render_solve_pretty)
}

fn build_report(
    graph: String,
    solution: Solution,
    snapshots: Vec<RecordedSnapshot>,
    queries: &[(Vertex, Vertex)],
) -> SolveReport {
    let paths = queries
        .iter()
        .map(|&(source, target)| match solution.path(source, target) {
            Ok(path) => PathOutcome {
                source,
                target,
                path: Some(path),
                error: None,
            },
            Err(e) => PathOutcome {
                source,
                target,
                path: None,
                error: Some(CliError::from_code(e.code(), e.to_string())),
            },
        })
        .collect();

    let termination = solution.termination();
    let iterations_completed = solution.iterations_completed();
    let vertices = solution.vertex_count();
    let absorbing = if solution.is_authoritative() {
        Vec::new()
    } else {
        absorbing_vertices(solution.distances())
    };
    let (distances, predecessors) = solution.into_parts();

    SolveReport {
        graph,
        vertices,
        termination,
        iterations_completed,
        absorbing_vertices: absorbing,
        distances,
        predecessors,
        snapshots,
        paths,
    }
}

fn predecessor_cell(blank: &'static str) -> impl Fn(&Option<Vertex>) -> String {
    move |p| p.map_or_else(|| blank.to_string(), |v| v.to_string())
}

fn write_path_outcome(w: &mut dyn Write, outcome: &PathOutcome) -> std::io::Result<()> {
    match (&outcome.path, &outcome.error) {
        (Some(path), _) => writeln!(w, "{} -> {}: {path}", outcome.source, outcome.target),
        (None, Some(error)) => writeln!(
            w,
            "{} -> {}: error: {}",
            outcome.source, outcome.target, error.message
        ),
        (None, None) => writeln!(w, "{} -> {}: no result", outcome.source, outcome.target),
    }
}

fn render_solve_text(report: &SolveReport, w: &mut dyn Write) -> std::io::Result<()> {
    for snapshot in &report.snapshots {
        if snapshot.is_final {
            writeln!(w, "final after {} step(s)", snapshot.step)?;
        } else {
            writeln!(w, "before step {}", snapshot.step)?;
        }
        writeln!(w, "L")?;
        write_matrix(w, &snapshot.distances, ToString::to_string)?;
        writeln!(w, "P")?;
        write_matrix(w, &snapshot.predecessors, predecessor_cell("-"))?;
    }

    writeln!(
        w,
        "{}",
        termination_line(report.termination, report.iterations_completed)
    )?;
    writeln!(w, "L")?;
    write_matrix(w, &report.distances, ToString::to_string)?;
    writeln!(w, "P")?;
    write_matrix(w, &report.predecessors, predecessor_cell("-"))?;
    for outcome in &report.paths {
        write_path_outcome(w, outcome)?;
    }
    Ok(())
}

fn render_solve_pretty(report: &SolveReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Solve {}", report.graph))?;
    pretty_kv(w, "Vertices", report.vertices.to_string())?;
    pretty_kv(
        w,
        "Result",
        termination_line(report.termination, report.iterations_completed),
    )?;
    if !report.absorbing_vertices.is_empty() {
        let listed: Vec<String> = report.absorbing_vertices.iter().map(ToString::to_string).collect();
        pretty_kv(w, "Cycle via", listed.join(", "))?;
    }

    for snapshot in &report.snapshots {
        writeln!(w)?;
        let heading = if snapshot.is_final {
            format!("Final tables ({} step(s))", snapshot.step)
        } else {
            let step = snapshot.step;
            format!("Before step {step} (transitive closure on {step})")
        };
        pretty_section(w, &heading)?;
        writeln!(w, "L:")?;
        write_matrix(w, &snapshot.distances, ToString::to_string)?;
        writeln!(w, "P:")?;
        write_matrix(w, &snapshot.predecessors, predecessor_cell(""))?;
    }

    writeln!(w)?;
    pretty_section(w, "Distances L (row = from, column = to)")?;
    write_matrix(w, &report.distances, ToString::to_string)?;
    writeln!(w)?;
    pretty_section(w, "Predecessors P")?;
    write_matrix(w, &report.predecessors, predecessor_cell(""))?;

    if !report.paths.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Paths")?;
        for outcome in &report.paths {
            write_path_outcome(w, outcome)?;
        }
    }
    pretty_rule(w)
}
