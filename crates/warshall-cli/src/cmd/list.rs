//! `fw list`: number the graph files in the graph directory.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use warshall_core::ErrorCode;
use warshall_core::loader::{list_graph_files, load_graph};

use crate::output::{CliError, OutputMode, pretty_rule, pretty_section, render_error, render_mode};

#[derive(Args, Debug, Default)]
pub struct ListArgs {}

/// One row of `fw list`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ListedGraph {
    /// 1-based number accepted wherever a GRAPH is expected.
    pub index: usize,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<usize>,
    /// Load failure, when the file is not a valid graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn run_list(_args: &ListArgs, output: OutputMode, graph_dir: &Path) -> anyhow::Result<()> {
    let files = match list_graph_files(graph_dir) {
        Ok(files) => files,
        Err(e) => {
            render_error(
                output,
                &CliError::from_code(
                    ErrorCode::GraphUnreadable,
                    format!("cannot list {}: {e}", graph_dir.display()),
                ),
            )?;
            anyhow::bail!("cannot list {}: {e}", graph_dir.display());
        }
    };

    let listed = describe(&files);
    tracing::debug!(count = listed.len(), dir = %graph_dir.display(), "listed graphs");

    render_mode(
        output,
        &listed,
        |rows, w| render_list_text(rows, w),
        |rows, w| render_list_pretty(rows, graph_dir, w),
    )
}

fn describe(files: &[std::path::PathBuf]) -> Vec<ListedGraph> {
    files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let mut row = ListedGraph {
                index: i + 1,
                path: path.display().to_string(),
                vertices: None,
                edges: None,
                error: None,
            };
            match load_graph(path) {
                Ok(weights) => {
                    row.vertices = Some(weights.vertex_count());
                    row.edges = Some(weights.edge_count());
                }
                Err(e) => row.error = Some(e.to_string()),
            }
            row
        })
        .collect()
}

fn render_list_text(rows: &[ListedGraph], w: &mut dyn Write) -> std::io::Result<()> {
    for row in rows {
        match (row.vertices, row.edges) {
            (Some(v), Some(e)) => writeln!(w, "{}\t{}\t{v}\t{e}", row.index, row.path)?,
            _ => writeln!(w, "{}\t{}\tinvalid", row.index, row.path)?,
        }
    }
    Ok(())
}

fn render_list_pretty(rows: &[ListedGraph], graph_dir: &Path, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Graphs in {}", graph_dir.display()))?;
    if rows.is_empty() {
        writeln!(w, "(no graph files)")?;
        return Ok(());
    }
    writeln!(w, "{:>4}  {:>8}  {:>8}  FILE", "#", "VERTICES", "EDGES")?;
    for row in rows {
        match (row.vertices, row.edges) {
            (Some(v), Some(e)) => writeln!(w, "{:>4}  {v:>8}  {e:>8}  {}", row.index, row.path)?,
            _ => writeln!(w, "{:>4}  {:>8}  {:>8}  {}", row.index, "-", "-", row.path)?,
        }
    }
    pretty_rule(w)?;
    writeln!(w, "{} file(s)", rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn describe_numbers_files_and_flags_invalid_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "3\n1\n0 1 4\n").expect("write");
        fs::write(dir.path().join("b.txt"), "nope\n").expect("write");

        let files = list_graph_files(dir.path()).expect("list");
        let rows = describe(&files);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].vertices, Some(3));
        assert_eq!(rows[0].edges, Some(1));
        assert!(rows[0].error.is_none());
        assert_eq!(rows[1].index, 2);
        assert!(rows[1].error.is_some());
    }

    #[test]
    fn text_rows_are_tab_separated() {
        let rows = vec![
            ListedGraph {
                index: 1,
                path: "g/a.txt".into(),
                vertices: Some(3),
                edges: Some(2),
                error: None,
            },
            ListedGraph {
                index: 2,
                path: "g/b.txt".into(),
                vertices: None,
                edges: None,
                error: Some("bad".into()),
            },
        ];
        let mut out = Vec::new();
        render_list_text(&rows, &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "1\tg/a.txt\t3\t2\n2\tg/b.txt\tinvalid\n"
        );
    }
}
