//! Graph description loading.
//!
//! # Format
//!
//! ```text
//! 3          ← vertex count V
//! 3          ← edge count E
//! 0 1 4      ← E lines of `from to weight`
//! 1 2 2
//! 0 2 10
//! ```
//!
//! Fields are separated by any whitespace. Trailing blank lines are ignored;
//! any other extra line counts as an undeclared edge. There are no comments
//! and no header. Duplicate `from to` pairs are accepted and the last one
//! wins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{FormatError, LoadError};
pub use crate::matrix::MAX_VERTICES;
use crate::matrix::{Vertex, Weight, WeightMatrix};


/// Parse a graph description into a [`WeightMatrix`].
///
/// # Errors
///
/// Returns a [`FormatError`] naming the offending line when a count or edge
/// line is missing or malformed, a vertex is out of range, or the number of
/// edge lines differs from the declared edge count.
pub fn parse_graph(text: &str) -> Result<WeightMatrix, FormatError> {
    let mut lines = text.lines();

    let vertex_count = parse_count(lines.next(), 1, "vertex count")?;
    if vertex_count > MAX_VERTICES {
        return Err(FormatError::TooManyVertices {
            line: 1,
            value: vertex_count,
            limit: MAX_VERTICES,
        });
    }
    let edge_count = parse_count(lines.next(), 2, "edge count")?;

    let mut edge_lines: Vec<&str> = lines.collect();
    while edge_lines.last().is_some_and(|line| line.trim().is_empty()) {
        edge_lines.pop();
    }

    let edges = edge_lines
        .iter()
        .enumerate()
        .map(|(offset, line)| parse_edge(line, offset + 1, vertex_count))
        .collect::<Result<Vec<_>, _>>()?;

    WeightMatrix::from_edges(vertex_count, edge_count, edges)
}

/// Read and parse a graph file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Format`] if its contents are malformed.
#[instrument]
pub fn load_graph(path: &Path) -> Result<WeightMatrix, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let weights = parse_graph(&text).map_err(|source| LoadError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        vertices = weights.vertex_count(),
        edges = weights.edge_count(),
        "graph loaded"
    );
    Ok(weights)
}

/// List the regular files in `dir`, sorted by file name.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be read.
pub fn list_graph_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_count(line: Option<&str>, number: usize, what: &'static str) -> Result<usize, FormatError> {
    let line = line.ok_or(FormatError::MissingLine { line: number, what })?;
    let value = parse_integer(line.trim(), number)?;
    usize::try_from(value).map_err(|_| FormatError::NegativeCount {
        line: number,
        what,
        value,
    })
}

/// Parse one `from to weight` line. `edge` is the 1-based edge number; the
/// text line number is `edge + 2`.
fn parse_edge(line: &str, edge: usize, vertex_count: usize) -> Result<(Vertex, Vertex, Weight), FormatError> {
    let number = edge + 2;
    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[from, to, weight] = fields.as_slice() else {
        return Err(FormatError::WrongFieldCount {
            line: number,
            found: fields.len(),
        });
    };

    let vertex = |token: &str| -> Result<Vertex, FormatError> {
        let value = parse_integer(token, number)?;
        usize::try_from(value).map_err(|_| FormatError::VertexOutOfRange {
            edge,
            vertex: value,
            vertex_count,
        })
    };

    Ok((vertex(from)?, vertex(to)?, parse_integer(weight, number)?))
}

fn parse_integer(token: &str, line: usize) -> Result<i64, FormatError> {
    token.parse::<i64>().map_err(|_| FormatError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}
