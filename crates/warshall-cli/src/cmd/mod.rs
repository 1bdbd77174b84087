//! Subcommand handlers. Each module exposes a clap `Args` struct and a
//! `run_*` entry point.

pub mod list;
pub mod path;
pub mod show;
pub mod solve;

use std::path::{Path, PathBuf};

use warshall_core::loader::{list_graph_files, load_graph};
use warshall_core::{ErrorCode, WeightMatrix};

use crate::output::{CliError, OutputMode, render_error};

/// Turn a GRAPH argument into a file path.
///
/// An existing file wins. Otherwise a positive integer `n` selects the `n`th
/// file of `fw list` in `graph_dir`.
pub fn resolve_graph(arg: &str, graph_dir: &Path) -> Result<PathBuf, CliError> {
    let direct = PathBuf::from(arg);
    if direct.is_file() {
        return Ok(direct);
    }

    let Ok(index) = arg.parse::<usize>() else {
        return Ok(direct);
    };
    if index == 0 {
        return Err(CliError::from_code(
            ErrorCode::GraphUnreadable,
            "graph numbers start at 1",
        ));
    }

    let files = list_graph_files(graph_dir).map_err(|e| {
        CliError::from_code(
            ErrorCode::GraphUnreadable,
            format!("cannot list {}: {e}", graph_dir.display()),
        )
    })?;

    files.into_iter().nth(index - 1).ok_or_else(|| {
        CliError::from_code(
            ErrorCode::GraphUnreadable,
            format!("no graph #{index} in {}", graph_dir.display()),
        )
    })
}

/// Resolve and load a graph, reporting failures in `output` mode.
pub fn open_graph(arg: &str, graph_dir: &Path, output: OutputMode) -> anyhow::Result<(PathBuf, WeightMatrix)> {
    let path = match resolve_graph(arg, graph_dir) {
        Ok(path) => path,
        Err(e) => {
            render_error(output, &e)?;
            anyhow::bail!("{}", e.message);
        }
    };

    match load_graph(&path) {
        Ok(weights) => Ok((path, weights)),
        Err(e) => {
            render_error(output, &CliError::from_code(e.code(), e.to_string()))?;
            anyhow::bail!("{e}");
        }
    }
}
