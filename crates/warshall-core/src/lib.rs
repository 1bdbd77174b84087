#![forbid(unsafe_code)]
//! warshall-core library.
//!
//! All-pairs shortest paths over a dense weight matrix using Floyd-Warshall
//! relaxation, with absorbing-cycle detection and predecessor-based path
//! reconstruction.
//!
//! ## Pipeline
//!
//! ```text
//! graph description (text)
//!        ↓  loader::parse_graph()
//! WeightMatrix
//!        ↓  init::initialize()
//! (DistanceMatrix L, PredecessorMatrix P)
//!        ↓  engine::relax()          ← cycle::has_absorbing_cycle() each step
//! Solution { L, P, termination, iterations_completed }
//!        ↓  Solution::path(s, t)     ← path::reconstruct()
//! ShortestPath { vertices, cost }
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in [`error`]; `anyhow::Result` only
//!   where files are read ([`config`]).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod init;
pub mod loader;
pub mod matrix;
pub mod path;

pub use engine::{RelaxationObserver, Snapshot, SnapshotRecorder, Solution, Termination};
pub use error::{ErrorCode, FormatError, LoadError, PathError, SolveError};
pub use matrix::{Distance, DistanceMatrix, PredecessorMatrix, SquareMatrix, Vertex, Weight, WeightMatrix};
pub use path::ShortestPath;
