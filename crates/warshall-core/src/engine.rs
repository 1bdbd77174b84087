//! Floyd-Warshall relaxation with early exit on absorbing cycles.
//!
//! # Algorithm
//!
//! For each intermediate vertex `x = 0, 1, …, V-1` ("transitive closure on
//! x"):
//!
//! 1. If the diagonal of `L` holds a negative entry, stop: an absorbing
//!    cycle exists and no further step can produce meaningful distances.
//! 2. Otherwise, for every ordered pair `(y, z)`, if going through `x` is
//!    strictly cheaper (`L[y][x] + L[x][z] < L[y][z]`), take it and record
//!    `P[y][z] = P[x][z]`.
//!
//! Updates are made in place, so later pairs in the same step read values
//! already improved earlier in that step.
//!
//! After the last step the diagonal is checked once more. A negative entry
//! there is reported as an absorbing cycle detected at step `V`.
//!
//! # Ownership
//!
//! [`relax`] takes `L` and `P` by value and moves them into the returned
//! [`Solution`], which only hands out shared references. Observers see each
//! intermediate state through a borrowed [`Snapshot`].

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cycle;
use crate::error::{PathError, SolveError};
use crate::init;
use crate::matrix::{Distance, DistanceMatrix, PredecessorMatrix, Vertex, WeightMatrix};
use crate::path::{self, ShortestPath};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Why the relaxation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Termination {
    /// Every vertex was processed as an intermediate and no absorbing cycle
    /// was found. Distances are the true shortest path costs.
    Completed,
    /// A negative self-distance was observed before `step` could run (or
    /// after the last step, when `step == V`). The tables hold the partial
    /// state at that point.
    AbsorbingCycle { step: usize },
}

/// Read-only view of the tables before a step, or after the last one.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    /// Intermediate vertex about to be processed, or the number of completed
    /// steps for the final snapshot.
    pub step: usize,
    pub is_final: bool,
    pub distances: &'a DistanceMatrix,
    pub predecessors: &'a PredecessorMatrix,
}

impl Snapshot<'_> {
    #[must_use]
    pub fn to_recorded(&self) -> RecordedSnapshot {
        RecordedSnapshot {
            step: self.step,
            is_final: self.is_final,
            distances: self.distances.clone(),
            predecessors: self.predecessors.clone(),
        }
    }
}

/// Owned copy of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedSnapshot {
    pub step: usize,
    pub is_final: bool,
    pub distances: DistanceMatrix,
    pub predecessors: PredecessorMatrix,
}

/// Receives progress snapshots from the engine.
///
/// Observers only ever see shared references, so they cannot influence the
/// result.
pub trait RelaxationObserver {
    fn observe(&mut self, snapshot: &Snapshot<'_>);
}

impl<F> RelaxationObserver for F
where
    F: FnMut(&Snapshot<'_>),
{
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        self(snapshot);
    }
}

/// No-op observer.
impl RelaxationObserver for () {
    fn observe(&mut self, _snapshot: &Snapshot<'_>) {}
}

/// Observer that keeps an owned copy of every snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    snapshots: Vec<RecordedSnapshot>,
}

impl SnapshotRecorder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> &[RecordedSnapshot] {
        &self.snapshots
    }

    #[must_use]
    pub fn into_snapshots(self) -> Vec<RecordedSnapshot> {
        self.snapshots
    }
}

impl RelaxationObserver for SnapshotRecorder {
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        self.snapshots.push(snapshot.to_recorded());
    }
}

/// Final tables plus how the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    distances: DistanceMatrix,
    predecessors: PredecessorMatrix,
    termination: Termination,
    iterations_completed: usize,
}

impl Solution {
    #[must_use]
    pub const fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    #[must_use]
    pub const fn predecessors(&self) -> &PredecessorMatrix {
        &self.predecessors
    }

    #[must_use]
    pub const fn termination(&self) -> Termination {
        self.termination
    }

    /// Number of relaxation steps actually performed.
    #[must_use]
    pub const fn iterations_completed(&self) -> usize {
        self.iterations_completed
    }

    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.distances.size()
    }

    /// `true` when the tables are true shortest paths (no absorbing cycle).
    #[must_use]
    pub const fn is_authoritative(&self) -> bool {
        matches!(self.termination, Termination::Completed)
    }

    /// `L[source][target]`, if both vertices are in range.
    #[must_use]
    pub fn distance(&self, source: Vertex, target: Vertex) -> Option<Distance> {
        self.distances.get(source, target).copied()
    }

    /// Reconstruct the shortest path `source → target`.
    ///
    /// Read-only: may be called any number of times.
    ///
    /// # Errors
    ///
    /// - [`PathError::InvalidQuery`] if either vertex is out of range.
    /// - [`PathError::AbsorbingCycle`] if the run stopped on an absorbing
    ///   cycle, since no path is authoritative then.
    /// - [`PathError::Unreachable`] / [`PathError::NonTerminating`] from
    ///   [`path::reconstruct`].
    pub fn path(&self, source: Vertex, target: Vertex) -> Result<ShortestPath, PathError> {
        path::check_query(self.vertex_count(), source, target)?;
        if let Termination::AbsorbingCycle { step } = self.termination {
            return Err(PathError::AbsorbingCycle { step });
        }
        path::reconstruct(&self.distances, &self.predecessors, source, target)
    }

    /// Give up the tables.
    #[must_use]
    pub fn into_parts(self) -> (DistanceMatrix, PredecessorMatrix) {
        (self.distances, self.predecessors)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Initialize from `weights` and relax with no observer.
///
/// # Errors
///
/// Returns [`SolveError::Overflow`] if an overflowing sum could still
/// improve a cell (negative overflow, or a cell that is still infinite).
pub fn solve(weights: &WeightMatrix) -> Result<Solution, SolveError> {
    solve_with_observer(weights, &mut ())
}

/// Initialize from `weights` and relax, reporting every snapshot.
///
/// # Errors
///
/// Returns [`SolveError::Overflow`] if an overflowing sum could still
/// improve a cell (negative overflow, or a cell that is still infinite).
#[instrument(skip_all, fields(vertices = weights.vertex_count(), edges = weights.edge_count()))]
pub fn solve_with_observer(
    weights: &WeightMatrix,
    observer: &mut impl RelaxationObserver,
) -> Result<Solution, SolveError> {
    let (distances, predecessors) = init::initialize(weights);
    relax(distances, predecessors, observer)
}

/// Run the relaxation loop over already-initialized tables.
///
/// # Errors
///
/// - [`SolveError::ShapeMismatch`] if `L` and `P` differ in size.
/// - [`SolveError::Overflow`] if an overflowing sum could still improve a
///   cell (negative overflow, or a cell that is still infinite).
pub fn relax(
    mut distances: DistanceMatrix,
    mut predecessors: PredecessorMatrix,
    observer: &mut impl RelaxationObserver,
) -> Result<Solution, SolveError> {
    let n = distances.size();
    if predecessors.size() != n {
        return Err(SolveError::ShapeMismatch {
            distances: n,
            predecessors: predecessors.size(),
        });
    }

    let mut termination = Termination::Completed;
    let mut step = 0;

    while step < n {
        if cycle::has_absorbing_cycle(&distances) {
            termination = Termination::AbsorbingCycle { step };
            break;
        }

        observer.observe(&Snapshot {
            step,
            is_final: false,
            distances: &distances,
            predecessors: &predecessors,
        });

        let updated = relax_through(step, &mut distances, &mut predecessors)?;
        debug!(step, updated, "relaxed through intermediate vertex");
        step += 1;
    }

    if termination == Termination::Completed && cycle::has_absorbing_cycle(&distances) {
        termination = Termination::AbsorbingCycle { step };
    }

    observer.observe(&Snapshot {
        step,
        is_final: true,
        distances: &distances,
        predecessors: &predecessors,
    });

    match termination {
        Termination::Completed => info!(iterations = step, "all-pairs relaxation completed"),
        Termination::AbsorbingCycle { step } => warn!(
            step,
            vertices = ?cycle::absorbing_vertices(&distances),
            "relaxation stopped on absorbing cycle"
        ),
    }

    Ok(Solution {
        distances,
        predecessors,
        termination,
        iterations_completed: step,
    })
}

/// One "transitive closure on x" pass. Returns the number of improved cells.
fn relax_through(
    x: Vertex,
    distances: &mut DistanceMatrix,
    predecessors: &mut PredecessorMatrix,
) -> Result<usize, SolveError> {
    let n = distances.size();
    let mut updated = 0;

    for y in 0..n {
        for z in 0..n {
            // L[y][x] is re-read per cell: it changes mid-row when z == x and
            // L[x][x] < 0.
            let through = distances[(y, x)];
            let current = distances[(y, z)];
            let Some(candidate) = through.checked_add(distances[(x, z)]) else {
                // Both terms share a sign when they overflow. A sum above
                // i64::MAX never beats a finite current cost.
                if current.is_finite() && !through.is_negative() {
                    continue;
                }
                return Err(SolveError::Overflow { step: x, from: y, to: z });
            };

            if candidate < current {
                distances[(y, z)] = candidate;
                predecessors[(y, z)] = predecessors[(x, z)];
                updated += 1;
            }
        }
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SquareMatrix;

    fn weights(n: usize, edges: &[(usize, usize, i64)]) -> WeightMatrix {
        WeightMatrix::from_edges(n, edges.len(), edges.iter().copied()).expect("valid edges")
    }

    #[test]
    fn two_hop_path_beats_direct_edge() {
        let solution = solve(&weights(3, &[(0, 1, 4), (1, 2, 2), (0, 2, 10)])).expect("solve");
        assert!(solution.is_authoritative());
        assert_eq!(solution.iterations_completed(), 3);
        assert_eq!(solution.distance(0, 2), Some(Distance::Finite(6)));
        assert_eq!(solution.predecessors()[(0, 2)], Some(1));
    }

    #[test]
    fn negative_self_loop_stops_before_first_step() {
        let solution = solve(&weights(1, &[(0, 0, -5)])).expect("solve");
        assert_eq!(solution.termination(), Termination::AbsorbingCycle { step: 0 });
        assert_eq!(solution.iterations_completed(), 0);
        assert!(solution.distances()[(0, 0)].is_negative());
    }

    #[test]
    fn positive_self_loop_completes_after_one_step() {
        let solution = solve(&weights(1, &[(0, 0, 3)])).expect("solve");
        assert_eq!(solution.termination(), Termination::Completed);
        assert_eq!(solution.iterations_completed(), 1);
        assert_eq!(solution.distances()[(0, 0)], Distance::ZERO);
    }

    #[test]
    fn two_cycle_is_detected_after_first_step() {
        // 0 -> 1 -> 0 totals -1 and closes while relaxing through 0.
        let solution = solve(&weights(2, &[(0, 1, 1), (1, 0, -2)])).expect("solve");
        assert_eq!(solution.termination(), Termination::AbsorbingCycle { step: 1 });
        assert_eq!(solution.iterations_completed(), 1);
        assert_eq!(solution.distance(1, 1), Some(Distance::Finite(-1)));
        assert!(!solution.is_authoritative());
    }

    #[test]
    fn cycle_stops_mid_run_and_keeps_partial_tables() {
        // 1 -> 2 -> 3 -> 1 totals -1 and closes while relaxing through 2, so
        // vertex 3 is never used as an intermediate.
        let solution =
            solve(&weights(4, &[(0, 1, 5), (1, 2, 1), (2, 3, 1), (3, 1, -3)])).expect("solve");
        assert_eq!(solution.termination(), Termination::AbsorbingCycle { step: 3 });
        assert_eq!(solution.iterations_completed(), 3);
        assert_eq!(solution.distance(3, 3), Some(Distance::Finite(-1)));
        assert_eq!(solution.distance(0, 3), Some(Distance::Finite(7)));
    }

    #[test]
    fn path_query_on_cyclic_solution_is_refused() {
        let solution = solve(&weights(1, &[(0, 0, -5)])).expect("solve");
        assert_eq!(solution.path(0, 0), Err(PathError::AbsorbingCycle { step: 0 }));
        assert_eq!(
            solution.path(0, 3),
            Err(PathError::InvalidQuery {
                vertex: 3,
                vertex_count: 1
            })
        );
    }

    #[test]
    fn empty_graph_completes_without_steps() {
        let solution = solve(&weights(0, &[])).expect("solve");
        assert!(solution.is_authoritative());
        assert_eq!(solution.iterations_completed(), 0);
    }

    #[test]
    fn recorder_sees_one_snapshot_per_step_plus_final() {
        let mut recorder = SnapshotRecorder::new();
        solve_with_observer(&weights(3, &[(0, 1, 4), (1, 2, 2)]), &mut recorder).expect("solve");
        let steps: Vec<(usize, bool)> = recorder
            .snapshots()
            .iter()
            .map(|s| (s.step, s.is_final))
            .collect();
        assert_eq!(steps, vec![(0, false), (1, false), (2, false), (3, true)]);
    }

    #[test]
    fn closure_observer_counts_snapshots() {
        let mut seen = 0usize;
        solve_with_observer(&weights(2, &[(0, 1, 1)]), &mut |_: &Snapshot<'_>| seen += 1).expect("solve");
        assert_eq!(seen, 3);
    }

    #[test]
    fn overflow_is_an_error_not_a_wrap() {
        let w = weights(3, &[(0, 1, i64::MAX), (1, 2, 1)]);
        assert_eq!(
            solve(&w),
            Err(SolveError::Overflow {
                step: 1,
                from: 0,
                to: 2
            })
        );
    }

    #[test]
    fn overflowing_detour_loses_to_a_finite_direct_edge() {
        let w = weights(3, &[(0, 1, i64::MAX), (1, 2, 1), (0, 2, 5)]);
        let solution = solve(&w).expect("positive overflow is skipped");
        assert_eq!(solution.termination(), Termination::Completed);
        assert_eq!(solution.distance(0, 2), Some(Distance::Finite(5)));
        assert_eq!(solution.predecessors()[(0, 2)], Some(0));
        assert_eq!(solution.path(0, 2).expect("path").vertices, vec![0, 2]);
    }

    #[test]
    fn negative_overflow_is_an_error() {
        let w = weights(3, &[(0, 1, i64::MIN), (1, 2, -1), (0, 2, 5)]);
        assert_eq!(
            solve(&w),
            Err(SolveError::Overflow {
                step: 1,
                from: 0,
                to: 2
            })
        );
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let l: DistanceMatrix = SquareMatrix::filled(2, Distance::ZERO);
        let p: PredecessorMatrix = SquareMatrix::filled(3, None);
        assert_eq!(
            relax(l, p, &mut SnapshotRecorder::new()),
            Err(SolveError::ShapeMismatch {
                distances: 2,
                predecessors: 3
            })
        );
    }
}
