//! Shortest-path reconstruction from the predecessor table.
//!
//! # Walk
//!
//! Starting at the target, repeatedly step to `P[source][node]` until the
//! source is reached, then reverse. Every lookup uses the fixed source row
//! `P[source][·]`: the engine records `P[y][z] = P[x][z]`, so row `source`
//! alone holds the whole back-chain for paths leaving `source`.
//!
//! A simple path has at most `V - 1` edges, so a walk longer than `V` steps
//! can only come from a malformed table and is reported as
//! [`PathError::NonTerminating`].

use std::fmt;

use serde::Serialize;

use crate::error::PathError;
use crate::matrix::{Distance, DistanceMatrix, PredecessorMatrix, Vertex, Weight, WeightMatrix};

/// A reconstructed minimum-cost path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShortestPath {
    pub source: Vertex,
    pub target: Vertex,
    /// Vertices from `source` to `target`, both inclusive.
    pub vertices: Vec<Vertex>,
    /// `L[source][target]`.
    pub cost: Weight,
}

impl ShortestPath {
    /// Number of edges on the path.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Sum the direct edge weights along the path.
    ///
    /// Returns `None` if a consecutive pair has no direct edge or the sum
    /// overflows.
    #[must_use]
    pub fn edge_cost_sum(&self, weights: &WeightMatrix) -> Option<Weight> {
        self.vertices
            .windows(2)
            .try_fold(0i64, |total, pair| total.checked_add(weights.weight(pair[0], pair[1])?))
    }
}

impl fmt::Display for ShortestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{vertex}")?;
        }
        write!(f, " (cost {})", self.cost)
    }
}

/// Reject a query whose endpoints fall outside `[0, vertex_count)`.
///
/// # Errors
///
/// Returns [`PathError::InvalidQuery`] naming the first bad vertex.
pub const fn check_query(vertex_count: usize, source: Vertex, target: Vertex) -> Result<(), PathError> {
    if source >= vertex_count {
        return Err(PathError::InvalidQuery {
            vertex: source,
            vertex_count,
        });
    }
    if target >= vertex_count {
        return Err(PathError::InvalidQuery {
            vertex: target,
            vertex_count,
        });
    }
    Ok(())
}

/// Walk `P[source][·]` back from `target` to `source`.
///
/// # Errors
///
/// - [`PathError::InvalidQuery`] if either vertex is out of range.
/// - [`PathError::Unreachable`] if `L[source][target]` is infinite or the
///   walk hits an unset predecessor.
/// - [`PathError::NonTerminating`] if the walk exceeds `V` steps.
pub fn reconstruct(
    distances: &DistanceMatrix,
    predecessors: &PredecessorMatrix,
    source: Vertex,
    target: Vertex,
) -> Result<ShortestPath, PathError> {
    let n = distances.size();
    check_query(n, source, target)?;

    let unreachable = PathError::Unreachable {
        from: source,
        to: target,
    };
    let Distance::Finite(cost) = distances[(source, target)] else {
        return Err(unreachable);
    };

    let mut vertices = vec![target];
    let mut node = target;
    let mut steps = 0;

    while node != source {
        if steps == n {
            return Err(PathError::NonTerminating {
                from: source,
                to: target,
                steps,
            });
        }
        node = predecessors
            .get(source, node)
            .copied()
            .flatten()
            .ok_or_else(|| unreachable.clone())?;
        vertices.push(node);
        steps += 1;
    }

    vertices.reverse();
    Ok(ShortestPath {
        source,
        target,
        vertices,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solve;
    use crate::matrix::SquareMatrix;

    fn weights(n: usize, edges: &[(usize, usize, i64)]) -> WeightMatrix {
        WeightMatrix::from_edges(n, edges.len(), edges.iter().copied()).expect("valid edges")
    }

    #[test]
    fn reconstructs_two_hop_path() {
        let w = weights(3, &[(0, 1, 4), (1, 2, 2), (0, 2, 10)]);
        let solution = solve(&w).expect("solve");
        let path = solution.path(0, 2).expect("path");
        assert_eq!(path.vertices, vec![0, 1, 2]);
        assert_eq!(path.cost, 6);
        assert_eq!(path.edge_count(), 2);
        assert_eq!(path.edge_cost_sum(&w), Some(6));
        assert_eq!(path.to_string(), "0 -> 1 -> 2 (cost 6)");
    }

    #[test]
    fn source_equals_target_is_a_single_vertex() {
        let solution = solve(&weights(2, &[(0, 1, 1)])).expect("solve");
        let path = solution.path(1, 1).expect("path");
        assert_eq!(path.vertices, vec![1]);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn unreachable_target() {
        let solution = solve(&weights(2, &[])).expect("solve");
        assert_eq!(
            solution.path(0, 1),
            Err(PathError::Unreachable { from: 0, to: 1 })
        );
    }

    #[test]
    fn out_of_range_query_is_rejected_first() {
        let solution = solve(&weights(2, &[])).expect("solve");
        assert_eq!(
            solution.path(5, 1),
            Err(PathError::InvalidQuery {
                vertex: 5,
                vertex_count: 2
            })
        );
        assert_eq!(
            solution.path(0, 2),
            Err(PathError::InvalidQuery {
                vertex: 2,
                vertex_count: 2
            })
        );
    }

    #[test]
    fn walk_uses_the_source_row_only() {
        // Row 0 says 2 <- 1 <- 0; row 1 would say 2 <- 1 directly, and row 2
        // is garbage. Only row 0 may be consulted.
        let l = SquareMatrix::from_fn(3, |_, _| Distance::ZERO);
        let mut p: PredecessorMatrix = SquareMatrix::filled(3, None);
        p[(0, 2)] = Some(1);
        p[(0, 1)] = Some(0);
        p[(1, 2)] = Some(2);
        p[(2, 1)] = Some(2);

        let path = reconstruct(&l, &p, 0, 2).expect("path");
        assert_eq!(path.vertices, vec![0, 1, 2]);
    }

    #[test]
    fn looping_predecessors_are_reported() {
        let l = SquareMatrix::from_fn(3, |_, _| Distance::Finite(1));
        let mut p: PredecessorMatrix = SquareMatrix::filled(3, None);
        p[(0, 1)] = Some(2);
        p[(0, 2)] = Some(1);

        let err = reconstruct(&l, &p, 0, 1).expect_err("loop");
        assert_eq!(
            err,
            PathError::NonTerminating {
                from: 0,
                to: 1,
                steps: 3
            }
        );
        assert!(err.is_cycle());
    }

    #[test]
    fn missing_predecessor_mid_walk_is_unreachable() {
        let l = SquareMatrix::from_fn(3, |_, _| Distance::Finite(1));
        let mut p: PredecessorMatrix = SquareMatrix::filled(3, None);
        p[(0, 2)] = Some(1);

        assert_eq!(
            reconstruct(&l, &p, 0, 2),
            Err(PathError::Unreachable { from: 0, to: 2 })
        );
    }

    #[test]
    fn repeated_queries_are_identical() {
        let solution = solve(&weights(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 5)])).expect("solve");
        let first = solution.path(0, 3);
        let second = solution.path(0, 3);
        assert_eq!(first, second);
        assert_eq!(first.expect("path").vertices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn edge_cost_sum_is_none_without_direct_edge() {
        let w = weights(3, &[(0, 1, 1)]);
        let path = ShortestPath {
            source: 0,
            target: 2,
            vertices: vec![0, 2],
            cost: 1,
        };
        assert_eq!(path.edge_cost_sum(&w), None);
    }
}
