//! Absorbing-cycle detection.
//!
//! A negative entry on the diagonal of `L` means the vertex lies on a cycle
//! of negative total weight. Once that happens, looping drives the cost of
//! any path through that vertex to −∞ and shortest paths stop being defined.

use crate::matrix::{DistanceMatrix, Vertex};

/// Return `true` iff some `L[i][i] < 0`.
#[must_use]
pub fn has_absorbing_cycle(distances: &DistanceMatrix) -> bool {
    distances.diagonal().any(|d| d.is_negative())
}

/// Vertices whose self-distance is negative, in index order.
#[must_use]
pub fn absorbing_vertices(distances: &DistanceMatrix) -> Vec<Vertex> {
    distances
        .diagonal()
        .enumerate()
        .filter_map(|(vertex, d)| d.is_negative().then_some(vertex))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{Distance, SquareMatrix};

    #[test]
    fn zero_diagonal_is_not_absorbing() {
        let l = SquareMatrix::from_fn(3, |i, j| if i == j { Distance::ZERO } else { Distance::Infinite });
        assert!(!has_absorbing_cycle(&l));
        assert!(absorbing_vertices(&l).is_empty());
    }

    #[test]
    fn negative_diagonal_entry_is_absorbing() {
        let l = SquareMatrix::from_fn(3, |i, j| match (i, j) {
            (1, 1) => Distance::Finite(-1),
            _ if i == j => Distance::ZERO,
            _ => Distance::Finite(-100),
        });
        assert!(has_absorbing_cycle(&l));
        assert_eq!(absorbing_vertices(&l), vec![1]);
    }

    #[test]
    fn empty_matrix_has_no_cycle() {
        let l: DistanceMatrix = SquareMatrix::filled(0, Distance::ZERO);
        assert!(!has_absorbing_cycle(&l));
    }
}
