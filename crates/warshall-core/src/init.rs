//! Initial distance (`L`) and predecessor (`P`) tables.

use crate::matrix::{Distance, DistanceMatrix, PredecessorMatrix, SquareMatrix, WeightMatrix};

/// Derive `(L, P)` from the input weights in a single pass.
///
/// | cell       | no edge              | edge of weight `w`                     |
/// |------------|----------------------|----------------------------------------|
/// | `i == j`   | `L = 0`, `P = i`     | `L = 0` if `w > 0` else `w`, `P = i`   |
/// | `i != j`   | `L = ∞`, `P = None`  | `L = w`, `P = i`                       |
///
/// A positive self-loop can never shorten a path, so its cost is dropped.
/// A negative one is kept: it is an absorbing cycle on its own.
#[must_use]
pub fn initialize(weights: &WeightMatrix) -> (DistanceMatrix, PredecessorMatrix) {
    let n = weights.vertex_count();

    let distances = SquareMatrix::from_fn(n, |i, j| match weights.weight(i, j) {
        None if i == j => Distance::ZERO,
        None => Distance::Infinite,
        Some(w) if i == j && w > 0 => Distance::ZERO,
        Some(w) => Distance::Finite(w),
    });

    let predecessors = SquareMatrix::from_fn(n, |i, j| {
        (i == j || weights.weight(i, j).is_some()).then_some(i)
    });

    (distances, predecessors)
}
