#![allow(dead_code)]

use proptest::prelude::*;
use warshall_core::WeightMatrix;

pub const MAX_VERTICES: usize = 7;

/// `(vertex_count, edges)` with weights drawn from `weights`.
pub fn arb_edges(
    max_vertices: usize,
    weights: std::ops::Range<i64>,
) -> impl Strategy<Value = (usize, Vec<(usize, usize, i64)>)> + Clone {
    (1..=max_vertices).prop_flat_map(move |n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, weights.clone()), 0..=n * n),
        )
    })
}

/// Any graph, including ones with absorbing cycles.
pub fn arb_weights() -> impl Strategy<Value = WeightMatrix> + Clone {
    arb_edges(MAX_VERTICES, -20..50).prop_map(|(n, edges)| build(n, edges))
}

/// Non-negative weights: never an absorbing cycle.
pub fn arb_nonnegative_weights() -> impl Strategy<Value = WeightMatrix> + Clone {
    arb_edges(MAX_VERTICES, 0..100).prop_map(|(n, edges)| build(n, edges))
}

/// Negative weights allowed, absorbing cycles impossible.
///
/// Each edge gets `base + potential[from] - potential[to]` with `base >= 0`;
/// potentials cancel around any cycle, so every cycle costs `Σ base >= 0`.
pub fn arb_cycle_free_weights() -> impl Strategy<Value = WeightMatrix> + Clone {
    (1..=MAX_VERTICES).prop_flat_map(|n| {
        (
            prop::collection::vec(-30i64..30, n),
            prop::collection::vec((0..n, 0..n, 0i64..40), 0..=n * n),
        )
            .prop_map(move |(potential, edges)| {
                let shifted = edges
                    .into_iter()
                    .map(|(from, to, base)| (from, to, base + potential[from] - potential[to]))
                    .collect();
                build(n, shifted)
            })
    })
}

fn build(n: usize, edges: Vec<(usize, usize, i64)>) -> WeightMatrix {
    WeightMatrix::from_edges(n, edges.len(), edges).expect("generated edges are in range")
}
