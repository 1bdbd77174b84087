//! Dense square matrices used throughout the solver.
//!
//! # Overview
//!
//! Every table in the pipeline is a `V × V` grid addressed by `(row, column)`
//! vertex indices:
//!
//! | Type                  | Cell                | Meaning                                   |
//! |-----------------------|---------------------|-------------------------------------------|
//! | [`WeightMatrix`]      | `Option<Weight>`    | direct edge weight, `None` = no edge      |
//! | [`DistanceMatrix`]    | [`Distance`]        | best known path cost (`L`)                |
//! | [`PredecessorMatrix`] | `Option<Vertex>`    | vertex to step back through (`P`)         |
//!
//! All three share the row-major [`SquareMatrix`] container.
//!
//! ## Infinity
//!
//! "No path" is the explicit [`Distance::Infinite`] variant rather than a
//! large sentinel, so `∞ + w` can never overflow into a finite value.

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::ops::{Index, IndexMut};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::FormatError;

/// A vertex is identified by its zero-based index.
pub type Vertex = usize;

/// Edge weights are signed integers; negative weights are allowed.
pub type Weight = i64;

/// Distance table `L`.
pub type DistanceMatrix = SquareMatrix<Distance>;

/// Predecessor table `P`.
pub type PredecessorMatrix = SquareMatrix<Option<Vertex>>;

/// Largest accepted vertex count. The solver keeps two dense `V × V` tables,
/// so memory grows with the square of this value.
pub const MAX_VERTICES: usize = 4096;

// ---------------------------------------------------------------------------
// SquareMatrix
// ---------------------------------------------------------------------------

/// Row-major `size × size` grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SquareMatrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> SquareMatrix<T> {
    /// Create a matrix with every cell set to `fill`.
    #[must_use]
    pub fn filled(size: usize, fill: T) -> Self {
        Self {
            size,
            cells: vec![fill; size * size],
        }
    }
}

impl<T> SquareMatrix<T> {
    /// Create a matrix by evaluating `cell(row, column)` for every position.
    pub fn from_fn(size: usize, mut cell: impl FnMut(Vertex, Vertex) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for column in 0..size {
                cells.push(cell(row, column));
            }
        }
        Self { size, cells }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Return `true` for the `0 × 0` matrix.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Bounds-checked cell access.
    #[must_use]
    pub fn get(&self, row: Vertex, column: Vertex) -> Option<&T> {
        if row < self.size && column < self.size {
            self.cells.get(row * self.size + column)
        } else {
            None
        }
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.size()`.
    #[must_use]
    pub fn row(&self, row: Vertex) -> &[T] {
        assert!(row < self.size, "row {row} out of bounds for size {}", self.size);
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.size).map(move |row| self.row(row))
    }

    /// Iterate over the main diagonal `(0,0), (1,1), …`.
    pub fn diagonal(&self) -> impl Iterator<Item = &T> {
        (0..self.size).map(move |i| &self.cells[i * self.size + i])
    }
}

impl<T> Index<(Vertex, Vertex)> for SquareMatrix<T> {
    type Output = T;

    fn index(&self, (row, column): (Vertex, Vertex)) -> &T {
        assert!(
            row < self.size && column < self.size,
            "cell ({row}, {column}) out of bounds for size {}",
            self.size
        );
        &self.cells[row * self.size + column]
    }
}

impl<T> IndexMut<(Vertex, Vertex)> for SquareMatrix<T> {
    fn index_mut(&mut self, (row, column): (Vertex, Vertex)) -> &mut T {
        assert!(
            row < self.size && column < self.size,
            "cell ({row}, {column}) out of bounds for size {}",
            self.size
        );
        &mut self.cells[row * self.size + column]
    }
}

/// Serialized as an array of row arrays.
impl<T: Serialize> Serialize for SquareMatrix<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.size))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// A path cost in the extended integers.
///
/// The derived ordering places every `Finite` value below `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Distance {
    Finite(Weight),
    Infinite,
}

impl Distance {
    pub const ZERO: Self = Self::Finite(0);

    /// Extended-real addition. `None` only when two finite values overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => match a.checked_add(b) {
                Some(sum) => Some(Self::Finite(sum)),
                None => None,
            },
            _ => Some(Self::Infinite),
        }
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Finite(w) if w < 0)
    }

    /// The finite value, if any.
    #[must_use]
    pub const fn finite(self) -> Option<Weight> {
        match self {
            Self::Finite(w) => Some(w),
            Self::Infinite => None,
        }
    }
}

impl From<Weight> for Distance {
    fn from(weight: Weight) -> Self {
        Self::Finite(weight)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(w) => fmt::Display::fmt(w, f),
            Self::Infinite => f.pad("∞"),
        }
    }
}

/// Finite distances serialize as integers, infinity as the string `"inf"`.
impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(w) => serializer.serialize_i64(*w),
            Self::Infinite => serializer.serialize_str("inf"),
        }
    }
}

// ---------------------------------------------------------------------------
// WeightMatrix
// ---------------------------------------------------------------------------

/// The raw input graph: optional direct edge weights on a dense grid.
///
/// Immutable once built. Duplicate `(from, to)` edges overwrite earlier ones
/// (last write wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightMatrix {
    weights: SquareMatrix<Option<Weight>>,
    edge_count: usize,
}

impl WeightMatrix {
    /// Build a weight matrix from exactly `edge_count` `(from, to, weight)`
    /// triples over `vertex_count` vertices.
    ///
    /// # Errors
    ///
    /// - [`FormatError::TooManyVertices`] if `vertex_count` exceeds
    ///   [`MAX_VERTICES`] (reported against line 1, where a description
    ///   declares it).
    /// - [`FormatError::VertexOutOfRange`] if an endpoint is `>= vertex_count`.
    /// - [`FormatError::EdgeCountMismatch`] if the number of triples differs
    ///   from `edge_count`.
    pub fn from_edges<I>(vertex_count: usize, edge_count: usize, edges: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = (Vertex, Vertex, Weight)>,
    {
        if vertex_count > MAX_VERTICES {
            return Err(FormatError::TooManyVertices {
                line: 1,
                value: vertex_count,
                limit: MAX_VERTICES,
            });
        }

        let mut weights = SquareMatrix::filled(vertex_count, None);
        let mut found = 0usize;

        for (from, to, weight) in edges {
            found += 1;
            for vertex in [from, to] {
                if vertex >= vertex_count {
                    return Err(FormatError::VertexOutOfRange {
                        edge: found,
                        vertex: i64::try_from(vertex).unwrap_or(i64::MAX),
                        vertex_count,
                    });
                }
            }
            weights[(from, to)] = Some(weight);
        }

        if found != edge_count {
            return Err(FormatError::EdgeCountMismatch {
                declared: edge_count,
                found,
            });
        }

        Ok(Self {
            weights,
            edge_count,
        })
    }

    /// Build a weight matrix from a petgraph graph.
    ///
    /// Node indices become vertex indices. Parallel edges collapse to the
    /// last one in edge-index order; `edge_count` is the graph's edge count,
    /// parallel edges included. A graph from [`Self::to_graph`] has no
    /// parallel edges, so a round trip leaves `edge_count` equal to the
    /// number of distinct edges.
    #[must_use]
    pub fn from_graph<N>(graph: &DiGraph<N, Weight>) -> Self {
        let mut weights = SquareMatrix::filled(graph.node_count(), None);
        for edge in graph.edge_references() {
            weights[(edge.source().index(), edge.target().index())] = Some(*edge.weight());
        }
        Self {
            weights,
            edge_count: graph.edge_count(),
        }
    }

    /// Convert to a petgraph graph with one node per vertex and one edge per
    /// present weight. Duplicate input lines were already collapsed, so the
    /// graph may hold fewer edges than [`Self::edge_count`].
    #[must_use]
    pub fn to_graph(&self) -> DiGraph<(), Weight> {
        let mut graph = DiGraph::with_capacity(self.vertex_count(), self.edges().count());
        for _ in 0..self.vertex_count() {
            graph.add_node(());
        }
        for (from, to, weight) in self.edges() {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), weight);
        }
        graph
    }

    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.weights.size()
    }

    /// Edge count as declared by the input (duplicates included).
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Direct edge weight `from → to`, if present and in range.
    #[must_use]
    pub fn weight(&self, from: Vertex, to: Vertex) -> Option<Weight> {
        self.weights.get(from, to).copied().flatten()
    }

    /// Present edges in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex, Weight)> + '_ {
        let n = self.vertex_count();
        (0..n).flat_map(move |from| {
            self.weights
                .row(from)
                .iter()
                .enumerate()
                .filter_map(move |(to, w)| w.map(|w| (from, to, w)))
        })
    }

    /// Borrow the underlying grid.
    #[must_use]
    pub const fn as_matrix(&self) -> &SquareMatrix<Option<Weight>> {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_ordering_puts_infinity_last() {
        assert!(Distance::Finite(i64::MAX) < Distance::Infinite);
        assert!(Distance::Finite(-3) < Distance::Finite(2));
    }

    #[test]
    fn distance_addition_follows_extended_reals() {
        let inf = Distance::Infinite;
        assert_eq!(inf.checked_add(Distance::Finite(-7)), Some(inf));
        assert_eq!(Distance::Finite(4).checked_add(inf), Some(inf));
        assert_eq!(
            Distance::Finite(4).checked_add(Distance::Finite(-6)),
            Some(Distance::Finite(-2))
        );
        assert_eq!(Distance::Finite(i64::MAX).checked_add(Distance::Finite(1)), None);
    }

    #[test]
    fn distance_display_and_json() {
        assert_eq!(Distance::Infinite.to_string(), "∞");
        assert_eq!(Distance::Finite(-2).to_string(), "-2");
        let json = serde_json::to_string(&[Distance::Finite(3), Distance::Infinite]).expect("json");
        assert_eq!(json, r#"[3,"inf"]"#);
    }

    #[test]
    fn square_matrix_indexing_and_rows() {
        let m = SquareMatrix::from_fn(3, |r, c| r * 10 + c);
        assert_eq!(m[(2, 1)], 21);
        assert_eq!(m.row(1), &[10, 11, 12]);
        assert_eq!(m.diagonal().copied().collect::<Vec<_>>(), vec![0, 11, 22]);
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn empty_matrix_serializes_to_empty_array() {
        let m: SquareMatrix<u8> = SquareMatrix::filled(0, 0);
        assert!(m.is_empty());
        assert_eq!(serde_json::to_string(&m).expect("json"), "[]");
    }

    #[test]
    fn duplicate_edges_last_write_wins() {
        let w = WeightMatrix::from_edges(2, 2, [(0, 1, 5), (0, 1, 9)]).expect("valid");
        assert_eq!(w.weight(0, 1), Some(9));
        assert_eq!(w.edge_count(), 2);
        assert_eq!(w.edges().count(), 1);
    }

    #[test]
    fn out_of_range_vertex_is_rejected() {
        let err = WeightMatrix::from_edges(2, 1, [(0, 2, 1)]).expect_err("out of range");
        assert_eq!(
            err,
            FormatError::VertexOutOfRange {
                edge: 1,
                vertex: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn edge_count_mismatch_is_rejected() {
        let err = WeightMatrix::from_edges(3, 2, [(0, 1, 1)]).expect_err("mismatch");
        assert_eq!(err, FormatError::EdgeCountMismatch { declared: 2, found: 1 });
    }

    #[test]
    fn petgraph_conversion_keeps_weights() {
        let w = WeightMatrix::from_edges(3, 3, [(0, 1, 4), (1, 2, -2), (2, 2, 7)]).expect("valid");
        let graph = w.to_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(WeightMatrix::from_graph(&graph), w);
    }

    #[test]
    fn petgraph_round_trip_counts_distinct_edges() {
        let w = WeightMatrix::from_edges(2, 3, [(0, 1, 9), (0, 1, 4), (1, 0, 2)]).expect("valid");
        assert_eq!(w.edge_count(), 3);

        let graph = w.to_graph();
        assert_eq!(graph.edge_count(), 2);

        let back = WeightMatrix::from_graph(&graph);
        assert_eq!(back.as_matrix(), w.as_matrix());
        assert_eq!(back.edge_count(), 2);
    }

    #[test]
    fn oversized_vertex_count_is_rejected_before_allocating() {
        assert_eq!(
            WeightMatrix::from_edges(MAX_VERTICES + 1, 0, []),
            Err(FormatError::TooManyVertices {
                line: 1,
                value: MAX_VERTICES + 1,
                limit: MAX_VERTICES
            })
        );
        assert!(matches!(
            WeightMatrix::from_edges(usize::MAX, 0, []),
            Err(FormatError::TooManyVertices { .. })
        ));
    }
}
