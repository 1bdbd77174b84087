use std::fmt;
use std::path::PathBuf;

use crate::matrix::Vertex;

/// Machine-readable error codes for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    GraphFormat,
    GraphUnreadable,
    ConfigParseError,
    InvalidQuery,
    Unreachable,
    CycleDetected,
    ArithmeticOverflow,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::GraphFormat => "E1001",
            Self::GraphUnreadable => "E1002",
            Self::ConfigParseError => "E1003",
            Self::InvalidQuery => "E2001",
            Self::Unreachable => "E2002",
            Self::CycleDetected => "E2003",
            Self::ArithmeticOverflow => "E3001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::GraphFormat => "Malformed graph description",
            Self::GraphUnreadable => "Graph file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidQuery => "Vertex out of range",
            Self::Unreachable => "No path between vertices",
            Self::CycleDetected => "Absorbing cycle",
            Self::ArithmeticOverflow => "Path cost overflow",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::GraphFormat => Some(
                "Line 1 is the vertex count, line 2 the edge count, then one `from to weight` line per edge.",
            ),
            Self::GraphUnreadable => Some("Check the path and read permissions, or run `fw list`."),
            Self::ConfigParseError => Some("Fix syntax in .warshall/config.toml and retry."),
            Self::InvalidQuery => Some("Use vertex indices between 0 and the vertex count minus one."),
            Self::Unreachable => None,
            Self::CycleDetected => Some(
                "Shortest paths are undefined while a negative cycle exists; remove or reweight it.",
            ),
            Self::ArithmeticOverflow => Some("Use smaller edge weights."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// A malformed graph description.
///
/// Line numbers are 1-based; edge numbers count edge lines from 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("line {line}: missing {what}")]
    MissingLine { line: usize, what: &'static str },

    #[error("line {line}: expected an integer, found {token:?}")]
    InvalidInteger { line: usize, token: String },

    #[error("line {line}: {what} must not be negative, found {value}")]
    NegativeCount {
        line: usize,
        what: &'static str,
        value: i64,
    },

    #[error("line {line}: {value} vertices exceeds the limit of {limit}")]
    TooManyVertices { line: usize, value: usize, limit: usize },

    #[error("line {line}: expected `from to weight`, found {found} field(s)")]
    WrongFieldCount { line: usize, found: usize },

    #[error("edge {edge} references vertex {vertex}, but the graph has {vertex_count} vertices")]
    VertexOutOfRange {
        edge: usize,
        vertex: i64,
        vertex_count: usize,
    },

    #[error("declared {declared} edges but found {found}")]
    EdgeCountMismatch { declared: usize, found: usize },
}

impl FormatError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::GraphFormat
    }
}

/// Failure to load a graph file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl LoadError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::GraphUnreadable,
            Self::Format { .. } => ErrorCode::GraphFormat,
        }
    }
}

// ---------------------------------------------------------------------------
// Solving
// ---------------------------------------------------------------------------

/// Failure of the relaxation itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("path cost {from} -> {to} overflows at step {step}")]
    Overflow { step: usize, from: Vertex, to: Vertex },

    #[error("distance table is {distances}x{distances} but predecessor table is {predecessors}x{predecessors}")]
    ShapeMismatch { distances: usize, predecessors: usize },
}

impl SolveError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Overflow { .. } => ErrorCode::ArithmeticOverflow,
            Self::ShapeMismatch { .. } => ErrorCode::InternalUnexpected,
        }
    }
}

// ---------------------------------------------------------------------------
// Path queries
// ---------------------------------------------------------------------------

/// Failure of a single `(source, target)` query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    InvalidQuery { vertex: Vertex, vertex_count: usize },

    #[error("no path from {from} to {to}")]
    Unreachable { from: Vertex, to: Vertex },

    #[error("predecessor walk from {to} back to {from} did not end within {steps} steps")]
    NonTerminating { from: Vertex, to: Vertex, steps: usize },

    #[error("the algorithm stopped at step {step} due to an absorbing cycle")]
    AbsorbingCycle { step: usize },
}

impl PathError {
    /// `true` for the cycle family: a looping predecessor walk or a solution
    /// cut short by an absorbing cycle.
    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(self, Self::NonTerminating { .. } | Self::AbsorbingCycle { .. })
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidQuery { .. } => ErrorCode::InvalidQuery,
            Self::Unreachable { .. } => ErrorCode::Unreachable,
            Self::NonTerminating { .. } | Self::AbsorbingCycle { .. } => ErrorCode::CycleDetected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::GraphFormat,
            ErrorCode::GraphUnreadable,
            ErrorCode::ConfigParseError,
            ErrorCode::InvalidQuery,
            ErrorCode::Unreachable,
            ErrorCode::CycleDetected,
            ErrorCode::ArithmeticOverflow,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::CycleDetected.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn unreachable_is_not_a_cycle_error() {
        let unreachable = PathError::Unreachable { from: 0, to: 1 };
        let looping = PathError::NonTerminating {
            from: 0,
            to: 1,
            steps: 2,
        };
        assert!(!unreachable.is_cycle());
        assert!(looping.is_cycle());
        assert!(PathError::AbsorbingCycle { step: 0 }.is_cycle());
        assert_ne!(unreachable.code(), looping.code());
    }

    #[test]
    fn format_error_messages_name_the_line() {
        let err = FormatError::InvalidInteger {
            line: 3,
            token: "x".to_string(),
        };
        assert_eq!(err.to_string(), "line 3: expected an integer, found \"x\"");
    }
}
