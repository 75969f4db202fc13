//! Error types for reading and generating planning problems.
//!
//! The search engine and the heuristics themselves never fail: an exhausted
//! frontier yields an empty plan and an unreachable goal yields
//! [`Estimate::Unreachable`](crate::search::Estimate::Unreachable).
//! Only the outer layers (text descriptions, files, instance generators) report errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading a domain or problem description.
///
/// Line numbers are 1-based and refer to the input text, blank lines included.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("description is empty")]
    Empty,

    #[error("line {line}: expected a `{expected}` section")]
    MissingSection { expected: &'static str, line: usize },

    #[error("line {line}: expected `{expected}`, found `{found}`")]
    UnexpectedLine {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: action record is missing its `{missing}` line")]
    TruncatedAction { line: usize, missing: &'static str },

    #[error("line {line}: action has an empty name")]
    EmptyActionName { line: usize },
}

/// Invalid parameters for an instance generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("a Hanoi instance needs at least one disk")]
    NoDisks,

    #[error("a Hanoi instance needs at least two pegs, got {0}")]
    TooFewPegs(usize),

    #[error("a random instance needs at least one proposition")]
    NoPropositions,
}

/// Top-level error for building a [`PlanningProblem`](crate::strips::PlanningProblem).
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Description(#[from] ParseError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}
