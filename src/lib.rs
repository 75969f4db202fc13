//! # Graphplan Search Library
//!
//! This library provides a domain-agnostic state-space search engine and the
//! planning-graph heuristics used to guide it on STRIPS planning problems.
//!
//! It is used by three binaries:
//! - `planner`: Reads a domain and a problem description and searches for a plan
//!   with the chosen strategy and heuristic.
//! - `hanoi_generator`: Writes Tower-of-Hanoi domain and problem descriptions.
//! - `heuristic_evaluator`: Compares the planning heuristics on generated instances.
//!
//! ## Modules
//! - `search`: The `SearchProblem` contract, search nodes, frontiers, and the
//!   depth-first, breadth-first, uniform-cost and A* strategies.
//! - `strips`: Propositions, actions, states, and `PlanningProblem`.
//! - `plan_graph`: Leveled planning graph expanded without mutex relations.
//! - `heuristics`: `max_level` and `level_sum`, and the `Estimate` they return.
//! - `parser`: Reader for the plain-text domain/problem format.
//! - `generators`: Tower-of-Hanoi and random instance generators.
//! - `error`: Error types for the parsing and generation layers.

pub mod error;
pub mod generators;
pub mod heuristics;
pub mod parser;
pub mod plan_graph;
pub mod search;
pub mod strips;

// Items are reached through their module path, e.g.
// `graphplan_search::heuristics::max_level`, except for the error type.
pub use crate::error::Error;
