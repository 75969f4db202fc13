//! Planning-graph heuristics for STRIPS problems.
//!
//! Both estimators grow a private [`PlanGraph`] from the state being scored until
//! every goal proposition has appeared or the graph stops growing:
//! - [`max_level`]: the first level at which all goals are present together. It never
//!   overestimates the number of parallel steps under the relaxation, so it is
//!   admissible for unit-cost plans.
//! - [`level_sum`]: the sum of the first levels at which each goal appears. It treats
//!   goals as independent and is **not** admissible; A* guided by it may return a
//!   longer plan than necessary.
//!
//! A goal that the graph can never reach is reported as [`Estimate::Unreachable`]
//! rather than as a numeric infinity.
use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::plan_graph::PlanGraph;
pub use crate::search::Estimate;
use crate::search::{Cost, Heuristic};
use crate::strips::{PlanningProblem, Proposition, State};

/// Returns, for every goal proposition, the first planning-graph level at which it appears.
///
/// Levels are counted from the level built directly from `state` (level 0). A goal's
/// level is recorded once and never updated. Returns `None` if the graph reaches its
/// fixed point before every goal has appeared.
pub fn goal_levels<'p>(
    state: &State,
    problem: &'p PlanningProblem,
) -> Option<BTreeMap<&'p Proposition, Cost>> {
    let goal = problem.goal();
    let mut levels: BTreeMap<&Proposition, Cost> = BTreeMap::new();
    let mut graph = PlanGraph::new(state, problem.actions());

    loop {
        let depth = graph.depth() as Cost;
        let layer = graph.current().proposition_layer();
        for proposition in goal {
            if !levels.contains_key(proposition) && layer.contains(proposition) {
                levels.insert(proposition, depth);
            }
        }

        if levels.len() == goal.len() {
            return Some(levels);
        }
        if graph.is_fixed() {
            debug!(depth, reached = levels.len(), goals = goal.len(), "planning graph levelled off");
            return None;
        }
        graph.expand();
    }
}

/// The number of planning-graph levels needed before every goal proposition is present.
///
/// # Examples
/// ```
/// use graphplan_search::heuristics::{max_level, Estimate};
/// use graphplan_search::strips::{Action, PlanningProblem, Proposition};
///
/// let p = Proposition::new("p");
/// let g = Proposition::new("g");
/// let reach = Action::new("reach", vec![p.clone()], vec![g.clone()], vec![]);
/// let problem = PlanningProblem::new(vec![reach], vec![], [p], [g]);
/// assert_eq!(max_level(problem.initial_state(), &problem), Estimate::Finite(1));
/// ```
pub fn max_level(state: &State, problem: &PlanningProblem) -> Estimate {
    match goal_levels(state, problem) {
        Some(levels) => Estimate::Finite(levels.values().copied().max().unwrap_or(0)),
        None => Estimate::Unreachable,
    }
}

/// The sum over goal propositions of the level at which each first appears.
pub fn level_sum(state: &State, problem: &PlanningProblem) -> Estimate {
    match goal_levels(state, problem) {
        Some(levels) => {
            let sum = levels
                .values()
                .fold(0, |sum: Cost, level| sum.saturating_add(*level));
            Estimate::Finite(sum)
        }
        None => Estimate::Unreachable,
    }
}

/// Estimates every state at zero.
pub fn null_heuristic(_state: &State, _problem: &PlanningProblem) -> Estimate {
    Estimate::ZERO
}

/// The planning heuristics, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanningHeuristic {
    /// [`null_heuristic`]; A* becomes uniform-cost search.
    Zero,
    /// [`max_level`]; admissible.
    MaxLevel,
    /// [`level_sum`]; more informed but not admissible.
    LevelSum,
}

impl PlanningHeuristic {
    pub const ALL: [PlanningHeuristic; 3] = [
        PlanningHeuristic::Zero,
        PlanningHeuristic::MaxLevel,
        PlanningHeuristic::LevelSum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlanningHeuristic::Zero => "zero",
            PlanningHeuristic::MaxLevel => "max",
            PlanningHeuristic::LevelSum => "sum",
        }
    }

    /// Whether A* guided by this heuristic is guaranteed to return a shortest plan.
    pub fn is_admissible(self) -> bool {
        !matches!(self, PlanningHeuristic::LevelSum)
    }
}

impl fmt::Display for PlanningHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

impl Heuristic<PlanningProblem> for PlanningHeuristic {
    fn estimate(&self, state: &State, problem: &PlanningProblem) -> Estimate {
        match self {
            PlanningHeuristic::Zero => null_heuristic(state, problem),
            PlanningHeuristic::MaxLevel => max_level(state, problem),
            PlanningHeuristic::LevelSum => level_sum(state, problem),
        }
    }
}
