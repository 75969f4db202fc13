//! STRIPS planning model.
//!
//! This module defines the planning-domain building blocks:
//! - `Proposition`: an atomic named fact, compared and hashed by name.
//! - `Action`: preconditions, add effects and delete effects over propositions.
//!   No-op actions carry a single proposition from one planning-graph level to the next.
//! - `State`: an immutable set of propositions with value semantics.
//! - `PlanningProblem`: the action/proposition universe plus initial state and goal,
//!   exposed to the search engine through [`SearchProblem`].
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::Error;
use crate::parser::{parse_domain, parse_problem};
use crate::search::{Cost, SearchProblem, Successor};

/// An atomic named fact. Two propositions with the same name are the same proposition.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Proposition {
    name: Arc<str>,
}

impl Proposition {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Proposition { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Proposition {
    fn from(name: &str) -> Self {
        Proposition::new(name)
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A STRIPS action.
///
/// An action is applicable to a set of propositions iff every precondition is in
/// it; applying it yields `(state ∪ add) \ delete`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    name: String,
    preconditions: Vec<Proposition>,
    add: Vec<Proposition>,
    delete: Vec<Proposition>,
    noop: bool,
}

impl Action {
    /// Creates a domain action.
    pub fn new(
        name: impl Into<String>,
        preconditions: Vec<Proposition>,
        add: Vec<Proposition>,
        delete: Vec<Proposition>,
    ) -> Self {
        Action {
            name: name.into(),
            preconditions,
            add,
            delete,
            noop: false,
        }
    }

    /// Creates the no-op that carries `proposition` forward unchanged.
    pub fn noop(proposition: &Proposition) -> Self {
        Action {
            name: proposition.name().to_string(),
            preconditions: vec![proposition.clone()],
            add: vec![proposition.clone()],
            delete: Vec::new(),
            noop: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &[Proposition] {
        &self.preconditions
    }

    pub fn add_effects(&self) -> &[Proposition] {
        &self.add
    }

    pub fn delete_effects(&self) -> &[Proposition] {
        &self.delete
    }

    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// Returns `true` if every precondition is contained in `propositions`.
    pub fn all_preconds_in(&self, propositions: &BTreeSet<Proposition>) -> bool {
        self.preconditions
            .iter()
            .all(|precondition| propositions.contains(precondition))
    }

    pub fn is_applicable(&self, state: &State) -> bool {
        self.all_preconds_in(state.propositions())
    }

    /// Returns the state reached by applying this action to `state`.
    ///
    /// Applicability is not checked; the caller is expected to have done so.
    pub fn apply(&self, state: &State) -> State {
        let mut next = state.propositions().clone();
        next.extend(self.add.iter().cloned());
        for deleted in &self.delete {
            next.remove(deleted);
        }
        State(Arc::new(next))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An immutable, unordered set of true propositions.
///
/// Equality and hashing depend only on the members, so two states reached by
/// different histories compare equal. Clones share the underlying set.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State(Arc<BTreeSet<Proposition>>);

impl State {
    pub fn new(propositions: impl IntoIterator<Item = Proposition>) -> Self {
        State(Arc::new(propositions.into_iter().collect()))
    }

    pub fn propositions(&self) -> &BTreeSet<Proposition> {
        &self.0
    }

    pub fn contains(&self, proposition: &Proposition) -> bool {
        self.0.contains(proposition)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposition> {
        self.0.iter()
    }
}

impl FromIterator<Proposition> for State {
    fn from_iter<I: IntoIterator<Item = Proposition>>(iter: I) -> Self {
        State::new(iter)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Proposition::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// A STRIPS planning problem.
///
/// Owns the action universe (domain actions followed by one generated no-op per
/// proposition), the proposition universe, the initial state and the goal. Apart
/// from the `expanded` instrumentation counter the problem is read-only after
/// construction.
#[derive(Debug)]
pub struct PlanningProblem {
    actions: Vec<Arc<Action>>,
    propositions: Vec<Proposition>,
    initial_state: State,
    goal: BTreeSet<Proposition>,
    expanded: AtomicUsize,
}

impl PlanningProblem {
    /// Builds a problem from already materialized actions and propositions.
    ///
    /// The proposition universe is `propositions` extended with every proposition
    /// mentioned by an action, the initial state or the goal, without duplicates.
    /// A no-op is generated for each proposition in the universe.
    pub fn new(
        actions: Vec<Action>,
        propositions: Vec<Proposition>,
        initial_state: impl IntoIterator<Item = Proposition>,
        goal: impl IntoIterator<Item = Proposition>,
    ) -> Self {
        let initial_state = State::new(initial_state);
        let goal: BTreeSet<Proposition> = goal.into_iter().collect();

        let mut seen = BTreeSet::new();
        let mut universe = Vec::with_capacity(propositions.len());
        let mentioned = actions.iter().flat_map(|action| {
            action
                .preconditions()
                .iter()
                .chain(action.add_effects())
                .chain(action.delete_effects())
                .cloned()
        });
        let everything = propositions
            .into_iter()
            .chain(mentioned)
            .chain(initial_state.iter().cloned())
            .chain(goal.iter().cloned());
        for proposition in everything {
            if seen.insert(proposition.clone()) {
                universe.push(proposition);
            }
        }

        let mut actions: Vec<Arc<Action>> = actions.into_iter().map(Arc::new).collect();
        let domain_action_count = actions.len();
        actions.extend(universe.iter().map(|p| Arc::new(Action::noop(p))));

        debug!(
            actions = domain_action_count,
            propositions = universe.len(),
            initial = initial_state.len(),
            goal = goal.len(),
            "planning problem built"
        );

        PlanningProblem {
            actions,
            propositions: universe,
            initial_state,
            goal,
            expanded: AtomicUsize::new(0),
        }
    }

    /// Builds a problem from domain and problem description text.
    ///
    /// See [`crate::parser`] for the format.
    pub fn from_descriptions(domain: &str, problem: &str) -> Result<Self, Error> {
        let domain = parse_domain(domain)?;
        let problem = parse_problem(problem)?;
        Ok(PlanningProblem::new(
            domain.actions,
            domain.propositions,
            problem.initial_state,
            problem.goal,
        ))
    }

    /// Reads and parses a domain file and a problem file.
    pub fn from_files(
        domain_path: impl AsRef<Path>,
        problem_path: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        let domain_path = domain_path.as_ref();
        let problem_path = problem_path.as_ref();
        let domain_text = read_description(domain_path)?;
        let problem_text = read_description(problem_path)?;

        let domain = parse_domain(&domain_text).map_err(|source| Error::Parse {
            path: domain_path.to_path_buf(),
            source,
        })?;
        let problem = parse_problem(&problem_text).map_err(|source| Error::Parse {
            path: problem_path.to_path_buf(),
            source,
        })?;
        Ok(PlanningProblem::new(
            domain.actions,
            domain.propositions,
            problem.initial_state,
            problem.goal,
        ))
    }

    /// The full action universe, no-ops included.
    pub fn actions(&self) -> &[Arc<Action>] {
        &self.actions
    }

    /// Domain actions only, in declaration order.
    pub fn domain_actions(&self) -> impl Iterator<Item = &Arc<Action>> {
        self.actions.iter().filter(|action| !action.is_noop())
    }

    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn goal(&self) -> &BTreeSet<Proposition> {
        &self.goal
    }

    /// Number of successor-generation calls made so far.
    pub fn expanded(&self) -> usize {
        self.expanded.load(Ordering::Relaxed)
    }

    /// Returns `true` if every goal proposition is in `propositions`.
    pub fn goal_satisfied_by(&self, propositions: &BTreeSet<Proposition>) -> bool {
        self.goal.is_subset(propositions)
    }
}

fn read_description(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl SearchProblem for PlanningProblem {
    type State = State;
    type Action = Arc<Action>;

    fn get_start_state(&self) -> State {
        self.initial_state.clone()
    }

    fn is_goal_state(&self, state: &State) -> bool {
        self.goal_satisfied_by(state.propositions())
    }

    /// Every applicable domain action, each with step cost 1. No-ops are skipped.
    fn get_successors(&self, state: &State) -> Vec<Successor<State, Arc<Action>>> {
        self.expanded.fetch_add(1, Ordering::Relaxed);
        self.domain_actions()
            .filter(|action| action.is_applicable(state))
            .map(|action| Successor::new(action.apply(state), Arc::clone(action), 1))
            .collect()
    }

    fn get_cost_of_actions(&self, actions: &[Arc<Action>]) -> Cost {
        actions.len() as Cost
    }
}
