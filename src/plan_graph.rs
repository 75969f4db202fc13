//! Leveled planning graph, expanded without mutex relations.
//!
//! Level 0 holds exactly the propositions of a state. Each further level holds the
//! actions (no-ops included) whose preconditions are all in the previous proposition
//! layer, and the union of their add effects. Every proposition of the problem has a
//! no-op, so from level 1 on the proposition layers form a non-decreasing chain, and
//! the graph has reached its fixed point once a level equals the one before it.
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::strips::{Action, Proposition, State};

/// The propositions reachable at one level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropositionLayer {
    propositions: BTreeSet<Proposition>,
}

impl PropositionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_proposition(&mut self, proposition: Proposition) {
        self.propositions.insert(proposition);
    }

    pub fn propositions(&self) -> &BTreeSet<Proposition> {
        &self.propositions
    }

    pub fn contains(&self, proposition: &Proposition) -> bool {
        self.propositions.contains(proposition)
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }
}

/// The actions applicable at one level.
#[derive(Clone, Debug, Default)]
pub struct ActionLayer {
    actions: Vec<Arc<Action>>,
}

impl ActionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: Arc<Action>) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Arc<Action>] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// One time slice of the planning graph: an action layer and the proposition layer it produces.
#[derive(Clone, Debug, Default)]
pub struct PlanGraphLevel {
    action_layer: ActionLayer,
    proposition_layer: PropositionLayer,
}

impl PlanGraphLevel {
    /// Builds level 0 from a state. Its action layer is empty.
    pub fn from_state(state: &State) -> Self {
        let mut proposition_layer = PropositionLayer::new();
        for proposition in state.iter() {
            proposition_layer.add_proposition(proposition.clone());
        }
        PlanGraphLevel {
            action_layer: ActionLayer::new(),
            proposition_layer,
        }
    }

    pub fn action_layer(&self) -> &ActionLayer {
        &self.action_layer
    }

    pub fn proposition_layer(&self) -> &PropositionLayer {
        &self.proposition_layer
    }

    /// Builds the next level from this one.
    ///
    /// `universe` is the full action set of the problem, no-ops included. Every action
    /// whose preconditions all hold in this level's proposition layer enters the next
    /// action layer, and its add effects enter the next proposition layer. Mutual
    /// exclusion between actions is not tracked.
    pub fn expand_without_mutex(&self, universe: &[Arc<Action>]) -> PlanGraphLevel {
        let current = self.proposition_layer.propositions();
        let mut next = PlanGraphLevel::default();
        for action in universe.iter().filter(|action| action.all_preconds_in(current)) {
            for proposition in action.add_effects() {
                next.proposition_layer.add_proposition(proposition.clone());
            }
            next.action_layer.add_action(Arc::clone(action));
        }
        next
    }
}

/// A planning graph grown level by level from one state.
///
/// The graph borrows the action universe of the problem it was built for and is
/// meant to be discarded after a single heuristic evaluation.
#[derive(Debug)]
pub struct PlanGraph<'a> {
    universe: &'a [Arc<Action>],
    levels: Vec<PlanGraphLevel>,
}

impl<'a> PlanGraph<'a> {
    /// Creates a graph whose only level is built from `state`.
    pub fn new(state: &State, universe: &'a [Arc<Action>]) -> Self {
        PlanGraph {
            universe,
            levels: vec![PlanGraphLevel::from_state(state)],
        }
    }

    /// Index of the most recent level; level 0 is the starting state.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// The most recent level.
    pub fn current(&self) -> &PlanGraphLevel {
        &self.levels[self.depth()]
    }

    pub fn levels(&self) -> &[PlanGraphLevel] {
        &self.levels
    }

    /// Appends the next level and returns it.
    pub fn expand(&mut self) -> &PlanGraphLevel {
        let next = self.current().expand_without_mutex(self.universe);
        self.levels.push(next);
        self.current()
    }

    /// Returns `true` once the last expansion left the proposition layer unchanged.
    ///
    /// A graph with a single level is never fixed. Layers are compared as sets: a
    /// state holding propositions without a no-op loses them at level 1, so equal
    /// sizes alone do not mean nothing changed.
    pub fn is_fixed(&self) -> bool {
        match self.levels.as_slice() {
            [.., previous, last] => last.proposition_layer == previous.proposition_layer,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strips::PlanningProblem;

    fn p(name: &str) -> Proposition {
        Proposition::new(name)
    }

    // a -> b -> c chain; `d` is never produced.
    fn chain_problem() -> PlanningProblem {
        let ab = Action::new("a_to_b", vec![p("a")], vec![p("b")], vec![p("a")]);
        let bc = Action::new("b_to_c", vec![p("b")], vec![p("c")], vec![p("b")]);
        PlanningProblem::new(vec![ab, bc], vec![p("a"), p("b"), p("c"), p("d")], [p("a")], [p("c")])
    }

    #[test]
    fn test_level_zero_is_the_state() {
        let state = State::new([p("a"), p("b")]);
        let level = PlanGraphLevel::from_state(&state);
        assert_eq!(level.proposition_layer().propositions(), state.propositions());
        assert!(level.action_layer().is_empty());
    }

    #[test]
    fn test_expand_without_mutex_keeps_deleted_propositions() {
        let problem = chain_problem();
        let level0 = PlanGraphLevel::from_state(problem.initial_state());
        let level1 = level0.expand_without_mutex(problem.actions());

        // `a_to_b` deletes `a`, but the no-op for `a` carries it forward.
        assert!(level1.proposition_layer().contains(&p("a")));
        assert!(level1.proposition_layer().contains(&p("b")));
        assert!(!level1.proposition_layer().contains(&p("c")));

        let names: Vec<&str> = level1.action_layer().actions().iter().map(|a| a.name()).collect();
        assert!(names.contains(&"a_to_b"));
        assert!(!names.contains(&"b_to_c"));
        // One domain action plus the no-op for `a`.
        assert_eq!(level1.action_layer().len(), 2);
    }

    #[test]
    fn test_levels_are_monotone_until_fixed() {
        let problem = chain_problem();
        let mut graph = PlanGraph::new(problem.initial_state(), problem.actions());
        assert!(!graph.is_fixed());

        graph.expand();
        graph.expand();
        assert_eq!(graph.depth(), 2);
        assert!(!graph.is_fixed());
        assert_eq!(graph.current().proposition_layer().len(), 3);

        graph.expand();
        assert!(graph.is_fixed());
        assert!(!graph.current().proposition_layer().contains(&p("d")));

        for pair in graph.levels().windows(2) {
            let earlier = pair[0].proposition_layer().propositions();
            let later = pair[1].proposition_layer().propositions();
            assert!(earlier.is_subset(later));
        }
    }

    #[test]
    fn test_swapped_layer_of_equal_size_is_not_fixed() {
        let problem = chain_problem();
        // `x` has no no-op, so level 1 drops it while gaining `b`.
        let state = State::new([p("x"), p("a")]);
        let mut graph = PlanGraph::new(&state, problem.actions());

        graph.expand();
        assert_eq!(graph.levels()[0].proposition_layer().len(), 2);
        assert_eq!(graph.current().proposition_layer().len(), 2);
        assert!(!graph.current().proposition_layer().contains(&p("x")));
        assert!(!graph.is_fixed());

        graph.expand();
        assert!(graph.current().proposition_layer().contains(&p("c")));
        graph.expand();
        assert!(graph.is_fixed());
    }
}
