//! Domain-agnostic graph search.
//!
//! Any state space that implements [`SearchProblem`] can be solved by one of the
//! four strategies in this module:
//! - [`depth_first_search`]: last-in-first-out frontier.
//! - [`breadth_first_search`]: first-in-first-out frontier.
//! - [`uniform_cost_search`]: frontier ordered by accumulated path cost.
//! - [`a_star_search`]: frontier ordered by path cost plus a [`Heuristic`] estimate.
//!
//! All of them run the same [`graph_search`] loop and only differ in the frontier
//! they hand to it. Duplicate states are pruned by state alone: the first time a
//! state is expanded is final, and cheaper paths to it discovered later are never
//! reconsidered.
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

/// Step and path costs.
pub type Cost = u32;

/// A heuristic distance: either a finite number of steps, or "the goal can never be reached".
///
/// `Unreachable` orders after every finite value, so it sinks to the back of any
/// priority frontier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Estimate {
    Finite(Cost),
    Unreachable,
}

impl Estimate {
    pub const ZERO: Estimate = Estimate::Finite(0);

    pub fn is_unreachable(self) -> bool {
        matches!(self, Estimate::Unreachable)
    }

    /// The finite value, if any.
    pub fn finite(self) -> Option<Cost> {
        match self {
            Estimate::Finite(value) => Some(value),
            Estimate::Unreachable => None,
        }
    }

    /// Adds a path cost; `Unreachable` absorbs it.
    ///
    /// ```
    /// use graphplan_search::search::Estimate;
    /// assert_eq!(Estimate::Finite(2).plus(3), Estimate::Finite(5));
    /// assert_eq!(Estimate::Unreachable.plus(3), Estimate::Unreachable);
    /// ```
    pub fn plus(self, cost: Cost) -> Estimate {
        match self {
            Estimate::Finite(value) => Estimate::Finite(value.saturating_add(cost)),
            Estimate::Unreachable => Estimate::Unreachable,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Estimate::Finite(value) => write!(f, "{}", value),
            Estimate::Unreachable => f.write_str("inf"),
        }
    }
}

/// One transition out of a state, as returned by [`SearchProblem::get_successors`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Successor<S, A> {
    /// The state reached by taking `action`.
    pub state: S,
    /// The action leading to `state`.
    pub action: A,
    /// Incremental cost of the transition.
    pub step_cost: Cost,
}

impl<S, A> Successor<S, A> {
    pub fn new(state: S, action: A, step_cost: Cost) -> Self {
        Successor {
            state,
            action,
            step_cost,
        }
    }
}

/// The capability set every searchable state space must provide.
///
/// States must be hashable and comparable so the visited set can deduplicate them,
/// and transitions must return fresh states rather than mutate the one passed in.
/// Every method is required: a domain that forgets one does not compile.
pub trait SearchProblem {
    type State: Clone + Eq + Hash;
    type Action: Clone;

    /// Returns the state the search starts from.
    fn get_start_state(&self) -> Self::State;

    /// Returns `true` if and only if `state` satisfies the goal.
    fn is_goal_state(&self, state: &Self::State) -> bool;

    /// Enumerates every state reachable from `state` by one legal action.
    fn get_successors(&self, state: &Self::State) -> Vec<Successor<Self::State, Self::Action>>;

    /// Total cost of a full action sequence. Used to validate solutions, not during search.
    fn get_cost_of_actions(&self, actions: &[Self::Action]) -> Cost;
}

/// Scores a state for informed search.
///
/// Implementations must be pure functions of their inputs. Any
/// `Fn(&State, &Problem) -> Estimate` closure or function is a heuristic.
pub trait Heuristic<P: SearchProblem + ?Sized> {
    fn estimate(&self, state: &P::State, problem: &P) -> Estimate;
}

impl<P, F> Heuristic<P> for F
where
    P: SearchProblem + ?Sized,
    F: Fn(&P::State, &P) -> Estimate,
{
    fn estimate(&self, state: &P::State, problem: &P) -> Estimate {
        self(state, problem)
    }
}

/// The trivial heuristic: every state is estimated at zero.
///
/// With it, [`a_star_search`] degenerates into [`uniform_cost_search`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullHeuristic;

impl<P: SearchProblem + ?Sized> Heuristic<P> for NullHeuristic {
    fn estimate(&self, _state: &P::State, _problem: &P) -> Estimate {
        Estimate::ZERO
    }
}

/// A search node: a state, the actions that reached it from the start, and their cost.
///
/// Nodes are never mutated; expanding a node creates new child nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<S, A> {
    state: S,
    path: Vec<A>,
    path_cost: Cost,
}

impl<S, A: Clone> Node<S, A> {
    /// Creates the root node for `state`, with an empty path and zero cost.
    pub fn root(state: S) -> Self {
        Node {
            state,
            path: Vec::new(),
            path_cost: 0,
        }
    }

    /// Creates the node reached from `self` through `successor`.
    pub fn child(&self, successor: Successor<S, A>) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(successor.action);
        Node {
            state: successor.state,
            path,
            path_cost: self.path_cost.saturating_add(successor.step_cost),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn path(&self) -> &[A] {
        &self.path
    }

    pub fn path_cost(&self) -> Cost {
        self.path_cost
    }

    pub fn into_path(self) -> Vec<A> {
        self.path
    }
}

/// The collection of nodes waiting to be expanded.
///
/// `priority` is only meaningful to ordered frontiers; stack and queue frontiers ignore it.
pub trait Frontier<T> {
    fn push(&mut self, item: T, priority: Estimate);
    fn pop(&mut self) -> Option<T>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Last-in-first-out frontier.
#[derive(Debug)]
pub struct StackFrontier<T> {
    items: Vec<T>,
}

impl<T> StackFrontier<T> {
    pub fn new() -> Self {
        StackFrontier { items: Vec::new() }
    }
}

impl<T> Default for StackFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for StackFrontier<T> {
    fn push(&mut self, item: T, _priority: Estimate) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// First-in-first-out frontier.
#[derive(Debug)]
pub struct QueueFrontier<T> {
    items: VecDeque<T>,
}

impl<T> QueueFrontier<T> {
    pub fn new() -> Self {
        QueueFrontier {
            items: VecDeque::new(),
        }
    }
}

impl<T> Default for QueueFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for QueueFrontier<T> {
    fn push(&mut self, item: T, _priority: Estimate) {
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

// `BinaryHeap` is a max-heap, so the key is reversed to pop the lowest
// (priority, insertion order) first.
#[derive(Debug)]
struct PriorityEntry<T> {
    key: Reverse<(Estimate, u64)>,
    item: T,
}

impl<T> PartialEq for PriorityEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for PriorityEntry<T> {}

impl<T> PartialOrd for PriorityEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for PriorityEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Frontier ordered by ascending priority; equal priorities pop in insertion order.
///
/// [`Estimate::Unreachable`] sorts after every finite priority, so such entries
/// only come out once nothing finite is left.
#[derive(Debug)]
pub struct PriorityFrontier<T> {
    heap: BinaryHeap<PriorityEntry<T>>,
    next_sequence: u64,
}

impl<T> PriorityFrontier<T> {
    pub fn new() -> Self {
        PriorityFrontier {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }
}

impl<T> Default for PriorityFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for PriorityFrontier<T> {
    fn push(&mut self, item: T, priority: Estimate) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(PriorityEntry {
            key: Reverse((priority, sequence)),
            item,
        });
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// The shared graph-search loop.
///
/// Seeds `frontier` with the start state, then repeatedly pops a node: a goal node
/// ends the search with its path, an already visited state is skipped, and any
/// other state is marked visited and its successors are pushed with the priority
/// computed by `priority`.
///
/// # Returns
/// The action path to the first goal popped, or an empty vector if the frontier
/// runs dry. An empty vector is also the answer when the start state is a goal.
pub fn graph_search<P, F, K>(problem: &P, mut frontier: F, mut priority: K) -> Vec<P::Action>
where
    P: SearchProblem + ?Sized,
    F: Frontier<Node<P::State, P::Action>>,
    K: FnMut(&Node<P::State, P::Action>) -> Estimate,
{
    let mut visited: HashSet<P::State> = HashSet::new();
    let mut popped: usize = 0;
    frontier.push(Node::root(problem.get_start_state()), Estimate::ZERO);

    while let Some(node) = frontier.pop() {
        popped += 1;
        if problem.is_goal_state(node.state()) {
            debug!(
                popped,
                visited = visited.len(),
                plan_length = node.path().len(),
                cost = node.path_cost(),
                "goal reached"
            );
            return node.into_path();
        }

        if !visited.insert(node.state().clone()) {
            continue;
        }

        trace!(depth = node.path().len(), cost = node.path_cost(), "expanding node");
        for successor in problem.get_successors(node.state()) {
            let child = node.child(successor);
            let key = priority(&child);
            frontier.push(child, key);
        }
    }

    debug!(popped, visited = visited.len(), "frontier exhausted without reaching a goal");
    Vec::new()
}

/// Searches the deepest nodes first.
pub fn depth_first_search<P>(problem: &P) -> Vec<P::Action>
where
    P: SearchProblem + ?Sized,
{
    graph_search(problem, StackFrontier::new(), |_| Estimate::ZERO)
}

/// Searches the shallowest nodes first.
///
/// With uniform step costs the returned path has the minimum number of actions.
pub fn breadth_first_search<P>(problem: &P) -> Vec<P::Action>
where
    P: SearchProblem + ?Sized,
{
    graph_search(problem, QueueFrontier::new(), |_| Estimate::ZERO)
}

/// Searches the node of least accumulated path cost first.
pub fn uniform_cost_search<P>(problem: &P) -> Vec<P::Action>
where
    P: SearchProblem + ?Sized,
{
    graph_search(problem, PriorityFrontier::new(), |node| {
        Estimate::Finite(node.path_cost())
    })
}

/// Searches the node of least path cost plus heuristic estimate first.
///
/// The heuristic is evaluated once for every generated successor. Returned paths
/// are cost-optimal when the heuristic is consistent; pass [`NullHeuristic`] to get
/// uniform-cost behaviour.
///
/// # Examples
/// ```
/// use graphplan_search::search::{a_star_search, NullHeuristic};
/// use graphplan_search::strips::{Action, PlanningProblem, Proposition};
///
/// let p = Proposition::new("p");
/// let g = Proposition::new("g");
/// let reach = Action::new("reach", vec![p.clone()], vec![g.clone()], vec![]);
/// let problem = PlanningProblem::new(vec![reach], vec![p.clone(), g.clone()], [p], [g]);
///
/// let plan = a_star_search(&problem, &NullHeuristic);
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan[0].name(), "reach");
/// ```
pub fn a_star_search<P, H>(problem: &P, heuristic: &H) -> Vec<P::Action>
where
    P: SearchProblem + ?Sized,
    H: Heuristic<P> + ?Sized,
{
    graph_search(problem, PriorityFrontier::new(), |node| {
        heuristic
            .estimate(node.state(), problem)
            .plus(node.path_cost())
    })
}
