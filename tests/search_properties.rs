use std::cell::RefCell;
use std::sync::Arc;

use graphplan_search::generators::{hanoi, random_problem, RandomProblemConfig};
use graphplan_search::heuristics::{level_sum, max_level, Estimate, PlanningHeuristic};
use graphplan_search::search::{
    a_star_search, breadth_first_search, depth_first_search, uniform_cost_search, NullHeuristic,
    SearchProblem, Successor,
};
use graphplan_search::strips::{Action, PlanningProblem, Proposition, State};
use graphplan_search::Error;

const SEEDS: std::ops::Range<u64> = 0..40;

fn p(name: &str) -> Proposition {
    Proposition::new(name)
}

fn small_config() -> RandomProblemConfig {
    RandomProblemConfig {
        propositions: 8,
        actions: 12,
        ..RandomProblemConfig::default()
    }
}

/// Replays `plan` from the start state, checking every action is applicable.
fn reaches_goal(problem: &PlanningProblem, plan: &[Arc<Action>]) -> bool {
    let mut state = problem.get_start_state();
    for action in plan {
        if !action.is_applicable(&state) {
            return false;
        }
        state = action.apply(&state);
    }
    problem.is_goal_state(&state)
}

/// Wraps a planning problem and records the order in which states are expanded.
struct Recording<'a> {
    inner: &'a PlanningProblem,
    order: RefCell<Vec<State>>,
}

impl<'a> Recording<'a> {
    fn new(inner: &'a PlanningProblem) -> Self {
        Recording {
            inner,
            order: RefCell::new(Vec::new()),
        }
    }
}

impl SearchProblem for Recording<'_> {
    type State = State;
    type Action = Arc<Action>;

    fn get_start_state(&self) -> State {
        self.inner.get_start_state()
    }

    fn is_goal_state(&self, state: &State) -> bool {
        self.inner.is_goal_state(state)
    }

    fn get_successors(&self, state: &State) -> Vec<Successor<State, Arc<Action>>> {
        self.order.borrow_mut().push(state.clone());
        self.inner.get_successors(state)
    }

    fn get_cost_of_actions(&self, actions: &[Arc<Action>]) -> u32 {
        self.inner.get_cost_of_actions(actions)
    }
}

#[test]
fn start_state_already_goal_gives_empty_plan() {
    let act = Action::new("unused", vec![p("a")], vec![p("b")], vec![]);
    let problem = PlanningProblem::new(vec![act], vec![], [p("a"), p("g")], [p("g")]);

    assert!(depth_first_search(&problem).is_empty());
    assert!(breadth_first_search(&problem).is_empty());
    assert!(uniform_cost_search(&problem).is_empty());
    assert!(a_star_search(&problem, &PlanningHeuristic::MaxLevel).is_empty());
    assert_eq!(problem.get_cost_of_actions(&[]), 0);
    assert_eq!(problem.expanded(), 0);
}

#[test]
fn single_action_scenario() {
    let a = Action::new("A", vec![p("P")], vec![p("G")], vec![]);
    let problem = PlanningProblem::new(vec![a], vec![p("P"), p("G")], [p("P")], [p("G")]);
    let start = problem.get_start_state();

    assert_eq!(max_level(&start, &problem), Estimate::Finite(1));
    assert_eq!(level_sum(&start, &problem), Estimate::Finite(1));

    for plan in [
        breadth_first_search(&problem),
        uniform_cost_search(&problem),
        a_star_search(&problem, &NullHeuristic),
        a_star_search(&problem, &PlanningHeuristic::MaxLevel),
        a_star_search(&problem, &PlanningHeuristic::LevelSum),
    ] {
        let names: Vec<&str> = plan.iter().map(|action| action.name()).collect();
        assert_eq!(names, vec!["A"]);
    }
}

#[test]
fn independent_goals_at_levels_one_and_two() {
    let first = Action::new("to_g1", vec![p("s")], vec![p("g1"), p("m")], vec![]);
    let second = Action::new("to_g2", vec![p("m")], vec![p("g2")], vec![]);
    let problem = PlanningProblem::new(vec![first, second], vec![], [p("s")], [p("g1"), p("g2")]);
    let start = problem.get_start_state();

    assert_eq!(max_level(&start, &problem), Estimate::Finite(2));
    assert_eq!(level_sum(&start, &problem), Estimate::Finite(3));

    let plan = a_star_search(&problem, &PlanningHeuristic::MaxLevel);
    assert_eq!(plan.len(), 2);
    assert!(reaches_goal(&problem, &plan));
}

#[test]
fn unproducible_goal_is_unreachable_and_unsolvable() {
    let cycle_a = Action::new("a_to_b", vec![p("a")], vec![p("b")], vec![p("a")]);
    let cycle_b = Action::new("b_to_a", vec![p("b")], vec![p("a")], vec![p("b")]);
    let problem = PlanningProblem::new(vec![cycle_a, cycle_b], vec![], [p("a")], [p("never")]);
    let start = problem.get_start_state();

    assert_eq!(max_level(&start, &problem), Estimate::Unreachable);
    assert_eq!(level_sum(&start, &problem), Estimate::Unreachable);

    assert!(depth_first_search(&problem).is_empty());
    assert!(breadth_first_search(&problem).is_empty());
    assert!(uniform_cost_search(&problem).is_empty());
    assert!(a_star_search(&problem, &PlanningHeuristic::LevelSum).is_empty());
}

#[test]
fn every_strategy_returns_a_valid_plan() {
    let config = small_config();
    for seed in SEEDS {
        let problem = random_problem(seed, &config).unwrap();
        let start_is_goal = problem.is_goal_state(&problem.get_start_state());
        let reference = breadth_first_search(&problem);
        let solvable = start_is_goal || !reference.is_empty();

        let plans = [
            ("dfs", depth_first_search(&problem)),
            ("bfs", reference.clone()),
            ("ucs", uniform_cost_search(&problem)),
            ("astar-zero", a_star_search(&problem, &PlanningHeuristic::Zero)),
            ("astar-max", a_star_search(&problem, &PlanningHeuristic::MaxLevel)),
            ("astar-sum", a_star_search(&problem, &PlanningHeuristic::LevelSum)),
        ];
        for (strategy, plan) in plans {
            if solvable {
                assert!(reaches_goal(&problem, &plan), "seed {seed}: {strategy} plan is invalid");
            } else {
                assert!(plan.is_empty(), "seed {seed}: {strategy} found a plan for an unsolvable problem");
            }
        }
    }
}

#[test]
fn cost_optimal_strategies_agree_with_breadth_first() {
    let config = small_config();
    for seed in SEEDS {
        let problem = random_problem(seed, &config).unwrap();
        let shortest = breadth_first_search(&problem);
        let ucs = uniform_cost_search(&problem);
        let astar_max = a_star_search(&problem, &PlanningHeuristic::MaxLevel);

        assert_eq!(ucs.len(), shortest.len(), "seed {seed}: uniform-cost is not optimal");
        assert_eq!(astar_max.len(), shortest.len(), "seed {seed}: A* with max-level is not optimal");
        assert_eq!(
            problem.get_cost_of_actions(&ucs),
            problem.get_cost_of_actions(&astar_max)
        );
    }
}

#[test]
fn zero_heuristic_a_star_expands_like_uniform_cost() {
    let mut problems: Vec<PlanningProblem> = SEEDS
        .map(|seed| random_problem(seed, &small_config()).unwrap())
        .collect();
    problems.push(hanoi(2, 3).unwrap());

    for problem in &problems {
        let ucs = Recording::new(problem);
        let astar = Recording::new(problem);
        let ucs_plan = uniform_cost_search(&ucs);
        let astar_plan = a_star_search(&astar, &NullHeuristic);

        assert_eq!(*ucs.order.borrow(), *astar.order.borrow());
        assert_eq!(ucs_plan, astar_plan);
    }
}

#[test]
fn hanoi_plans_have_minimum_length() {
    let two = hanoi(2, 3).unwrap();
    assert_eq!(breadth_first_search(&two).len(), 3);

    let three = hanoi(3, 3).unwrap();
    let bfs = breadth_first_search(&three);
    let astar_max = a_star_search(&three, &PlanningHeuristic::MaxLevel);
    assert_eq!(bfs.len(), 7);
    assert_eq!(astar_max.len(), 7);
    assert!(reaches_goal(&three, &astar_max));

    let astar_sum = a_star_search(&three, &PlanningHeuristic::LevelSum);
    assert!(reaches_goal(&three, &astar_sum));
}

#[test]
fn adding_a_goal_never_lowers_max_level() {
    for seed in SEEDS {
        let base = random_problem(seed, &small_config()).unwrap();
        let actions: Vec<Action> = base.domain_actions().map(|action| (**action).clone()).collect();
        let initial: Vec<Proposition> = base.initial_state().iter().cloned().collect();

        let mut goal: Vec<Proposition> = Vec::new();
        let mut previous = Estimate::ZERO;
        for extra in base.propositions() {
            goal.push(extra.clone());
            let problem = PlanningProblem::new(
                actions.clone(),
                base.propositions().to_vec(),
                initial.clone(),
                goal.clone(),
            );
            let estimate = max_level(problem.initial_state(), &problem);
            assert!(estimate >= previous, "seed {seed}: max-level dropped from {previous} to {estimate}");
            previous = estimate;
        }
    }
}

#[test]
fn level_sum_is_at_least_max_level() {
    for seed in SEEDS {
        let problem = random_problem(seed, &small_config()).unwrap();
        let state = problem.initial_state();
        let max = max_level(state, &problem);
        let sum = level_sum(state, &problem);
        assert!(sum >= max, "seed {seed}: level-sum {sum} < max-level {max}");
        assert_eq!(sum.is_unreachable(), max.is_unreachable());
    }
}

#[test]
fn problem_files_are_loaded() {
    let dir = std::env::temp_dir().join(format!("graphplan_search_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let domain = dir.join("domain.txt");
    let problem = dir.join("problem.txt");
    std::fs::write(&domain, "Propositions:\nP G\nActions:\nName: A\npre: P\nadd: G\ndelete: P\n").unwrap();
    std::fs::write(&problem, "Initial state: P\nGoal state: G\n").unwrap();

    let loaded = PlanningProblem::from_files(&domain, &problem).unwrap();
    let plan = a_star_search(&loaded, &PlanningHeuristic::LevelSum);
    assert_eq!(plan.len(), 1);
    assert_eq!(loaded.expanded(), 1);

    let missing = PlanningProblem::from_files(dir.join("missing.txt"), &problem);
    assert!(matches!(missing, Err(Error::Io { .. })));

    std::fs::write(&problem, "Goal state: G\n").unwrap();
    let malformed = PlanningProblem::from_files(&domain, &problem);
    assert!(matches!(malformed, Err(Error::Parse { .. })));

    std::fs::remove_dir_all(&dir).unwrap();
}
