//! Instance generators for planning problems.
//!
//! - Tower of Hanoi with `n` disks and `m` pegs, emitted in the text format read by
//!   [`crate::parser`].
//! - Random STRIPS instances built from a seed, for heuristic comparisons and tests.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Error, GeneratorError};
use crate::strips::{Action, PlanningProblem, Proposition};

fn check_hanoi_size(disks: usize, pegs: usize) -> Result<(), GeneratorError> {
    if disks == 0 {
        return Err(GeneratorError::NoDisks);
    }
    if pegs < 2 {
        return Err(GeneratorError::TooFewPegs(pegs));
    }
    Ok(())
}

fn hanoi_action(disk: &str, source: &str, destination: &str) -> String {
    format!(
        "Name: MOVE_{disk}_from_{source}_to_{destination}\n\
         pre: {disk} {destination} {disk}_on_{source}\n\
         add: {source} {disk}_on_{destination}\n\
         delete: {destination} {disk}_on_{source}\n"
    )
}

/// Generates the Tower-of-Hanoi domain description.
///
/// Disk `d{i}` is smaller than `d{k}` whenever `i < k`. A bare disk or peg name means
/// "nothing is on top of it"; `d{i}_on_x` means disk `i` sits directly on `x`.
///
/// # Arguments
/// * `disks`: Number of disks, at least 1.
/// * `pegs`: Number of pegs, at least 2.
pub fn hanoi_domain(disks: usize, pegs: usize) -> Result<String, GeneratorError> {
    check_hanoi_size(disks, pegs)?;
    let disk_names: Vec<String> = (0..disks).map(|i| format!("d{i}")).collect();
    let peg_names: Vec<String> = (0..pegs).map(|j| format!("p{j}")).collect();

    let mut propositions: Vec<String> = disk_names.iter().chain(&peg_names).cloned().collect();
    for small in 0..disks {
        for large in small + 1..disks {
            propositions.push(format!("d{small}_on_d{large}"));
        }
    }
    for disk in 0..disks {
        for peg in 0..pegs {
            propositions.push(format!("d{disk}_on_p{peg}"));
        }
    }

    let mut actions = String::new();
    for (size, disk) in disk_names.iter().enumerate() {
        for source in &peg_names {
            for destination in peg_names.iter().filter(|peg| *peg != source) {
                actions.push_str(&hanoi_action(disk, source, destination));
            }
            for larger in &disk_names[size + 1..] {
                actions.push_str(&hanoi_action(disk, source, larger));
                actions.push_str(&hanoi_action(disk, larger, source));
            }
        }
        for from in &disk_names[size + 1..] {
            for to in disk_names[size + 1..].iter().filter(|other| *other != from) {
                actions.push_str(&hanoi_action(disk, from, to));
            }
        }
    }

    Ok(format!(
        "Propositions:\n{}\nActions:\n{}",
        propositions.join(" "),
        actions
    ))
}

/// Generates the Tower-of-Hanoi problem description: every disk stacked on `p0`,
/// to be moved onto the last peg.
pub fn hanoi_problem(disks: usize, pegs: usize) -> Result<String, GeneratorError> {
    check_hanoi_size(disks, pegs)?;
    let stacked: Vec<String> = (0..disks - 1)
        .map(|disk| format!("d{disk}_on_d{}", disk + 1))
        .chain(std::iter::once(String::new()))
        .collect();
    let tower = stacked.join(" ");
    let largest = disks - 1;

    let clear_at_start: Vec<String> = (1..pegs).map(|peg| format!("p{peg}")).collect();
    let clear_at_goal: Vec<String> = (0..pegs - 1).map(|peg| format!("p{peg}")).collect();

    Ok(format!(
        "Initial state: {} d0 {}d{largest}_on_p0\nGoal state: {} d0 {}d{largest}_on_p{}\n",
        clear_at_start.join(" "),
        tower,
        clear_at_goal.join(" "),
        tower,
        pegs - 1
    ))
}

/// Builds a ready-to-search Tower-of-Hanoi problem.
pub fn hanoi(disks: usize, pegs: usize) -> Result<PlanningProblem, Error> {
    let domain = hanoi_domain(disks, pegs)?;
    let problem = hanoi_problem(disks, pegs)?;
    PlanningProblem::from_descriptions(&domain, &problem)
}

/// Shape of a random STRIPS instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomProblemConfig {
    pub propositions: usize,
    pub actions: usize,
    pub max_preconditions: usize,
    pub max_add_effects: usize,
    pub max_delete_effects: usize,
    pub initial_size: usize,
    pub goal_size: usize,
}

impl Default for RandomProblemConfig {
    fn default() -> Self {
        RandomProblemConfig {
            propositions: 12,
            actions: 20,
            max_preconditions: 2,
            max_add_effects: 2,
            max_delete_effects: 1,
            initial_size: 3,
            goal_size: 3,
        }
    }
}

/// Builds a random STRIPS instance. The same seed and config always give the same problem.
///
/// Propositions are named `p0`, `p1`, ... and actions `a0`, `a1`, .... Nothing
/// guarantees the goal is reachable.
pub fn random_problem(
    seed: u64,
    config: &RandomProblemConfig,
) -> Result<PlanningProblem, GeneratorError> {
    if config.propositions == 0 {
        return Err(GeneratorError::NoPropositions);
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let universe: Vec<Proposition> = (0..config.propositions)
        .map(|i| Proposition::new(format!("p{i}")))
        .collect();

    let sample = |rng: &mut SmallRng, min: usize, max: usize| -> Vec<Proposition> {
        let count = rng.gen_range(min..=max.max(min)).min(universe.len());
        universe.choose_multiple(rng, count).cloned().collect()
    };

    let actions: Vec<Action> = (0..config.actions)
        .map(|i| {
            let preconditions = sample(&mut rng, 0, config.max_preconditions);
            let add = sample(&mut rng, 1, config.max_add_effects);
            let delete = sample(&mut rng, 0, config.max_delete_effects);
            Action::new(format!("a{i}"), preconditions, add, delete)
        })
        .collect();
    let initial_state = sample(&mut rng, config.initial_size, config.initial_size);
    let goal = sample(&mut rng, config.goal_size, config.goal_size);

    Ok(PlanningProblem::new(actions, universe.clone(), initial_state, goal))
}
