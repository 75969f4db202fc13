use std::collections::HashMap;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use graphplan_search::generators::{hanoi, random_problem, RandomProblemConfig};
use graphplan_search::heuristics::PlanningHeuristic;
use graphplan_search::search::{a_star_search, SearchProblem};
use graphplan_search::strips::PlanningProblem;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare planning heuristics on generated instances", long_about = None)]
struct Args {
    /// Number of random instances
    #[clap(short, long, default_value_t = 20)]
    instances: usize,

    /// Seed of the first random instance; the rest use consecutive seeds
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Number of propositions in each random instance
    #[clap(long, default_value_t = 12)]
    propositions: usize,

    /// Number of actions in each random instance
    #[clap(long, default_value_t = 20)]
    actions: usize,

    /// Largest Hanoi instance (disks) to include, on 3 pegs; 0 skips Hanoi
    #[clap(long, default_value_t = 2)]
    hanoi_disks: usize,
}

#[derive(Default)]
struct Totals {
    solved: usize,
    unsolved: usize,
    expanded: usize,
    plan_length: usize,
}

fn evaluate(
    name: &str,
    problem_for: &dyn Fn() -> Result<PlanningProblem>,
    totals: &mut HashMap<PlanningHeuristic, Totals>,
) -> Result<()> {
    println!("\nEvaluating {}", name);
    for heuristic in PlanningHeuristic::ALL {
        // A fresh problem per heuristic keeps the expansion counters separate.
        let problem = problem_for()?;
        let start = problem.get_start_state();
        let begin = Instant::now();
        let plan = a_star_search(&problem, &heuristic);
        let elapsed = begin.elapsed();

        let solved = !plan.is_empty() || problem.is_goal_state(&start);
        let entry = totals.entry(heuristic).or_default();
        if solved {
            entry.solved += 1;
            entry.plan_length += plan.len();
        } else {
            entry.unsolved += 1;
        }
        entry.expanded += problem.expanded();

        println!(
            "  Heuristic: {:<5}, Solved: {:<5}, Plan length: {:<4}, Expanded: {:<7}, Time: {:.3}s",
            heuristic,
            solved,
            plan.len(),
            problem.expanded(),
            elapsed.as_secs_f64()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();
    let args = Args::parse();

    let config = RandomProblemConfig {
        propositions: args.propositions,
        actions: args.actions,
        ..RandomProblemConfig::default()
    };
    let mut totals: HashMap<PlanningHeuristic, Totals> = HashMap::new();

    println!("Starting heuristic evaluation for {} random instances...", args.instances);
    for index in 0..args.instances {
        let seed = args.start_seed + index as u64;
        evaluate(
            &format!("random instance {} (Seed: {})", index, seed),
            &|| -> Result<PlanningProblem> { Ok(random_problem(seed, &config)?) },
            &mut totals,
        )?;
    }
    for disks in 1..=args.hanoi_disks {
        evaluate(
            &format!("Hanoi with {} disks on 3 pegs", disks),
            &|| -> Result<PlanningProblem> { Ok(hanoi(disks, 3)?) },
            &mut totals,
        )?;
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Totals ---");
    for heuristic in PlanningHeuristic::ALL {
        let Some(total) = totals.get(&heuristic) else {
            println!("Heuristic {}: No runs recorded.", heuristic);
            continue;
        };
        let average_length = if total.solved == 0 {
            0.0
        } else {
            total.plan_length as f64 / total.solved as f64
        };
        println!(
            "Heuristic {:<5}: Solved = {}, Unsolved = {}, Expanded = {}, Average plan length = {:.2}, Admissible = {}",
            heuristic,
            total.solved,
            total.unsolved,
            total.expanded,
            average_length,
            heuristic.is_admissible()
        );
    }
    Ok(())
}
