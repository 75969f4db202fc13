use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use graphplan_search::heuristics::PlanningHeuristic;
use graphplan_search::search::{
    a_star_search, breadth_first_search, depth_first_search, uniform_cost_search, SearchProblem,
};
use graphplan_search::strips::PlanningProblem;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Search for a plan in a STRIPS domain", long_about = None)]
struct Args {
    /// Path to the domain description (propositions and actions)
    domain: PathBuf,

    /// Path to the problem description (initial state and goal)
    problem: PathBuf,

    /// Heuristic guiding A*
    #[clap(long, value_enum, default_value_t = HeuristicArg::Zero)]
    heuristic: HeuristicArg,

    /// Search strategy
    #[clap(short, long, value_enum, default_value_t = StrategyArg::Astar)]
    strategy: StrategyArg,

    /// Verbose logging (overridden by RUST_LOG)
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HeuristicArg {
    Zero,
    Max,
    Sum,
}

impl From<HeuristicArg> for PlanningHeuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Zero => PlanningHeuristic::Zero,
            HeuristicArg::Max => PlanningHeuristic::MaxLevel,
            HeuristicArg::Sum => PlanningHeuristic::LevelSum,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Dfs,
    Bfs,
    Ucs,
    Astar,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let problem = PlanningProblem::from_files(&args.domain, &args.problem).with_context(|| {
        format!(
            "Failed to load planning problem from {} and {}",
            args.domain.display(),
            args.problem.display()
        )
    })?;
    let heuristic = PlanningHeuristic::from(args.heuristic);
    if args.strategy != StrategyArg::Astar && heuristic != PlanningHeuristic::Zero {
        tracing::warn!(%heuristic, "heuristic is only used by A*, ignoring it");
    }

    println!(
        "Loaded {} actions over {} propositions",
        problem.domain_actions().count(),
        problem.propositions().len()
    );
    println!("Initial state: {}", problem.initial_state());

    let start = Instant::now();
    let plan = match args.strategy {
        StrategyArg::Dfs => depth_first_search(&problem),
        StrategyArg::Bfs => breadth_first_search(&problem),
        StrategyArg::Ucs => uniform_cost_search(&problem),
        StrategyArg::Astar => a_star_search(&problem, &heuristic),
    };
    let elapsed = start.elapsed();

    let solved = !plan.is_empty() || problem.is_goal_state(&problem.get_start_state());
    if solved {
        println!(
            "Plan found with {} actions in {:.2} seconds",
            plan.len(),
            elapsed.as_secs_f64()
        );
        for (i, action) in plan.iter().enumerate() {
            println!("  {}: {}", i + 1, action);
        }
        println!("Plan cost: {}", problem.get_cost_of_actions(&plan));
    } else {
        println!("Could not find a plan in {:.2} seconds", elapsed.as_secs_f64());
    }
    println!("Search nodes expanded: {}", problem.expanded());
    Ok(())
}
