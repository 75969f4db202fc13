use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use graphplan_search::generators::{hanoi_domain, hanoi_problem};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Write Tower-of-Hanoi domain and problem descriptions", long_about = None)]
struct Args {
    /// Number of disks
    disks: usize,

    /// Number of pegs
    pegs: usize,

    /// Directory the two files are written to
    #[clap(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
    let args = Args::parse();

    let domain = hanoi_domain(args.disks, args.pegs)?;
    let problem = hanoi_problem(args.disks, args.pegs)?;

    let domain_path = args
        .out_dir
        .join(format!("hanoi_{}_{}_domain.txt", args.disks, args.pegs));
    let problem_path = args
        .out_dir
        .join(format!("hanoi_{}_{}_problem.txt", args.disks, args.pegs));

    fs::write(&domain_path, domain)
        .with_context(|| format!("Failed to write {}", domain_path.display()))?;
    fs::write(&problem_path, problem)
        .with_context(|| format!("Failed to write {}", problem_path.display()))?;

    tracing::info!(domain = %domain_path.display(), problem = %problem_path.display(), "wrote Hanoi instance");
    Ok(())
}
