// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod job;
pub mod logging;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::JobFile;
use crate::config::loader::load_and_validate;
use crate::engine::{Pipeline, RunReport};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the job file, builds the graph and runs it depth by
/// depth. Returns `None` for `--dry-run`.
pub async fn run(args: CliArgs) -> Result<Option<RunReport>> {
    let cfg = load_and_validate(&args.config)?;
    let pipeline = Pipeline::from_config(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &pipeline)?;
        return Ok(None);
    }

    let plan = pipeline.plan()?;
    info!(roots = ?plan.roots, jobs = plan.jobs, "starting run");
    let report = pipeline.run().await?;
    print_report(&report);

    Ok(Some(report))
}

/// Print jobs, their dependencies and the roots.
fn print_dry_run(cfg: &JobFile, pipeline: &Pipeline) -> Result<()> {
    println!("depgraph dry-run");
    println!("  config.check_cycles = {}", cfg.config.check_cycles);
    println!();

    let plan = pipeline.plan()?;
    println!("jobs ({}):", plan.jobs);
    for (name, job) in cfg.job.iter() {
        println!("  - {name}");
        println!("      cmd: {}", job.cmd);
        if !job.after.is_empty() {
            println!("      after: {:?}", job.after);
        }
        if !job.validate.is_empty() {
            println!("      validate: {:?}", job.validate);
        }
    }
    println!();
    println!("roots: {:?}", plan.roots);

    debug!("dry-run complete (no execution)");
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("depths run: {}", report.depths);
    println!("passed:     {:?}", report.passed);
    println!("failed:     {:?}", report.failed);
    println!("blocked:    {:?}", report.blocked);
    if !report.unresolved.is_empty() {
        println!("unresolved: {:?}", report.unresolved);
    }
}
