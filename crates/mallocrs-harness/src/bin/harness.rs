//! CLI entrypoint for the mallocrs conformance harness.

use clap::{Parser, Subcommand};

/// Conformance and stress-testing tooling for mallocrs.
#[derive(Debug, Parser)]
#[command(name = "mallocrs-harness")]
#[command(about = "Conformance and stress-testing harness for mallocrs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the six end-to-end scenarios from the registry walkthrough.
    Scenario {
        /// Emit the full report as JSON instead of a plain-text summary.
        #[arg(long)]
        json: bool,
    },
    /// Run a pseudo-randomized alloc/release/realloc sequence, checking
    /// registry invariants after every operation.
    Stress {
        /// Seed for the pseudo-random operation generator.
        #[arg(long, default_value_t = 0xDEAD_BEEF_u64)]
        seed: u64,
        /// Number of operations to run.
        #[arg(long, default_value_t = 10_000)]
        iterations: u64,
        /// Emit the full report as JSON instead of a plain-text summary.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scenario { json } => {
            let outcomes = mallocrs_harness::run_scenarios();
            let all_passed = outcomes.iter().all(|o| o.passed);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
            } else {
                for outcome in &outcomes {
                    let status = if outcome.passed { "PASS" } else { "FAIL" };
                    println!("[{status}] {}: {}", outcome.name, outcome.detail);
                }
                let passed_count = outcomes.iter().filter(|o| o.passed).count();
                println!("{passed_count}/{} scenarios passed", outcomes.len());
            }

            if !all_passed {
                return Err("one or more scenarios failed".into());
            }
        }
        Command::Stress { seed, iterations, json } => {
            let report = mallocrs_harness::run_stress(seed, iterations);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.passed {
                println!(
                    "PASS: {} operations (seed={:#x}) preserved all registry invariants",
                    report.iterations_run, report.seed
                );
            } else {
                println!(
                    "FAIL at operation {}/{} (seed={:#x}):",
                    report.iterations_run, report.iterations_requested, report.seed
                );
                for violation in &report.violations {
                    println!("  [{}] {}", violation.invariant, violation.detail);
                }
                println!("last {} operations:", report.log.len().min(20));
                for op in report.log.iter().rev().take(20).collect::<Vec<_>>().into_iter().rev() {
                    println!("  {op:?}");
                }
            }

            if !report.passed {
                return Err("stress run found a registry invariant violation".into());
            }
        }
    }

    Ok(())
}
