use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "holdfast workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pointer benchmark suite once per global allocator
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const ALLOCATORS: &[&str] = &[
    "alloc-system",
    "alloc-mimalloc",
    "alloc-snmalloc",
    "alloc-jemalloc",
];

const REPORT_PATH: &str = "benchmark_results/report.md";

/// The slice of criterion's `estimates.json` we read.
#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

/// workload -> allocator -> mean time in nanoseconds
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", "suite", "--release"])
        .status()?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    for alloc in ALLOCATORS {
        println!("\n>>> Benchmarking with feature: {alloc}");
        let start = Instant::now();
        let baseline_name = alloc.trim_start_matches("alloc-");

        let mut cmd = Command::new("cargo");
        cmd.env("CARGO_INCREMENTAL", "0")
            .args(["bench", "--bench", "suite", "--features", alloc])
            .arg("--")
            .args(["--save-baseline", baseline_name]);

        if quick {
            cmd.args(["--measurement-time", "0.1", "--noplot", "--sample-size", "10"]);
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run bench for {alloc}"))?;

        if status.success() {
            println!("Finished {alloc} in {:.2?}", start.elapsed());
        } else {
            eprintln!("Warning: Benchmark failed for {alloc}");
        }
    }

    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results)?;

    let report_path = Path::new(REPORT_PATH);
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("Failed to create {}", report_path.display()))?;

    writeln!(file, "# Pointer Benchmarks by Allocator")?;
    writeln!(file)?;
    write!(file, "| Workload |")?;
    for alloc in ALLOCATORS {
        write!(file, " {} (ns) | vs system |", alloc.trim_start_matches("alloc-"))?;
    }
    writeln!(file)?;
    write!(file, "|---|")?;
    for _ in ALLOCATORS {
        write!(file, "---|---|")?;
    }
    writeln!(file)?;

    for (workload, by_alloc) in &results {
        write!(file, "| {workload} |")?;
        let system = by_alloc.get("system").copied();

        for alloc in ALLOCATORS {
            match by_alloc.get(alloc.trim_start_matches("alloc-")) {
                Some(ns) => {
                    let speedup = system.map_or(0.0, |base| base / ns);
                    write!(file, " {ns:.1} | **{speedup:.2}x** |")?;
                }
                None => write!(file, " N/A | - |")?,
            }
        }
        writeln!(file)?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

/// Walks `target/criterion/<group>/<bench>/<baseline>/estimates.json`.
fn collect_results(dir: &Path, results: &mut Results) -> Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results)?;
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        let Some(baseline_dir) = path.parent() else { continue };
        let Some(workload_dir) = baseline_dir.parent() else { continue };
        let (Some(baseline), Some(workload)) = (file_name(baseline_dir), file_name(workload_dir))
        else {
            continue;
        };
        if baseline == "report" || baseline == "new" || baseline == "base" || workload == "report" {
            continue;
        }

        let content = fs::read_to_string(&path)?;
        let estimates: Estimates = serde_json::from_str(&content)
            .with_context(|| format!("Malformed {}", path.display()))?;
        if estimates.mean.point_estimate > 0.0 {
            results
                .entry(workload)
                .or_default()
                .insert(baseline, estimates.mean.point_estimate);
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(str::to_owned)
}
