// Liquidity Arena Benchmark Runner
// Monte Carlo runs of bundled strategies, seedable PRNG, per-tick audit trail
//
// Usage:
//   cargo run --release --bin bench                        # Run all scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5            # Quick mode (5 runs each)
//   cargo run --release --bin bench -- RANDOM              # Filter by name, label or category
//   cargo run --release --bin bench -- --ticks 5000        # Override ticks per run
//   cargo run --release --bin bench -- --config world.json # Replace every scenario's world
//   cargo run --release --bin bench -- --time-series       # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42           # Custom base seed
//   cargo run --release --bin bench -- --verbose           # Per-action debug logging

mod monte_carlo;
mod random_strategy;
mod report;
mod scenarios;
mod time_series;

use liquidity_arena::SimulationConfig;
use report::*;
use scenarios::*;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::Level;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    ticks: Option<u64>,
    config: Option<String>,
    time_series: bool,
    verbose: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        ticks: None,
        config: None,
        time_series: false,
        verbose: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--ticks" => {
                i += 1;
                if i < args.len() {
                    cli.ticks = args[i].parse().ok();
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(args[i].clone());
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            "--verbose" | "-v" => {
                cli.verbose = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn load_config(path: &str) -> Result<SimulationConfig, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    SimulationConfig::from_json(&raw).map_err(|e| format!("{}: {}", path, e))
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    let override_config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            std::process::exit(2);
        }
    };

    let mut all_scenarios = scenarios();
    if let Some(ticks) = cli.ticks {
        for scenario in &mut all_scenarios {
            scenario.ticks = ticks;
        }
    }

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        Some(std::path::Path::new("benchmark-results/time-series").to_path_buf())
    } else {
        None
    };

    println!("\n  Liquidity Arena Benchmark Runner v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<30} {:>5} {:>4} {:>16} {:>8} {:>9} {:>10} {:>7}",
        "Scenario", "Pass%", "N", "PnL", "Applied", "Reject%", "Conserv", "Time");
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let config = override_config.clone().unwrap_or_else(scenario.config);
        let report = match monte_carlo::run_monte_carlo(
            scenario,
            &config,
            cli.runs,
            cli.seed,
            ts_dir.as_deref(),
        ) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("  {:<30} skipped: {}", scenario.label, e);
                continue;
            }
        };

        let pass_pct = report.pass_rate * 100.0;
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<30} {:>4}% {:>4} {:>9.4}±{:<6.4} {:>8.0} {:>8.1}% {:>10.2e} {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.n_runs,
            report.pnl.mean, report.pnl.half_width(),
            report.applied_count.mean,
            report.rejection_rate.mean * 100.0,
            report.max_conservation_error.max,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(96));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: if total > 0 { passed as f64 / total as f64 } else { 0.0 },
        },
        scenarios: mc_reports,
    };

    if let Err(e) = write_report(&report, &timestamp) {
        eprintln!("  Failed to write benchmark report: {}", e);
        std::process::exit(1);
    }

    if failed > 0 || total == 0 {
        std::process::exit(1);
    }
}

fn write_report(report: &BenchReport, timestamp: &str) -> std::io::Result<()> {
    let dir = std::path::Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(&path, json)?;
    println!("  Results saved to: {}\n", path.display());
    Ok(())
}
