// Monte Carlo Infrastructure: N runs per scenario with statistical aggregation
// Seeded strategies run N times with seeds base..base+N; deterministic ones run once

use liquidity_arena::*;

use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    config: &SimulationConfig,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<BenchResult, ConfigError> {
    let start = Instant::now();
    let mut sim = Simulation::new(config, scenario.strategy.build(seed))?;
    let initial = sim.report();

    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());

    let mut tally = EventTally::default();

    for _ in 0..scenario.ticks {
        let result = sim.tick_core();
        tally.record(&result);

        if let Some(ref mut ts) = time_series {
            ts.record(&result);
        }
    }

    // Write time series if enabled
    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = ts.write_jsonl(&path) {
            eprintln!("  Warning: failed to write time series: {}", e);
        }
    }

    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_millis();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);

    let final_report = sim.report();
    let final_locked: f64 = final_report.chains.iter().map(|c| c.locked).sum();
    let pnl = final_report.total - initial.total;
    let rejection_rate = tally.rejection_rate();

    let law = sim.conservation();
    let max_conservation_error = law.max_error();

    // Evaluate pass/fail
    let criteria = &scenario.criteria;
    let mut pass = max_conservation_error <= criteria.max_conservation_error;
    if let Some(max_loss) = criteria.max_loss {
        if pnl < -max_loss {
            pass = false;
        }
    }
    if criteria.require_activity && tally.applied_count == 0 {
        pass = false;
    }

    Ok(BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        ticks: scenario.ticks,
        initial_total: initial.total,
        final_total: final_report.total,
        final_locked,
        pnl,
        applied_count: tally.applied_count,
        rejected_count: tally.rejected_count,
        release_count: tally.release_count,
        rejection_rate,
        rejections_by_reason: tally.rejections_by_reason,
        max_conservation_error,
        conservation_violations: law.total_violations(),
        surplus_minted: law.surplus_minted(),
        gas_burned: law.gas_burned(),
        elapsed_ms,
        throughput_per_sec: scenario.ticks as f64 / elapsed_secs,
    })
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    config: &SimulationConfig,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> Result<MonteCarloReport, ConfigError> {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    // Unseeded strategies are fully deterministic: repeated runs are identical
    let n_runs = if scenario.strategy.is_seeded() { n_runs.max(1) } else { 1 };

    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        results.push(run_single(scenario, config, seed, ts_dir.as_deref())?);
    }

    Ok(aggregate(scenario, results))
}

fn samples(results: &[BenchResult], f: impl Fn(&BenchResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n > 0 { passed as f64 / n as f64 } else { 0.0 };

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        pnl: samples(&results, |r| r.pnl),
        applied_count: samples(&results, |r| r.applied_count as f64),
        rejection_rate: samples(&results, |r| r.rejection_rate),
        max_conservation_error: samples(&results, |r| r.max_conservation_error),
        gas_burned: samples(&results, |r| r.gas_burned),
        surplus_minted: samples(&results, |r| r.surplus_minted),
        elapsed_ms: samples(&results, |r| r.elapsed_ms as f64),
        throughput_per_sec: samples(&results, |r| r.throughput_per_sec),
        individual_runs: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::scenarios;

    fn find(name: &str) -> Scenario {
        scenarios().into_iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_reference_shuttle_passes() {
        let scenario = find("REFERENCE_SHUTTLE");
        let config = (scenario.config)();
        let result = run_single(&scenario, &config, 0, None).unwrap();
        assert!(result.pass, "{:?}", result);
        assert!(result.applied_count > 0);
        assert_eq!(result.conservation_violations, 0);
    }

    #[test]
    fn test_idle_runs_once() {
        let scenario = find("IDLE_BASELINE");
        let config = (scenario.config)();
        let report = run_monte_carlo(&scenario, &config, 5, 0, None).unwrap();
        assert_eq!(report.n_runs, 1);
        assert_eq!(report.pass_rate, 1.0);
        assert_eq!(report.pnl.mean, 0.0);
    }

    #[test]
    fn test_random_seeds_reproducible() {
        let scenario = find("RANDOM_FLOW");
        let config = (scenario.config)();
        let a = run_single(&scenario, &config, 3, None).unwrap();
        let b = run_single(&scenario, &config, 3, None).unwrap();
        assert_eq!(a.applied_count, b.applied_count);
        assert_eq!(a.rejections_by_reason, b.rejections_by_reason);
        assert_eq!(a.final_total, b.final_total);
    }
}
