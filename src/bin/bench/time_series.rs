// Per-Tick JSONL Time Series Recorder
// Outputs one JSON line per tick for independent analysis

use serde::Serialize;
use liquidity_arena::{ChainSnapshot, TickResult};
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub strategy_total: f64,
    pub locked_total: f64,
    pub applied: usize,
    pub rejected: usize,
    pub released: f64,
    pub conservation_error: f64,
    pub chains: Vec<ChainSnapshot>,
}

impl TickSnapshot {
    pub fn from_result(result: &TickResult) -> Self {
        let locked_total: f64 = result.chains.iter().map(|c| c.locked_total).sum();
        let strategy_total = result.chains.iter().map(|c| c.strategy_balance).sum::<f64>()
            + locked_total;
        let applied = result.applied_count();
        Self {
            tick: result.tick,
            strategy_total,
            locked_total,
            applied,
            rejected: result.rejections().count(),
            released: result.released_total(),
            conservation_error: result.conservation.error,
            chains: result.chains.clone(),
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, result: &TickResult) {
        self.snapshots.push(TickSnapshot::from_result(result));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}
