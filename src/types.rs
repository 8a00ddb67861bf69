// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Type Definitions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conservation::ConservationResult;
use crate::error::ActionError;

/// Value held or moved on a chain, in the chain's strategy currency.
pub type Amount = f64;

/// Discrete simulation time steps.
pub type Ticks = u64;

// ─── Action Kind ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Move funds to another chain through its bridging pool.
    Bridge = 0,
    /// Fill an order against the destination's order flow, earning surplus.
    Execute = 1,
}

impl ActionKind {
    /// The destination pool an action of this kind draws from.
    pub fn pool(&self) -> PoolKind {
        match self {
            Self::Bridge => PoolKind::Outflow,
            Self::Execute => PoolKind::Orderflow,
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bridge" => Ok(Self::Bridge),
            "execute" => Ok(Self::Execute),
            other => Err(format!("unknown action kind [{}]", other)),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bridge => write!(f, "bridge"),
            Self::Execute => write!(f, "execute"),
        }
    }
}

// ─── Pool Kind ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Orderflow,
    Outflow,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orderflow => write!(f, "orderflow"),
            Self::Outflow => write!(f, "outflow"),
        }
    }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// An instruction proposed by a strategy. Lives for a single tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub source: String,
    pub destination: String,
    pub amount: Amount,
}

impl Action {
    pub fn bridge(source: impl Into<String>, destination: impl Into<String>, amount: Amount) -> Self {
        Self {
            kind: ActionKind::Bridge,
            source: source.into(),
            destination: destination.into(),
            amount,
        }
    }

    pub fn execute(source: impl Into<String>, destination: impl Into<String>, amount: Amount) -> Self {
        Self {
            kind: ActionKind::Execute,
            source: source.into(),
            destination: destination.into(),
            amount,
        }
    }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Result of processing one proposed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Accepted: `credited` is now locked on the destination for `lock_ticks`.
    Applied { credited: Amount, lock_ticks: Ticks },
    Rejected { reason: ActionError },
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Discrete, ordered occurrences emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    SettlementReleased {
        tick: Ticks,
        chain: String,
        amount: Amount,
    },
    ActionProcessed {
        tick: Ticks,
        kind: ActionKind,
        source: String,
        destination: String,
        amount: Amount,
        outcome: ActionOutcome,
    },
}

impl SimEvent {
    pub fn tick(&self) -> Ticks {
        match self {
            Self::SettlementReleased { tick, .. } | Self::ActionProcessed { tick, .. } => *tick,
        }
    }
}

// ─── Snapshots & Reports ─────────────────────────────────────────────────────

/// Owned copy of one chain's state, for reporting and serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub name: String,
    pub orderflow_balance: Amount,
    pub outflow_balance: Amount,
    pub strategy_balance: Amount,
    pub locked_total: Amount,
    pub pending_settlements: usize,
}

/// Per-chain line of an aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub name: String,
    pub balance: Amount,
    pub locked: Amount,
}

/// Strategy-owned value across all chains: spendable plus locked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub tick: Ticks,
    pub chains: Vec<ChainSummary>,
    pub total: Amount,
}

// ─── TickResult ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TickResult {
    pub tick: Ticks,
    pub events: Vec<SimEvent>,
    pub chains: Vec<ChainSnapshot>,
    pub conservation: ConservationResult,
}

impl TickResult {
    pub fn applied_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::ActionProcessed { outcome, .. } if outcome.is_applied()))
            .count()
    }

    pub fn rejections(&self) -> impl Iterator<Item = &ActionError> {
        self.events.iter().filter_map(|e| match e {
            SimEvent::ActionProcessed {
                outcome: ActionOutcome::Rejected { reason },
                ..
            } => Some(reason),
            _ => None,
        })
    }

    pub fn released_total(&self) -> Amount {
        self.events
            .iter()
            .map(|e| match e {
                SimEvent::SettlementReleased { amount, .. } => *amount,
                _ => 0.0,
            })
            .sum()
    }
}

// ─── EventTally ──────────────────────────────────────────────────────────────

/// Running counts of processed events across ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventTally {
    pub applied_count: u64,
    pub rejected_count: u64,
    pub release_count: u64,
    /// Rejections keyed by [`ActionError::code`].
    pub rejections_by_reason: BTreeMap<String, u64>,
}

impl EventTally {
    pub fn record(&mut self, result: &TickResult) {
        for event in &result.events {
            match event {
                SimEvent::SettlementReleased { .. } => self.release_count += 1,
                SimEvent::ActionProcessed { outcome, .. } => match outcome {
                    ActionOutcome::Applied { .. } => self.applied_count += 1,
                    ActionOutcome::Rejected { reason } => {
                        self.rejected_count += 1;
                        *self
                            .rejections_by_reason
                            .entry(reason.code().to_string())
                            .or_insert(0) += 1;
                    }
                },
            }
        }
    }

    pub fn proposed(&self) -> u64 {
        self.applied_count + self.rejected_count
    }

    /// Share of proposed actions that were rejected; 0 when nothing was proposed.
    pub fn rejection_rate(&self) -> f64 {
        match self.proposed() {
            0 => 0.0,
            n => self.rejected_count as f64 / n as f64,
        }
    }
}

// ─── RunSummary ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: Ticks,
    pub initial: AggregateReport,
    pub final_report: AggregateReport,
    pub applied_count: u64,
    pub rejected_count: u64,
    pub release_count: u64,
    /// Rejections keyed by [`ActionError::code`].
    pub rejections_by_reason: BTreeMap<String, u64>,
    pub max_conservation_error: f64,
    pub conservation_violations: u32,
}

impl RunSummary {
    /// Change in total strategy value over the run.
    pub fn pnl(&self) -> Amount {
        self.final_report.total - self.initial.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(outcome: ActionOutcome) -> SimEvent {
        SimEvent::ActionProcessed {
            tick: 0,
            kind: ActionKind::Bridge,
            source: "A".into(),
            destination: "B".into(),
            amount: 1.0,
            outcome,
        }
    }

    #[test]
    fn test_tally_counts_each_event_kind() {
        let result = TickResult {
            tick: 0,
            events: vec![
                SimEvent::SettlementReleased { tick: 0, chain: "B".into(), amount: 1.0 },
                processed(ActionOutcome::Applied { credited: 0.9, lock_ticks: 4 }),
                processed(ActionOutcome::Rejected {
                    reason: ActionError::SameChain { chain: "A".into() },
                }),
                processed(ActionOutcome::Rejected {
                    reason: ActionError::SameChain { chain: "A".into() },
                }),
            ],
            chains: Vec::new(),
            conservation: ConservationResult { balanced: true, error: 0.0 },
        };

        let mut tally = EventTally::default();
        tally.record(&result);
        tally.record(&result);

        assert_eq!(tally.release_count, 2);
        assert_eq!(tally.applied_count, 2);
        assert_eq!(tally.rejected_count, 4);
        assert_eq!(tally.rejections_by_reason.get("same_chain"), Some(&4));
        assert_eq!(tally.proposed(), 6);
        assert!((tally.rejection_rate() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_tally_rate_is_zero() {
        assert_eq!(EventTally::default().rejection_rate(), 0.0);
    }
}
