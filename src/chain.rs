// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Chain State

use std::collections::HashMap;

use crate::config::{ChainConfig, ChainParams, SimulationConfig, POOL_CAP_MULTIPLIER};
use crate::error::ConfigError;
use crate::ledger::SettlementLedger;
use crate::types::{Amount, ChainSnapshot, ChainSummary, PoolKind, SimEvent, Ticks};

// ─── Chain ───────────────────────────────────────────────────────────────────

/// Mutable state of one network. Only the engine holds `&mut Chain`.
#[derive(Debug, Clone)]
pub struct Chain {
    name: String,
    pub(crate) orderflow_balance: Amount,
    pub(crate) outflow_balance: Amount,
    pub(crate) strategy_balance: Amount,
    max_orderflow: Amount,
    max_outflow: Amount,
    params: ChainParams,
    pub(crate) ledger: SettlementLedger,
}

impl Chain {
    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            name: config.name.clone(),
            orderflow_balance: config.initial_orderflow,
            outflow_balance: config.initial_outflow,
            strategy_balance: config.initial_strategy_balance,
            max_orderflow: config.initial_orderflow * POOL_CAP_MULTIPLIER,
            max_outflow: config.initial_outflow * POOL_CAP_MULTIPLIER,
            params: config.params.clone(),
            ledger: SettlementLedger::new(),
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn orderflow_balance(&self) -> Amount { self.orderflow_balance }
    pub fn outflow_balance(&self) -> Amount { self.outflow_balance }
    pub fn strategy_balance(&self) -> Amount { self.strategy_balance }
    pub fn max_orderflow(&self) -> Amount { self.max_orderflow }
    pub fn max_outflow(&self) -> Amount { self.max_outflow }
    pub fn params(&self) -> &ChainParams { &self.params }
    pub fn ledger(&self) -> &SettlementLedger { &self.ledger }

    pub fn pool(&self, pool: PoolKind) -> Amount {
        match pool {
            PoolKind::Orderflow => self.orderflow_balance,
            PoolKind::Outflow => self.outflow_balance,
        }
    }

    pub fn locked_total(&self) -> Amount {
        self.ledger.locked_total()
    }

    /// Add one tick of organic inflow to both pools, clamped to their caps.
    pub(crate) fn regenerate(&mut self) {
        self.orderflow_balance = (self.orderflow_balance + self.params.orderflow_regen_per_tick)
            .min(self.max_orderflow);
        self.outflow_balance = (self.outflow_balance + self.params.outflow_regen_per_tick)
            .min(self.max_outflow);
    }

    /// Age the ledger and credit every expired settlement to the strategy
    /// balance. Returns one release event per credited entry.
    pub(crate) fn age_and_release(&mut self, tick: Ticks) -> Vec<SimEvent> {
        let released = self.ledger.age();
        let mut events = Vec::with_capacity(released.len());
        for amount in released {
            self.strategy_balance += amount;
            events.push(SimEvent::SettlementReleased {
                tick,
                chain: self.name.clone(),
                amount,
            });
        }
        events
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            name: self.name.clone(),
            orderflow_balance: self.orderflow_balance,
            outflow_balance: self.outflow_balance,
            strategy_balance: self.strategy_balance,
            locked_total: self.locked_total(),
            pending_settlements: self.ledger.len(),
        }
    }

    pub fn summary(&self) -> ChainSummary {
        ChainSummary {
            name: self.name.clone(),
            balance: self.strategy_balance,
            locked: self.locked_total(),
        }
    }
}

// ─── ChainSet ────────────────────────────────────────────────────────────────

/// All chains of a simulation with a unique name index.
#[derive(Debug, Clone)]
pub struct ChainSet {
    chains: Vec<Chain>,
    index: HashMap<String, usize>,
}

impl ChainSet {
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let chains: Vec<Chain> = config.chains.iter().map(Chain::from_config).collect();
        let index = chains
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Ok(Self { chains, index })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Chain> {
        self.index_of(name).map(|i| &self.chains[i])
    }

    pub(crate) fn at(&self, idx: usize) -> &Chain {
        &self.chains[idx]
    }

    /// Mutable access to two distinct chains at once.
    pub(crate) fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Chain, &mut Chain) {
        assert_ne!(a, b, "pair_mut requires distinct chains");
        if a < b {
            let (left, right) = self.chains.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.chains.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chain> {
        self.chains.iter_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chain> {
        self.chains.iter()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn view(&self) -> ChainsView<'_> {
        ChainsView { set: self }
    }

    pub fn snapshots(&self) -> Vec<ChainSnapshot> {
        self.chains.iter().map(Chain::snapshot).collect()
    }
}

// ─── ChainsView ──────────────────────────────────────────────────────────────

/// Read-only view handed to strategies. It borrows the engine's chains for
/// the duration of one call, so it can neither mutate nor outlive the tick.
#[derive(Debug, Clone, Copy)]
pub struct ChainsView<'a> {
    set: &'a ChainSet,
}

impl<'a> ChainsView<'a> {
    pub fn get(&self, name: &str) -> Option<&'a Chain> {
        self.set.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Chain> {
        self.set.chains.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.set.chains.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ChainSet {
        ChainSet::from_config(&SimulationConfig::three_chain()).unwrap()
    }

    #[test]
    fn test_caps_from_initial_balances() {
        let chains = set();
        let a = chains.get("A").unwrap();
        assert!((a.max_orderflow() - 15.0).abs() < 1e-12);
        assert!((a.max_outflow() - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_regeneration_clamped() {
        let mut chains = set();
        for _ in 0..1000 {
            for chain in chains.iter_mut() {
                chain.regenerate();
            }
        }
        for chain in chains.iter() {
            assert!(chain.orderflow_balance() <= chain.max_orderflow());
            assert!(chain.outflow_balance() <= chain.max_outflow());
            assert_eq!(chain.orderflow_balance(), chain.max_orderflow());
        }
    }

    #[test]
    fn test_regeneration_pulls_overfull_pool_to_cap() {
        let mut chains = set();
        let idx = chains.index_of("A").unwrap();
        let (a, _) = chains.pair_mut(idx, idx + 1);
        a.outflow_balance = 100.0;
        a.regenerate();
        assert_eq!(a.outflow_balance(), a.max_outflow());
    }

    #[test]
    fn test_release_credits_once() {
        let mut chains = set();
        let idx = chains.index_of("B").unwrap();
        let (b, _) = chains.pair_mut(idx, 0);
        b.ledger.enqueue(2.5, 2);
        assert!(b.age_and_release(0).is_empty());
        let events = b.age_and_release(1);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            SimEvent::SettlementReleased { tick: 1, chain: "B".into(), amount: 2.5 }
        );
        assert!((b.strategy_balance() - 2.5).abs() < 1e-12);
        assert!(b.age_and_release(2).is_empty());
        assert!((b.strategy_balance() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_pair_mut_order() {
        let mut chains = set();
        let (c, a) = chains.pair_mut(2, 0);
        assert_eq!(c.name(), "C");
        assert_eq!(a.name(), "A");
    }

    #[test]
    fn test_view_lookup() {
        let chains = set();
        let view = chains.view();
        assert_eq!(view.len(), 3);
        assert_eq!(view.names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert!(view.get("D").is_none());
        assert_eq!(view.get("A").map(|c| c.strategy_balance()), Some(10.0));
    }
}
