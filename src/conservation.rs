// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Conservation Audit

//! Value conservation for strategy-owned funds.
//!
//! Actions move value between chains, burn gas and (for executes) mint
//! surplus. Nothing else may create or destroy strategy value, so at every
//! tick boundary:
//!
//! ```text
//! Σ strategy_balance + Σ locked = initial_total + surplus_minted − gas_burned
//! ```
//!
//! Inflows are accumulated in `Decimal` so the reference side of the
//! equation does not drift with the number of actions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::adapter::{from_decimal, to_decimal};
use crate::chain::ChainSet;
use crate::execution::ValidatedAction;
use crate::types::ActionKind;

/// Absolute error below this threshold is considered balanced.
const TOLERANCE: Decimal = dec!(0.000001);

/// Outcome of one tick-level check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConservationResult {
    pub balanced: bool,
    pub error: f64,
}

/// Expected strategy value, tracked independently of chain balances.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConservationLaw {
    initial_total: Decimal,
    surplus_minted: Decimal,
    gas_burned: Decimal,
    cumulative_error: Decimal,
    max_error: Decimal,
    consecutive_violations: u32,
    total_violations: u32,
}

impl ConservationLaw {
    pub fn new(chains: &ChainSet) -> Self {
        let initial_total = chains
            .iter()
            .map(|c| to_decimal(c.strategy_balance()) + to_decimal(c.locked_total()))
            .sum();
        Self {
            initial_total,
            surplus_minted: Decimal::ZERO,
            gas_burned: Decimal::ZERO,
            cumulative_error: Decimal::ZERO,
            max_error: Decimal::ZERO,
            consecutive_violations: 0,
            total_violations: 0,
        }
    }

    /// Account for an accepted action's value creation and destruction.
    pub fn record_action(&mut self, plan: &ValidatedAction) {
        let gas = to_decimal(plan.gas);
        self.gas_burned += gas;
        if plan.kind == ActionKind::Execute {
            let net = to_decimal(plan.amount) - gas;
            self.surplus_minted += to_decimal(plan.credited) - net;
        }
    }

    pub fn expected_total(&self) -> Decimal {
        self.initial_total + self.surplus_minted - self.gas_burned
    }

    /// Compare the chains' actual strategy value against the expected total.
    pub fn verify(&mut self, chains: &ChainSet) -> ConservationResult {
        let actual: Decimal = chains
            .iter()
            .map(|c| to_decimal(c.strategy_balance()) + to_decimal(c.locked_total()))
            .sum();
        let error = (actual - self.expected_total()).abs();
        let balanced = error < TOLERANCE;

        if balanced {
            self.consecutive_violations = 0;
        } else {
            self.cumulative_error += error;
            self.consecutive_violations += 1;
            self.total_violations += 1;
        }
        self.max_error = self.max_error.max(error);

        ConservationResult {
            balanced,
            error: from_decimal(error),
        }
    }

    pub fn surplus_minted(&self) -> f64 { from_decimal(self.surplus_minted) }
    pub fn gas_burned(&self) -> f64 { from_decimal(self.gas_burned) }
    pub fn max_error(&self) -> f64 { from_decimal(self.max_error) }
    pub fn cumulative_error(&self) -> f64 { from_decimal(self.cumulative_error) }
    pub fn consecutive_violations(&self) -> u32 { self.consecutive_violations }
    pub fn total_violations(&self) -> u32 { self.total_violations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::execution::apply;
    use crate::types::Action;

    fn setup() -> (ChainSet, ConservationLaw) {
        let chains = ChainSet::from_config(&SimulationConfig::three_chain()).unwrap();
        let law = ConservationLaw::new(&chains);
        (chains, law)
    }

    #[test]
    fn test_initial_state_balanced() {
        let (chains, mut law) = setup();
        assert_eq!(law.expected_total(), dec!(10));
        let result = law.verify(&chains);
        assert!(result.balanced);
        assert_eq!(result.error, 0.0);
    }

    #[test]
    fn test_bridge_burns_gas_only() {
        let (mut chains, mut law) = setup();
        let plan = apply(&mut chains, &Action::bridge("A", "B", 2.0)).unwrap();
        law.record_action(&plan);
        assert!((law.gas_burned() - 0.0001).abs() < 1e-12);
        assert_eq!(law.surplus_minted(), 0.0);
        assert!(law.verify(&chains).balanced);
    }

    #[test]
    fn test_execute_mints_surplus() {
        let (mut chains, mut law) = setup();
        let plan = apply(&mut chains, &Action::execute("A", "C", 4.0)).unwrap();
        law.record_action(&plan);
        let expected_surplus = (4.0 - 0.0001) * 0.0005;
        assert!((law.surplus_minted() - expected_surplus).abs() < 1e-9);
        assert!(law.verify(&chains).balanced);
    }

    #[test]
    fn test_unrecorded_action_is_a_violation() {
        let (mut chains, mut law) = setup();
        apply(&mut chains, &Action::bridge("A", "B", 2.0)).unwrap();
        let result = law.verify(&chains);
        assert!(!result.balanced);
        assert!((result.error - 0.0001).abs() < 1e-9);
        assert_eq!(law.consecutive_violations(), 1);
        assert_eq!(law.total_violations(), 1);
    }
}
