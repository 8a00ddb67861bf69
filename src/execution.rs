// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Action Validation & Execution
//
// Validation is a pure function of the current chain state; only a
// successfully validated plan is committed. A rejected action therefore
// never leaves a partial mutation behind.

use crate::chain::ChainSet;
use crate::error::ActionError;
use crate::types::{Action, ActionKind, Amount, Ticks};

/// An action that passed every check, with its effects precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAction {
    pub kind: ActionKind,
    pub source: usize,
    pub destination: usize,
    pub amount: Amount,
    pub gas: Amount,
    /// Amount locked on the destination: net of gas, times surplus for executes.
    pub credited: Amount,
    pub lock_ticks: Ticks,
}

/// Run the shared checks and the kind-specific checks, in order:
/// same chain, unknown chain, amount, source funds, destination pool, gas.
pub fn validate(chains: &ChainSet, action: &Action) -> Result<ValidatedAction, ActionError> {
    if action.source == action.destination {
        return Err(ActionError::SameChain { chain: action.source.clone() });
    }

    let source_idx = chains
        .index_of(&action.source)
        .ok_or_else(|| ActionError::UnknownChain { name: action.source.clone() })?;
    let destination_idx = chains
        .index_of(&action.destination)
        .ok_or_else(|| ActionError::UnknownChain { name: action.destination.clone() })?;
    let source = chains.at(source_idx);
    let destination = chains.at(destination_idx);

    // NaN compares false against every bound below
    if !action.amount.is_finite() || action.amount < 0.0 {
        return Err(ActionError::InvalidAmount { amount: action.amount });
    }

    if source.strategy_balance() < action.amount {
        return Err(ActionError::InsufficientSourceFunds {
            chain: source.name().to_string(),
            available: source.strategy_balance(),
            requested: action.amount,
        });
    }

    let pool = action.kind.pool();
    let available = destination.pool(pool);
    if available < action.amount {
        return Err(ActionError::InsufficientDestinationLiquidity {
            chain: destination.name().to_string(),
            pool,
            available,
            requested: action.amount,
        });
    }

    // Fee, surplus and lock time always come from the source chain.
    let params = source.params();
    if action.amount < params.gas_cost {
        return Err(ActionError::BelowGasCost {
            amount: action.amount,
            gas_cost: params.gas_cost,
        });
    }

    let net = action.amount - params.gas_cost;
    let (credited, lock_ticks) = match action.kind {
        ActionKind::Bridge => (net, params.bridging_time),
        ActionKind::Execute => (net * params.execution_surplus, params.inventory_lock_time),
    };

    Ok(ValidatedAction {
        kind: action.kind,
        source: source_idx,
        destination: destination_idx,
        amount: action.amount,
        gas: params.gas_cost,
        credited,
        lock_ticks,
    })
}

/// Apply a validated plan. Infallible: every precondition was checked.
pub fn commit(chains: &mut ChainSet, plan: &ValidatedAction) {
    let (source, destination) = chains.pair_mut(plan.source, plan.destination);
    match plan.kind {
        ActionKind::Bridge => {
            destination.outflow_balance -= plan.amount;
            // Rebate is the full amount (not net of gas) and is not clamped;
            // the next regeneration step brings the pool back under its cap.
            source.outflow_balance += plan.amount;
        }
        ActionKind::Execute => {
            destination.orderflow_balance -= plan.amount;
        }
    }
    source.strategy_balance -= plan.amount;
    destination.ledger.enqueue(plan.credited, plan.lock_ticks);
}

/// Validate then commit. Later actions in the same tick see the result.
pub fn apply(chains: &mut ChainSet, action: &Action) -> Result<ValidatedAction, ActionError> {
    let plan = validate(chains, action)?;
    commit(chains, &plan);
    Ok(plan)
}
