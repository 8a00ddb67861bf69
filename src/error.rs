// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Error Types

use serde::Serialize;

use crate::types::{Amount, PoolKind};

// ---------------------------------------------------------------------------
// Action rejections
// ---------------------------------------------------------------------------

/// Reason a proposed action was discarded.
///
/// Rejections are local to one action: the engine emits them as events and
/// moves on to the next action. None of these ever abort a tick or a run.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ActionError {
    #[error("source and destination are the same chain [{chain}]")]
    SameChain { chain: String },

    #[error("unknown chain [{name}]")]
    UnknownChain { name: String },

    #[error("amount {amount} must be finite and non-negative")]
    InvalidAmount { amount: Amount },

    #[error("insufficient funds on [{chain}]: available {available}, requested {requested}")]
    InsufficientSourceFunds {
        chain: String,
        available: Amount,
        requested: Amount,
    },

    #[error("insufficient {pool} liquidity on [{chain}]: available {available}, requested {requested}")]
    InsufficientDestinationLiquidity {
        chain: String,
        pool: PoolKind,
        available: Amount,
        requested: Amount,
    },

    #[error("amount {amount} does not cover gas cost {gas_cost}")]
    BelowGasCost { amount: Amount, gas_cost: Amount },
}

impl ActionError {
    /// Stable short identifier, used as a counting key in run summaries.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SameChain { .. } => "same_chain",
            Self::UnknownChain { .. } => "unknown_chain",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientSourceFunds { .. } => "insufficient_source_funds",
            Self::InsufficientDestinationLiquidity { .. } => {
                "insufficient_destination_liquidity"
            }
            Self::BelowGasCost { .. } => "below_gas_cost",
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while building a simulation from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration defines no chains")]
    NoChains,

    #[error("chain name must not be empty")]
    EmptyName,

    #[error("duplicate chain name [{0}]")]
    DuplicateChain(String),

    #[error("chain [{chain}]: {field} must not be negative")]
    NegativeValue { chain: String, field: &'static str },

    #[error("chain [{chain}]: {field} must be finite")]
    NonFinite { chain: String, field: &'static str },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}
