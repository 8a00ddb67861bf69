// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Simulation Configuration

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Amount, Ticks};

/// Pools regenerate up to this multiple of their initial balance.
pub const POOL_CAP_MULTIPLIER: f64 = 1.5;

/// Default number of ticks between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: Ticks = 100;

// ---------------------------------------------------------------------------
// Chain parameters
// ---------------------------------------------------------------------------

/// Economic parameters of one chain, fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainParams {
    pub orderflow_regen_per_tick: Amount,
    pub outflow_regen_per_tick: Amount,
    /// Fixed fee deducted from every action sourced on this chain.
    pub gas_cost: Amount,
    /// Multiplier on the post-gas amount of an execute action.
    pub execution_surplus: f64,
    pub bridging_time: Ticks,
    pub inventory_lock_time: Ticks,
}

// ---------------------------------------------------------------------------
// Chain configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub params: ChainParams,
    pub initial_orderflow: Amount,
    pub initial_outflow: Amount,
    #[serde(default)]
    pub initial_strategy_balance: Amount,
}

impl ChainConfig {
    pub fn new(
        name: impl Into<String>,
        params: ChainParams,
        initial_orderflow: Amount,
        initial_outflow: Amount,
        initial_strategy_balance: Amount,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            initial_orderflow,
            initial_outflow,
            initial_strategy_balance,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let fields: [(&'static str, f64); 7] = [
            ("orderflow_regen_per_tick", self.params.orderflow_regen_per_tick),
            ("outflow_regen_per_tick", self.params.outflow_regen_per_tick),
            ("gas_cost", self.params.gas_cost),
            ("execution_surplus", self.params.execution_surplus),
            ("initial_orderflow", self.initial_orderflow),
            ("initial_outflow", self.initial_outflow),
            ("initial_strategy_balance", self.initial_strategy_balance),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { chain: self.name.clone(), field });
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeValue { chain: self.name.clone(), field });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation configuration
// ---------------------------------------------------------------------------

/// Fully formed initial world handed to the engine at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub chains: Vec<ChainConfig>,
    /// Ticks between progress log lines; 0 disables them.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: Ticks,
}

fn default_progress_interval() -> Ticks {
    DEFAULT_PROGRESS_INTERVAL
}

impl SimulationConfig {
    pub fn new(chains: Vec<ChainConfig>) -> Self {
        Self {
            chains,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::NoChains);
        }
        let mut seen = HashSet::new();
        for chain in &self.chains {
            chain.validate()?;
            if !seen.insert(chain.name.as_str()) {
                return Err(ConfigError::DuplicateChain(chain.name.clone()));
            }
        }
        Ok(())
    }

    /// Three-chain world: A is funded with high order flow, B has slow
    /// bridging, C has the best surplus but the longest inventory lock.
    pub fn three_chain() -> Self {
        Self::new(vec![
            ChainConfig::new(
                "A",
                ChainParams {
                    orderflow_regen_per_tick: 0.64,
                    outflow_regen_per_tick: 0.24,
                    gas_cost: 0.0001,
                    execution_surplus: 1.0005,
                    bridging_time: 4,
                    inventory_lock_time: 4,
                },
                10.0,
                30.0,
                10.0,
            ),
            ChainConfig::new(
                "B",
                ChainParams {
                    orderflow_regen_per_tick: 0.38,
                    outflow_regen_per_tick: 0.4,
                    gas_cost: 0.0005,
                    execution_surplus: 1.0003,
                    bridging_time: 6,
                    inventory_lock_time: 6,
                },
                30.0,
                10.0,
                0.0,
            ),
            ChainConfig::new(
                "C",
                ChainParams {
                    orderflow_regen_per_tick: 0.24,
                    outflow_regen_per_tick: 0.61,
                    gas_cost: 0.0008,
                    execution_surplus: 1.0009,
                    bridging_time: 4,
                    inventory_lock_time: 8,
                },
                40.0,
                30.0,
                0.0,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_chain_is_valid() {
        let config = SimulationConfig::three_chain();
        assert!(config.validate().is_ok());
        assert_eq!(config.chains.len(), 3);
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut config = SimulationConfig::three_chain();
        config.chains[2].name = "A".to_string();
        match config.validate() {
            Err(ConfigError::DuplicateChain(name)) => assert_eq!(name, "A"),
            other => panic!("expected DuplicateChain, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_config_rejected() {
        let config = SimulationConfig::new(Vec::new());
        assert!(matches!(config.validate(), Err(ConfigError::NoChains)));
    }

    #[test]
    fn test_negative_gas_rejected() {
        let mut config = SimulationConfig::three_chain();
        config.chains[1].params.gas_cost = -1.0;
        match config.validate() {
            Err(ConfigError::NegativeValue { chain, field }) => {
                assert_eq!(chain, "B");
                assert_eq!(field, "gas_cost");
            }
            other => panic!("expected NegativeValue, got {:?}", other),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = SimulationConfig::three_chain();
        config.chains[0].initial_outflow = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NonFinite { .. })));
    }

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{
            "chains": [{
                "name": "X",
                "params": {
                    "orderflow_regen_per_tick": 1.0,
                    "outflow_regen_per_tick": 1.0,
                    "gas_cost": 0.01,
                    "execution_surplus": 1.001,
                    "bridging_time": 2,
                    "inventory_lock_time": 3
                },
                "initial_orderflow": 5.0,
                "initial_outflow": 5.0
            }]
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
        assert_eq!(config.chains[0].initial_strategy_balance, 0.0);
        assert_eq!(config.chains[0].params.inventory_lock_time, 3);
    }

    #[test]
    fn test_from_json_bad_input() {
        assert!(matches!(
            SimulationConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
