// Scenario Definitions: reference shuttle, baselines and randomized stress
// Each scenario pairs a world configuration with a strategy factory

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use liquidity_arena::{IdleStrategy, ShuttleStrategy, SimulationConfig, Strategy};

use crate::random_strategy::RandomStrategy;

// ─── Scenario Configuration ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum StrategyKind {
    Idle,
    Shuttle,
    Random {
        max_actions: u32,
        max_fraction: f64,
        execute_share: f64,
    },
}

impl StrategyKind {
    pub fn build(&self, seed: u64) -> Box<dyn Strategy> {
        match *self {
            Self::Idle => Box::new(IdleStrategy),
            Self::Shuttle => Box::new(ShuttleStrategy::default()),
            Self::Random { max_actions, max_fraction, execute_share } => Box::new(
                RandomStrategy::new(
                    ChaCha8Rng::seed_from_u64(seed),
                    max_actions,
                    max_fraction,
                    execute_share,
                ),
            ),
        }
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, Self::Random { .. })
    }
}

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub ticks: u64,
    pub config: fn() -> SimulationConfig,
    pub strategy: StrategyKind,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    pub max_conservation_error: f64,
    /// Total value must not fall below initial by more than this
    pub max_loss: Option<f64>,
    pub require_activity: bool,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            max_conservation_error: 1e-6,
            max_loss: None,
            require_activity: false,
        }
    }
}

// ─── World Variants ─────────────────────────────────────────────────────────

fn dry_pools() -> SimulationConfig {
    let mut config = SimulationConfig::three_chain();
    for chain in &mut config.chains {
        chain.params.orderflow_regen_per_tick = 0.0;
        chain.params.outflow_regen_per_tick = 0.0;
    }
    config
}

fn instant_settlement() -> SimulationConfig {
    let mut config = SimulationConfig::three_chain();
    for chain in &mut config.chains {
        chain.params.bridging_time = 0;
        chain.params.inventory_lock_time = 0;
    }
    config
}

fn expensive_gas() -> SimulationConfig {
    let mut config = SimulationConfig::three_chain();
    for chain in &mut config.chains {
        chain.params.gas_cost *= 1000.0;
    }
    config
}

fn evenly_funded() -> SimulationConfig {
    let mut config = SimulationConfig::three_chain();
    for chain in &mut config.chains {
        chain.initial_strategy_balance = 10.0;
    }
    config
}

// ─── Scenario List ──────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "REFERENCE_SHUTTLE",
            label: "Reference A→B shuttle",
            category: "reference",
            ticks: 1000,
            config: SimulationConfig::three_chain,
            strategy: StrategyKind::Shuttle,
            criteria: PassCriteria {
                require_activity: true,
                ..Default::default()
            },
        },
        Scenario {
            name: "IDLE_BASELINE",
            label: "Idle baseline",
            category: "baseline",
            ticks: 1000,
            config: SimulationConfig::three_chain,
            strategy: StrategyKind::Idle,
            criteria: PassCriteria {
                max_loss: Some(0.0),
                ..Default::default()
            },
        },
        Scenario {
            name: "RANDOM_FLOW",
            label: "Random flow",
            category: "stress",
            ticks: 1000,
            config: evenly_funded,
            strategy: StrategyKind::Random {
                max_actions: 4,
                max_fraction: 0.5,
                execute_share: 0.5,
            },
            criteria: PassCriteria {
                require_activity: true,
                ..Default::default()
            },
        },
        Scenario {
            name: "RANDOM_BURST",
            label: "Burst of overdrawing actions",
            category: "stress",
            ticks: 500,
            config: evenly_funded,
            strategy: StrategyKind::Random {
                max_actions: 32,
                max_fraction: 1.5,
                execute_share: 0.5,
            },
            criteria: PassCriteria {
                require_activity: true,
                ..Default::default()
            },
        },
        Scenario {
            name: "DRY_POOLS",
            label: "No pool regeneration",
            category: "liquidity",
            ticks: 1000,
            config: dry_pools,
            strategy: StrategyKind::Random {
                max_actions: 4,
                max_fraction: 0.8,
                execute_share: 0.5,
            },
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "INSTANT_SETTLEMENT",
            label: "Zero lock times",
            category: "timing",
            ticks: 1000,
            config: instant_settlement,
            strategy: StrategyKind::Random {
                max_actions: 4,
                max_fraction: 0.5,
                execute_share: 0.7,
            },
            criteria: PassCriteria {
                require_activity: true,
                ..Default::default()
            },
        },
        Scenario {
            name: "EXPENSIVE_GAS",
            label: "Gas ×1000",
            category: "fees",
            ticks: 1000,
            config: expensive_gas,
            strategy: StrategyKind::Random {
                max_actions: 4,
                max_fraction: 0.5,
                execute_share: 0.5,
            },
            criteria: PassCriteria::default(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_names_unique() {
        let all = scenarios();
        let mut names: Vec<&str> = all.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_scenario_configs_valid() {
        for scenario in scenarios() {
            assert!((scenario.config)().validate().is_ok(), "{}", scenario.name);
        }
    }
}
