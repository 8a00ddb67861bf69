// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - multi-chain liquidity flow simulation

pub mod types;
pub mod error;
pub mod config;
pub mod ledger;
pub mod chain;
pub mod execution;
pub mod strategy;
pub mod events;
pub mod simulation;
pub mod conservation;
pub mod adapter;

pub use types::*;
pub use error::{ActionError, ConfigError};
pub use config::{ChainConfig, ChainParams, SimulationConfig};
pub use chain::{Chain, ChainsView};
pub use strategy::{from_fn, IdleStrategy, QueuedStrategy, Route, ShuttleStrategy, Strategy};
pub use events::EventSink;
pub use simulation::Simulation;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser-facing wrapper. Actions are submitted from JS and proposed on the
/// next tick through a [`QueuedStrategy`].
#[wasm_bindgen]
pub struct LiquidityArena {
    config: SimulationConfig,
    sim: Simulation<QueuedStrategy>,
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
impl LiquidityArena {
    /// Build from a JSON `SimulationConfig`; an empty string selects the
    /// default three-chain world.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<LiquidityArena, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = if config_json.trim().is_empty() {
            SimulationConfig::three_chain()
        } else {
            SimulationConfig::from_json(config_json).map_err(to_js_error)?
        };
        let sim = Simulation::new(&config, QueuedStrategy::new()).map_err(to_js_error)?;
        Ok(Self { config, sim })
    }

    pub fn tick(&mut self) -> JsValue {
        let result = self.sim.tick_core();
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    /// Run N ticks without returning per-tick results.
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.sim.tick_core();
        }
    }

    pub fn submit_action(
        &mut self,
        kind: &str,
        source: &str,
        destination: &str,
        amount: f64,
    ) -> Result<(), JsValue> {
        let kind: ActionKind = kind.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.sim.strategy_mut().submit(Action {
            kind,
            source: source.to_string(),
            destination: destination.to_string(),
            amount,
        });
        Ok(())
    }

    pub fn current_tick(&self) -> u64 {
        self.sim.current_tick()
    }

    pub fn get_chains(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.sim.snapshots()).unwrap_or(JsValue::NULL)
    }

    pub fn get_report(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.sim.report()).unwrap_or(JsValue::NULL)
    }

    /// Reset simulation to its initial configuration, dropping queued actions.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.sim = Simulation::new(&self.config, QueuedStrategy::new()).map_err(to_js_error)?;
        Ok(())
    }
}
