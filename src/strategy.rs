// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Strategy Contract

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::chain::ChainsView;
use crate::types::{Action, Amount, Ticks};

/// A pluggable policy. Called once per tick, after pool regeneration and
/// settlement release, with a read-only view of every chain. The returned
/// actions are validated and applied in order.
pub trait Strategy {
    fn on_tick(&mut self, tick: Ticks, chains: &ChainsView<'_>) -> Vec<Action>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn on_tick(&mut self, tick: Ticks, chains: &ChainsView<'_>) -> Vec<Action> {
        (**self).on_tick(tick, chains)
    }
}

// ─── FromFn ──────────────────────────────────────────────────────────────────

/// Strategy backed by a closure. Created with [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Turn a closure into a [`Strategy`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(Ticks, &ChainsView<'_>) -> Vec<Action>,
{
    FromFn(f)
}

impl<F> Strategy for FromFn<F>
where
    F: FnMut(Ticks, &ChainsView<'_>) -> Vec<Action>,
{
    fn on_tick(&mut self, tick: Ticks, chains: &ChainsView<'_>) -> Vec<Action> {
        (self.0)(tick, chains)
    }
}

// ─── IdleStrategy ────────────────────────────────────────────────────────────

/// Never proposes anything. Useful as a baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleStrategy;

impl Strategy for IdleStrategy {
    fn on_tick(&mut self, _tick: Ticks, _chains: &ChainsView<'_>) -> Vec<Action> {
        Vec::new()
    }
}

// ─── QueuedStrategy ──────────────────────────────────────────────────────────

/// Replays externally submitted actions. Everything queued before a tick is
/// proposed, in submission order, on that tick.
#[derive(Debug, Clone, Default)]
pub struct QueuedStrategy {
    pending: VecDeque<Action>,
}

impl QueuedStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Strategy for QueuedStrategy {
    fn on_tick(&mut self, _tick: Ticks, _chains: &ChainsView<'_>) -> Vec<Action> {
        self.pending.drain(..).collect()
    }
}

// ─── ShuttleStrategy ─────────────────────────────────────────────────────────

/// A fixed route: move `amount` from `source` to `destination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub source: String,
    pub destination: String,
    pub amount: Amount,
}

impl Route {
    pub fn new(source: impl Into<String>, destination: impl Into<String>, amount: Amount) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            amount,
        }
    }
}

/// Shuttles funds around a two-leg loop:
///
/// * bridge leg: bridge when the source holds more than the amount and the
///   destination's outflow pool can absorb it;
/// * execute leg: fill an order when the source holds more than the amount
///   and has order flow above it.
///
/// The default loop bridges 2 from A to B and fills orders of 5 on B,
/// credited back on A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuttleStrategy {
    pub bridge: Option<Route>,
    pub execute: Option<Route>,
}

impl Default for ShuttleStrategy {
    fn default() -> Self {
        Self {
            bridge: Some(Route::new("A", "B", 2.0)),
            execute: Some(Route::new("B", "A", 5.0)),
        }
    }
}

impl Strategy for ShuttleStrategy {
    fn on_tick(&mut self, _tick: Ticks, chains: &ChainsView<'_>) -> Vec<Action> {
        let mut actions = Vec::new();

        if let Some(route) = &self.bridge {
            if let (Some(src), Some(dst)) = (chains.get(&route.source), chains.get(&route.destination)) {
                if src.strategy_balance() > route.amount && dst.outflow_balance() > route.amount {
                    actions.push(Action::bridge(&*route.source, &*route.destination, route.amount));
                }
            }
        }

        // Order flow is read on the chain the order is filled on (the source)
        if let Some(route) = &self.execute {
            if let Some(src) = chains.get(&route.source) {
                if src.strategy_balance() > route.amount && src.orderflow_balance() > route.amount {
                    actions.push(Action::execute(&*route.source, &*route.destination, route.amount));
                }
            }
        }

        actions
    }
}
