// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Simulation Core

use tracing::{info, warn};

use crate::chain::{Chain, ChainSet, ChainsView};
use crate::config::SimulationConfig;
use crate::conservation::ConservationLaw;
use crate::error::ConfigError;
use crate::events::{self, EventSink};
use crate::execution;
use crate::strategy::Strategy;
use crate::types::*;

// ─── Simulation struct ───────────────────────────────────────────────────────

/// The tick engine. Owns every chain exclusively; the strategy only ever
/// sees a [`ChainsView`] borrowed for the duration of its call.
pub struct Simulation<S = Box<dyn Strategy>> {
    chains: ChainSet,
    strategy: S,
    current_tick: Ticks,
    progress_interval: Ticks,
    conservation: ConservationLaw,
    sinks: Vec<Box<dyn EventSink>>,
}

impl<S: Strategy> Simulation<S> {
    pub fn new(config: &SimulationConfig, strategy: S) -> Result<Self, ConfigError> {
        let chains = ChainSet::from_config(config)?;
        let conservation = ConservationLaw::new(&chains);
        Ok(Self {
            chains,
            strategy,
            current_tick: 0,
            progress_interval: config.progress_interval,
            conservation,
            sinks: Vec::new(),
        })
    }

    /// Register an additional observer for every emitted event.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Run `iterations` ticks with initial and final aggregate reporting.
    /// Per-action failures are reported and never stop the run.
    pub fn run(&mut self, iterations: Ticks) -> RunSummary {
        let initial = self.report();
        events::log_report("initial state", &initial);
        info!(iterations, start_tick = self.current_tick, "starting simulation");

        let mut tally = EventTally::default();
        for _ in 0..iterations {
            let result = self.tick_core();
            tally.record(&result);
        }

        let final_report = self.report();
        info!(
            ticks = iterations,
            applied_count = tally.applied_count,
            rejected_count = tally.rejected_count,
            "finished simulation"
        );
        events::log_report("final state", &final_report);

        RunSummary {
            ticks: iterations,
            initial,
            final_report,
            applied_count: tally.applied_count,
            rejected_count: tally.rejected_count,
            release_count: tally.release_count,
            rejections_by_reason: tally.rejections_by_reason,
            max_conservation_error: self.conservation.max_error(),
            conservation_violations: self.conservation.total_violations(),
        }
    }

    /// Advance one tick: regenerate pools, release matured settlements,
    /// ask the strategy for actions, then validate and apply them in order.
    pub fn tick_core(&mut self) -> TickResult {
        let tick = self.current_tick;
        if self.progress_interval > 0 && tick % self.progress_interval == 0 {
            info!(tick, "progress");
        }

        let mut tick_events = Vec::new();

        // 1. Organic pool inflow
        for chain in self.chains.iter_mut() {
            chain.regenerate();
        }

        // 2. Matured settlements become spendable before the strategy looks
        for chain in self.chains.iter_mut() {
            for event in chain.age_and_release(tick) {
                dispatch(&mut self.sinks, &mut tick_events, event);
            }
        }

        // 3. Strategy proposes against a read-only view
        let actions = self.strategy.on_tick(tick, &self.chains.view());

        // 4. Sequential validation; each accepted action is visible to the next
        for action in actions {
            let outcome = match execution::apply(&mut self.chains, &action) {
                Ok(plan) => {
                    self.conservation.record_action(&plan);
                    ActionOutcome::Applied {
                        credited: plan.credited,
                        lock_ticks: plan.lock_ticks,
                    }
                }
                Err(reason) => ActionOutcome::Rejected { reason },
            };
            let event = SimEvent::ActionProcessed {
                tick,
                kind: action.kind,
                source: action.source,
                destination: action.destination,
                amount: action.amount,
                outcome,
            };
            dispatch(&mut self.sinks, &mut tick_events, event);
        }

        // 5. Audit
        let conservation = self.conservation.verify(&self.chains);
        if !conservation.balanced {
            warn!(tick, error = conservation.error, "conservation violated");
        }

        self.current_tick += 1;

        TickResult {
            tick,
            events: tick_events,
            chains: self.chains.snapshots(),
            conservation,
        }
    }

    /// Strategy-owned value per chain and in total.
    pub fn report(&self) -> AggregateReport {
        let chains: Vec<ChainSummary> = self.chains.iter().map(Chain::summary).collect();
        let total = chains.iter().map(|c| c.balance + c.locked).sum();
        AggregateReport {
            tick: self.current_tick,
            chains,
            total,
        }
    }

    pub fn current_tick(&self) -> Ticks { self.current_tick }
    pub fn chains(&self) -> ChainsView<'_> { self.chains.view() }
    pub fn chain(&self, name: &str) -> Option<&Chain> { self.chains.get(name) }
    pub fn snapshots(&self) -> Vec<ChainSnapshot> { self.chains.snapshots() }
    pub fn strategy(&self) -> &S { &self.strategy }
    pub fn strategy_mut(&mut self) -> &mut S { &mut self.strategy }
    pub fn conservation(&self) -> &ConservationLaw { &self.conservation }
}

/// Log an event and hand it to every sink at the point it occurs, then keep
/// it for the tick result.
fn dispatch(sinks: &mut [Box<dyn EventSink>], tick_events: &mut Vec<SimEvent>, event: SimEvent) {
    events::log_event(&event);
    for sink in sinks.iter_mut() {
        sink.emit(&event);
    }
    tick_events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{from_fn, IdleStrategy, QueuedStrategy};

    fn queued() -> Simulation<QueuedStrategy> {
        Simulation::new(&SimulationConfig::three_chain(), QueuedStrategy::new()).unwrap()
    }

    #[test]
    fn test_tick_counter_advances() {
        let mut sim = Simulation::new(&SimulationConfig::three_chain(), IdleStrategy).unwrap();
        assert_eq!(sim.tick_core().tick, 0);
        assert_eq!(sim.tick_core().tick, 1);
        assert_eq!(sim.current_tick(), 2);
    }

    #[test]
    fn test_regeneration_before_strategy() {
        let mut observed = None;
        {
            let strategy = from_fn(|_tick: Ticks, view: &ChainsView<'_>| {
                observed = view.get("A").map(|a| a.orderflow_balance());
                Vec::new()
            });
            let mut sim = Simulation::new(&SimulationConfig::three_chain(), strategy).unwrap();
            sim.tick_core();
        }
        let seen = observed.unwrap();
        assert!((seen - 10.64).abs() < 1e-9, "strategy saw {}", seen);
    }

    #[test]
    fn test_rejections_are_emitted_not_dropped() {
        let mut sim = queued();
        sim.strategy_mut().submit(Action::bridge("A", "A", 1.0));
        sim.strategy_mut().submit(Action::bridge("A", "B", 2.0));
        let result = sim.tick_core();
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.applied_count(), 1);
        let codes: Vec<&str> = result.rejections().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["same_chain"]);
    }

    #[test]
    fn test_sinks_observe_events() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let log = Rc::new(RefCell::new(Vec::new()));
        let captured = Rc::clone(&log);
        let mut sim = queued().with_sink(move |e: &SimEvent| captured.borrow_mut().push(e.clone()));
        sim.strategy_mut().submit(Action::bridge("A", "B", 2.0));
        let result = sim.tick_core();
        assert_eq!(*log.borrow(), result.events);
    }

    #[test]
    fn test_sinks_see_releases_before_strategy_runs() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let order = Rc::new(RefCell::new(Vec::new()));
        let from_strategy = Rc::clone(&order);
        let from_sink = Rc::clone(&order);

        let mut config = SimulationConfig::three_chain();
        config.chains[0].params.bridging_time = 1;
        let strategy = from_fn(move |tick: Ticks, _view: &ChainsView<'_>| {
            from_strategy.borrow_mut().push(format!("strategy {}", tick));
            if tick == 0 {
                vec![Action::bridge("A", "B", 2.0)]
            } else {
                Vec::new()
            }
        });
        let mut sim = Simulation::new(&config, strategy)
            .unwrap()
            .with_sink(move |e: &SimEvent| {
                let label = match e {
                    SimEvent::SettlementReleased { tick, .. } => format!("released {}", tick),
                    SimEvent::ActionProcessed { tick, .. } => format!("processed {}", tick),
                };
                from_sink.borrow_mut().push(label);
            });
        sim.tick_core();
        sim.tick_core();

        assert_eq!(
            *order.borrow(),
            vec!["strategy 0", "processed 0", "released 1", "strategy 1"]
        );
    }

    #[test]
    fn test_report_totals_balance_and_locked() {
        let mut sim = queued();
        sim.strategy_mut().submit(Action::bridge("A", "B", 2.0));
        sim.tick_core();
        let report = sim.report();
        assert_eq!(report.tick, 1);
        assert!((report.total - 9.9999).abs() < 1e-9);
        let b = report.chains.iter().find(|c| c.name == "B").unwrap();
        assert!((b.locked - 1.9999).abs() < 1e-9);
    }

    #[test]
    fn test_run_summary_counts() {
        let mut sim = queued();
        sim.strategy_mut().submit(Action::bridge("A", "B", 2.0));
        sim.strategy_mut().submit(Action::bridge("A", "B", 0.00005));
        let summary = sim.run(10);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.applied_count, 1);
        assert_eq!(summary.rejected_count, 1);
        assert_eq!(summary.release_count, 1);
        assert_eq!(summary.rejections_by_reason.get("below_gas_cost"), Some(&1));
        assert_eq!(summary.conservation_violations, 0);
        assert!((summary.pnl() + 0.0001).abs() < 1e-9);
    }
}
