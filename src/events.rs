// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Event Reporting

use tracing::{debug, info};

use crate::types::{ActionOutcome, AggregateReport, SimEvent};

/// Observer for engine events, called in occurrence order.
pub trait EventSink {
    fn emit(&mut self, event: &SimEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&SimEvent),
{
    fn emit(&mut self, event: &SimEvent) {
        self(event)
    }
}

/// Log one event with structured fields. Releases and applied actions are
/// routine (`debug`); rejections are surfaced at `info`.
pub fn log_event(event: &SimEvent) {
    match event {
        SimEvent::SettlementReleased { tick, chain, amount } => {
            debug!(tick, chain = %chain, amount, "settlement released");
        }
        SimEvent::ActionProcessed {
            tick,
            kind,
            source,
            destination,
            amount,
            outcome,
        } => match outcome {
            ActionOutcome::Applied { credited, lock_ticks } => {
                debug!(
                    tick,
                    kind = %kind,
                    source = %source,
                    destination = %destination,
                    amount,
                    credited,
                    lock_ticks,
                    "action applied"
                );
            }
            ActionOutcome::Rejected { reason } => {
                info!(
                    tick,
                    kind = %kind,
                    source = %source,
                    destination = %destination,
                    amount,
                    reason = reason.code(),
                    "action rejected: {}",
                    reason
                );
            }
        },
    }
}

/// Log an aggregate report: one line per chain plus the total.
pub fn log_report(label: &str, report: &AggregateReport) {
    for chain in &report.chains {
        info!(
            tick = report.tick,
            chain = %chain.name,
            balance = chain.balance,
            locked = chain.locked,
            "{}",
            label
        );
    }
    info!(tick = report.tick, total = report.total, "{} total", label);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_receives_events() {
        let mut seen = Vec::new();
        {
            let mut sink = |e: &SimEvent| seen.push(e.tick());
            sink.emit(&SimEvent::SettlementReleased {
                tick: 7,
                chain: "A".into(),
                amount: 1.0,
            });
        }
        assert_eq!(seen, vec![7]);
    }
}
