// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Liquidity Arena - Locked-Settlement Ledger
//
// Funds earned by an accepted action land on the destination chain as a
// locked settlement and only become spendable once their countdown expires.

use serde::{Deserialize, Serialize};

use crate::types::{Amount, Ticks};

/// One pending credit awaiting release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockedSettlement {
    pub amount: Amount,
    pub remaining_ticks: Ticks,
}

/// Ordered queue of locked settlements for a single chain.
///
/// Entries are independent: two settlements with different countdowns are
/// never coalesced, and releases come out in enqueue order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementLedger {
    entries: Vec<LockedSettlement>,
}

impl SettlementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, amount: Amount, lock_ticks: Ticks) {
        self.entries.push(LockedSettlement {
            amount,
            remaining_ticks: lock_ticks,
        });
    }

    /// Decrement every countdown by one (floored at zero) and remove the
    /// entries that reach zero. Returns the released amounts in order.
    pub fn age(&mut self) -> Vec<Amount> {
        let mut released = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining_ticks = entry.remaining_ticks.saturating_sub(1);
            if entry.remaining_ticks == 0 {
                released.push(entry.amount);
                false
            } else {
                true
            }
        });
        released
    }

    pub fn locked_total(&self) -> Amount {
        self.entries.iter().map(|e| e.amount).sum()
    }

    pub fn entries(&self) -> &[LockedSettlement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_after_countdown() {
        let mut ledger = SettlementLedger::new();
        ledger.enqueue(1.9999, 4);
        assert!(ledger.age().is_empty());
        assert!(ledger.age().is_empty());
        assert!(ledger.age().is_empty());
        let released = ledger.age();
        assert_eq!(released, vec![1.9999]);
        assert!(ledger.is_empty());
        // Nothing left to release twice
        assert!(ledger.age().is_empty());
    }

    #[test]
    fn test_zero_countdown_releases_on_next_age() {
        let mut ledger = SettlementLedger::new();
        ledger.enqueue(3.0, 0);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.age(), vec![3.0]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_entries_not_coalesced() {
        let mut ledger = SettlementLedger::new();
        ledger.enqueue(1.0, 2);
        ledger.enqueue(2.0, 1);
        ledger.enqueue(4.0, 2);
        assert_eq!(ledger.len(), 3);
        assert!((ledger.locked_total() - 7.0).abs() < f64::EPSILON);

        assert_eq!(ledger.age(), vec![2.0]);
        assert_eq!(ledger.entries()[0].remaining_ticks, 1);
        assert_eq!(ledger.age(), vec![1.0, 4.0]);
        assert_eq!(ledger.locked_total(), 0.0);
    }
}
