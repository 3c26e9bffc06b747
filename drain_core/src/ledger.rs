//! The consumption ledger: ordered usage records plus their running total.

use crate::record::UsageRecord;
use crate::store::LedgerStore;
use crate::units::{parse_measurement, MilliampHours};
use crate::{Error, Result};

/// Result of a successful [`Ledger::add_record`]
#[derive(Clone, Debug, PartialEq)]
pub struct AddOutcome {
    pub record: UsageRecord,
    /// Running total after the add
    pub total: MilliampHours,
    /// Set when the running total is now above the battery capacity
    pub capacity_exceeded: bool,
}

/// Ledger of device draws, persisted through a [`LedgerStore`].
///
/// Every mutation is written through to the store before it returns.
pub struct Ledger<S: LedgerStore> {
    store: S,
    records: Vec<UsageRecord>,
    total: MilliampHours,
    capacity: MilliampHours,
}

impl<S: LedgerStore> Ledger<S> {
    /// Rehydrate a ledger from `store`. The total is recomputed from the records.
    pub fn open(store: S, capacity: MilliampHours) -> Result<Self> {
        let records = store.load()?;
        let total: MilliampHours = records.iter().map(|r| r.consumption).sum();
        tracing::debug!(
            "Opened ledger with {} records, total {:.6}",
            records.len(),
            total
        );

        Ok(Self {
            store,
            records,
            total,
            capacity,
        })
    }

    /// Log one device draw from raw user input.
    ///
    /// Invalid numbers abort before anything changes. If the store cannot
    /// be written the record is dropped again and the error returned.
    pub fn add_record(
        &mut self,
        name: &str,
        current_microamps: &str,
        duration_seconds: &str,
    ) -> Result<AddOutcome> {
        let current = parse_measurement("current", current_microamps)?;
        let duration = parse_measurement("duration", duration_seconds)?;
        let record = UsageRecord::new(name, current, duration);

        // Large but finite inputs can still overflow to inf
        if !record.consumption.0.is_finite() {
            return Err(Error::OutOfRange {
                field: "consumption",
                value: record.consumption.0,
            });
        }
        let new_total = self.total + record.consumption;
        if !new_total.0.is_finite() {
            return Err(Error::OutOfRange {
                field: "total",
                value: new_total.0,
            });
        }

        let previous_total = self.total;
        self.records.push(record.clone());
        self.total = new_total;

        if let Err(e) = self.store.save(&self.records) {
            self.records.pop();
            self.total = previous_total;
            return Err(e);
        }

        let capacity_exceeded = self.is_over_capacity();
        if capacity_exceeded {
            tracing::warn!(
                "Battery capacity exceeded: {:.2} of {:.2}",
                self.total,
                self.capacity
            );
        }

        Ok(AddOutcome {
            record,
            total: self.total,
            capacity_exceeded,
        })
    }

    /// Delete the backing data, then drop every record.
    ///
    /// If the delete fails the in-memory ledger is left as it was.
    pub fn reset(&mut self) -> Result<()> {
        self.store.delete()?;
        self.records.clear();
        self.total = MilliampHours::ZERO;
        tracing::info!("Ledger reset");
        Ok(())
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    pub fn total(&self) -> MilliampHours {
        self.total
    }

    pub fn capacity(&self) -> MilliampHours {
        self.capacity
    }

    /// Capacity left; negative once exceeded
    pub fn remaining(&self) -> MilliampHours {
        MilliampHours(self.capacity.0 - self.total.0)
    }

    /// Fraction of capacity consumed (can be above 1.0)
    pub fn usage_ratio(&self) -> f64 {
        self.total.0 / self.capacity.0
    }

    pub fn is_over_capacity(&self) -> bool {
        self.total > self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
