use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::kind::EntityKind;
use crate::temporal::Timestamp;

// ---------------------------------------------------------------------------
// Donator
// ---------------------------------------------------------------------------

/// One donation made by a donator. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonatorRecord {
    pub donator: String,
    pub project: String,
    pub amount: u64,
    /// Position within the donator's record sequence, starting at 0.
    pub sequence_index: u64,
    pub timestamp: Timestamp,
}

/// A donor and its full donation history.
///
/// `total_donated` and `donation_count` are aggregates over `records`; they
/// are kept alongside the history so a single stored value carries both and
/// a donation is one read-modify-write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donator {
    pub name: String,
    pub registered_at: Timestamp,
    pub total_donated: u64,
    pub donation_count: u64,
    pub records: Vec<DonatorRecord>,
}

impl Donator {
    /// A donator with no history.
    pub fn new(name: impl Into<String>, registered_at: Timestamp) -> Self {
        Self {
            name: name.into(),
            registered_at,
            total_donated: 0,
            donation_count: 0,
            records: Vec::new(),
        }
    }

    /// Sequence index the next record will receive.
    pub fn next_sequence_index(&self) -> u64 {
        self.records.len() as u64
    }

    /// Append a donation and update the aggregates.
    ///
    /// Nothing is modified if the amount is zero or the total would
    /// overflow.
    pub fn donate(
        &mut self,
        project: impl Into<String>,
        amount: u64,
        timestamp: Timestamp,
    ) -> Result<&DonatorRecord, TypeError> {
        if amount == 0 {
            return Err(TypeError::ZeroAmount);
        }
        let total = self
            .total_donated
            .checked_add(amount)
            .ok_or(TypeError::Overflow {
                field: "total_donated",
                current: self.total_donated,
                amount,
            })?;

        let record = DonatorRecord {
            donator: self.name.clone(),
            project: project.into(),
            amount,
            sequence_index: self.next_sequence_index(),
            timestamp,
        };
        self.total_donated = total;
        self.donation_count += 1;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Verify the aggregates agree with the record history.
    pub fn check_invariants(&self) -> Result<(), TypeError> {
        let violation = |reason: String| TypeError::InvariantViolation {
            kind: EntityKind::Donator,
            name: self.name.clone(),
            reason,
        };

        if self.donation_count != self.records.len() as u64 {
            return Err(violation(format!(
                "donation_count {} but {} records",
                self.donation_count,
                self.records.len()
            )));
        }

        let mut sum: u64 = 0;
        for (i, record) in self.records.iter().enumerate() {
            if record.sequence_index != i as u64 {
                return Err(violation(format!(
                    "record {i} has sequence_index {}",
                    record.sequence_index
                )));
            }
            if record.donator != self.name {
                return Err(violation(format!(
                    "record {i} belongs to {}",
                    record.donator
                )));
            }
            if record.amount == 0 {
                return Err(violation(format!("record {i} has zero amount")));
            }
            sum = sum
                .checked_add(record.amount)
                .ok_or_else(|| violation("record amounts overflow".into()))?;
        }

        if sum != self.total_donated {
            return Err(violation(format!(
                "total_donated {} but records sum to {sum}",
                self.total_donated
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Receiver
// ---------------------------------------------------------------------------

/// A profit recipient. Its balance only grows, through assignments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: String,
    pub registered_at: Timestamp,
    pub balance: u64,
    /// Project of the most recent assignment, `None` until the first one.
    pub last_project: Option<String>,
}

impl Receiver {
    pub fn new(name: impl Into<String>, registered_at: Timestamp) -> Self {
        Self {
            name: name.into(),
            registered_at,
            balance: 0,
            last_project: None,
        }
    }

    /// Credit an assignment from `project`. A zero amount only moves
    /// `last_project`.
    pub fn credit(&mut self, project: impl Into<String>, amount: u64) -> Result<u64, TypeError> {
        let balance = self.balance.checked_add(amount).ok_or(TypeError::Overflow {
            field: "balance",
            current: self.balance,
            amount,
        })?;
        self.balance = balance;
        self.last_project = Some(project.into());
        Ok(balance)
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A named cause. Donations and assignments reference projects by name only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub registered_at: Timestamp,
}

impl Project {
    pub fn new(name: impl Into<String>, registered_at: Timestamp) -> Self {
        Self {
            name: name.into(),
            registered_at,
        }
    }
}
