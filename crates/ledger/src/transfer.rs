use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coinwave_core::{DomainError, DomainResult, TransactionId};

use crate::account::PartySnapshot;

/// Transfers above this amount incur the flat service fee.
pub const FEE_THRESHOLD: u64 = 100;

/// Flat service fee, in the smallest currency unit.
pub const TRANSFER_FEE: u64 = 5;

/// Fee assessed on a peer transfer of `amount`.
pub fn fee_for(amount: u64) -> u64 {
    if amount > FEE_THRESHOLD {
        TRANSFER_FEE
    } else {
        0
    }
}

/// Validate a transfer amount before any balance is touched.
pub fn validate_amount(amount: u64) -> DomainResult<()> {
    if amount == 0 {
        return Err(DomainError::validation("amount must be positive"));
    }
    Ok(())
}

/// Immutable log entry for a committed peer transfer (append-only, never
/// updated or deleted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub transaction_id: TransactionId,
    pub sender: PartySnapshot,
    pub receiver: PartySnapshot,
    /// Amount moved, excluding the fee.
    pub amount: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Log entry for a service charge, referencing the transfer that incurred it.
/// Written only when the fee is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub transaction_id: TransactionId,
    pub fee: u64,
    pub payer: PartySnapshot,
    pub occurred_at: DateTime<Utc>,
}
