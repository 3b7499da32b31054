//! # Domain Types
//!
//! Core domain types used throughout Divvy.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Participant    │   │  ExpenseRecord  │   │  PaymentRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  display_name   │   │  payer_id       │   │  from_id        │       │
//! │  └─────────────────┘   │  total_minor    │   │  to_id          │       │
//! │                        │  allocations    │   │  amount_minor   │       │
//! │  ┌─────────────────┐   └─────────────────┘   └─────────────────┘       │
//! │  │     Group       │                                                   │
//! │  │  ─────────────  │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  id (UUID)      │   │   VoidRecord    │   │   LedgerEntry   │       │
//! │  │  member_ids     │   │  ─────────────  │   │  ─────────────  │       │
//! │  └─────────────────┘   │  voids_id       │   │  Expense        │       │
//! │                        └─────────────────┘   │  Payment        │       │
//! │  ┌─────────────────┐                         │  Void           │       │
//! │  │   Percentage    │                         └─────────────────┘       │
//! │  │  bps (u32)      │                                                   │
//! │  │  2500 = 25%     │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability
//! Expense and payment records never mutate after creation. Corrections are
//! modeled as a void marker plus a new record, preserving the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::{Currency, Money};

/// Opaque participant identifier (UUID v4 string).
pub type ParticipantId = String;

/// Opaque group identifier (UUID v4 string).
pub type GroupId = String;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2500 bps = 25%. Percentage splits therefore stay exact rationals and the
/// "must sum to 100%" check is integer equality with no epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

/// Basis points in a whole (100%).
pub const PERCENT_SCALE_BPS: u32 = 10_000;

impl Percentage {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a percentage from whole percent (25 => 25%).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        Percentage(pct * 100)
    }

    /// Returns the value in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

// =============================================================================
// Participant
// =============================================================================

/// A person eligible to take part in splits.
///
/// Immutable once created and never deleted: historical ledger entries keep
/// referencing a participant even after they leave every group.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Participant {
    /// Unique identifier (UUID v4).
    pub id: ParticipantId,

    /// Name shown in balances, activity feed, and split forms.
    pub display_name: String,

    /// When the participant was registered.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Registers a new participant with a generated id.
    pub fn new(display_name: impl Into<String>) -> Self {
        Participant {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Group
// =============================================================================

/// A named circle of participants (trip, flat, team lunch).
///
/// ## Membership Snapshot
/// An expense scoped to a group must draw its split participants from the
/// members at creation time. Removing a member later never retroactively
/// invalidates historical records.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Current members. Non-empty for an active group.
    pub member_ids: Vec<ParticipantId>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a group with a generated id.
    pub fn new(name: impl Into<String>, member_ids: Vec<ParticipantId>) -> Self {
        Group {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            member_ids,
            created_at: Utc::now(),
        }
    }

    /// Checks current membership.
    pub fn is_member(&self, participant_id: &str) -> bool {
        self.member_ids.iter().any(|m| m == participant_id)
    }
}

// =============================================================================
// Split Method
// =============================================================================

/// How an expense total was divided (the split-options selector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Even shares for every included participant.
    Equal,
    /// Caller supplied one exact amount per participant.
    Exact,
    /// Caller supplied one percentage per participant.
    Percentage,
    /// Caller supplied integer share counts per participant.
    Shares,
}

// =============================================================================
// Allocation Line
// =============================================================================

/// One participant's share of one expense.
///
/// The currency lives on the owning [`ExpenseRecord`]; every line of an
/// expense is in the expense's currency by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AllocationLine {
    pub participant_id: ParticipantId,
    /// Share owed, in minor units. Zero-weight participants keep an
    /// explicit zero line so balance folds always see the full set.
    pub owed_minor: i64,
}

// =============================================================================
// Expense Record
// =============================================================================

/// A committed expense: who paid, how much, and how it was divided.
///
/// Immutable once appended to the ledger. Corrections are a void marker plus
/// a new record, never an in-place edit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Group scope, if the expense belongs to one.
    pub group_id: Option<GroupId>,

    /// Who fronted the money.
    pub payer_id: ParticipantId,

    /// Total in minor units.
    pub total_minor: i64,

    /// Currency of the total and of every allocation line.
    pub currency: Currency,

    /// Which split method produced the allocations.
    pub split_method: SplitMethod,

    /// Per-participant shares. Invariant: sums exactly to `total_minor`.
    pub allocations: Vec<AllocationLine>,

    /// Free-form note shown in the activity feed.
    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total_minor, self.currency)
    }

    /// Returns one allocation line's share as Money.
    #[inline]
    pub fn owed(&self, line: &AllocationLine) -> Money {
        Money::from_minor(line.owed_minor, self.currency)
    }
}

// =============================================================================
// Payment Record
// =============================================================================

/// A direct settlement between two participants.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Group scope, if the payment settles group debt.
    pub group_id: Option<GroupId>,

    /// Who paid.
    pub from_id: ParticipantId,

    /// Who received.
    pub to_id: ParticipantId,

    /// Amount in minor units. Always positive.
    pub amount_minor: i64,

    pub currency: Currency,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount_minor, self.currency)
    }
}

// =============================================================================
// Void Record
// =============================================================================

/// An append-only marker that reverses a prior entry.
///
/// Deletion is never physical: the referenced record stays in the ledger and
/// the balance fold applies it once more with inverted sign.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoidRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The expense or payment this marker reverses.
    pub voids_id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// The unit of ledger storage: an expense, a payment, or a void marker.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEntry {
    Expense(ExpenseRecord),
    Payment(PaymentRecord),
    Void(VoidRecord),
}

impl LedgerEntry {
    /// The entry's own id.
    pub fn id(&self) -> &str {
        match self {
            LedgerEntry::Expense(e) => &e.id,
            LedgerEntry::Payment(p) => &p.id,
            LedgerEntry::Void(v) => &v.id,
        }
    }

    /// Group scope, if any. Void markers inherit the scope of the entry
    /// they reverse, so they carry none of their own.
    pub fn group_id(&self) -> Option<&str> {
        match self {
            LedgerEntry::Expense(e) => e.group_id.as_deref(),
            LedgerEntry::Payment(p) => p.group_id.as_deref(),
            LedgerEntry::Void(_) => None,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEntry::Expense(e) => e.created_at,
            LedgerEntry::Payment(p) => p.created_at,
            LedgerEntry::Void(v) => v.created_at,
        }
    }

    /// Storage tag for persistence ("expense" / "payment" / "void").
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEntry::Expense(_) => "expense",
            LedgerEntry::Payment(_) => "payment",
            LedgerEntry::Void(_) => "void",
        }
    }
}

// =============================================================================
// Suggested Payment
// =============================================================================

/// One transfer in a settlement plan.
///
/// A suggestion only: nothing changes until the user confirms and a
/// [`PaymentRecord`] is appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SuggestedPayment {
    pub from_id: ParticipantId,
    pub to_id: ParticipantId,
    /// Amount in minor units. Always positive.
    pub amount_minor: i64,
    pub currency: Currency,
}

impl SuggestedPayment {
    /// Returns the suggested amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount_minor, self.currency)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_from_bps() {
        let pct = Percentage::from_bps(2500);
        assert_eq!(pct.bps(), 2500);
        assert_eq!(Percentage::from_percent(25), pct);
        assert!(Percentage::zero().is_zero());
    }

    #[test]
    fn test_group_membership() {
        let a = Participant::new("Aditi");
        let b = Participant::new("Ben");
        let group = Group::new("Goa Trip", vec![a.id.clone(), b.id.clone()]);

        assert!(group.is_member(&a.id));
        assert!(group.is_member(&b.id));
        assert!(!group.is_member("someone-else"));
    }

    #[test]
    fn test_ledger_entry_accessors() {
        let payment = PaymentRecord {
            id: "p1".to_string(),
            group_id: Some("g1".to_string()),
            from_id: "a".to_string(),
            to_id: "b".to_string(),
            amount_minor: 500,
            currency: Currency::Inr,
            created_at: Utc::now(),
        };
        let entry = LedgerEntry::Payment(payment);

        assert_eq!(entry.id(), "p1");
        assert_eq!(entry.group_id(), Some("g1"));
        assert_eq!(entry.kind(), "payment");
    }

    #[test]
    fn test_entry_serde_round_trip() {
        let void = LedgerEntry::Void(VoidRecord {
            id: "v1".to_string(),
            voids_id: "e1".to_string(),
            created_at: Utc::now(),
        });

        let json = serde_json::to_string(&void).unwrap();
        assert!(json.contains("\"kind\":\"void\""));

        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), "v1");
    }
}
