//! # Expense Ledger
//!
//! Append-only collection of expense and payment records; the source of
//! truth for every balance computation.
//!
//! ## Ledger Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ledger Operations                                  │
//! │                                                                         │
//! │  append(entry) ──► validate FIRST, then push (no partial state)        │
//! │  void(id)      ──► appends a VoidRecord, never deletes                 │
//! │  entries()     ──► ordered iteration, full audit trail                 │
//! │                                                                         │
//! │  NEVER: reorder, edit in place, or physically remove an entry          │
//! │                                                                         │
//! │  Expense lifecycle: Draft ──► Committed (append) ──► [Voided]          │
//! │  Committed and Voided are terminal; a correction is a NEW record       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! `Ledger` itself is single-threaded. [`LedgerState`] wraps it in
//! `Arc<Mutex<_>>` so appends and voids serialize against each other while
//! readers take a consistent snapshot: an entry is observed fully or not at
//! all, and id assignment can never race.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{LedgerEntry, ParticipantId, PaymentRecord, VoidRecord};
use crate::money::Money;
use crate::validation::{validate_participants, validate_positive_amount};

// =============================================================================
// Payment Construction
// =============================================================================

impl PaymentRecord {
    /// Builds a direct settlement record.
    ///
    /// This is the step that materializes a settlement suggestion: the
    /// suggestion itself never touches the ledger, only a confirmed payment
    /// does.
    ///
    /// ## Errors
    /// - `Validation(MustBePositive)` for a zero or negative amount
    /// - `Validation(SelfPayment)` when payer and payee match
    pub fn new(
        group_id: Option<String>,
        from_id: impl Into<ParticipantId>,
        to_id: impl Into<ParticipantId>,
        amount: Money,
    ) -> CoreResult<PaymentRecord> {
        let from_id = from_id.into();
        let to_id = to_id.into();

        validate_positive_amount(amount, "amount")?;
        if from_id == to_id {
            return Err(ValidationError::SelfPayment.into());
        }

        Ok(PaymentRecord {
            id: Uuid::new_v4().to_string(),
            group_id,
            from_id,
            to_id,
            amount_minor: amount.minor_units(),
            currency: amount.currency(),
            created_at: Utc::now(),
        })
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Append-only, in-memory ledger with an id index.
///
/// Persistence is an external collaborator (divvy-db): a ledger is seeded
/// from the collaborator's `load()` and every successful append is handed to
/// its `save()` by the caller. The ledger never assumes durability it was
/// not told about.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    /// id -> position, for O(1) duplicate checks and void lookups.
    index: HashMap<String, usize>,
    /// ids referenced by an appended void marker.
    voided: HashSet<String>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Rebuilds a ledger from persisted entries, in insertion order.
    ///
    /// Every entry passes the same validation as a live append, so a
    /// corrupted store surfaces loudly instead of producing wrong balances.
    pub fn seed(entries: Vec<LedgerEntry>) -> CoreResult<Ledger> {
        let mut ledger = Ledger::new();
        for entry in entries {
            ledger.append(entry)?;
        }
        Ok(ledger)
    }

    /// Appends a validated entry.
    ///
    /// Validation happens entirely before the push: on any error the ledger
    /// is exactly as it was, with no partial-write state.
    ///
    /// ## Errors
    /// - `DuplicateRecordId` if the id is already present
    /// - `AllocationMismatch` if an expense's lines don't sum to its total
    /// - `VoidTargetNotFound` / `AlreadyVoided` / `CannotVoidAVoid` for bad
    ///   void markers
    /// - `Validation` for malformed amounts or participant sets
    pub fn append(&mut self, entry: LedgerEntry) -> CoreResult<()> {
        self.validate(&entry)?;

        if let LedgerEntry::Void(ref v) = entry {
            self.voided.insert(v.voids_id.clone());
        }
        self.index.insert(entry.id().to_string(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Appends a void marker for an existing entry and returns its id.
    ///
    /// Voided is terminal: the target can never be un-voided, and a void
    /// marker itself can never be voided.
    pub fn void(&mut self, target_id: &str) -> CoreResult<String> {
        let marker = LedgerEntry::Void(VoidRecord {
            id: Uuid::new_v4().to_string(),
            voids_id: target_id.to_string(),
            created_at: Utc::now(),
        });
        let id = marker.id().to_string();
        self.append(marker)?;
        Ok(id)
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&LedgerEntry> {
        self.index.get(id).map(|pos| &self.entries[*pos])
    }

    /// Whether the given entry has been voided.
    pub fn is_voided(&self, id: &str) -> bool {
        self.voided.contains(id)
    }

    /// All entries in append order.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// Entries for a balance view.
    ///
    /// `None` is the global view and yields every entry; `Some(group)`
    /// yields one group's entries. Void markers carry no scope of their
    /// own; they follow the entry they reverse.
    pub fn entries_for<'a>(
        &'a self,
        group_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a LedgerEntry> {
        self.entries.iter().filter(move |entry| match group_id {
            None => true,
            Some(_) => match entry {
                LedgerEntry::Void(v) => self
                    .get(&v.voids_id)
                    .map(|target| target.group_id() == group_id)
                    .unwrap_or(false),
                other => other.group_id() == group_id,
            },
        })
    }

    /// Entries outside any group (personal expenses and payments), with
    /// their void markers.
    pub fn entries_ungrouped(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(|entry| match entry {
            LedgerEntry::Void(v) => self
                .get(&v.voids_id)
                .map(|target| target.group_id().is_none())
                .unwrap_or(false),
            other => other.group_id().is_none(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    fn validate(&self, entry: &LedgerEntry) -> CoreResult<()> {
        if entry.id().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }
        if self.index.contains_key(entry.id()) {
            return Err(CoreError::DuplicateRecordId(entry.id().to_string()));
        }

        match entry {
            LedgerEntry::Expense(expense) => {
                validate_positive_amount(expense.total(), "total")?;

                let participants: Vec<ParticipantId> = expense
                    .allocations
                    .iter()
                    .map(|l| l.participant_id.clone())
                    .collect();
                validate_participants(&participants)?;

                let sum: i128 = expense
                    .allocations
                    .iter()
                    .map(|l| l.owed_minor as i128)
                    .sum();
                if sum != expense.total_minor as i128 {
                    return Err(CoreError::AllocationMismatch {
                        expected_minor: expense.total_minor as i128,
                        actual_minor: sum,
                    });
                }
            }

            LedgerEntry::Payment(payment) => {
                validate_positive_amount(payment.amount(), "amount")?;
                if payment.from_id == payment.to_id {
                    return Err(ValidationError::SelfPayment.into());
                }
            }

            LedgerEntry::Void(void) => {
                match self.get(&void.voids_id) {
                    None => {
                        return Err(CoreError::VoidTargetNotFound(void.voids_id.clone()));
                    }
                    Some(LedgerEntry::Void(_)) => {
                        return Err(CoreError::CannotVoidAVoid(void.voids_id.clone()));
                    }
                    Some(_) => {}
                }
                if self.voided.contains(&void.voids_id) {
                    return Err(CoreError::AlreadyVoided(void.voids_id.clone()));
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Shared Ledger State
// =============================================================================

/// Thread-safe ledger handle.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Ledger>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Serializes appends/voids; two concurrent appends can never
///   both pass the duplicate-id check
///
/// ## Why Not RwLock?
/// Balance folds are quick single-pass reads and appends are frequent.
/// Single-writer-multiple-reader via short critical sections keeps the
/// atomicity story simple: a reader sees an entry fully or not at all.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    ledger: Arc<Mutex<Ledger>>,
}

impl LedgerState {
    /// Creates an empty shared ledger.
    pub fn new() -> Self {
        LedgerState::default()
    }

    /// Wraps an already-seeded ledger.
    pub fn from_ledger(ledger: Ledger) -> Self {
        LedgerState {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Executes a function with read access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let balances = state.with_ledger(|l| net_balances(l, None))?;
    /// ```
    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger) -> R,
    {
        let ledger = self.ledger.lock().expect("Ledger mutex poisoned");
        f(&ledger)
    }

    /// Executes a function with write access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_ledger_mut(|l| l.append(entry))?;
    /// ```
    pub fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let mut ledger = self.ledger.lock().expect("Ledger mutex poisoned");
        f(&mut ledger)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use crate::split::SplitPolicy;
    use crate::types::ExpenseRecord;

    fn inr(minor: i64) -> Money {
        Money::from_minor(minor, Currency::Inr)
    }

    fn dinner(payer: &str, others: &[&str]) -> ExpenseRecord {
        let mut participants = vec![payer.to_string()];
        participants.extend(others.iter().map(|s| s.to_string()));
        ExpenseRecord::new(
            None,
            payer.to_string(),
            inr(900),
            &SplitPolicy::Equal,
            &participants,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_append_and_lookup() {
        let mut ledger = Ledger::new();
        let expense = dinner("a", &["b", "c"]);
        let id = expense.id.clone();

        ledger.append(LedgerEntry::Expense(expense)).unwrap();

        assert_eq!(ledger.len(), 1);
        assert!(ledger.get(&id).is_some());
        assert!(!ledger.is_voided(&id));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut ledger = Ledger::new();
        let expense = dinner("a", &["b"]);

        ledger.append(LedgerEntry::Expense(expense.clone())).unwrap();
        let err = ledger.append(LedgerEntry::Expense(expense)).unwrap_err();

        assert!(matches!(err, CoreError::DuplicateRecordId(_)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_failed_append_leaves_no_partial_state() {
        let mut ledger = Ledger::new();
        let mut expense = dinner("a", &["b"]);
        // Corrupt the allocation sum
        expense.allocations[0].owed_minor += 1;

        assert!(matches!(
            ledger.append(LedgerEntry::Expense(expense)).unwrap_err(),
            CoreError::AllocationMismatch { .. }
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_void_marks_not_deletes() {
        let mut ledger = Ledger::new();
        let expense = dinner("a", &["b"]);
        let id = expense.id.clone();
        ledger.append(LedgerEntry::Expense(expense)).unwrap();

        let void_id = ledger.void(&id).unwrap();

        // Both the record and the marker stay in the ledger
        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_voided(&id));
        assert!(ledger.get(&id).is_some());
        assert!(ledger.get(&void_id).is_some());
    }

    #[test]
    fn test_double_void_rejected() {
        let mut ledger = Ledger::new();
        let expense = dinner("a", &["b"]);
        let id = expense.id.clone();
        ledger.append(LedgerEntry::Expense(expense)).unwrap();

        ledger.void(&id).unwrap();
        assert!(matches!(
            ledger.void(&id).unwrap_err(),
            CoreError::AlreadyVoided(_)
        ));
    }

    #[test]
    fn test_void_of_void_rejected() {
        let mut ledger = Ledger::new();
        let expense = dinner("a", &["b"]);
        let id = expense.id.clone();
        ledger.append(LedgerEntry::Expense(expense)).unwrap();

        let void_id = ledger.void(&id).unwrap();
        assert!(matches!(
            ledger.void(&void_id).unwrap_err(),
            CoreError::CannotVoidAVoid(_)
        ));
    }

    #[test]
    fn test_void_unknown_target_rejected() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.void("nope").unwrap_err(),
            CoreError::VoidTargetNotFound(_)
        ));
    }

    #[test]
    fn test_group_scoped_iteration() {
        let mut ledger = Ledger::new();

        let grouped = ExpenseRecord::new(
            Some("trip".to_string()),
            "a".to_string(),
            inr(900),
            &SplitPolicy::Equal,
            &["a".to_string(), "b".to_string()],
            None,
        )
        .unwrap();
        let grouped_id = grouped.id.clone();
        ledger.append(LedgerEntry::Expense(grouped)).unwrap();
        ledger
            .append(LedgerEntry::Expense(dinner("a", &["b"])))
            .unwrap();
        ledger.void(&grouped_id).unwrap();

        // Group scope sees the expense and its void marker
        assert_eq!(ledger.entries_for(Some("trip")).count(), 2);
        // The global view sees everything
        assert_eq!(ledger.entries_for(None).count(), 3);
        // The personal filter sees only the standalone dinner
        assert_eq!(ledger.entries_ungrouped().count(), 1);
    }

    #[test]
    fn test_payment_validation() {
        assert!(PaymentRecord::new(None, "a", "a", inr(100)).is_err());
        assert!(PaymentRecord::new(None, "a", "b", inr(0)).is_err());
        assert!(PaymentRecord::new(None, "a", "b", inr(-5)).is_err());
        assert!(PaymentRecord::new(None, "a", "b", inr(100)).is_ok());
    }

    #[test]
    fn test_seed_replays_validation() {
        let expense = dinner("a", &["b"]);
        let entries = vec![
            LedgerEntry::Expense(expense.clone()),
            LedgerEntry::Expense(expense),
        ];
        assert!(matches!(
            Ledger::seed(entries).unwrap_err(),
            CoreError::DuplicateRecordId(_)
        ));
    }

    #[test]
    fn test_shared_state_serializes_appends() {
        let state = LedgerState::new();
        let expense = dinner("a", &["b"]);
        let id = expense.id.clone();

        state
            .with_ledger_mut(|l| l.append(LedgerEntry::Expense(expense)))
            .unwrap();

        let seen = state.with_ledger(|l| l.get(&id).is_some());
        assert!(seen);
    }
}
