//! # Balance Engine
//!
//! Derives net and pairwise balances from the ledger. Balances are NEVER
//! stored: every view is recomputed from the full entry sequence, so the
//! displayed numbers can never drift from the audit trail.
//!
//! ## The Fold
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Single-Pass Balance Fold                               │
//! │                                                                         │
//! │  ExpenseRecord:   payer   += total                                     │
//! │                   each allocation participant -= owed                  │
//! │                   (a payer who is also in the split nets against       │
//! │                    themself automatically, no special-casing)          │
//! │                                                                         │
//! │  PaymentRecord:   from += amount   (they fronted cash)                 │
//! │                   to   -= amount   (their claim shrank)                │
//! │                                                                         │
//! │  VoidRecord:      re-apply the referenced entry with sign -1           │
//! │                                                                         │
//! │  Deterministic and idempotent: the same ledger prefix always folds     │
//! │  to the same balances.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sign convention: positive net = is owed overall, negative = owes overall.
//!
//! ## Currencies
//! A fold only has meaning within one currency. The unscoped functions fail
//! with `CurrencyMismatch` when a scope mixes currencies; the `_in` variants
//! filter to one currency for multi-currency ledgers.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::money::{Currency, Money};
use crate::types::{LedgerEntry, ParticipantId};

// =============================================================================
// Net Balances
// =============================================================================

/// Computes each participant's overall net balance for a scope.
///
/// `scope: None` is the global view and folds every entry in the ledger,
/// group-scoped or not; `Some(group)` folds one group. Positive = is owed
/// overall, negative = owes overall. Participants that appear only through
/// explicit zero allocation lines are present with a zero balance.
///
/// ## Errors
/// `CurrencyMismatch` when the scope mixes currencies. Use
/// [`net_balances_in`] to fold one currency of a mixed ledger.
pub fn net_balances(
    ledger: &Ledger,
    scope: Option<&str>,
) -> CoreResult<HashMap<ParticipantId, Money>> {
    fold_net(ledger, scope, None)
}

/// Computes net balances for one currency, ignoring entries in others.
pub fn net_balances_in(
    ledger: &Ledger,
    scope: Option<&str>,
    currency: Currency,
) -> CoreResult<HashMap<ParticipantId, Money>> {
    fold_net(ledger, scope, Some(currency))
}

fn fold_net(
    ledger: &Ledger,
    scope: Option<&str>,
    only: Option<Currency>,
) -> CoreResult<HashMap<ParticipantId, Money>> {
    // i128 accumulators: a running total may exceed i64 mid-fold even when
    // every individual entry fits.
    let mut totals: HashMap<ParticipantId, i128> = HashMap::new();
    let mut currency: Option<Currency> = only;

    for entry in ledger.entries_for(scope) {
        apply_net(ledger, entry, 1, &mut totals, &mut currency, only.is_some())?;
    }

    let currency = currency.unwrap_or_default();
    totals
        .into_iter()
        .map(|(id, minor)| {
            let minor = i64::try_from(minor).map_err(|_| CoreError::AmountOverflow)?;
            Ok((id, Money::from_minor(minor, currency)))
        })
        .collect()
}

/// Applies one entry to the running totals with the given sign.
///
/// Void markers recurse onto their target with the sign flipped, which is
/// exactly "reverse the effect of the referenced record".
fn apply_net(
    ledger: &Ledger,
    entry: &LedgerEntry,
    sign: i128,
    totals: &mut HashMap<ParticipantId, i128>,
    currency: &mut Option<Currency>,
    filtering: bool,
) -> CoreResult<()> {
    match entry {
        LedgerEntry::Expense(expense) => {
            if !check_currency(expense.currency, currency, filtering)? {
                return Ok(());
            }
            *totals.entry(expense.payer_id.clone()).or_insert(0) +=
                sign * expense.total_minor as i128;
            for line in &expense.allocations {
                *totals.entry(line.participant_id.clone()).or_insert(0) -=
                    sign * line.owed_minor as i128;
            }
        }

        LedgerEntry::Payment(payment) => {
            if !check_currency(payment.currency, currency, filtering)? {
                return Ok(());
            }
            *totals.entry(payment.from_id.clone()).or_insert(0) +=
                sign * payment.amount_minor as i128;
            *totals.entry(payment.to_id.clone()).or_insert(0) -=
                sign * payment.amount_minor as i128;
        }

        LedgerEntry::Void(void) => {
            if let Some(target) = ledger.get(&void.voids_id) {
                apply_net(ledger, target, -sign, totals, currency, filtering)?;
            }
        }
    }
    Ok(())
}

/// Tracks the fold currency. Returns whether the entry participates.
///
/// In filtering mode off-currency entries are skipped; otherwise a second
/// currency is a hard error.
fn check_currency(
    found: Currency,
    currency: &mut Option<Currency>,
    filtering: bool,
) -> CoreResult<bool> {
    match *currency {
        None => {
            *currency = Some(found);
            Ok(true)
        }
        Some(expected) if expected == found => Ok(true),
        Some(_) if filtering => Ok(false),
        Some(expected) => Err(CoreError::CurrencyMismatch { expected, found }),
    }
}

// =============================================================================
// Pairwise Balances
// =============================================================================

/// Net debt between one pair of participants: `from_id` owes `to_id`.
///
/// Always normalized so `amount_minor` is positive; settled pairs are
/// dropped entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PairBalance {
    pub from_id: ParticipantId,
    pub to_id: ParticipantId,
    pub amount_minor: i64,
    pub currency: Currency,
}

/// Computes net pairwise debts for a scope, sorted for stable display.
///
/// ## Errors
/// `CurrencyMismatch` when the scope mixes currencies (see
/// [`pairwise_balances_in`]).
pub fn pairwise_balances(ledger: &Ledger, scope: Option<&str>) -> CoreResult<Vec<PairBalance>> {
    fold_pairwise(ledger, scope, None)
}

/// Computes pairwise debts for one currency, ignoring entries in others.
pub fn pairwise_balances_in(
    ledger: &Ledger,
    scope: Option<&str>,
    currency: Currency,
) -> CoreResult<Vec<PairBalance>> {
    fold_pairwise(ledger, scope, Some(currency))
}

fn fold_pairwise(
    ledger: &Ledger,
    scope: Option<&str>,
    only: Option<Currency>,
) -> CoreResult<Vec<PairBalance>> {
    // BTreeMap keyed on the ordered pair keeps the output deterministic.
    // Value: how much key.0 owes key.1 net (signed, i128 mid-fold).
    let mut pairs: BTreeMap<(ParticipantId, ParticipantId), i128> = BTreeMap::new();
    let mut currency: Option<Currency> = only;

    for entry in ledger.entries_for(scope) {
        apply_pairwise(ledger, entry, 1, &mut pairs, &mut currency, only.is_some())?;
    }

    let currency = currency.unwrap_or_default();
    pairs
        .into_iter()
        .filter(|(_, net)| *net != 0)
        .map(|((a, b), net)| {
            let minor = i64::try_from(net.abs()).map_err(|_| CoreError::AmountOverflow)?;
            Ok(if net > 0 {
                PairBalance {
                    from_id: a,
                    to_id: b,
                    amount_minor: minor,
                    currency,
                }
            } else {
                PairBalance {
                    from_id: b,
                    to_id: a,
                    amount_minor: minor,
                    currency,
                }
            })
        })
        .collect()
}

fn apply_pairwise(
    ledger: &Ledger,
    entry: &LedgerEntry,
    sign: i128,
    pairs: &mut BTreeMap<(ParticipantId, ParticipantId), i128>,
    currency: &mut Option<Currency>,
    filtering: bool,
) -> CoreResult<()> {
    match entry {
        LedgerEntry::Expense(expense) => {
            if !check_currency(expense.currency, currency, filtering)? {
                return Ok(());
            }
            for line in &expense.allocations {
                // The payer's own share self-cancels; everyone else owes
                // the payer their line.
                if line.participant_id != expense.payer_id {
                    add_debt(
                        pairs,
                        &line.participant_id,
                        &expense.payer_id,
                        sign * line.owed_minor as i128,
                    );
                }
            }
        }

        LedgerEntry::Payment(payment) => {
            if !check_currency(payment.currency, currency, filtering)? {
                return Ok(());
            }
            // Paying someone shrinks what you owe them.
            add_debt(
                pairs,
                &payment.from_id,
                &payment.to_id,
                -sign * payment.amount_minor as i128,
            );
        }

        LedgerEntry::Void(void) => {
            if let Some(target) = ledger.get(&void.voids_id) {
                apply_pairwise(ledger, target, -sign, pairs, currency, filtering)?;
            }
        }
    }
    Ok(())
}

/// Records "debtor owes creditor `amount` more" against the canonical
/// (lexicographically ordered) pair key.
fn add_debt(
    pairs: &mut BTreeMap<(ParticipantId, ParticipantId), i128>,
    debtor: &str,
    creditor: &str,
    amount: i128,
) {
    if debtor < creditor {
        *pairs
            .entry((debtor.to_string(), creditor.to_string()))
            .or_insert(0) += amount;
    } else {
        *pairs
            .entry((creditor.to_string(), debtor.to_string()))
            .or_insert(0) -= amount;
    }
}

// =============================================================================
// Balance Snapshot
// =============================================================================

/// A derived, display-ready view of one currency's balances.
///
/// Not persisted anywhere. Recomputed from the ledger on request, which
/// eliminates drift between stored balances and the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BalanceSnapshot {
    pub currency: Currency,
    /// Net balance per participant (positive = is owed).
    pub net: HashMap<ParticipantId, Money>,
    /// Who owes whom, normalized and sorted.
    pub pairwise: Vec<PairBalance>,
}

/// The "you owe / you get" header of the balances screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BalanceSummary {
    pub you_owe_minor: i64,
    pub you_get_minor: i64,
    pub currency: Currency,
}

impl BalanceSnapshot {
    /// Computes the snapshot for a scope and currency.
    pub fn compute(ledger: &Ledger, scope: Option<&str>, currency: Currency) -> CoreResult<Self> {
        Ok(BalanceSnapshot {
            currency,
            net: net_balances_in(ledger, scope, currency)?,
            pairwise: pairwise_balances_in(ledger, scope, currency)?,
        })
    }

    /// One participant's net balance (zero if they appear nowhere).
    pub fn net_for(&self, participant_id: &str) -> Money {
        self.net
            .get(participant_id)
            .copied()
            .unwrap_or(Money::zero(self.currency))
    }

    /// The "you owe / you get" totals for one participant.
    ///
    /// Both can be nonzero at once: you can owe one person while another
    /// owes you, which is exactly what the pairwise rows capture.
    pub fn summary_for(&self, participant_id: &str) -> BalanceSummary {
        let mut you_owe = 0;
        let mut you_get = 0;
        for pair in &self.pairwise {
            if pair.from_id == participant_id {
                you_owe += pair.amount_minor;
            } else if pair.to_id == participant_id {
                you_get += pair.amount_minor;
            }
        }
        BalanceSummary {
            you_owe_minor: you_owe,
            you_get_minor: you_get,
            currency: self.currency,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
