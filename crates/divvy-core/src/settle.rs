//! # Settlement Simplifier
//!
//! Reduces a set of net balances to a minimal sequence of settling
//! transactions ("Settle up").
//!
//! ## Greedy Matching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Debt Simplification                                   │
//! │                                                                         │
//! │  net balances ──► creditors (positive)   debtors (negative)            │
//! │                        │                      │                         │
//! │                        └──────────┬───────────┘                         │
//! │                                   ▼                                     │
//! │       match largest creditor with largest debtor,                      │
//! │       settle min(magnitudes), push remainders back, repeat             │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │       SuggestedPayment sequence that zeroes every balance              │
//! │                                                                         │
//! │  A self-cancelling cycle (A→B→C→A) nets to zero everywhere and         │
//! │  produces ZERO suggestions, not three.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Read-only with respect to the ledger: a suggestion only materializes when
//! the user confirms it and a `PaymentRecord` is appended.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::money::{Currency, Money};
use crate::types::{ParticipantId, SuggestedPayment};

/// Produces the minimal settlement plan for a set of net balances.
///
/// Deterministic: ties in magnitude break on participant id, so the same
/// balances always yield the same suggestion order.
///
/// ## Errors
/// `CurrencyMismatch` if the balance map mixes currencies.
pub fn simplify(net: &HashMap<ParticipantId, Money>) -> CoreResult<Vec<SuggestedPayment>> {
    let mut currency: Option<Currency> = None;
    // Max-heaps on (magnitude, Reverse(id)): largest amount first, ties to
    // the lexicographically smallest participant.
    let mut creditors: BinaryHeap<(i64, Reverse<ParticipantId>)> = BinaryHeap::new();
    let mut debtors: BinaryHeap<(i64, Reverse<ParticipantId>)> = BinaryHeap::new();

    for (id, money) in net {
        match currency {
            None => currency = Some(money.currency()),
            Some(expected) if expected != money.currency() => {
                return Err(CoreError::CurrencyMismatch {
                    expected,
                    found: money.currency(),
                });
            }
            Some(_) => {}
        }
        let minor = money.minor_units();
        if minor > 0 {
            creditors.push((minor, Reverse(id.clone())));
        } else if minor < 0 {
            debtors.push((-minor, Reverse(id.clone())));
        }
    }

    let currency = match currency {
        Some(c) => c,
        None => return Ok(Vec::new()),
    };

    let mut suggestions = Vec::new();
    while let (Some((owed, Reverse(creditor))), Some((owes, Reverse(debtor)))) =
        (creditors.pop(), debtors.pop())
    {
        let settled = owed.min(owes);
        suggestions.push(SuggestedPayment {
            from_id: debtor.clone(),
            to_id: creditor.clone(),
            amount_minor: settled,
            currency,
        });

        // Residual minor units cannot appear here: all amounts are integers
        // already, so the remainders below eventually reach exactly zero.
        if owed > settled {
            creditors.push((owed - settled, Reverse(creditor)));
        }
        if owes > settled {
            debtors.push((owes - settled, Reverse(debtor)));
        }
    }

    Ok(suggestions)
}

/// Convenience: fold one currency of a scope and simplify the result.
pub fn settle_up(
    ledger: &Ledger,
    scope: Option<&str>,
    currency: Currency,
) -> CoreResult<Vec<SuggestedPayment>> {
    let net = crate::balance::net_balances_in(ledger, scope, currency)?;
    simplify(&net)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::net_balances;
    use crate::split::SplitPolicy;
    use crate::types::{ExpenseRecord, LedgerEntry, PaymentRecord};

    fn inr(minor: i64) -> Money {
        Money::from_minor(minor, Currency::Inr)
    }

    fn balances(entries: &[(&str, i64)]) -> HashMap<ParticipantId, Money> {
        entries
            .iter()
            .map(|(id, minor)| (id.to_string(), inr(*minor)))
            .collect()
    }

    fn equal_expense(payer: &str, participants: &[&str], total: i64) -> ExpenseRecord {
        let ids: Vec<String> = participants.iter().map(|s| s.to_string()).collect();
        ExpenseRecord::new(None, payer.to_string(), inr(total), &SplitPolicy::Equal, &ids, None)
            .unwrap()
    }

    #[test]
    fn test_single_pair() {
        let plan = simplify(&balances(&[("a", 300), ("b", -300)])).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].from_id, "b");
        assert_eq!(plan[0].to_id, "a");
        assert_eq!(plan[0].amount_minor, 300);
    }

    #[test]
    fn test_all_zero_yields_no_suggestions() {
        let plan = simplify(&balances(&[("a", 0), ("b", 0), ("c", 0)])).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_self_cancelling_cycle_yields_nothing() {
        // A owes B 100, B owes C 100, C owes A 100: every net is zero,
        // so there is nothing to settle
        let mut ledger = Ledger::new();
        ledger
            .append(LedgerEntry::Expense(equal_expense("b", &["a", "b"], 200)))
            .unwrap();
        ledger
            .append(LedgerEntry::Expense(equal_expense("c", &["b", "c"], 200)))
            .unwrap();
        ledger
            .append(LedgerEntry::Expense(equal_expense("a", &["c", "a"], 200)))
            .unwrap();

        let net = net_balances(&ledger, None).unwrap();
        assert!(net.values().all(Money::is_zero));
        assert!(simplify(&net).unwrap().is_empty());
    }

    #[test]
    fn test_fan_in_uses_one_payment_per_debtor() {
        // Two debtors, one creditor: two transfers, no more
        let plan = simplify(&balances(&[("a", 500), ("b", -300), ("c", -200)])).unwrap();
        assert_eq!(plan.len(), 2);
        // Largest debtor settles first
        assert_eq!(plan[0].from_id, "b");
        assert_eq!(plan[0].amount_minor, 300);
        assert_eq!(plan[1].from_id, "c");
        assert_eq!(plan[1].amount_minor, 200);
    }

    #[test]
    fn test_deterministic_tie_break_on_id() {
        let plan = simplify(&balances(&[("z", -100), ("b", -100), ("a", 200)])).unwrap();
        assert_eq!(plan.len(), 2);
        // Equal magnitudes: the lexicographically smaller id goes first
        assert_eq!(plan[0].from_id, "b");
        assert_eq!(plan[1].from_id, "z");
    }

    #[test]
    fn test_mixed_currency_rejected() {
        let mut net = balances(&[("a", 100)]);
        net.insert("b".to_string(), Money::from_minor(-100, Currency::Usd));
        assert!(matches!(
            simplify(&net).unwrap_err(),
            CoreError::CurrencyMismatch { .. }
        ));
    }

    /// Settlement correctness: applying every suggestion as a confirmed
    /// payment drives every net balance to exactly zero.
    #[test]
    fn test_applying_plan_zeroes_all_balances() {
        let mut ledger = Ledger::new();
        ledger
            .append(LedgerEntry::Expense(equal_expense("a", &["a", "b", "c"], 1000)))
            .unwrap();
        ledger
            .append(LedgerEntry::Expense(equal_expense("b", &["a", "b", "c", "d"], 700)))
            .unwrap();
        ledger
            .append(LedgerEntry::Expense(equal_expense("c", &["b", "c"], 450)))
            .unwrap();

        let plan = settle_up(&ledger, None, Currency::Inr).unwrap();
        for suggestion in &plan {
            let payment = PaymentRecord::new(
                None,
                suggestion.from_id.clone(),
                suggestion.to_id.clone(),
                suggestion.amount(),
            )
            .unwrap();
            ledger.append(LedgerEntry::Payment(payment)).unwrap();
        }

        let net = net_balances(&ledger, None).unwrap();
        assert!(
            net.values().all(Money::is_zero),
            "plan left residual balances: {:?}",
            net
        );
    }

    /// The plan never needs more transfers than participants minus one
    /// distinct non-zero side pairing (greedy bound).
    #[test]
    fn test_plan_size_bound() {
        let net = balances(&[("a", 900), ("b", -100), ("c", -200), ("d", -600)]);
        let plan = simplify(&net).unwrap();
        assert!(plan.len() <= 3);
    }
}
