//! # Split Policy Module
//!
//! Pure allocation math: turn a total, a participant list, and a split
//! policy into per-participant allocation lines.
//!
//! ## Policy Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Split Policies                                     │
//! │                                                                         │
//! │  Equal       weights [1, 1, ..., 1]      ──┐                            │
//! │  Shares      weights [3, 1, 2, ...]      ──┼──► Money::distribute       │
//! │  Percentage  weights [bps, bps, ...]     ──┘    (exact-sum guarantee)   │
//! │                                                                         │
//! │  Exact       caller-supplied amounts ───────► validated sum == total   │
//! │                                                                         │
//! │  ALL validation happens before any allocation is produced; a failed    │
//! │  split never reaches the ledger.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tightened Behavior
//! The expense form historically let exact and percentage entries drift from
//! the total and saved anyway. Here a drifted split fails fast with
//! `AllocationMismatch` / `PercentageMismatch` so balances can never be
//! silently corrupted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    AllocationLine, ExpenseRecord, Group, ParticipantId, Percentage, SplitMethod,
    PERCENT_SCALE_BPS,
};
use crate::validation::{validate_notes, validate_participants};

// =============================================================================
// Split Policy
// =============================================================================

/// A split policy plus its per-participant parameters.
///
/// Parameters are positional: entry `i` belongs to `participants[i]` in the
/// ordered participant list handed to [`SplitPolicy::compute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Even shares for every participant.
    Equal,
    /// One exact amount (minor units) per participant. Must sum to the total.
    Exact { amounts_minor: Vec<i64> },
    /// One percentage per participant. Must sum to exactly 100%.
    Percentage { percentages: Vec<Percentage> },
    /// One integer share count per participant.
    Shares { shares: Vec<u64> },
}

impl SplitPolicy {
    /// The method tag recorded on the resulting expense.
    pub fn method(&self) -> SplitMethod {
        match self {
            SplitPolicy::Equal => SplitMethod::Equal,
            SplitPolicy::Exact { .. } => SplitMethod::Exact,
            SplitPolicy::Percentage { .. } => SplitMethod::Percentage,
            SplitPolicy::Shares { .. } => SplitMethod::Shares,
        }
    }

    /// Computes one allocation line per participant.
    ///
    /// ## Guarantees
    /// - The returned lines sum exactly to `total` (no leftover minor units)
    /// - Every participant appears, zero-weight ones with an explicit zero
    ///   line, so balance folds always see the complete set per expense
    /// - Validation errors surface before any allocation exists
    ///
    /// ## Errors
    /// - `EmptyParticipants` / `Validation` for a malformed participant list
    /// - `Validation(LengthMismatch)` when params don't line up
    /// - `AllocationMismatch` when exact amounts drift from the total
    /// - `PercentageMismatch` when percentages don't sum to 100%
    /// - `InvalidWeights` when no share weight is positive
    ///
    /// ## Example
    /// ```rust
    /// use divvy_core::money::{Currency, Money};
    /// use divvy_core::split::SplitPolicy;
    ///
    /// let total = Money::from_minor(900, Currency::Inr);
    /// let people = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    /// let lines = SplitPolicy::Equal.compute(total, &people).unwrap();
    /// assert_eq!(lines.iter().map(|l| l.owed_minor).sum::<i64>(), 900);
    /// ```
    pub fn compute(
        &self,
        total: Money,
        participants: &[ParticipantId],
    ) -> CoreResult<Vec<AllocationLine>> {
        validate_participants(participants)?;

        if !total.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "total".to_string(),
            }
            .into());
        }

        let shares = match self {
            SplitPolicy::Equal => {
                let weights = vec![1u64; participants.len()];
                total.distribute(&weights)?
            }

            SplitPolicy::Exact { amounts_minor } => {
                self.check_len("amounts_minor", amounts_minor.len(), participants.len())?;
                if amounts_minor.iter().any(|a| *a < 0) {
                    return Err(ValidationError::MustBeNonNegative {
                        field: "amounts_minor".to_string(),
                    }
                    .into());
                }
                // i128 sum: caller-supplied amounts may overflow i64
                let sum: i128 = amounts_minor.iter().map(|a| *a as i128).sum();
                if sum != total.minor_units() as i128 {
                    return Err(CoreError::AllocationMismatch {
                        expected_minor: total.minor_units() as i128,
                        actual_minor: sum,
                    });
                }
                amounts_minor
                    .iter()
                    .map(|minor| Money::from_minor(*minor, total.currency()))
                    .collect()
            }

            SplitPolicy::Percentage { percentages } => {
                self.check_len("percentages", percentages.len(), participants.len())?;
                // u64 sum: many large bps values would wrap a u32 and could
                // sneak past the 100% check
                let total_bps: u64 = percentages.iter().map(|p| p.bps() as u64).sum();
                if total_bps != PERCENT_SCALE_BPS as u64 {
                    return Err(CoreError::PercentageMismatch { total_bps });
                }
                let weights: Vec<u64> = percentages.iter().map(|p| p.bps() as u64).collect();
                total.distribute(&weights)?
            }

            SplitPolicy::Shares { shares } => {
                self.check_len("shares", shares.len(), participants.len())?;
                total.distribute(shares)?
            }
        };

        Ok(participants
            .iter()
            .zip(shares)
            .map(|(participant_id, share)| AllocationLine {
                participant_id: participant_id.clone(),
                owed_minor: share.minor_units(),
            })
            .collect())
    }

    fn check_len(&self, field: &str, actual: usize, expected: usize) -> CoreResult<()> {
        if actual != expected {
            return Err(ValidationError::LengthMismatch {
                field: field.to_string(),
                expected,
                actual,
            }
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// Expense Construction
// =============================================================================

impl ExpenseRecord {
    /// Builds a committed expense from a split computation.
    ///
    /// The record is complete and internally consistent on return; appending
    /// it to the ledger is the only remaining step ("Draft" exists only on
    /// the caller's side, before this call succeeds).
    pub fn new(
        group_id: Option<String>,
        payer_id: impl Into<ParticipantId>,
        total: Money,
        policy: &SplitPolicy,
        participants: &[ParticipantId],
        notes: Option<String>,
    ) -> CoreResult<ExpenseRecord> {
        if let Some(ref n) = notes {
            validate_notes(n)?;
        }
        let allocations = policy.compute(total, participants)?;

        Ok(ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            group_id,
            payer_id: payer_id.into(),
            total_minor: total.minor_units(),
            currency: total.currency(),
            split_method: policy.method(),
            allocations,
            notes,
            created_at: Utc::now(),
        })
    }

    /// Builds a group-scoped expense, checking the membership snapshot.
    ///
    /// Every split participant must be a member of the group right now;
    /// later removals never invalidate the record retroactively.
    ///
    /// ## Errors
    /// `UnknownParticipant` for any participant outside the group.
    pub fn new_in_group(
        group: &Group,
        payer_id: impl Into<ParticipantId>,
        total: Money,
        policy: &SplitPolicy,
        participants: &[ParticipantId],
        notes: Option<String>,
    ) -> CoreResult<ExpenseRecord> {
        for participant_id in participants {
            if !group.is_member(participant_id) {
                return Err(CoreError::UnknownParticipant(participant_id.clone()));
            }
        }
        ExpenseRecord::new(
            Some(group.id.clone()),
            payer_id,
            total,
            policy,
            participants,
            notes,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn people(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|i| format!("user-{}", i)).collect()
    }

    fn inr(minor: i64) -> Money {
        Money::from_minor(minor, Currency::Inr)
    }

    #[test]
    fn test_equal_split_exact() {
        let lines = SplitPolicy::Equal.compute(inr(900), &people(3)).unwrap();
        let owed: Vec<i64> = lines.iter().map(|l| l.owed_minor).collect();
        assert_eq!(owed, vec![300, 300, 300]);
    }

    #[test]
    fn test_equal_split_remainder_to_earliest() {
        let lines = SplitPolicy::Equal.compute(inr(1000), &people(3)).unwrap();
        let owed: Vec<i64> = lines.iter().map(|l| l.owed_minor).collect();
        assert_eq!(owed, vec![334, 333, 333]);
        assert_eq!(owed.iter().sum::<i64>(), 1000);
    }

    /// Engine contract: equal splits never leak minor units for any
    /// participant count from 1 to 1000.
    #[test]
    fn test_equal_split_sums_exactly_up_to_1000_participants() {
        for n in 1..=1000usize {
            let lines = SplitPolicy::Equal.compute(inr(123_457), &people(n)).unwrap();
            assert_eq!(lines.len(), n);
            assert_eq!(
                lines.iter().map(|l| l.owed_minor).sum::<i64>(),
                123_457,
                "equal split across {} participants drifted",
                n
            );
        }
    }

    #[test]
    fn test_exact_split_accepts_matching_sum() {
        let policy = SplitPolicy::Exact {
            amounts_minor: vec![100, 400, 500],
        };
        let lines = policy.compute(inr(1000), &people(3)).unwrap();
        let owed: Vec<i64> = lines.iter().map(|l| l.owed_minor).collect();
        assert_eq!(owed, vec![100, 400, 500]);
    }

    #[test]
    fn test_exact_split_rejects_drift() {
        let policy = SplitPolicy::Exact {
            amounts_minor: vec![100, 400, 490],
        };
        let err = policy.compute(inr(1000), &people(3)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AllocationMismatch {
                expected_minor: 1000,
                actual_minor: 990,
            }
        ));
    }

    #[test]
    fn test_exact_split_rejects_negative_amount() {
        let policy = SplitPolicy::Exact {
            amounts_minor: vec![1100, -100, 0],
        };
        assert!(policy.compute(inr(1000), &people(3)).is_err());
    }

    #[test]
    fn test_percentage_split_exact_hundred() {
        let policy = SplitPolicy::Percentage {
            percentages: vec![
                Percentage::from_percent(25),
                Percentage::from_percent(25),
                Percentage::from_percent(50),
            ],
        };
        let lines = policy.compute(inr(1000), &people(3)).unwrap();
        let owed: Vec<i64> = lines.iter().map(|l| l.owed_minor).collect();
        assert_eq!(owed, vec![250, 250, 500]);
    }

    #[test]
    fn test_percentage_split_rejects_99_and_101() {
        for pct in [33u32, 34u32] {
            // 33+33+33 = 99%, 34+34+33 = 101%
            let spread = if pct == 33 { [33, 33, 33] } else { [34, 34, 33] };
            let policy = SplitPolicy::Percentage {
                percentages: spread.iter().map(|p| Percentage::from_percent(*p)).collect(),
            };
            let err = policy.compute(inr(1000), &people(3)).unwrap_err();
            assert!(matches!(err, CoreError::PercentageMismatch { .. }));
        }
    }

    #[test]
    fn test_percentage_split_rejects_bps_sum_past_u32() {
        // 4_000_000_000 + 294_977_296 = 2^32 + 10_000: a u32 sum would wrap
        // to exactly 100% and let this through
        let policy = SplitPolicy::Percentage {
            percentages: vec![
                Percentage::from_bps(4_000_000_000),
                Percentage::from_bps(294_977_296),
            ],
        };
        let err = policy.compute(inr(1000), &people(2)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PercentageMismatch {
                total_bps: 4_294_977_296,
            }
        ));
    }

    #[test]
    fn test_exact_split_rejects_amounts_summing_past_i64() {
        let policy = SplitPolicy::Exact {
            amounts_minor: vec![i64::MAX, i64::MAX],
        };
        let err = policy.compute(inr(1000), &people(2)).unwrap_err();
        assert!(matches!(err, CoreError::AllocationMismatch { .. }));
    }

    #[test]
    fn test_percentage_split_sums_exactly_despite_rounding() {
        // Thirds as basis points: 3333 + 3333 + 3334 = 10000
        let policy = SplitPolicy::Percentage {
            percentages: vec![
                Percentage::from_bps(3333),
                Percentage::from_bps(3333),
                Percentage::from_bps(3334),
            ],
        };
        let lines = policy.compute(inr(1000), &people(3)).unwrap();
        assert_eq!(lines.iter().map(|l| l.owed_minor).sum::<i64>(), 1000);
    }

    #[test]
    fn test_shares_split() {
        let policy = SplitPolicy::Shares {
            shares: vec![3, 1],
        };
        let lines = policy.compute(inr(1000), &people(2)).unwrap();
        let owed: Vec<i64> = lines.iter().map(|l| l.owed_minor).collect();
        assert_eq!(owed, vec![750, 250]);
    }

    #[test]
    fn test_zero_weight_participant_gets_explicit_zero_line() {
        let policy = SplitPolicy::Shares {
            shares: vec![0, 1, 1],
        };
        let lines = policy.compute(inr(1000), &people(3)).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].owed_minor, 0);
        assert_eq!(lines[0].participant_id, "user-0");
        assert_eq!(lines.iter().map(|l| l.owed_minor).sum::<i64>(), 1000);
    }

    #[test]
    fn test_all_zero_shares_rejected() {
        let policy = SplitPolicy::Shares {
            shares: vec![0, 0],
        };
        assert!(matches!(
            policy.compute(inr(1000), &people(2)).unwrap_err(),
            CoreError::InvalidWeights
        ));
    }

    #[test]
    fn test_params_length_mismatch() {
        let policy = SplitPolicy::Shares {
            shares: vec![1, 1],
        };
        let err = policy.compute(inr(1000), &people(3)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_participants_rejected() {
        assert!(matches!(
            SplitPolicy::Equal.compute(inr(1000), &[]).unwrap_err(),
            CoreError::EmptyParticipants
        ));
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let dup = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert!(SplitPolicy::Equal.compute(inr(1000), &dup).is_err());
    }

    #[test]
    fn test_expense_record_construction() {
        let participants = people(3);
        let expense = ExpenseRecord::new(
            None,
            participants[0].clone(),
            inr(900),
            &SplitPolicy::Equal,
            &participants,
            Some("Dinner".to_string()),
        )
        .unwrap();

        assert_eq!(expense.total_minor, 900);
        assert_eq!(expense.split_method, SplitMethod::Equal);
        assert_eq!(expense.allocations.len(), 3);
        assert_eq!(
            expense.allocations.iter().map(|l| l.owed_minor).sum::<i64>(),
            900
        );
    }

    #[test]
    fn test_group_expense_rejects_non_member() {
        let participants = people(3);
        let group = Group::new("Flat 4B", participants[..2].to_vec());

        let err = ExpenseRecord::new_in_group(
            &group,
            participants[0].clone(),
            inr(900),
            &SplitPolicy::Equal,
            &participants,
            None,
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::UnknownParticipant(id) if id == participants[2]));
    }
}
