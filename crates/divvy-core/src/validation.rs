//! # Validation Module
//!
//! Input validation utilities for Divvy.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (mobile app)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + SplitPolicy::compute                           │
//! │  ├── Participant set shape (non-empty, unique, bounded)                │
//! │  └── Amount and text rules BEFORE any ledger mutation                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger append + database constraints                         │
//! │  ├── Duplicate id rejection                                            │
//! │  └── Allocation-sum invariant recheck                                  │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::ParticipantId;
use crate::{MAX_NAME_LEN, MAX_NOTES_LEN, MAX_SPLIT_PARTICIPANTS};

use std::collections::HashSet;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a participant or group display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "display_name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "display_name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an expense note.
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates that an amount is strictly positive.
///
/// Expenses and payments of zero or negative amounts are meaningless;
/// reversals are modeled with void markers, not negative records.
pub fn validate_positive_amount(amount: Money, field: &str) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Participant Set Validators
// =============================================================================

/// Validates the shape of a split's participant list.
///
/// ## Rules
/// - Non-empty (`EmptyParticipants`)
/// - At most `MAX_SPLIT_PARTICIPANTS`
/// - No duplicate ids: a participant cannot hold two allocation lines in
///   one expense
pub fn validate_participants(participants: &[ParticipantId]) -> CoreResult<()> {
    if participants.is_empty() {
        return Err(CoreError::EmptyParticipants);
    }

    if participants.len() > MAX_SPLIT_PARTICIPANTS {
        return Err(ValidationError::TooManyParticipants {
            max: MAX_SPLIT_PARTICIPANTS,
        }
        .into());
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for id in participants {
        if !seen.insert(id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "participants".to_string(),
                value: id.clone(),
            }
            .into());
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_display_name_rules() {
        assert!(validate_display_name("Aditi").is_ok());
        assert!(validate_display_name("  ").is_err());
        assert!(validate_display_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_notes_length() {
        assert!(validate_notes("Dinner at Leela").is_ok());
        assert!(validate_notes(&"x".repeat(MAX_NOTES_LEN + 1)).is_err());
    }

    #[test]
    fn test_positive_amount() {
        let ok = Money::from_minor(1, Currency::Inr);
        let zero = Money::zero(Currency::Inr);
        let negative = Money::from_minor(-1, Currency::Inr);

        assert!(validate_positive_amount(ok, "amount").is_ok());
        assert!(validate_positive_amount(zero, "amount").is_err());
        assert!(validate_positive_amount(negative, "amount").is_err());
    }

    #[test]
    fn test_participant_set_rules() {
        assert!(matches!(
            validate_participants(&[]).unwrap_err(),
            CoreError::EmptyParticipants
        ));

        let dup = vec!["a".to_string(), "a".to_string()];
        assert!(validate_participants(&dup).is_err());

        let big: Vec<String> = (0..=MAX_SPLIT_PARTICIPANTS).map(|i| i.to_string()).collect();
        assert!(validate_participants(&big).is_err());

        let ok = vec!["a".to_string(), "b".to_string()];
        assert!(validate_participants(&ok).is_ok());
    }
}
