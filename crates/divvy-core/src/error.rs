//! # Error Types
//!
//! Domain-specific error types for divvy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  divvy-core errors (this file)                                         │
//! │  ├── CoreError        - Split/ledger/balance domain errors             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  divvy-db errors (separate crate)                                      │
//! │  └── DbError          - Persistence collaborator failures              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → Presentation layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, expected vs actual sums)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to a message the UI can explain
//!    ("percentages must sum to 100%", not a generic failure)
//! 5. Every validation error is raised BEFORE any ledger mutation

use thiserror::Error;

use crate::money::Currency;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent split-computation or ledger-invariant violations.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two monetary values in different currencies were combined.
    ///
    /// ## When This Occurs
    /// - Adding a USD allocation into an INR balance fold
    /// - Computing balances over a scope that mixes currencies
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        expected: Currency,
        found: Currency,
    },

    /// Distribution weights are unusable (empty or all zero).
    #[error("Split weights must include at least one positive weight")]
    InvalidWeights,

    /// Supplied exact amounts do not sum to the expense total.
    ///
    /// ## When This Occurs
    /// The "split unequally" form let the user enter per-person amounts
    /// whose sum drifts from the total. The engine fails fast here instead
    /// of committing a ledger entry that would corrupt balances.
    #[error("Allocations sum to {actual_minor} but the total is {expected_minor}")]
    AllocationMismatch {
        /// i128: caller-supplied amounts are summed wider than i64 so the
        /// mismatch is reported instead of wrapping.
        expected_minor: i128,
        actual_minor: i128,
    },

    /// Supplied percentages do not sum to exactly 100%.
    ///
    /// Percentages are basis points (10000 = 100%), so the check is exact
    /// integer equality with no epsilon. The sum is u64 so absurd inputs
    /// report their real total rather than a wrapped one.
    #[error("Percentages sum to {}.{:02}% but must sum to exactly 100%", total_bps / 100, total_bps % 100)]
    PercentageMismatch { total_bps: u64 },

    /// An allocation references a participant outside the supplied set.
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    /// A split was requested over an empty participant set.
    #[error("A split needs at least one participant")]
    EmptyParticipants,

    /// Arithmetic left the representable i64 minor-unit range.
    #[error("Amount overflows the representable range")]
    AmountOverflow,

    /// A record with this id already exists in the ledger.
    #[error("Duplicate record id: {0}")]
    DuplicateRecordId(String),

    /// A void marker references an id that is not in the ledger.
    #[error("Cannot void unknown record: {0}")]
    VoidTargetNotFound(String),

    /// The referenced record has already been voided.
    ///
    /// Voided is terminal: a corrected expense is a NEW record, never an
    /// un-void of the old one.
    #[error("Record {0} is already voided")]
    AlreadyVoided(String),

    /// Void markers themselves cannot be voided.
    #[error("Record {0} is a void marker and cannot be voided")]
    CannotVoidAVoid(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before split computation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Monetary value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Monetary value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Per-participant params don't line up with the participant list.
    #[error("{field} has {actual} entries but there are {expected} participants")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Duplicate value where uniqueness is required.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// A payment from a participant to themself.
    #[error("Payer and payee must be different participants")]
    SelfPayment,

    /// Too many participants in a single split.
    #[error("A split supports at most {max} participants")]
    TooManyParticipants { max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
