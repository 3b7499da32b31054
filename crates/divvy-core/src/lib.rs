//! # divvy-core: Pure Business Logic for Divvy
//!
//! This crate is the **heart** of Divvy. It contains the whole
//! expense-split / balance-settlement engine as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Divvy Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Mobile Frontend (screens)                      │   │
//! │  │   Balances ──► Groups ──► Activity ──► Add Expense ──► Settle  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ generated TS bindings                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ divvy-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   split   │  │  ledger   │  │  balance  │  │   │
//! │  │   │   Money   │  │ policies  │  │ append-   │  │ net/pair  │  │   │
//! │  │   │ distribute│  │ 4 variants│  │ only log  │  │   folds   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐                                                │   │
//! │  │   │  settle   │   NO I/O • NO DATABASE • PURE FUNCTIONS        │   │
//! │  │   │  greedy   │                                                │   │
//! │  │   └───────────┘                                                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  divvy-db (Persistence Layer)                   │   │
//! │  │          SQLite: participants, groups, ledger entries           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//! UI action → [`split::SplitPolicy`] (produces an allocation) →
//! [`ledger::Ledger`] (appends the record) → [`balance`] (recomputes
//! aggregates) → UI display. [`settle`] suggests a minimal settlement on
//! demand; only a confirmed payment append changes the ledger.
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every computation is deterministic - same ledger
//!    prefix = same balances
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64) with a
//!    currency tag; splits sum back to their total EXACTLY
//! 4. **Append-Only Ledger**: No edits, no deletes; corrections are void
//!    markers plus new records
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use divvy_core::money::{Currency, Money};
//! use divvy_core::split::SplitPolicy;
//! use divvy_core::ledger::Ledger;
//! use divvy_core::types::{ExpenseRecord, LedgerEntry};
//! use divvy_core::balance::net_balances;
//!
//! let people = vec!["aditi".to_string(), "ben".to_string(), "chen".to_string()];
//! let expense = ExpenseRecord::new(
//!     None,
//!     "aditi".to_string(),
//!     Money::from_minor(900, Currency::Inr),
//!     &SplitPolicy::Equal,
//!     &people,
//!     Some("Dinner".to_string()),
//! ).unwrap();
//!
//! let mut ledger = Ledger::new();
//! ledger.append(LedgerEntry::Expense(expense)).unwrap();
//!
//! let net = net_balances(&ledger, None).unwrap();
//! assert_eq!(net["aditi"].minor_units(), 600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod ledger;
pub mod money;
pub mod settle;
pub mod split;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use divvy_core::Money` instead of
// `use divvy_core::money::Money`

pub use balance::{
    net_balances, net_balances_in, pairwise_balances, pairwise_balances_in, BalanceSnapshot,
    BalanceSummary, PairBalance,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Ledger, LedgerState};
pub use money::{Currency, Money};
pub use settle::{settle_up, simplify};
pub use split::SplitPolicy;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum participants in a single split.
///
/// ## Business Reason
/// Keeps allocation vectors and balance folds bounded; real groups top out
/// far below this.
pub const MAX_SPLIT_PARTICIPANTS: usize = 1000;

/// Maximum length of a participant or group display name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of an expense note.
pub const MAX_NOTES_LEN: usize = 500;
