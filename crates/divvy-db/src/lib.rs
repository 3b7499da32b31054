//! # Divvy Database Layer
//!
//! SQLite persistence for the Divvy expense-splitting engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         divvy-db                                        │
//! │                                                                         │
//! │  Application code                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database (pool.rs) ── connection pool + migrations                     │
//! │       │                                                                 │
//! │       ├── participants() → ParticipantRepository                        │
//! │       ├── groups()       → GroupRepository                              │
//! │       └── ledger()       → LedgerRepository                             │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                     SQLite (WAL mode, FK on)                            │
//! │                                                                         │
//! │  On startup: ledger().load_ledger() replays every persisted entry      │
//! │  through divvy-core's append validation and hands back a Ledger.       │
//! │  After that, each confirmed append is mirrored with ledger().save().   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Division of Labor
//! All money, split, and balance rules live in `divvy-core`; this crate
//! only moves validated records between memory and disk.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{GroupRepository, LedgerRepository, ParticipantRepository};
