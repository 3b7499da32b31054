//! # Repository Module
//!
//! Database repository implementations for Divvy.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Application code                                                       │
//! │       │                                                                 │
//! │       │  db.ledger().load()                                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  LedgerRepository                                                       │
//! │  ├── save(&self, entry)                                                 │
//! │  ├── load(&self)                                                        │
//! │  └── load_group(&self, group_id)                                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  The ledger on disk is the source of truth; the in-memory Ledger is    │
//! │  rebuilt from it on startup and both stay append-only.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ParticipantRepository`] - Participant registration and lookup
//! - [`GroupRepository`] - Groups and membership
//! - [`LedgerRepository`] - Append-only ledger entry storage

mod group;
mod ledger;
mod participant;

pub use group::GroupRepository;
pub use ledger::LedgerRepository;
pub use participant::ParticipantRepository;
