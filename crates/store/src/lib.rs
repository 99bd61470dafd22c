//! Persistence collaborator and repositories for Finbook.
//!
//! The engine is expressed as synchronous operations against a shared
//! transactional data store. This crate provides that store as a
//! single-process, lock-guarded table set plus the repositories that
//! orchestrate the core validation, workflow, and posting logic
//! against it.
//!
//! Every repository operation runs inside one critical section, so
//! state transitions and the balance updates they cause are applied
//! together or not at all.

pub mod memory;
pub mod repositories;

pub use memory::MemoryStore;
pub use repositories::{AccountRepository, EntryFilter, JournalRepository, LedgerRepository};
