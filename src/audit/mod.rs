//! Audit logging for manhours-cli
//!
//! Every create, update and delete in the record store, and every group
//! consolidated into the ledger, is appended to `audit.log` as one JSON line.
//!
//! - `AuditEntry`: timestamp, operation, entity, before/after state
//! - `AuditLogger`: JSONL writer and reader

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
