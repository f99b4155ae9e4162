//! Audit log of every create, update and delete
//!
//! Services record each mutation as an [`AuditEntry`] (with before/after
//! snapshots) through an [`AuditLogger`] that appends JSON lines to
//! `audit.log`.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
