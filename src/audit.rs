//! Mutation audit hooks.
//!
//! Callers that keep an undo history or an activity feed plug a
//! [`MutationAudit`] into the mutator config and receive one record per
//! committed operation. The default sink drops everything.

use std::time::SystemTime;

use serde_json::Value;

use crate::model::Fingerprint;

/// Operations the mutator can commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    RemoveItems,
    RemoveRow,
    InsertRow,
    AddItem,
    MoveItem,
    ResizeColumn,
    EqualizeRow,
    ReorderRows,
    Load,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::RemoveItems => "remove_items",
            MutationKind::RemoveRow => "remove_row",
            MutationKind::InsertRow => "insert_row",
            MutationKind::AddItem => "add_item",
            MutationKind::MoveItem => "move_item",
            MutationKind::ResizeColumn => "resize_column",
            MutationKind::EqualizeRow => "equalize_row",
            MutationKind::ReorderRows => "reorder_rows",
            MutationKind::Load => "load",
        }
    }
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct MutationAuditEvent {
    pub timestamp: SystemTime,
    pub kind: MutationKind,
    /// Layout hash before the operation; `None` for loads.
    pub before: Option<Fingerprint>,
    pub after: Fingerprint,
    pub details: Vec<(String, Value)>,
}

/// Builder helper to append fields ergonomically.
pub struct MutationAuditEventBuilder {
    event: MutationAuditEvent,
}

impl MutationAuditEventBuilder {
    pub fn new(kind: MutationKind, after: Fingerprint) -> Self {
        Self {
            event: MutationAuditEvent {
                timestamp: SystemTime::now(),
                kind,
                before: None,
                after,
                details: Vec::new(),
            },
        }
    }

    pub fn before(&mut self, before: Fingerprint) -> &mut Self {
        self.event.before = Some(before);
        self
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> MutationAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait MutationAudit: Send + Sync {
    fn record(&self, event: MutationAuditEvent);

    /// Lets the mutator skip fingerprinting when nobody listens.
    fn enabled(&self) -> bool {
        true
    }
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullMutationAudit;

impl MutationAudit for NullMutationAudit {
    fn record(&self, _event: MutationAuditEvent) {}

    fn enabled(&self) -> bool {
        false
    }
}
