//! Journal repository for entry lifecycle operations.
//!
//! Orchestrates the core validator, workflow, and poster against the
//! store. Approval flips the entry's status and posts every line inside
//! one critical section, so a failed approval never leaves a partially
//! posted state and a concurrent approver observes the terminal status.

use chrono::Utc;
use std::sync::Arc;

use finbook_core::actor::Actor;
use finbook_core::audit::{AuditAction, AuditEvent, AuditSink, Notifier, PendingEntryNotice};
use finbook_core::error::EngineError;
use finbook_core::journal::{
    AccountRef, AttachmentInput, AttachmentMeta, CreateEntryInput, EntryPatch, EntryStatus,
    EntryWorkflow, JournalEntry, validate_lines,
};
use finbook_core::ledger::{DateRange, post_to_account, postings_for_entry};
use finbook_shared::config::ApprovalConfig;
use finbook_shared::types::{AttachmentId, JournalEntryId, UserId};

use crate::memory::MemoryStore;

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Filter by entry date range.
    pub range: DateRange,
    /// Filter by creator.
    pub created_by: Option<UserId>,
}

/// Journal repository for entry lifecycle operations.
#[derive(Clone)]
pub struct JournalRepository {
    store: Arc<MemoryStore>,
    audit: Arc<dyn AuditSink>,
    notifier: Arc<dyn Notifier>,
    config: ApprovalConfig,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        audit: Arc<dyn AuditSink>,
        notifier: Arc<dyn Notifier>,
        config: ApprovalConfig,
    ) -> Self {
        Self {
            store,
            audit,
            notifier,
            config,
        }
    }

    /// Submits a new journal entry in the Pending state.
    ///
    /// Lines are validated against the account registry first; nothing
    /// is persisted on failure. On success a CREATE audit event is
    /// emitted and approvers are notified (notification can never fail
    /// the submission).
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed or unbalanced lines.
    pub fn submit(
        &self,
        input: CreateEntryInput,
        actor: &Actor,
    ) -> Result<JournalEntry, EngineError> {
        let entry = {
            let mut tables = self.store.write();
            validate_lines(&input.lines, |id| {
                tables.accounts.get(&id).map(AccountRef::from)
            })?;

            let entry = JournalEntry::create(input, actor.id, Utc::now());
            tables.entries.insert(entry.id, entry.clone());
            entry
        };

        tracing::info!(
            entry_id = %entry.id,
            lines = entry.lines.len(),
            total = %entry.total_amount(),
            "journal entry submitted"
        );
        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Create,
            table_name: "journal_entries",
            record_id: entry.id.to_string(),
            before: None,
            after: serde_json::to_value(&entry).ok(),
            occurred_at: Utc::now(),
        });
        self.notifier.entry_submitted(&PendingEntryNotice {
            entry_id: entry.id,
            submitted_by: actor.id,
            total_amount: entry.total_amount(),
        });

        Ok(entry)
    }

    /// Approves a pending entry and posts every line to the ledger.
    ///
    /// The status flip, posting rows, and balance updates happen inside
    /// one critical section. A second approval of the same entry fails
    /// with an invalid-state error and performs no ledger work.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotPending`, or `ApproverRoleRequired`
    /// on the corresponding violation.
    pub fn approve(
        &self,
        entry_id: JournalEntryId,
        actor: &Actor,
    ) -> Result<JournalEntry, EngineError> {
        let (before, updated) = {
            let mut tables = self.store.write();
            let entry = tables
                .entries
                .get(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;

            let action = EntryWorkflow::approve(entry.status, actor)?;
            let before = serde_json::to_value(entry).ok();
            let postings = postings_for_entry(entry, action.occurred_at());

            // Resolve every line account before touching any balance.
            for posting in &postings {
                if !tables.accounts.contains_key(&posting.account_id) {
                    return Err(EngineError::AccountNotFound(posting.account_id));
                }
            }
            for posting in &postings {
                if let Some(account) = tables.accounts.get_mut(&posting.account_id) {
                    post_to_account(account, posting);
                }
            }

            let entry = tables
                .entries
                .get_mut(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;
            action.apply(entry);
            let updated = entry.clone();
            tables.postings.extend(postings);

            (before, updated)
        };

        tracing::info!(entry_id = %entry_id, approved_by = %actor.id, "journal entry approved");
        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Approve,
            table_name: "journal_entries",
            record_id: entry_id.to_string(),
            before,
            after: serde_json::to_value(&updated).ok(),
            occurred_at: Utc::now(),
        });

        Ok(updated)
    }

    /// Rejects a pending entry with a reason. No ledger effect.
    ///
    /// # Errors
    ///
    /// Returns `RejectionReasonTooShort`, `EntryNotFound`, `NotPending`,
    /// or `ApproverRoleRequired` on the corresponding violation.
    pub fn reject(
        &self,
        entry_id: JournalEntryId,
        actor: &Actor,
        reason: &str,
    ) -> Result<JournalEntry, EngineError> {
        let (before, updated) = {
            let mut tables = self.store.write();
            let entry = tables
                .entries
                .get(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;

            let action = EntryWorkflow::reject(
                entry.status,
                actor,
                reason,
                self.config.min_rejection_reason_len,
            )?;
            let before = serde_json::to_value(entry).ok();

            let entry = tables
                .entries
                .get_mut(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;
            action.apply(entry);

            (before, entry.clone())
        };

        tracing::info!(entry_id = %entry_id, rejected_by = %actor.id, "journal entry rejected");
        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Reject,
            table_name: "journal_entries",
            record_id: entry_id.to_string(),
            before,
            after: serde_json::to_value(&updated).ok(),
            occurred_at: Utc::now(),
        });

        Ok(updated)
    }

    /// Edits a pending entry. A lines patch re-runs validation and
    /// replaces the whole line set.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryImmutable`, `NotEntryOwner`, or a
    /// validation error on the corresponding violation.
    pub fn edit(
        &self,
        entry_id: JournalEntryId,
        actor: &Actor,
        patch: EntryPatch,
    ) -> Result<JournalEntry, EngineError> {
        let (before, updated) = {
            let mut tables = self.store.write();
            let entry = tables
                .entries
                .get(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;

            EntryWorkflow::ensure_mutable(entry.status, actor, entry.created_by)?;
            if let Some(lines) = &patch.lines {
                validate_lines(lines, |id| tables.accounts.get(&id).map(AccountRef::from))?;
            }

            let entry = tables
                .entries
                .get_mut(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;
            let before = serde_json::to_value(&*entry).ok();
            if let Some(entry_date) = patch.entry_date {
                entry.entry_date = entry_date;
            }
            if let Some(description) = patch.description {
                entry.description = description;
            }
            if let Some(is_adjusting) = patch.is_adjusting {
                entry.is_adjusting = is_adjusting;
            }
            if let Some(lines) = patch.lines {
                entry.replace_lines(&lines);
            }

            (before, entry.clone())
        };

        tracing::info!(entry_id = %entry_id, "journal entry edited");
        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Update,
            table_name: "journal_entries",
            record_id: entry_id.to_string(),
            before,
            after: serde_json::to_value(&updated).ok(),
            occurred_at: Utc::now(),
        });

        Ok(updated)
    }

    /// Deletes a pending entry, cascading its lines and attachments.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryImmutable`, or `NotEntryOwner` on
    /// the corresponding violation.
    pub fn delete(&self, entry_id: JournalEntryId, actor: &Actor) -> Result<(), EngineError> {
        let before = {
            let mut tables = self.store.write();
            let entry = tables
                .entries
                .get(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;

            EntryWorkflow::ensure_mutable(entry.status, actor, entry.created_by)?;

            let removed = tables.entries.remove(&entry_id);
            tables.attachments.retain(|_, a| a.entry_id != entry_id);
            removed.and_then(|entry| serde_json::to_value(&entry).ok())
        };

        tracing::info!(entry_id = %entry_id, "journal entry deleted");
        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Delete,
            table_name: "journal_entries",
            record_id: entry_id.to_string(),
            before,
            after: None,
            occurred_at: Utc::now(),
        });

        Ok(())
    }

    /// Attaches file metadata to a pending entry.
    ///
    /// File content storage is a separate collaborator; only metadata
    /// is tracked here, under the same gates as entry edits.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryImmutable`, or `NotEntryOwner` on
    /// the corresponding violation.
    pub fn attach(
        &self,
        entry_id: JournalEntryId,
        actor: &Actor,
        input: AttachmentInput,
    ) -> Result<AttachmentMeta, EngineError> {
        let meta = {
            let mut tables = self.store.write();
            let entry = tables
                .entries
                .get(&entry_id)
                .ok_or(EngineError::EntryNotFound(entry_id))?;

            EntryWorkflow::ensure_mutable(entry.status, actor, entry.created_by)?;

            let meta = AttachmentMeta {
                id: AttachmentId::new(),
                entry_id,
                file_name: input.file_name,
                file_path: input.file_path,
                file_type: input.file_type,
                file_size: input.file_size,
                uploaded_by: actor.id,
                uploaded_at: Utc::now(),
            };
            tables.attachments.insert(meta.id, meta.clone());
            meta
        };

        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Create,
            table_name: "journal_attachments",
            record_id: meta.id.to_string(),
            before: None,
            after: serde_json::to_value(&meta).ok(),
            occurred_at: Utc::now(),
        });

        Ok(meta)
    }

    /// Returns an entry's attachment metadata, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist.
    pub fn attachments(
        &self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<AttachmentMeta>, EngineError> {
        let tables = self.store.read();
        if !tables.entries.contains_key(&entry_id) {
            return Err(EngineError::EntryNotFound(entry_id));
        }

        let mut attachments: Vec<_> = tables
            .attachments
            .values()
            .filter(|a| a.entry_id == entry_id)
            .cloned()
            .collect();
        attachments.sort_by_key(|a| a.uploaded_at);
        Ok(attachments)
    }

    /// Gets an entry by id with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist.
    pub fn get(&self, entry_id: JournalEntryId) -> Result<JournalEntry, EngineError> {
        self.store
            .read()
            .entries
            .get(&entry_id)
            .cloned()
            .ok_or(EngineError::EntryNotFound(entry_id))
    }

    /// Lists entries matching the filter, most recent entry date first
    /// (creation time breaks ties).
    #[must_use]
    pub fn list(&self, filter: &EntryFilter) -> Vec<JournalEntry> {
        let tables = self.store.read();
        let mut entries: Vec<_> = tables
            .entries
            .values()
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .filter(|e| filter.range.contains(e.entry_date))
            .filter(|e| filter.created_by.is_none_or(|u| e.created_by == u))
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            b.entry_date
                .cmp(&a.entry_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        entries
    }
}
