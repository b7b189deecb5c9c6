// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;
use thiserror::Error;

use crate::model::{NoteSpan, NoteSpanId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("the note is signed and can no longer be edited")]
    ReadOnly,
    #[error("note span not found (id={0})")]
    UnknownSpan(NoteSpanId),
    #[error("note text must not be empty")]
    EmptyText,
}

/// The single note span currently in edit mode, with its unsaved draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    target: Option<NoteSpanId>,
    draft: String,
}

impl EditSession {
    pub fn target(&self) -> Option<&NoteSpanId> {
        self.target.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_editing_span(&self, span_id: &NoteSpanId) -> bool {
        self.target.as_ref() == Some(span_id)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Puts `span` into edit mode, seeding the draft with its text.
    ///
    /// Returns the span whose edit was discarded, if another one was open.
    pub(crate) fn start(&mut self, span: &NoteSpan) -> Option<NoteSpanId> {
        let replaced = self.target.take().filter(|previous| previous != span.id());
        self.target = Some(span.id().clone());
        self.draft = span.text().to_owned();
        replaced
    }

    pub(crate) fn cancel(&mut self) -> Option<NoteSpanId> {
        self.draft.clear();
        self.target.take()
    }

    pub(crate) fn set_draft(&mut self, draft: impl Into<String>) {
        if self.target.is_some() {
            self.draft = draft.into();
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        if self.target.is_some() {
            self.draft.push(ch);
        }
    }

    pub(crate) fn pop_char(&mut self) {
        if self.target.is_some() {
            self.draft.pop();
        }
    }
}

/// An optimistic text update waiting for the store to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    ticket: u64,
    span_id: NoteSpanId,
    text: String,
}

impl PendingSave {
    pub fn span_id(&self) -> &NoteSpanId {
        &self.span_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The trimmed text matched the stored text; edit mode was left without a store call.
    Unchanged,
    Pending(PendingSave),
}

/// How a pending save settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Unchanged,
    Saved,
    RolledBack,
}

/// The last collection the store confirmed, plus the newest ticket issued per span.
#[derive(Debug, Clone, Default)]
pub(crate) struct SaveLedger {
    baseline: Vec<NoteSpan>,
    next_ticket: u64,
    latest: IndexMap<NoteSpanId, u64>,
}

impl SaveLedger {
    pub(crate) fn new(baseline: Vec<NoteSpan>) -> Self {
        Self { baseline, next_ticket: 0, latest: IndexMap::new() }
    }

    pub(crate) fn baseline(&self) -> &[NoteSpan] {
        &self.baseline
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.latest.len()
    }

    pub(crate) fn issue(&mut self, span_id: NoteSpanId, text: String) -> PendingSave {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.latest.insert(span_id.clone(), ticket);
        PendingSave { ticket, span_id, text }
    }

    /// Records a confirmed span in the baseline.
    ///
    /// Returns true when `pending` is still the newest save for its span, i.e. the confirmed text
    /// should also replace whatever the live collection shows.
    pub(crate) fn confirm(&mut self, pending: &PendingSave, stored: &NoteSpan) -> bool {
        if let Some(slot) = self.baseline.iter_mut().find(|span| span.id() == stored.id()) {
            *slot = stored.clone();
        }
        self.retire(pending)
    }

    /// Drops the ticket; returns true when it was the newest for its span.
    pub(crate) fn retire(&mut self, pending: &PendingSave) -> bool {
        if self.latest.get(&pending.span_id) == Some(&pending.ticket) {
            self.latest.shift_remove(&pending.span_id);
            true
        } else {
            false
        }
    }
}
