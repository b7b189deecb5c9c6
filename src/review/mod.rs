// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Review state for one session: citation cross-navigation, keyboard focus, note editing and
//! signing.
//!
//! [`Review`] is the single owner of that state. Every change goes through an explicit
//! transition (usually via [`Review::dispatch`]); renderers read it through accessors and the
//! focus signal.

use std::collections::VecDeque;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::model::{
    NoteSpan, NoteSpanId, SegmentId, Session, SessionId, SessionRecord, SignError,
    TranscriptSegment,
};
use crate::query::{needs_confirmation_count, CitationIndex};
use crate::store::{SessionStore, SignReceipt, StoreError};

pub mod edit;
pub mod keys;
pub mod selection;

pub use edit::{EditError, EditSession, PendingSave, SaveOutcome, SaveStatus};
pub use keys::{step_focus, FocusSignal, NavKey};
pub use selection::{
    note_span_visual, segment_is_interactive, segment_visual, NoteSpanVisual, SegmentVisual,
    SelectionChange, SelectionState,
};

use edit::SaveLedger;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("note span not found (id={0})")]
    UnknownNoteSpan(NoteSpanId),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Sign(#[from] SignError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User input the review state reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    ClickNoteSpan(NoteSpanId),
    ClickSegment(SegmentId),
    HoverNoteSpan(Option<NoteSpanId>),
    HoverSegment(Option<SegmentId>),
    Key(NavKey),
    StartEditing(NoteSpanId),
    CancelEditing,
    EditDraft(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Selection(SelectionChange),
    Focus(Option<usize>),
    Editing(Option<NoteSpanId>),
    Hover,
    /// The event had no effect (e.g. navigation keys while the draft has input focus).
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct Review {
    record: SessionRecord,
    index: CitationIndex,
    selection: SelectionState,
    edit: EditSession,
    ledger: SaveLedger,
    focus: FocusSignal,
    notices: VecDeque<Notice>,
}

impl Review {
    pub fn new(mut record: SessionRecord) -> Self {
        record.normalize();
        let index = CitationIndex::derive(&record.note_spans);
        let ledger = SaveLedger::new(record.note_spans.clone());
        info!(
            session = %record.session.id(),
            segments = record.transcript_segments.len(),
            spans = record.note_spans.len(),
            cited_segments = index.len(),
            "review loaded"
        );
        Self {
            record,
            index,
            selection: SelectionState::default(),
            edit: EditSession::default(),
            ledger,
            focus: FocusSignal::default(),
            notices: VecDeque::new(),
        }
    }

    pub async fn load<S>(store: &S, session_id: &SessionId) -> Result<Self, StoreError>
    where
        S: SessionStore + ?Sized,
    {
        let record = store.load_session(session_id).await?;
        Ok(Self::new(record))
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn session(&self) -> &Session {
        &self.record.session
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.record.transcript_segments
    }

    pub fn note_spans(&self) -> &[NoteSpan] {
        &self.record.note_spans
    }

    pub fn index(&self) -> &CitationIndex {
        &self.index
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    pub fn is_read_only(&self) -> bool {
        self.record.session.is_signed()
    }

    /// Navigation keys are suppressed while the edit draft owns the keyboard.
    pub fn input_focused(&self) -> bool {
        self.edit.is_editing()
    }

    pub fn pending_saves(&self) -> usize {
        self.ledger.in_flight()
    }

    pub fn needs_confirmation_count(&self) -> usize {
        needs_confirmation_count(&self.record.note_spans)
    }

    pub fn focus_signal(&self) -> watch::Receiver<Option<usize>> {
        self.focus.subscribe()
    }

    pub fn span(&self, span_id: &NoteSpanId) -> Option<&NoteSpan> {
        self.record.note_spans.iter().find(|span| span.id() == span_id)
    }

    pub fn position_of(&self, span_id: &NoteSpanId) -> Option<usize> {
        self.record.note_spans.iter().position(|span| span.id() == span_id)
    }

    pub fn focused_span(&self) -> Option<&NoteSpan> {
        self.selection.focused_note_index().and_then(|idx| self.record.note_spans.get(idx))
    }

    pub fn active_span(&self) -> Option<&NoteSpan> {
        self.selection.active_note_span().and_then(|id| self.span(id))
    }

    pub fn note_span_visual(&self, position: usize) -> Option<NoteSpanVisual> {
        let span = self.record.note_spans.get(position)?;
        Some(note_span_visual(&self.selection, span, position))
    }

    pub fn segment_visual(&self, segment_id: &SegmentId) -> SegmentVisual {
        segment_visual(&self.selection, segment_id, &self.index)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn dispatch(&mut self, event: ReviewEvent) -> Result<Dispatched, ReviewError> {
        match event {
            ReviewEvent::ClickNoteSpan(span_id) => {
                self.click_note_span(&span_id).map(Dispatched::Selection)
            }
            ReviewEvent::ClickSegment(segment_id) => {
                Ok(Dispatched::Selection(self.click_segment(&segment_id)))
            }
            ReviewEvent::HoverNoteSpan(span_id) => {
                self.selection.hover_note_span(span_id);
                Ok(Dispatched::Hover)
            }
            ReviewEvent::HoverSegment(segment_id) => {
                self.selection.hover_segment(segment_id);
                Ok(Dispatched::Hover)
            }
            ReviewEvent::Key(key) => Ok(self.key(key)),
            ReviewEvent::StartEditing(span_id) => {
                self.start_editing(&span_id)?;
                Ok(Dispatched::Editing(Some(span_id)))
            }
            ReviewEvent::CancelEditing => {
                self.cancel_editing();
                Ok(Dispatched::Editing(None))
            }
            ReviewEvent::EditDraft(draft) => {
                if !self.edit.is_editing() {
                    return Ok(Dispatched::Ignored);
                }
                self.edit.set_draft(draft);
                Ok(Dispatched::Editing(self.edit.target().cloned()))
            }
        }
    }

    pub fn click_note_span(&mut self, span_id: &NoteSpanId) -> Result<SelectionChange, ReviewError> {
        let span = self
            .record
            .note_spans
            .iter()
            .find(|span| span.id() == span_id)
            .ok_or_else(|| ReviewError::UnknownNoteSpan(span_id.clone()))?;
        let change = self.selection.click_note_span(span);
        debug!(span = %span_id, ?change, "note span clicked");
        Ok(change)
    }

    pub fn click_segment(&mut self, segment_id: &SegmentId) -> SelectionChange {
        let change = self.selection.click_segment(segment_id, &self.index, &self.record.note_spans);
        debug!(segment = %segment_id, ?change, "transcript segment clicked");
        change
    }

    pub fn key(&mut self, key: NavKey) -> Dispatched {
        if self.input_focused() {
            return Dispatched::Ignored;
        }
        match key {
            NavKey::Down | NavKey::Up => {
                let current = self.selection.focused_note_index();
                let next = step_focus(current, self.record.note_spans.len(), key);
                if !self.set_focus(next) {
                    return Dispatched::Ignored;
                }
                debug!(focus = self.selection.focused_note_index_signed(), "focus moved");
                Dispatched::Focus(next)
            }
            NavKey::Enter => {
                let Some(span) = self.focused_span() else {
                    return Dispatched::Ignored;
                };
                let span = span.clone();
                Dispatched::Selection(self.selection.click_note_span(&span))
            }
            NavKey::Escape => {
                let change = self.selection.escape();
                self.focus.publish(None);
                Dispatched::Selection(change)
            }
        }
    }

    /// Moves keyboard focus directly, e.g. when a row is picked with the mouse.
    pub fn focus_span(&mut self, span_id: &NoteSpanId) -> Result<(), ReviewError> {
        let position =
            self.position_of(span_id).ok_or_else(|| ReviewError::UnknownNoteSpan(span_id.clone()))?;
        self.set_focus(Some(position));
        Ok(())
    }

    fn set_focus(&mut self, focus: Option<usize>) -> bool {
        let moved = self.selection.set_focus(focus);
        self.focus.publish(self.selection.focused_note_index());
        moved
    }

    pub fn start_editing(&mut self, span_id: &NoteSpanId) -> Result<(), EditError> {
        if self.is_read_only() {
            warn!(span = %span_id, "edit refused: session is signed");
            return Err(EditError::ReadOnly);
        }
        let span = self
            .record
            .note_spans
            .iter()
            .find(|span| span.id() == span_id)
            .ok_or_else(|| EditError::UnknownSpan(span_id.clone()))?;
        if let Some(discarded) = self.edit.start(span) {
            debug!(discarded = %discarded, span = %span_id, "open edit replaced");
        }
        Ok(())
    }

    pub fn cancel_editing(&mut self) {
        if let Some(span_id) = self.edit.cancel() {
            debug!(span = %span_id, "edit cancelled");
        }
    }

    pub fn push_draft_char(&mut self, ch: char) {
        self.edit.push_char(ch);
    }

    pub fn pop_draft_char(&mut self) {
        self.edit.pop_char();
    }

    /// Saves the open draft.
    pub fn begin_save_draft(&mut self) -> Result<SaveOutcome, EditError> {
        let Some(span_id) = self.edit.target().cloned() else {
            return Ok(SaveOutcome::Unchanged);
        };
        let draft = self.edit.draft().to_owned();
        self.begin_save(&span_id, &draft)
    }

    /// Validates and applies an edit optimistically.
    ///
    /// Blank text is rejected before anything changes. Text equal to the stored text (after
    /// trimming) just leaves edit mode. Otherwise the span's text is replaced, edit mode ends
    /// and the returned [`PendingSave`] must be persisted and handed to [`Review::settle_save`].
    pub fn begin_save(&mut self, span_id: &NoteSpanId, text: &str) -> Result<SaveOutcome, EditError> {
        if self.is_read_only() {
            return Err(EditError::ReadOnly);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            warn!(span = %span_id, "edit rejected: empty text");
            return Err(EditError::EmptyText);
        }
        let position =
            self.position_of(span_id).ok_or_else(|| EditError::UnknownSpan(span_id.clone()))?;

        if self.edit.is_editing_span(span_id) {
            self.edit.cancel();
        }
        let span = &mut self.record.note_spans[position];
        if span.text() == trimmed {
            debug!(span = %span_id, "edit unchanged");
            return Ok(SaveOutcome::Unchanged);
        }
        span.set_text(trimmed);
        self.reindex();

        let pending = self.ledger.issue(span_id.clone(), trimmed.to_owned());
        info!(span = %span_id, ticket = pending.ticket(), "note span updated optimistically");
        Ok(SaveOutcome::Pending(pending))
    }

    /// Commits or rolls back a pending save once the store has answered.
    ///
    /// On failure the whole span collection returns to the last confirmed snapshot.
    pub fn settle_save(
        &mut self,
        pending: &PendingSave,
        result: Result<NoteSpan, StoreError>,
    ) -> SaveStatus {
        match result {
            Ok(stored) => {
                if self.ledger.confirm(pending, &stored) {
                    if let Some(position) = self.position_of(stored.id()) {
                        let span = &mut self.record.note_spans[position];
                        if span.text() != stored.text() {
                            span.set_text(stored.text());
                            self.reindex();
                        }
                    }
                }
                info!(span = %pending.span_id(), ticket = pending.ticket(), "note span saved");
                self.push_notice(NoticeLevel::Info, "Note saved");
                SaveStatus::Saved
            }
            Err(err) => {
                error!(
                    span = %pending.span_id(),
                    ticket = pending.ticket(),
                    error = %err,
                    "saving note span failed; reverting"
                );
                self.ledger.retire(pending);
                self.record.note_spans = self.ledger.baseline().to_vec();
                self.reindex();
                self.push_notice(NoticeLevel::Error, "Could not save the edit; changes were reverted");
                SaveStatus::RolledBack
            }
        }
    }

    /// Optimistic save followed by persistence through `store`.
    pub async fn save_edit<S>(
        &mut self,
        store: &S,
        span_id: &NoteSpanId,
        text: &str,
    ) -> Result<SaveStatus, ReviewError>
    where
        S: SessionStore + ?Sized,
    {
        match self.begin_save(span_id, text)? {
            SaveOutcome::Unchanged => Ok(SaveStatus::Unchanged),
            SaveOutcome::Pending(pending) => {
                let result = store.update_note_span_text(pending.span_id(), pending.text()).await;
                Ok(self.settle_save(&pending, result))
            }
        }
    }

    /// Checks that the session can still be signed; a signed session is rejected locally.
    pub fn check_signable(&self) -> Result<(), ReviewError> {
        match self.record.session.signed_at() {
            Some(signed_at) if self.is_read_only() => {
                warn!(session = %self.session().id(), "sign refused: already signed");
                Err(ReviewError::Sign(SignError::AlreadySigned { signed_at }))
            }
            _ => Ok(()),
        }
    }

    pub async fn sign<S>(&mut self, store: &S) -> Result<SignReceipt, ReviewError>
    where
        S: SessionStore + ?Sized,
    {
        self.check_signable()?;
        let result = store.sign_session(self.record.session.id()).await;
        self.apply_sign(result)
    }

    /// Applies the store's answer to a sign request. Success makes the note read-only and ends
    /// any open edit; failures leave the session unchanged.
    pub fn apply_sign(
        &mut self,
        result: Result<SignReceipt, StoreError>,
    ) -> Result<SignReceipt, ReviewError> {
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(err) => {
                if err.is_conflict() {
                    warn!(session = %self.session().id(), error = %err, "sign conflict");
                } else {
                    error!(session = %self.session().id(), error = %err, "sign failed");
                }
                self.push_notice(NoticeLevel::Error, format!("Could not sign: {err}"));
                return Err(err.into());
            }
        };
        self.record.session.sign(receipt.signed_at)?;
        self.cancel_editing();
        info!(session = %receipt.session_id, signed_at = %receipt.signed_at, "session signed");
        self.push_notice(NoticeLevel::Info, "Note signed");
        Ok(receipt)
    }

    fn reindex(&mut self) {
        self.index = CitationIndex::derive(&self.record.note_spans);
        self.selection.reconcile(&self.record.note_spans);
        self.focus.publish(self.selection.focused_note_index());
    }

    fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice { level, message: message.into() });
    }
}

#[cfg(test)]
mod tests;
