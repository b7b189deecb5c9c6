// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for session records.
//!
//! The review core only talks to a [`SessionStore`]: load a session with its transcript and
//! note, replace one note span's text, sign the session. [`SessionFolder`] keeps the record as
//! JSON on disk; [`MemoryStore`] keeps it in memory and can be told to fail.

use std::fmt;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{NoteSpan, NoteSpanId, SessionId, SessionRecord, SessionStatus, SignError};

pub mod memory;
pub mod session_folder;

pub use memory::MemoryStore;
pub use session_folder::{SessionFolder, WriteDurability};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Session,
    NoteSpan,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => f.write_str("session"),
            Self::NoteSpan => f.write_str("note span"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found (id={id})")]
    NotFound { kind: RecordKind, id: String },
    #[error("session {session_id} is already signed (signed at {signed_at})")]
    Conflict { session_id: SessionId, signed_at: DateTime<Utc> },
    #[error("invalid text for note span {span_id}: text must not be empty")]
    InvalidText { span_id: NoteSpanId },
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error at {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("refusing to write through symlink at {}", .path.display())]
    SymlinkRefused { path: PathBuf },
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn session_not_found(id: &SessionId) -> Self {
        Self::NotFound { kind: RecordKind::Session, id: id.to_string() }
    }

    pub(crate) fn note_span_not_found(id: &NoteSpanId) -> Self {
        Self::NotFound { kind: RecordKind::NoteSpan, id: id.to_string() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result of a successful `draft → signed` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignReceipt {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub signed_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Session header plus its transcript and note spans, both in ordinal order.
    async fn load_session(&self, session_id: &SessionId) -> Result<SessionRecord, StoreError>;

    /// Replaces one span's text and returns the stored span.
    async fn update_note_span_text(
        &self,
        span_id: &NoteSpanId,
        text: &str,
    ) -> Result<NoteSpan, StoreError>;

    async fn sign_session(&self, session_id: &SessionId) -> Result<SignReceipt, StoreError>;
}

/// Applies a text update to whichever span in `record` carries `span_id`.
pub(crate) fn apply_text_update(
    record: &mut SessionRecord,
    span_id: &NoteSpanId,
    text: &str,
) -> Result<Option<NoteSpan>, StoreError> {
    if text.trim().is_empty() {
        return Err(StoreError::InvalidText { span_id: span_id.clone() });
    }
    let Some(span) = record.note_spans.iter_mut().find(|span| span.id() == span_id) else {
        return Ok(None);
    };
    span.set_text(text);
    Ok(Some(span.clone()))
}

/// Signs `record` at `at`, reporting an already-signed session as a conflict.
pub(crate) fn apply_sign(
    record: &mut SessionRecord,
    at: DateTime<Utc>,
) -> Result<SignReceipt, StoreError> {
    let session = &mut record.session;
    if let Err(SignError::AlreadySigned { signed_at }) = session.sign(at) {
        return Err(StoreError::Conflict { session_id: session.id().clone(), signed_at });
    }
    Ok(SignReceipt {
        session_id: session.id().clone(),
        status: session.status(),
        signed_at: session.signed_at().unwrap_or(at),
    })
}
