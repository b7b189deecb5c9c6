// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{apply_sign, apply_text_update, SessionStore, SignReceipt, StoreError};
use crate::model::fixtures::demo_record;
use crate::model::{NoteSpan, NoteSpanId, SessionId, SessionRecord};

const SESSION_RECORD_FILENAME: &str = "notecite-session.json";

/// A session stored as a single JSON record inside a folder.
///
/// Reads normalise ordinal order. Writes go through a temp file in the same folder and are renamed
/// into place; a symlink at the record path is refused. Read-modify-write updates are serialised
/// per folder handle (clones share the lock).
#[derive(Debug, Clone)]
pub struct SessionFolder {
    root: PathBuf,
    durability: WriteDurability,
    write_lock: Arc<Mutex<()>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush the written record and the rename to stable storage where possible.
    /// Exact guarantees are platform/filesystem-dependent.
    Durable,
}

impl SessionFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self) -> PathBuf {
        self.root.join(SESSION_RECORD_FILENAME)
    }

    /// Reads the folder's record. A missing file surfaces as [`StoreError::Io`] with
    /// `ErrorKind::NotFound`.
    pub fn load_record(&self) -> Result<SessionRecord, StoreError> {
        let path = self.record_path();
        let json = fs::read_to_string(&path)
            .map_err(|source| StoreError::Io { path: path.clone(), source })?;
        let mut record: SessionRecord = serde_json::from_str(&json)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        record.normalize();
        debug!(
            path = %path.display(),
            segments = record.transcript_segments.len(),
            spans = record.note_spans.len(),
            "loaded session record"
        );
        Ok(record)
    }

    pub fn save_record(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let path = self.record_path();
        let mut json = serde_json::to_string_pretty(record)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        json.push('\n');
        write_atomic_in_session(&self.root, &path, json.as_bytes(), self.durability)
    }

    /// Loads the record, seeding the folder with the demo session when no record exists yet.
    pub fn load_or_init(&self) -> Result<SessionRecord, StoreError> {
        match self.load_record() {
            Ok(record) => Ok(record),
            Err(StoreError::Io { path, source })
                if source.kind() == io::ErrorKind::NotFound && path == self.record_path() =>
            {
                let record = demo_record();
                self.save_record(&record)?;
                info!(path = %path.display(), session = %record.session.id(), "seeded session folder");
                Ok(record)
            }
            Err(err) => Err(err),
        }
    }

    fn load_session_blocking(&self, session_id: &SessionId) -> Result<SessionRecord, StoreError> {
        match self.load_record() {
            Ok(record) if record.session.id() == session_id => Ok(record),
            Ok(_) => Err(StoreError::session_not_found(session_id)),
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::session_not_found(session_id))
            }
            Err(err) => Err(err),
        }
    }

    fn update_note_span_text_blocking(
        &self,
        span_id: &NoteSpanId,
        text: &str,
    ) -> Result<NoteSpan, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut record = self.load_record_or_not_found(StoreError::note_span_not_found(span_id))?;
        let span = apply_text_update(&mut record, span_id, text)?
            .ok_or_else(|| StoreError::note_span_not_found(span_id))?;
        self.save_record(&record)?;
        Ok(span)
    }

    fn sign_session_blocking(
        &self,
        session_id: &SessionId,
        at: DateTime<Utc>,
    ) -> Result<SignReceipt, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut record = self.load_record_or_not_found(StoreError::session_not_found(session_id))?;
        if record.session.id() != session_id {
            return Err(StoreError::session_not_found(session_id));
        }
        let receipt = apply_sign(&mut record, at)?;
        self.save_record(&record)?;
        Ok(receipt)
    }

    fn load_record_or_not_found(&self, not_found: StoreError) -> Result<SessionRecord, StoreError> {
        match self.load_record() {
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Err(not_found)
            }
            other => other,
        }
    }
}

#[async_trait]
impl SessionStore for SessionFolder {
    async fn load_session(&self, session_id: &SessionId) -> Result<SessionRecord, StoreError> {
        let folder = self.clone();
        let session_id = session_id.clone();
        tokio::task::spawn_blocking(move || folder.load_session_blocking(&session_id)).await?
    }

    async fn update_note_span_text(
        &self,
        span_id: &NoteSpanId,
        text: &str,
    ) -> Result<NoteSpan, StoreError> {
        let folder = self.clone();
        let span_id = span_id.clone();
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || folder.update_note_span_text_blocking(&span_id, &text))
            .await?
    }

    async fn sign_session(&self, session_id: &SessionId) -> Result<SignReceipt, StoreError> {
        let folder = self.clone();
        let session_id = session_id.clone();
        let now = Utc::now();
        tokio::task::spawn_blocking(move || folder.sign_session_blocking(&session_id, now)).await?
    }
}

// Extracted atomic-write helpers for the session folder.
include!("session_folder/helpers.rs");
