// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::Mutex;

use super::{apply_sign, apply_text_update, SessionStore, SignReceipt, StoreError};
use crate::model::{NoteSpan, NoteSpanId, SessionId, SessionRecord};

/// In-memory session records, used for the demo and for exercising failure paths.
///
/// Note-span updates can be switched to fail with [`StoreError::Unavailable`] without touching
/// the stored record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<IndexMap<SessionId, SessionRecord>>,
    fail_updates: AtomicBool,
    update_calls: AtomicUsize,
    sign_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        let mut records = IndexMap::new();
        records.insert(record.session.id().clone(), record);
        Self { records: Mutex::new(records), ..Self::default() }
    }

    pub async fn insert(&self, record: SessionRecord) {
        self.records.lock().await.insert(record.session.id().clone(), record);
    }

    pub async fn snapshot(&self, session_id: &SessionId) -> Option<SessionRecord> {
        self.records.lock().await.get(session_id).cloned()
    }

    pub fn fail_note_span_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Number of `update_note_span_text` calls received, failed ones included.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load_session(&self, session_id: &SessionId) -> Result<SessionRecord, StoreError> {
        let records = self.records.lock().await;
        let mut record =
            records.get(session_id).cloned().ok_or_else(|| StoreError::session_not_found(session_id))?;
        record.normalize();
        Ok(record)
    }

    async fn update_note_span_text(
        &self,
        span_id: &NoteSpanId,
        text: &str,
    ) -> Result<NoteSpan, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("update of note span {span_id} rejected")));
        }

        let mut records = self.records.lock().await;
        for record in records.values_mut() {
            if let Some(span) = apply_text_update(record, span_id, text)? {
                return Ok(span);
            }
        }
        Err(StoreError::note_span_not_found(span_id))
    }

    async fn sign_session(&self, session_id: &SessionId) -> Result<SignReceipt, StoreError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().await;
        let record =
            records.get_mut(session_id).ok_or_else(|| StoreError::session_not_found(session_id))?;
        apply_sign(record, Utc::now())
    }
}
