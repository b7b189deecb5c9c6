// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::SessionId;
use super::note::NoteSpan;
use super::transcript::TranscriptSegment;

/// Lifecycle of the note attached to a session. Only moves forward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Draft,
    Signed,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Signed => "signed",
        }
    }

    pub fn is_signed(self) -> bool {
        self == Self::Signed
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    #[error("session is already signed (signed at {signed_at})")]
    AlreadySigned { signed_at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStateError {
    #[error("signed session is missing its signed-at timestamp")]
    SignedWithoutTimestamp,
    #[error("draft session carries a signed-at timestamp")]
    DraftWithTimestamp,
}

/// Session header: participants, timing and signing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SessionRepr")]
pub struct Session {
    id: SessionId,
    patient_name: String,
    clinician_name: String,
    session_date: DateTime<Utc>,
    #[serde(rename = "duration")]
    duration_ms: u64,
    status: SessionStatus,
    signed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        id: SessionId,
        patient_name: impl Into<String>,
        clinician_name: impl Into<String>,
        session_date: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id,
            patient_name: patient_name.into(),
            clinician_name: clinician_name.into(),
            session_date,
            duration_ms,
            status: SessionStatus::Draft,
            signed_at: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn clinician_name(&self) -> &str {
        &self.clinician_name
    }

    pub fn session_date(&self) -> DateTime<Utc> {
        self.session_date
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_signed(&self) -> bool {
        self.status.is_signed()
    }

    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        self.signed_at
    }

    /// Moves `draft → signed`, stamping `at`. A signed session is never touched again.
    pub fn sign(&mut self, at: DateTime<Utc>) -> Result<(), SignError> {
        if self.status.is_signed() {
            return Err(SignError::AlreadySigned { signed_at: self.signed_at.unwrap_or(at) });
        }
        self.status = SessionStatus::Signed;
        self.signed_at = Some(at);
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRepr {
    id: SessionId,
    patient_name: String,
    clinician_name: String,
    session_date: DateTime<Utc>,
    duration: u64,
    #[serde(default)]
    status: SessionStatus,
    #[serde(default)]
    signed_at: Option<DateTime<Utc>>,
}

impl TryFrom<SessionRepr> for Session {
    type Error = SessionStateError;

    fn try_from(repr: SessionRepr) -> Result<Self, Self::Error> {
        match (repr.status, repr.signed_at) {
            (SessionStatus::Signed, None) => return Err(SessionStateError::SignedWithoutTimestamp),
            (SessionStatus::Draft, Some(_)) => return Err(SessionStateError::DraftWithTimestamp),
            _ => {}
        }
        Ok(Self {
            id: repr.id,
            patient_name: repr.patient_name,
            clinician_name: repr.clinician_name,
            session_date: repr.session_date,
            duration_ms: repr.duration,
            status: repr.status,
            signed_at: repr.signed_at,
        })
    }
}

/// Everything the review screen loads for one session.
///
/// Segments and spans are kept sorted by their ordinal position; the keyboard traversal order and
/// the citation tie-break both rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(flatten)]
    pub session: Session,
    #[serde(default)]
    pub transcript_segments: Vec<TranscriptSegment>,
    #[serde(default)]
    pub note_spans: Vec<NoteSpan>,
}

impl SessionRecord {
    pub fn new(
        session: Session,
        transcript_segments: Vec<TranscriptSegment>,
        note_spans: Vec<NoteSpan>,
    ) -> Self {
        let mut record = Self { session, transcript_segments, note_spans };
        record.normalize();
        record
    }

    /// Stable sort of segments and spans by ordinal.
    pub fn normalize(&mut self) {
        self.transcript_segments.sort_by_key(TranscriptSegment::order);
        self.note_spans.sort_by_key(NoteSpan::order);
    }
}
