// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::SegmentId;

/// Who is talking in a transcript segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Clinician,
    Patient,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clinician => "clinician",
            Self::Patient => "patient",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Clinician => "Clinician",
            Self::Patient => "Patient",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid speaker {0:?}")]
pub struct ParseSpeakerError(String);

impl FromStr for Speaker {
    type Err = ParseSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clinician" => Ok(Self::Clinician),
            "patient" => Ok(Self::Patient),
            other => Err(ParseSpeakerError(other.to_owned())),
        }
    }
}

/// One utterance of the recorded session. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SegmentRepr")]
pub struct TranscriptSegment {
    id: SegmentId,
    speaker: Speaker,
    text: String,
    start_ms: u64,
    end_ms: u64,
    order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("segment {id} ends before it starts ({start_ms}ms > {end_ms}ms)")]
pub struct SegmentTimingError {
    pub id: SegmentId,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TranscriptSegment {
    pub fn new(
        id: SegmentId,
        speaker: Speaker,
        text: impl Into<String>,
        start_ms: u64,
        end_ms: u64,
        order: u32,
    ) -> Result<Self, SegmentTimingError> {
        if end_ms < start_ms {
            return Err(SegmentTimingError { id, start_ms, end_ms });
        }
        Ok(Self { id, speaker, text: text.into(), start_ms, end_ms, order })
    }

    pub fn id(&self) -> &SegmentId {
        &self.id
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn order(&self) -> u32 {
        self.order
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentRepr {
    id: SegmentId,
    speaker: Speaker,
    text: String,
    start_ms: u64,
    end_ms: u64,
    order: u32,
}

impl TryFrom<SegmentRepr> for TranscriptSegment {
    type Error = SegmentTimingError;

    fn try_from(repr: SegmentRepr) -> Result<Self, Self::Error> {
        Self::new(repr.id, repr.speaker, repr.text, repr.start_ms, repr.end_ms, repr.order)
    }
}
