// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use notecite::model::{
    NoteSection, NoteSpan, NoteSpanId, SegmentId, Session, SessionId, SessionRecord, Speaker,
    TranscriptSegment,
};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("notecite_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub segments: usize,
    pub spans: usize,
    /// Citations per span; every seventh span is left uncited.
    pub fan_out: usize,
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// Roughly one therapy session.
    Small,
    Medium,
    Large,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::Large];

    pub const fn id(self) -> &'static str {
        match self {
            Case::Small => "small",
            Case::Medium => "medium",
            Case::Large => "large",
        }
    }

    pub const fn params(self) -> Params {
        match self {
            Case::Small => Params { segments: 16, spans: 15, fan_out: 2 },
            Case::Medium => Params { segments: 400, spans: 250, fan_out: 3 },
            Case::Large => Params { segments: 5_000, spans: 2_000, fan_out: 4 },
        }
    }
}

fn segment_id(idx: usize) -> SegmentId {
    SegmentId::new(format!("ts-{idx:05}")).expect("segment id")
}

/// Deterministic session whose spans cite segments spread across the whole transcript.
pub fn record(case: Case) -> SessionRecord {
    let Params { segments, spans, fan_out } = case.params();
    let session = Session::new(
        SessionId::new(format!("bench-{}", case.id())).expect("session id"),
        "Bench Patient",
        "Bench Clinician",
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().expect("date"),
        u64::try_from(segments).expect("segments fit u64") * 10_000,
    );

    let transcript = (0..segments)
        .map(|idx| {
            let speaker = if idx % 2 == 0 { Speaker::Clinician } else { Speaker::Patient };
            let start = u64::try_from(idx).expect("idx fits u64") * 10_000;
            TranscriptSegment::new(
                segment_id(idx),
                speaker,
                format!("Segment {idx} of the benchmark transcript."),
                start,
                start + 9_000,
                u32::try_from(idx).expect("idx fits u32"),
            )
            .expect("segment timing")
        })
        .collect();

    let note_spans = (0..spans)
        .map(|idx| {
            let citations = if idx % 7 == 6 {
                Vec::new()
            } else {
                (0..fan_out).map(|k| segment_id((idx * 31 + k * 97) % segments)).collect()
            };
            NoteSpan::new(
                NoteSpanId::new(format!("ns-{idx:05}")).expect("span id"),
                NoteSection::ALL[idx * NoteSection::ALL.len() / spans],
                format!("Statement {idx} drawn from the transcript."),
                citations,
                u32::try_from(idx).expect("idx fits u32"),
            )
        })
        .collect();

    SessionRecord::new(session, transcript, note_spans)
}
