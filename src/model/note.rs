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

use super::ids::{NoteSpanId, SegmentId};

/// Section of a SOAP note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSection {
    Subjective,
    Objective,
    Assessment,
    Plan,
}

impl NoteSection {
    /// All sections in SOAP reading order.
    pub const ALL: [NoteSection; 4] = [
        NoteSection::Subjective,
        NoteSection::Objective,
        NoteSection::Assessment,
        NoteSection::Plan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subjective => "subjective",
            Self::Objective => "objective",
            Self::Assessment => "assessment",
            Self::Plan => "plan",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Subjective => "Subjective",
            Self::Objective => "Objective",
            Self::Assessment => "Assessment",
            Self::Plan => "Plan",
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Subjective => 'S',
            Self::Objective => 'O',
            Self::Assessment => 'A',
            Self::Plan => 'P',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Subjective => "Patient's reported symptoms and history",
            Self::Objective => "Observable and measurable findings",
            Self::Assessment => "Clinical interpretation and diagnosis",
            Self::Plan => "Treatment recommendations and next steps",
        }
    }
}

impl fmt::Display for NoteSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid note section {0:?}")]
pub struct ParseNoteSectionError(String);

impl FromStr for NoteSection {
    type Err = ParseNoteSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ParseNoteSectionError(s.to_owned()))
    }
}

/// One claim of the generated note, optionally backed by transcript citations.
///
/// Citations keep their load order and are de-duplicated on construction. They are not checked
/// against the transcript: dangling ids are carried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NoteSpanRepr")]
pub struct NoteSpan {
    id: NoteSpanId,
    section: NoteSection,
    text: String,
    citations: Vec<SegmentId>,
    needs_confirmation: bool,
    order: u32,
}

impl NoteSpan {
    /// Builds a span; `needs_confirmation` follows from an empty citation list.
    pub fn new(
        id: NoteSpanId,
        section: NoteSection,
        text: impl Into<String>,
        citations: impl IntoIterator<Item = SegmentId>,
        order: u32,
    ) -> Self {
        let citations = dedup_citations(citations);
        let needs_confirmation = citations.is_empty();
        Self { id, section, text: text.into(), citations, needs_confirmation, order }
    }

    pub fn with_needs_confirmation(mut self, needs_confirmation: bool) -> Self {
        self.needs_confirmation = needs_confirmation;
        self
    }

    pub fn id(&self) -> &NoteSpanId {
        &self.id
    }

    pub fn section(&self) -> NoteSection {
        self.section
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn citations(&self) -> &[SegmentId] {
        &self.citations
    }

    pub fn cites(&self, segment_id: &SegmentId) -> bool {
        self.citations.contains(segment_id)
    }

    pub fn citation_count(&self) -> usize {
        self.citations.len()
    }

    pub fn needs_confirmation(&self) -> bool {
        self.needs_confirmation
    }

    pub fn order(&self) -> u32 {
        self.order
    }
}

fn dedup_citations(citations: impl IntoIterator<Item = SegmentId>) -> Vec<SegmentId> {
    let mut out: Vec<SegmentId> = Vec::new();
    for citation in citations {
        if !out.contains(&citation) {
            out.push(citation);
        }
    }
    out
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteSpanRepr {
    id: NoteSpanId,
    section: NoteSection,
    text: String,
    #[serde(default)]
    citations: Vec<SegmentId>,
    #[serde(default)]
    needs_confirmation: bool,
    order: u32,
}

impl From<NoteSpanRepr> for NoteSpan {
    fn from(repr: NoteSpanRepr) -> Self {
        Self {
            id: repr.id,
            section: repr.section,
            text: repr.text,
            citations: dedup_citations(repr.citations),
            needs_confirmation: repr.needs_confirmation,
            order: repr.order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteSection, NoteSpan, NoteSpanId, SegmentId};

    fn sid(value: &str) -> SegmentId {
        SegmentId::new(value).unwrap()
    }

    #[test]
    fn new_span_dedups_citations_and_flags_uncited() {
        let span = NoteSpan::new(
            NoteSpanId::new("ns-010").unwrap(),
            NoteSection::Assessment,
            "GAD with work-related triggers.",
            [sid("ts-004"), sid("ts-006"), sid("ts-004")],
            10,
        );
        assert_eq!(span.citations(), &[sid("ts-004"), sid("ts-006")]);
        assert!(!span.needs_confirmation());
        assert!(span.cites(&sid("ts-006")));

        let uncited = NoteSpan::new(
            NoteSpanId::new("ns-011").unwrap(),
            NoteSection::Assessment,
            "PHQ-9 estimated lower.",
            [],
            11,
        );
        assert!(uncited.needs_confirmation());
        assert_eq!(uncited.citation_count(), 0);
    }

    #[test]
    fn span_deserializes_with_explicit_flag() {
        let json = r#"{
            "id": "ns-006",
            "section": "objective",
            "text": "Patient appears engaged.",
            "citations": [],
            "needsConfirmation": true,
            "order": 6
        }"#;
        let span: NoteSpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.section(), NoteSection::Objective);
        assert!(span.needs_confirmation());

        let back = serde_json::to_value(&span).unwrap();
        assert_eq!(back["needsConfirmation"], serde_json::Value::Bool(true));
    }

    #[test]
    fn sections_keep_soap_order() {
        let letters: String = NoteSection::ALL.iter().map(|s| s.letter()).collect();
        assert_eq!(letters, "SOAP");
        assert_eq!("plan".parse::<NoteSection>().unwrap(), NoteSection::Plan);
        assert!("history".parse::<NoteSection>().is_err());
    }
}
