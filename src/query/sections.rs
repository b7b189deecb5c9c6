// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{NoteSection, NoteSpan};

/// One SOAP section and the position of its spans in the traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    pub section: NoteSection,
    /// Indices into the span slice the group was built from.
    pub span_indices: Vec<usize>,
}

/// Groups spans by section in SOAP order, keeping each section's spans in slice order.
///
/// Every section is returned, empty ones included, so the renderer can still draw the header.
pub fn spans_by_section(spans: &[NoteSpan]) -> Vec<SectionGroup> {
    NoteSection::ALL
        .into_iter()
        .map(|section| SectionGroup {
            section,
            span_indices: spans
                .iter()
                .enumerate()
                .filter(|(_, span)| span.section() == section)
                .map(|(idx, _)| idx)
                .collect(),
        })
        .collect()
}

pub fn needs_confirmation_count(spans: &[NoteSpan]) -> usize {
    spans.iter().filter(|span| span.needs_confirmation()).count()
}
