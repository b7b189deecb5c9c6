// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::{IndexMap, IndexSet};

use crate::model::{NoteSpan, NoteSpanId, SegmentId};

/// Reverse citation lookup: transcript segment → note spans citing it.
///
/// Citing spans are kept in the order they were first seen while walking the span collection,
/// so [`CitationIndex::first_citing`] is the span that appears earliest in load order. Segment
/// ids that no span cites are absent; dangling citation ids (no such segment) are indexed like
/// any other id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationIndex {
    citing: IndexMap<SegmentId, IndexSet<NoteSpanId>>,
}

impl CitationIndex {
    /// Builds the index from the current span collection. O(total citations).
    pub fn derive<'a>(spans: impl IntoIterator<Item = &'a NoteSpan>) -> Self {
        let mut citing: IndexMap<SegmentId, IndexSet<NoteSpanId>> = IndexMap::new();
        for span in spans {
            for segment_id in span.citations() {
                citing.entry(segment_id.clone()).or_default().insert(span.id().clone());
            }
        }
        Self { citing }
    }

    /// Spans citing `segment_id`, in load order. `None` when nothing cites it.
    pub fn citing(&self, segment_id: &SegmentId) -> Option<&IndexSet<NoteSpanId>> {
        self.citing.get(segment_id).filter(|spans| !spans.is_empty())
    }

    pub fn first_citing(&self, segment_id: &SegmentId) -> Option<&NoteSpanId> {
        self.citing(segment_id).and_then(|spans| spans.first())
    }

    pub fn is_cited(&self, segment_id: &SegmentId) -> bool {
        self.citing(segment_id).is_some()
    }

    pub fn citing_count(&self, segment_id: &SegmentId) -> usize {
        self.citing(segment_id).map_or(0, IndexSet::len)
    }

    pub fn contains(&self, segment_id: &SegmentId, span_id: &NoteSpanId) -> bool {
        self.citing(segment_id).is_some_and(|spans| spans.contains(span_id))
    }

    pub fn segment_ids(&self) -> impl Iterator<Item = &SegmentId> {
        self.citing.keys()
    }

    pub fn len(&self) -> usize {
        self.citing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citing.is_empty()
    }
}
