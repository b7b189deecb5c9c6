// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexSet;

use crate::model::{NoteSpan, NoteSpanId, SegmentId};
use crate::query::CitationIndex;

/// Pinned and transient highlight state shared by the note and transcript panes.
///
/// `active_segments` always mirrors the citations of `active_note_span` (empty when nothing is
/// pinned). Only the transition methods below mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    active_note_span: Option<NoteSpanId>,
    active_segments: IndexSet<SegmentId>,
    hovered_note_span: Option<NoteSpanId>,
    hovered_segment: Option<SegmentId>,
    focused_note_index: Option<usize>,
}

/// What a transition did to the pinned selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Activated(NoteSpanId),
    Cleared,
    Unchanged,
}

impl SelectionState {
    pub fn active_note_span(&self) -> Option<&NoteSpanId> {
        self.active_note_span.as_ref()
    }

    pub fn active_segments(&self) -> &IndexSet<SegmentId> {
        &self.active_segments
    }

    pub fn is_segment_active(&self, segment_id: &SegmentId) -> bool {
        self.active_segments.contains(segment_id)
    }

    pub fn hovered_note_span(&self) -> Option<&NoteSpanId> {
        self.hovered_note_span.as_ref()
    }

    pub fn hovered_segment(&self) -> Option<&SegmentId> {
        self.hovered_segment.as_ref()
    }

    pub fn focused_note_index(&self) -> Option<usize> {
        self.focused_note_index
    }

    /// Focus index with `-1` standing for "no keyboard focus".
    pub fn focused_note_index_signed(&self) -> isize {
        self.focused_note_index
            .and_then(|idx| isize::try_from(idx).ok())
            .unwrap_or(-1)
    }

    pub fn has_active(&self) -> bool {
        self.active_note_span.is_some()
    }

    /// Click on a note span: toggles it off when already pinned, otherwise pins it.
    pub fn click_note_span(&mut self, span: &NoteSpan) -> SelectionChange {
        if self.active_note_span.as_ref() == Some(span.id()) {
            self.clear_active();
            return SelectionChange::Cleared;
        }
        self.activate(span)
    }

    /// Click on a transcript segment: pins the first span citing it (load order).
    ///
    /// Uncited segments are inert and leave the selection untouched. This never toggles off,
    /// even when the proxy span is already pinned.
    pub fn click_segment(
        &mut self,
        segment_id: &SegmentId,
        index: &CitationIndex,
        spans: &[NoteSpan],
    ) -> SelectionChange {
        let Some(first) = index.first_citing(segment_id) else {
            return SelectionChange::Unchanged;
        };
        let Some(span) = spans.iter().find(|span| span.id() == first) else {
            return SelectionChange::Unchanged;
        };
        self.activate(span)
    }

    pub fn hover_note_span(&mut self, span_id: Option<NoteSpanId>) {
        self.hovered_note_span = span_id;
    }

    pub fn hover_segment(&mut self, segment_id: Option<SegmentId>) {
        self.hovered_segment = segment_id;
    }

    /// Escape: drops the pinned selection and keyboard focus; hover survives.
    pub fn escape(&mut self) -> SelectionChange {
        let had_any = self.has_active() || self.focused_note_index.is_some();
        self.clear_active();
        self.focused_note_index = None;
        if had_any {
            SelectionChange::Cleared
        } else {
            SelectionChange::Unchanged
        }
    }

    pub(crate) fn set_focus(&mut self, focus: Option<usize>) -> bool {
        if self.focused_note_index == focus {
            return false;
        }
        self.focused_note_index = focus;
        true
    }

    /// Re-derives the pinned citations after the span collection was replaced.
    ///
    /// A pinned span that no longer exists clears the selection; a focus index past the end is
    /// clamped to the last span.
    pub(crate) fn reconcile(&mut self, spans: &[NoteSpan]) {
        if let Some(active) = self.active_note_span.clone() {
            match spans.iter().find(|span| span.id() == &active) {
                Some(span) => self.active_segments = span.citations().iter().cloned().collect(),
                None => self.clear_active(),
            }
        }
        if let Some(focus) = self.focused_note_index {
            self.focused_note_index = spans.len().checked_sub(1).map(|last| focus.min(last));
        }
    }

    fn activate(&mut self, span: &NoteSpan) -> SelectionChange {
        if self.active_note_span.as_ref() == Some(span.id()) {
            return SelectionChange::Unchanged;
        }
        self.active_note_span = Some(span.id().clone());
        self.active_segments = span.citations().iter().cloned().collect();
        SelectionChange::Activated(span.id().clone())
    }

    fn clear_active(&mut self) {
        self.active_note_span = None;
        self.active_segments.clear();
    }
}

/// How a note span should be drawn, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSpanVisual {
    NeedsConfirmation,
    Active,
    Highlighted,
    Default,
}

/// How a transcript segment should be drawn, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentVisual {
    Active,
    Hovered,
    Cited,
    Inert,
}

/// `position` is the span's index in traversal order, compared against the keyboard focus.
pub fn note_span_visual(state: &SelectionState, span: &NoteSpan, position: usize) -> NoteSpanVisual {
    if span.needs_confirmation() {
        NoteSpanVisual::NeedsConfirmation
    } else if state.active_note_span() == Some(span.id()) {
        NoteSpanVisual::Active
    } else if state.hovered_note_span() == Some(span.id())
        || state.focused_note_index() == Some(position)
    {
        NoteSpanVisual::Highlighted
    } else {
        NoteSpanVisual::Default
    }
}

pub fn segment_visual(
    state: &SelectionState,
    segment_id: &SegmentId,
    index: &CitationIndex,
) -> SegmentVisual {
    if state.is_segment_active(segment_id) {
        SegmentVisual::Active
    } else if state.hovered_segment() == Some(segment_id) {
        SegmentVisual::Hovered
    } else if index.is_cited(segment_id) {
        SegmentVisual::Cited
    } else {
        SegmentVisual::Inert
    }
}

/// Segments nobody cites do not react to clicks.
pub fn segment_is_interactive(index: &CitationIndex, segment_id: &SegmentId) -> bool {
    index.is_cited(segment_id)
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{
        note_span_visual, segment_is_interactive, segment_visual, NoteSpanVisual, SegmentVisual,
        SelectionChange, SelectionState,
    };
    use crate::model::fixtures::demo_record;
    use crate::model::{NoteSpan, NoteSpanId, SegmentId};
    use crate::query::CitationIndex;

    struct Fixture {
        spans: Vec<NoteSpan>,
        index: CitationIndex,
        state: SelectionState,
    }

    #[fixture]
    fn demo() -> Fixture {
        let record = demo_record();
        let index = CitationIndex::derive(&record.note_spans);
        Fixture { spans: record.note_spans, index, state: SelectionState::default() }
    }

    fn sid(value: &str) -> SegmentId {
        SegmentId::new(value).unwrap()
    }

    fn nid(value: &str) -> NoteSpanId {
        NoteSpanId::new(value).unwrap()
    }

    fn span<'a>(spans: &'a [NoteSpan], id: &str) -> &'a NoteSpan {
        spans.iter().find(|span| span.id().as_str() == id).unwrap()
    }

    fn active_segment_ids(state: &SelectionState) -> Vec<&str> {
        state.active_segments().iter().map(|id| id.as_str()).collect()
    }

    #[rstest]
    fn clicking_a_span_pins_its_citations(mut demo: Fixture) {
        let change = demo.state.click_note_span(span(&demo.spans, "ns-010"));

        assert_eq!(change, SelectionChange::Activated(nid("ns-010")));
        assert_eq!(demo.state.active_note_span(), Some(&nid("ns-010")));
        assert_eq!(active_segment_ids(&demo.state), vec!["ts-004", "ts-006"]);
    }

    #[rstest]
    fn clicking_an_active_span_twice_clears(mut demo: Fixture) {
        let target = span(&demo.spans, "ns-001").clone();
        demo.state.click_note_span(&target);
        let change = demo.state.click_note_span(&target);

        assert_eq!(change, SelectionChange::Cleared);
        assert_eq!(demo.state, SelectionState::default());
    }

    #[rstest]
    fn clicking_another_span_replaces_selection(mut demo: Fixture) {
        demo.state.click_note_span(span(&demo.spans, "ns-001"));
        demo.state.click_note_span(span(&demo.spans, "ns-013"));

        assert_eq!(demo.state.active_note_span(), Some(&nid("ns-013")));
        assert_eq!(active_segment_ids(&demo.state), vec!["ts-015", "ts-016"]);
    }

    #[rstest]
    fn flagged_span_activates_with_no_segments(mut demo: Fixture) {
        demo.state.click_note_span(span(&demo.spans, "ns-006"));

        assert_eq!(demo.state.active_note_span(), Some(&nid("ns-006")));
        assert!(demo.state.active_segments().is_empty());
    }

    #[rstest]
    fn segment_click_activates_first_citing_span(mut demo: Fixture) {
        // ts-008 is cited by ns-005, ns-009 and ns-012; ns-005 comes first.
        let change = demo.state.click_segment(&sid("ts-008"), &demo.index, &demo.spans);

        assert_eq!(change, SelectionChange::Activated(nid("ns-005")));
        assert_eq!(active_segment_ids(&demo.state), vec!["ts-008"]);
    }

    #[rstest]
    fn segment_click_is_not_a_toggle(mut demo: Fixture) {
        demo.state.click_segment(&sid("ts-002"), &demo.index, &demo.spans);
        let change = demo.state.click_segment(&sid("ts-002"), &demo.index, &demo.spans);

        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(demo.state.active_note_span(), Some(&nid("ns-001")));
    }

    #[rstest]
    #[case::uncited("ts-001")]
    #[case::unknown("ts-404")]
    fn uncited_segment_click_is_a_no_op(mut demo: Fixture, #[case] segment: &str) {
        demo.state.click_note_span(span(&demo.spans, "ns-002"));
        let before = demo.state.clone();

        let change = demo.state.click_segment(&sid(segment), &demo.index, &demo.spans);

        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(demo.state, before);
        assert!(!segment_is_interactive(&demo.index, &sid(segment)));
    }

    #[rstest]
    fn hover_never_touches_active_fields(mut demo: Fixture) {
        demo.state.click_note_span(span(&demo.spans, "ns-002"));
        demo.state.hover_note_span(Some(nid("ns-003")));
        demo.state.hover_segment(Some(sid("ts-010")));

        assert_eq!(demo.state.active_note_span(), Some(&nid("ns-002")));
        assert_eq!(active_segment_ids(&demo.state), vec!["ts-004"]);

        demo.state.hover_note_span(None);
        demo.state.hover_segment(None);
        assert!(demo.state.hovered_note_span().is_none());
        assert!(demo.state.hovered_segment().is_none());
    }

    #[rstest]
    fn escape_clears_selection_and_focus_but_keeps_hover(mut demo: Fixture) {
        demo.state.click_note_span(span(&demo.spans, "ns-002"));
        demo.state.set_focus(Some(3));
        demo.state.hover_segment(Some(sid("ts-010")));

        assert_eq!(demo.state.escape(), SelectionChange::Cleared);
        assert!(!demo.state.has_active());
        assert!(demo.state.active_segments().is_empty());
        assert_eq!(demo.state.focused_note_index_signed(), -1);
        assert_eq!(demo.state.hovered_segment(), Some(&sid("ts-010")));

        assert_eq!(demo.state.escape(), SelectionChange::Unchanged);
    }

    #[rstest]
    fn note_visual_precedence(mut demo: Fixture) {
        let flagged = span(&demo.spans, "ns-006").clone();
        let plain = span(&demo.spans, "ns-001").clone();

        demo.state.click_note_span(&flagged);
        assert_eq!(note_span_visual(&demo.state, &flagged, 5), NoteSpanVisual::NeedsConfirmation);

        assert_eq!(note_span_visual(&demo.state, &plain, 0), NoteSpanVisual::Default);
        demo.state.hover_note_span(Some(nid("ns-001")));
        assert_eq!(note_span_visual(&demo.state, &plain, 0), NoteSpanVisual::Highlighted);
        demo.state.hover_note_span(None);
        demo.state.set_focus(Some(0));
        assert_eq!(note_span_visual(&demo.state, &plain, 0), NoteSpanVisual::Highlighted);
        demo.state.click_note_span(&plain);
        assert_eq!(note_span_visual(&demo.state, &plain, 0), NoteSpanVisual::Active);
    }

    #[rstest]
    fn segment_visual_precedence(mut demo: Fixture) {
        assert_eq!(segment_visual(&demo.state, &sid("ts-001"), &demo.index), SegmentVisual::Inert);
        assert_eq!(segment_visual(&demo.state, &sid("ts-002"), &demo.index), SegmentVisual::Cited);

        demo.state.hover_segment(Some(sid("ts-001")));
        assert_eq!(
            segment_visual(&demo.state, &sid("ts-001"), &demo.index),
            SegmentVisual::Hovered
        );

        demo.state.hover_segment(Some(sid("ts-004")));
        demo.state.click_note_span(span(&demo.spans, "ns-002"));
        assert_eq!(segment_visual(&demo.state, &sid("ts-004"), &demo.index), SegmentVisual::Active);
    }

    #[rstest]
    fn reconcile_drops_missing_active_span_and_clamps_focus(mut demo: Fixture) {
        demo.state.click_note_span(span(&demo.spans, "ns-015"));
        demo.state.set_focus(Some(14));

        let shorter = demo.spans[..3].to_vec();
        demo.state.reconcile(&shorter);

        assert!(!demo.state.has_active());
        assert_eq!(demo.state.focused_note_index(), Some(2));

        demo.state.reconcile(&[]);
        assert_eq!(demo.state.focused_note_index(), None);
    }
}
