// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{
    Dispatched, EditError, NavKey, NoticeLevel, NoteSpanVisual, Review, ReviewError, ReviewEvent,
    SaveOutcome, SaveStatus, SegmentVisual, SelectionChange,
};
use crate::model::fixtures::{demo_record, DEMO_SESSION_ID};
use crate::model::{NoteSpanId, SegmentId, SessionId, SignError};
use crate::store::{MemoryStore, SessionStore, StoreError};

#[fixture]
fn review() -> Review {
    Review::new(demo_record())
}

fn sid(value: &str) -> SegmentId {
    SegmentId::new(value).unwrap()
}

fn nid(value: &str) -> NoteSpanId {
    NoteSpanId::new(value).unwrap()
}

fn span_text<'a>(review: &'a Review, id: &str) -> &'a str {
    review.span(&nid(id)).unwrap().text()
}

fn active_ids(review: &Review) -> Vec<String> {
    review.selection().active_segments().iter().map(|id| id.as_str().to_owned()).collect()
}

#[rstest]
fn segment_click_activates_citing_span_and_all_its_segments(mut review: Review) {
    // ts-006 is cited by ns-003 and ns-010; ns-003 loads first.
    review.dispatch(ReviewEvent::ClickSegment(sid("ts-006"))).unwrap();
    assert_eq!(review.selection().active_note_span(), Some(&nid("ns-003")));

    review.dispatch(ReviewEvent::ClickNoteSpan(nid("ns-010"))).unwrap();
    assert_eq!(active_ids(&review), vec!["ts-004", "ts-006"]);
    assert_eq!(review.segment_visual(&sid("ts-004")), SegmentVisual::Active);
    assert_eq!(review.segment_visual(&sid("ts-006")), SegmentVisual::Active);
    assert_eq!(review.segment_visual(&sid("ts-001")), SegmentVisual::Inert);
}

#[rstest]
fn segment_click_highlights_every_source_of_the_chosen_span(mut review: Review) {
    // ts-009 is cited only by ns-012, which also cites ts-008.
    review.dispatch(ReviewEvent::ClickSegment(sid("ts-009"))).unwrap();

    assert_eq!(review.selection().active_note_span(), Some(&nid("ns-012")));
    assert_eq!(active_ids(&review), vec!["ts-008", "ts-009"]);
    assert_eq!(review.segment_visual(&sid("ts-008")), SegmentVisual::Active);
}

#[test]
fn segment_click_without_earlier_citer_picks_the_multi_source_span() {
    let mut record = demo_record();
    record.note_spans.retain(|span| span.id() != &nid("ns-003"));
    let mut review = Review::new(record);

    review.dispatch(ReviewEvent::ClickSegment(sid("ts-006"))).unwrap();

    assert_eq!(review.selection().active_note_span(), Some(&nid("ns-010")));
    assert_eq!(active_ids(&review), vec!["ts-004", "ts-006"]);
    assert_eq!(review.segment_visual(&sid("ts-004")), SegmentVisual::Active);
    assert_eq!(review.segment_visual(&sid("ts-006")), SegmentVisual::Active);
}

#[rstest]
fn clicking_unknown_span_is_an_error(mut review: Review) {
    let err = review.dispatch(ReviewEvent::ClickNoteSpan(nid("ns-404"))).unwrap_err();
    assert!(matches!(err, ReviewError::UnknownNoteSpan(_)));
    assert!(!review.selection().has_active());
}

#[rstest]
fn keyboard_walks_the_span_order(mut review: Review) {
    for _ in 0..3 {
        review.dispatch(ReviewEvent::Key(NavKey::Down)).unwrap();
    }
    assert_eq!(review.selection().focused_note_index(), Some(2));
    assert_eq!(review.note_span_visual(2), Some(NoteSpanVisual::Highlighted));

    let dispatched = review.dispatch(ReviewEvent::Key(NavKey::Enter)).unwrap();
    assert_eq!(dispatched, Dispatched::Selection(SelectionChange::Activated(nid("ns-003"))));
    assert_eq!(review.note_span_visual(2), Some(NoteSpanVisual::Active));

    let dispatched = review.dispatch(ReviewEvent::Key(NavKey::Enter)).unwrap();
    assert_eq!(dispatched, Dispatched::Selection(SelectionChange::Cleared));

    review.dispatch(ReviewEvent::Key(NavKey::Enter)).unwrap();
    review.dispatch(ReviewEvent::Key(NavKey::Escape)).unwrap();
    assert_eq!(review.selection().focused_note_index_signed(), -1);
    assert!(!review.selection().has_active());
}

#[rstest]
fn down_clamps_at_last_span(mut review: Review) {
    for _ in 0..40 {
        review.key(NavKey::Down);
    }
    assert_eq!(review.selection().focused_note_index(), Some(14));
    assert_eq!(review.key(NavKey::Down), Dispatched::Ignored);

    review.key(NavKey::Escape);
    assert_eq!(review.key(NavKey::Up), Dispatched::Focus(Some(0)));
    assert_eq!(review.key(NavKey::Up), Dispatched::Ignored);
}

#[rstest]
fn enter_without_focus_does_nothing(mut review: Review) {
    assert_eq!(review.key(NavKey::Enter), Dispatched::Ignored);
    assert!(!review.selection().has_active());
}

#[rstest]
fn navigation_is_suppressed_while_editing(mut review: Review) {
    review.dispatch(ReviewEvent::StartEditing(nid("ns-001"))).unwrap();

    assert_eq!(review.dispatch(ReviewEvent::Key(NavKey::Down)).unwrap(), Dispatched::Ignored);
    assert_eq!(review.dispatch(ReviewEvent::Key(NavKey::Escape)).unwrap(), Dispatched::Ignored);
    assert_eq!(review.selection().focused_note_index(), None);
    assert!(review.input_focused());
}

#[rstest]
fn focus_signal_follows_keyboard(mut review: Review) {
    let mut rx = review.focus_signal();

    review.key(NavKey::Down);
    review.key(NavKey::Down);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Some(1));

    review.focus_span(&nid("ns-010")).unwrap();
    assert_eq!(*rx.borrow_and_update(), Some(9));

    review.key(NavKey::Escape);
    assert_eq!(*rx.borrow_and_update(), None);
}

#[rstest]
fn empty_note_ignores_navigation() {
    let mut record = demo_record();
    record.note_spans.clear();
    let mut review = Review::new(record);

    assert_eq!(review.key(NavKey::Down), Dispatched::Ignored);
    assert_eq!(review.key(NavKey::Up), Dispatched::Ignored);
    assert_eq!(review.selection().focused_note_index_signed(), -1);
    assert!(review.index().is_empty());
}

#[rstest]
fn starting_a_second_edit_discards_the_first_draft(mut review: Review) {
    review.start_editing(&nid("ns-001")).unwrap();
    review.dispatch(ReviewEvent::EditDraft("half-typed".to_owned())).unwrap();

    review.start_editing(&nid("ns-002")).unwrap();

    assert_eq!(review.edit().target(), Some(&nid("ns-002")));
    assert_eq!(review.edit().draft(), span_text(&review, "ns-002"));
    assert_eq!(span_text(&review, "ns-001"), demo_record().note_spans[0].text());
}

#[rstest]
fn draft_events_need_an_open_edit(mut review: Review) {
    let dispatched = review.dispatch(ReviewEvent::EditDraft("x".to_owned())).unwrap();
    assert_eq!(dispatched, Dispatched::Ignored);

    review.dispatch(ReviewEvent::StartEditing(nid("ns-004"))).unwrap();
    review.dispatch(ReviewEvent::CancelEditing).unwrap();
    assert!(!review.edit().is_editing());
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
fn blank_edits_are_rejected_before_any_change(mut review: Review, #[case] text: &str) {
    review.start_editing(&nid("ns-001")).unwrap();

    let err = review.begin_save(&nid("ns-001"), text).unwrap_err();

    assert_eq!(err, EditError::EmptyText);
    assert_eq!(review.note_spans(), demo_record().note_spans.as_slice());
    assert!(review.edit().is_editing());
    assert_eq!(review.pending_saves(), 0);
}

#[rstest]
#[tokio::test]
async fn same_text_save_skips_the_store(mut review: Review) {
    let store = MemoryStore::with_record(demo_record());
    let original = span_text(&review, "ns-005").to_owned();
    review.start_editing(&nid("ns-005")).unwrap();

    let padded = format!("  {original}  ");
    let status = review.save_edit(&store, &nid("ns-005"), &padded).await.unwrap();

    assert_eq!(status, SaveStatus::Unchanged);
    assert_eq!(store.update_calls(), 0);
    assert!(!review.edit().is_editing());
}

#[rstest]
#[tokio::test]
async fn successful_save_trims_and_persists(mut review: Review) {
    let store = MemoryStore::with_record(demo_record());
    review.start_editing(&nid("ns-003")).unwrap();

    let status = review.save_edit(&store, &nid("ns-003"), "  Sunday dread.  ").await.unwrap();

    assert_eq!(status, SaveStatus::Saved);
    assert_eq!(span_text(&review, "ns-003"), "Sunday dread.");
    assert!(!review.edit().is_editing());
    assert_eq!(store.update_calls(), 1);

    let session_id = SessionId::new(DEMO_SESSION_ID).unwrap();
    let stored = store.load_session(&session_id).await.unwrap();
    assert_eq!(stored.note_spans[2].text(), "Sunday dread.");

    let notices = review.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
}

#[rstest]
#[tokio::test]
async fn failed_save_restores_the_pre_edit_collection(mut review: Review) {
    let store = MemoryStore::with_record(demo_record());
    store.fail_note_span_updates(true);
    review.dispatch(ReviewEvent::ClickNoteSpan(nid("ns-010"))).unwrap();

    let status = review.save_edit(&store, &nid("ns-010"), "Rewritten assessment.").await.unwrap();

    assert_eq!(status, SaveStatus::RolledBack);
    assert_eq!(review.note_spans(), demo_record().note_spans.as_slice());
    assert_eq!(active_ids(&review), vec!["ts-004", "ts-006"]);
    let notices = review.take_notices();
    assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Error));
}

#[rstest]
fn optimistic_text_is_visible_before_the_store_answers(mut review: Review) {
    review.start_editing(&nid("ns-001")).unwrap();
    review.dispatch(ReviewEvent::EditDraft("Optimistic".to_owned())).unwrap();

    let SaveOutcome::Pending(pending) = review.begin_save_draft().unwrap() else {
        panic!("expected a pending save");
    };

    assert_eq!(span_text(&review, "ns-001"), "Optimistic");
    assert!(!review.edit().is_editing());
    assert_eq!(review.pending_saves(), 1);
    assert_eq!(pending.text(), "Optimistic");
}

#[rstest]
fn rollback_keeps_earlier_confirmed_saves(mut review: Review) {
    let SaveOutcome::Pending(first) = review.begin_save(&nid("ns-001"), "First").unwrap() else {
        panic!("expected a pending save");
    };
    let SaveOutcome::Pending(second) = review.begin_save(&nid("ns-002"), "Second").unwrap() else {
        panic!("expected a pending save");
    };

    let stored = review.span(&nid("ns-001")).unwrap().clone();
    assert_eq!(review.settle_save(&first, Ok(stored)), SaveStatus::Saved);

    let failure = StoreError::Unavailable("offline".to_owned());
    assert_eq!(review.settle_save(&second, Err(failure)), SaveStatus::RolledBack);

    assert_eq!(span_text(&review, "ns-001"), "First");
    assert_eq!(span_text(&review, "ns-002"), demo_record().note_spans[1].text());
    assert_eq!(review.pending_saves(), 0);
}

#[rstest]
fn settling_an_older_save_does_not_clobber_a_newer_one(mut review: Review) {
    let SaveOutcome::Pending(older) = review.begin_save(&nid("ns-001"), "Older").unwrap() else {
        panic!("expected a pending save");
    };
    let SaveOutcome::Pending(_newer) = review.begin_save(&nid("ns-001"), "Newer").unwrap() else {
        panic!("expected a pending save");
    };

    let mut stored = review.span(&nid("ns-001")).unwrap().clone();
    stored.set_text("Older");
    review.settle_save(&older, Ok(stored));

    assert_eq!(span_text(&review, "ns-001"), "Newer");
    assert_eq!(review.pending_saves(), 1);
}

#[rstest]
#[tokio::test]
async fn signing_cancels_edits_and_locks_the_note(mut review: Review) {
    let store = MemoryStore::with_record(demo_record());
    review.start_editing(&nid("ns-001")).unwrap();

    let receipt = review.sign(&store).await.unwrap();

    assert!(review.is_read_only());
    assert_eq!(review.session().signed_at(), Some(receipt.signed_at));
    assert!(!review.edit().is_editing());
    assert_eq!(review.start_editing(&nid("ns-001")), Err(EditError::ReadOnly));
    assert_eq!(review.begin_save(&nid("ns-001"), "late"), Err(EditError::ReadOnly));
}

#[rstest]
#[tokio::test]
async fn signing_twice_conflicts_and_keeps_the_timestamp(mut review: Review) {
    let store = MemoryStore::with_record(demo_record());
    let receipt = review.sign(&store).await.unwrap();

    let err = review.sign(&store).await.unwrap_err();

    assert!(matches!(err, ReviewError::Sign(SignError::AlreadySigned { signed_at }) if signed_at == receipt.signed_at));
    assert_eq!(review.session().signed_at(), Some(receipt.signed_at));
    assert_eq!(store.sign_calls(), 1);
}

#[rstest]
#[tokio::test]
async fn store_conflict_leaves_session_unchanged(mut review: Review) {
    let store = MemoryStore::with_record(demo_record());
    let session_id = SessionId::new(DEMO_SESSION_ID).unwrap();
    store.sign_session(&session_id).await.unwrap();

    let err = review.sign(&store).await.unwrap_err();

    assert!(matches!(err, ReviewError::Store(StoreError::Conflict { .. })));
    assert!(!review.is_read_only());
    assert_eq!(review.session().signed_at(), None);
}

#[rstest]
fn counts_spans_needing_confirmation(review: Review) {
    assert_eq!(review.needs_confirmation_count(), 3);
    assert_eq!(review.note_span_visual(5), Some(NoteSpanVisual::NeedsConfirmation));
    assert_eq!(review.note_span_visual(99), None);
}
