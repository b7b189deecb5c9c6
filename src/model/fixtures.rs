// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in demo session: a behavioral-health follow-up visit with a generated SOAP note.

use chrono::{TimeZone, Utc};

use super::ids::{NoteSpanId, SegmentId, SessionId};
use super::note::{NoteSection, NoteSpan};
use super::session::{Session, SessionRecord};
use super::transcript::{Speaker, TranscriptSegment};

pub const DEMO_SESSION_ID: &str = "session-001";

const SEGMENTS: &[(&str, Speaker, u64, u64, &str)] = &[
    ("ts-001", Speaker::Clinician, 0, 5_000, "Good morning, Sarah. How have you been feeling since our last session two weeks ago?"),
    ("ts-002", Speaker::Patient, 5_500, 18_000, "Hi Dr. Chen. It's been a mixed bag, honestly. The first week was really tough. I had trouble sleeping most nights, maybe getting only 3-4 hours. But this past week has been a bit better."),
    ("ts-003", Speaker::Clinician, 19_000, 26_000, "I'm glad to hear there's been some improvement. Can you tell me more about what was making it difficult to sleep that first week?"),
    ("ts-004", Speaker::Patient, 27_000, 48_000, "It was the racing thoughts again. I kept replaying conversations from work, worrying about the presentation I have coming up. My mind just wouldn't shut off. I tried the breathing exercises you taught me, and they helped a little, but some nights I still couldn't fall asleep until 3 or 4 AM."),
    ("ts-005", Speaker::Clinician, 49_000, 58_000, "It sounds like work-related anxiety is still a significant trigger for you. Have you been able to identify any patterns in when these thoughts are most intense?"),
    ("ts-006", Speaker::Patient, 59_000, 73_000, "Yes, definitely Sunday evenings are the worst. The anticipation of the work week just floods in. And then Wednesday too, because that's when we have team meetings, and my manager has been pretty critical lately."),
    ("ts-007", Speaker::Clinician, 74_000, 84_000, "That's a valuable insight. How are things going with the medication adjustment we made last time? Any side effects from increasing the sertraline to 100mg?"),
    ("ts-008", Speaker::Patient, 85_000, 104_000, "The first few days I felt a bit nauseous in the mornings, but that went away. I think I'm starting to notice some improvement in my overall mood. The lows don't feel quite as low, if that makes sense. I haven't had any of those really dark days this past week."),
    ("ts-009", Speaker::Clinician, 105_000, 116_000, "That's encouraging progress. The fact that the nausea resolved and you're noticing mood stabilization suggests the increased dose is working. Have you had any thoughts of self-harm or suicide?"),
    ("ts-010", Speaker::Patient, 117_000, 133_000, "No, nothing like that. Even during the bad week, I didn't have those thoughts. I think the worst it got was feeling like I wanted to just disappear from work for a while, but not in a harmful way. More like needing a long vacation."),
    ("ts-011", Speaker::Clinician, 134_000, 142_000, "I'm glad to hear that. Have you been able to maintain any of the self-care activities we discussed? Exercise, spending time outdoors?"),
    ("ts-012", Speaker::Patient, 143_000, 159_000, "I went for walks three times this week, which is more than usual. My sister actually joined me on Sunday, which was nice. Having company made it easier to get out of the house. I haven't been to the gym though."),
    ("ts-013", Speaker::Clinician, 160_000, 168_000, "Walking with your sister sounds like a positive step. Social support is so important. How has your appetite been?"),
    ("ts-014", Speaker::Patient, 169_000, 182_000, "Better than before. I'm eating three meals most days now. I still don't have much appetite in the mornings, but I force myself to have at least some toast or yogurt."),
    ("ts-015", Speaker::Clinician, 183_000, 192_000, "Let's talk about strategies for managing the Sunday evening anxiety. What do you currently do on Sunday evenings?"),
    ("ts-016", Speaker::Patient, 193_000, 206_000, "Usually I end up just scrolling on my phone, reading work emails, trying to get ahead. But then I get more anxious because I see all these things I need to do."),
];

const SPANS: &[(&str, NoteSection, &[&str], &str)] = &[
    ("ns-001", NoteSection::Subjective, &["ts-002"], "Patient reports mixed progress over the past two weeks, with significant sleep difficulties during the first week (3-4 hours per night) followed by improvement in the second week."),
    ("ns-002", NoteSection::Subjective, &["ts-004"], "Sleep disturbance attributed to racing thoughts and work-related anxiety, particularly concerns about an upcoming presentation. Patient utilized breathing exercises with partial effectiveness."),
    ("ns-003", NoteSection::Subjective, &["ts-006"], "Anxiety patterns identified: Sunday evenings (anticipatory anxiety about work week) and Wednesdays (team meetings with critical manager)."),
    ("ns-004", NoteSection::Subjective, &["ts-010"], "Patient denies suicidal ideation or thoughts of self-harm. Reports passive desire to 'disappear from work' but clarifies this as desire for respite rather than harmful intent."),
    ("ns-005", NoteSection::Objective, &["ts-008"], "Medication status: Sertraline increased to 100mg at previous session. Initial side effect of morning nausea resolved within first few days."),
    ("ns-006", NoteSection::Objective, &[], "Patient appears engaged and maintains good eye contact throughout session. Affect is congruent with reported mood improvements."),
    ("ns-007", NoteSection::Objective, &["ts-012"], "Behavioral interventions: Patient engaged in walking 3 times per week, including one social outing with sister. Gym attendance not maintained."),
    ("ns-008", NoteSection::Objective, &["ts-014"], "Appetite improved with patient eating three meals daily. Morning appetite remains reduced but patient demonstrates compensatory behavior."),
    ("ns-009", NoteSection::Assessment, &["ts-008"], "Major Depressive Disorder, recurrent, moderate - showing improvement. Patient reports decreased severity of depressive episodes ('lows don't feel quite as low') and absence of very dark days."),
    ("ns-010", NoteSection::Assessment, &["ts-004", "ts-006"], "Generalized Anxiety Disorder with work-related triggers. Anxiety remains clinically significant but patient demonstrating improved coping strategies."),
    ("ns-011", NoteSection::Assessment, &[], "PHQ-9 score estimated to have decreased by 3 points since last session based on symptom presentation."),
    ("ns-012", NoteSection::Plan, &["ts-008", "ts-009"], "Continue sertraline 100mg daily. Monitor for continued mood stabilization and any emerging side effects."),
    ("ns-013", NoteSection::Plan, &["ts-015", "ts-016"], "Implement Sunday evening anxiety management protocol: No work email after 6 PM, structured relaxation activity, sleep hygiene reinforcement."),
    ("ns-014", NoteSection::Plan, &["ts-012"], "Encourage continued walking routine with social component. Discuss gradual return to gym at next session."),
    ("ns-015", NoteSection::Plan, &[], "Follow-up appointment scheduled in two weeks. Patient to contact clinic if sleep disturbance worsens or if any concerning symptoms emerge."),
];

/// The demo session, unsigned, with every segment and span in load order.
pub fn demo_record() -> SessionRecord {
    let session_date = Utc
        .with_ymd_and_hms(2024, 11, 15, 10, 0, 0)
        .single()
        .expect("hard-coded demo session date is valid");
    let session = Session::new(
        SessionId::new(DEMO_SESSION_ID).expect("hard-coded demo session id is valid"),
        "Sarah M.",
        "Dr. Emily Chen",
        session_date,
        45 * 60 * 1000,
    );

    let segments = SEGMENTS
        .iter()
        .zip(1u32..)
        .map(|(&(id, speaker, start_ms, end_ms, text), order)| {
            TranscriptSegment::new(segment_id(id), speaker, text, start_ms, end_ms, order)
                .expect("hard-coded demo segment timing is valid")
        })
        .collect();

    let spans = SPANS
        .iter()
        .zip(1u32..)
        .map(|(&(id, section, citations, text), order)| {
            NoteSpan::new(
                NoteSpanId::new(id).expect("hard-coded demo note span id is valid"),
                section,
                text,
                citations.iter().map(|citation| segment_id(citation)),
                order,
            )
        })
        .collect();

    SessionRecord::new(session, segments, spans)
}

fn segment_id(value: &str) -> SegmentId {
    SegmentId::new(value).expect("hard-coded demo segment id is valid")
}
