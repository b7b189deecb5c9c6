// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A session record carries the session header, the ordered transcript and the ordered note
//! spans whose citations point back into that transcript.

pub mod fixtures;
pub mod ids;
pub mod note;
pub mod session;
pub mod transcript;

pub use ids::{Id, IdError, NoteSpanId, SegmentId, SessionId};
pub use note::{NoteSection, NoteSpan, ParseNoteSectionError};
pub use session::{Session, SessionRecord, SessionStateError, SessionStatus, SignError};
pub use transcript::{ParseSpeakerError, SegmentTimingError, Speaker, TranscriptSegment};
