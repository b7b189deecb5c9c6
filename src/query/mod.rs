// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a session record.
//!
//! Queries provide derived views (citation lookups, section grouping) that power the review
//! state and the renderer. None of them mutate their input.

pub mod citations;
pub mod sections;

pub use citations::CitationIndex;
pub use sections::{needs_confirmation_count, spans_by_section, SectionGroup};
