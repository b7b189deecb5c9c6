// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Notecite: terminal review of AI-drafted SOAP notes against the session transcript.
//!
//! Every note statement cites the transcript segments it was drawn from. [`review::Review`]
//! keeps the cross-navigation, editing and signing state; [`store`] persists sessions and
//! [`tui`] renders them.

pub mod logging;
pub mod model;
pub mod query;
pub mod review;
pub mod store;
pub mod tui;
