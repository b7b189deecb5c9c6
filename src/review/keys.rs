// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Escape,
}

impl NavKey {
    /// Vim-style letter aliases.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'j' => Some(Self::Down),
            'k' => Some(Self::Up),
            _ => None,
        }
    }
}

/// Next focus for a movement key over `len` spans; `None` is "no focus".
///
/// Down clamps at the last span, Up clamps at the first (Up without focus lands on the first).
/// With no spans there is nothing to focus and the focus stays cleared.
pub fn step_focus(current: Option<usize>, len: usize, key: NavKey) -> Option<usize> {
    let last = len.checked_sub(1)?;
    match key {
        NavKey::Down => Some(current.map_or(0, |idx| idx.saturating_add(1)).min(last)),
        NavKey::Up => Some(current.map_or(0, |idx| idx.saturating_sub(1)).min(last)),
        NavKey::Enter => current.map(|idx| idx.min(last)),
        NavKey::Escape => None,
    }
}

/// Publishes the keyboard focus so a renderer can follow it.
#[derive(Debug)]
pub struct FocusSignal {
    tx: watch::Sender<Option<usize>>,
}

impl Default for FocusSignal {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }
}

impl FocusSignal {
    pub fn subscribe(&self) -> watch::Receiver<Option<usize>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<usize> {
        *self.tx.borrow()
    }

    /// Only notifies subscribers when the focus actually moved.
    pub(crate) fn publish(&self, focus: Option<usize>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == focus {
                false
            } else {
                *current = focus;
                true
            }
        })
    }
}
