// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

use crate::model::Speaker;
use crate::review::{NoteSpanVisual, SegmentVisual};

pub(crate) const PALETTE_ENV: &str = "NOTECITE_PALETTE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: String, value: String },
}

/// Named colors the renderer uses. Any subset can be overridden from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Fg,
    Bg,
    Clinician,
    Patient,
    Citation,
    Warning,
    Focus,
    Muted,
    Error,
    Success,
}

impl Role {
    const ALL: [Self; 10] = [
        Self::Fg,
        Self::Bg,
        Self::Clinician,
        Self::Patient,
        Self::Citation,
        Self::Warning,
        Self::Focus,
        Self::Muted,
        Self::Error,
        Self::Success,
    ];

    fn idx(self) -> usize {
        self as usize
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Fg => "fg",
            Self::Bg => "bg",
            Self::Clinician => "clinician",
            Self::Patient => "patient",
            Self::Citation => "citation",
            Self::Warning => "warning",
            Self::Focus => "focus",
            Self::Muted => "muted",
            Self::Error => "error",
            Self::Success => "success",
        }
    }

    fn default_color(self) -> Color {
        match self {
            Self::Fg | Self::Bg => Color::Reset,
            Self::Clinician => Color::LightBlue,
            Self::Patient => Color::LightMagenta,
            Self::Citation => Color::Cyan,
            Self::Warning => Color::Yellow,
            Self::Focus => Color::LightGreen,
            Self::Muted => Color::DarkGray,
            Self::Error => Color::Red,
            Self::Success => Color::Green,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                let known = Self::ALL.map(Role::as_str).join(", ");
                format!("unknown role `{}` (expected one of {known})", value.trim())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TuiTheme {
    colors: [Color; Role::ALL.len()],
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self { colors: Role::ALL.map(Role::default_color) }
    }
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(PALETTE_ENV) {
            Ok(value) => Self::from_overrides(&value).map_err(|error| ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_owned(),
                value: format!("{} ({error})", value.trim()),
            }),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            }),
        }
    }

    /// Parses `role=color` pairs separated by commas on top of the defaults.
    pub(crate) fn from_overrides(value: &str) -> Result<Self, String> {
        let mut theme = Self::default();
        for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let Some((role, color)) = entry.split_once('=') else {
                return Err(format!("expected role=color, got `{entry}`"));
            };
            let role = role.parse::<Role>()?;
            theme.colors[role.idx()] = parse_palette_color(color)?;
        }
        Ok(theme)
    }

    fn color(&self, role: Role) -> Color {
        self.colors[role.idx()]
    }

    pub(crate) fn base_style(&self) -> Style {
        Style::default().fg(self.color(Role::Fg)).bg(self.color(Role::Bg))
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.color(Role::Focus))
        } else {
            self.base_style()
        }
    }

    pub(crate) fn muted_style(&self) -> Style {
        self.base_style().fg(self.color(Role::Muted))
    }

    pub(crate) fn key_style(&self) -> Style {
        self.base_style().fg(self.color(Role::Citation)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn section_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub(crate) fn speaker_style(&self, speaker: Speaker) -> Style {
        let role = match speaker {
            Speaker::Clinician => Role::Clinician,
            Speaker::Patient => Role::Patient,
        };
        self.base_style().fg(self.color(role)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn note_span_style(&self, visual: NoteSpanVisual) -> Style {
        match visual {
            NoteSpanVisual::NeedsConfirmation => self.base_style().fg(self.color(Role::Warning)),
            NoteSpanVisual::Active => self
                .base_style()
                .fg(Color::Black)
                .bg(self.color(Role::Citation))
                .add_modifier(Modifier::BOLD),
            NoteSpanVisual::Highlighted => self.base_style().add_modifier(Modifier::REVERSED),
            NoteSpanVisual::Default => self.base_style(),
        }
    }

    pub(crate) fn segment_style(&self, visual: SegmentVisual) -> Style {
        match visual {
            SegmentVisual::Active => self
                .base_style()
                .fg(Color::Black)
                .bg(self.color(Role::Citation))
                .add_modifier(Modifier::BOLD),
            SegmentVisual::Hovered => self.base_style().add_modifier(Modifier::REVERSED),
            SegmentVisual::Cited => self.base_style(),
            SegmentVisual::Inert => self.muted_style(),
        }
    }

    pub(crate) fn status_style(&self, signed: bool) -> Style {
        let role = if signed { Role::Success } else { Role::Warning };
        self.base_style().fg(self.color(role)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn warning_style(&self) -> Style {
        self.base_style().fg(self.color(Role::Warning))
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.color(Role::Error))
    }
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_string());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != 3 {
            return Err(format!("invalid rgb: value: {trimmed}"));
        }
        let r = parse_hex_channel(parts[0])?;
        let g = parse_hex_channel(parts[1])?;
        let b = parse_hex_channel(parts[2])?;
        return Ok(Color::Rgb(r, g, b));
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let [_, r, g, b] = rgb.to_be_bytes();
    Ok(Color::Rgb(r, g, b))
}

fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    match value.len() {
        2 => u8::from_str_radix(value, 16).map_err(|_| format!("invalid rgb: component {value}")),
        4 => u16::from_str_radix(value, 16)
            .map(|parsed| (parsed >> 8) as u8)
            .map_err(|_| format!("invalid rgb: component {value}")),
        _ => Err(format!("invalid rgb: component {value} (expected 2 or 4 hex digits)")),
    }
}
