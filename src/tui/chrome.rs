// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Layout, title, header, footer and pane-content helpers used by TUI rendering.

fn stack_panes_vertically(area: Rect) -> bool {
    area.width < 100
}

/// Rows occupied by one entity inside a pane's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowSpan {
    start: usize,
    height: usize,
}

impl RowSpan {
    fn contains(self, row: usize) -> bool {
        row >= self.start && row < self.start + self.height
    }
}

/// Rendered pane content plus where each entity landed.
struct PaneContent {
    lines: Vec<Line<'static>>,
    rows: Vec<RowSpan>,
}

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

/// Greedy word wrap on character counts. Words longer than `width` are split.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let word_len = word.chars().count();
            let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(word);
                current_len += word_len;
                break;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let split_at = word.char_indices().nth(width).map_or(word.len(), |(idx, _)| idx);
            lines.push(word[..split_at].to_owned());
            word = &word[split_at..];
            if word.is_empty() {
                break;
            }
        }
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Scroll offset that puts `target` in the middle of a `viewport`-row window.
fn centered_scroll(target: RowSpan, viewport: usize, content: usize) -> u16 {
    let max_scroll = content.saturating_sub(viewport);
    let middle = target.start + target.height / 2;
    let scroll = middle.saturating_sub(viewport / 2).min(max_scroll);
    u16::try_from(scroll).unwrap_or(u16::MAX)
}

/// `mm:ss` (or `h:mm:ss` past the hour) from a millisecond offset.
fn format_timestamp(ms: u64) -> String {
    let total_secs = ms / 1000;
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes} min")
    }
}

fn header_line(review: &Review, theme: &TuiTheme) -> Line<'static> {
    let session = review.session();
    let mut spans = vec![
        Span::styled(session.patient_name().to_owned(), theme.base_style().add_modifier(Modifier::BOLD)),
        Span::styled(" · ", theme.muted_style()),
        Span::styled(session.clinician_name().to_owned(), theme.base_style()),
        Span::styled(" · ", theme.muted_style()),
        Span::styled(session.session_date().format("%b %e, %Y %H:%M").to_string(), theme.base_style()),
        Span::styled(" · ", theme.muted_style()),
        Span::styled(format_duration(session.duration_ms()), theme.base_style()),
        Span::styled(" · ", theme.muted_style()),
        Span::styled(session.status().as_str().to_uppercase(), theme.status_style(session.is_signed())),
    ];
    if let Some(signed_at) = session.signed_at() {
        spans.push(Span::styled(
            format!(" {}", signed_at.format("%Y-%m-%d %H:%M UTC")),
            theme.muted_style(),
        ));
    }
    let flagged = review.needs_confirmation_count();
    if flagged > 0 {
        spans.push(Span::styled(" · ", theme.muted_style()));
        spans.push(Span::styled(format!("{flagged} need review"), theme.warning_style()));
    }
    if review.pending_saves() > 0 {
        spans.push(Span::styled(" · saving…", theme.muted_style()));
    }
    Line::from(spans)
}

fn transcript_content(review: &Review, theme: &TuiTheme, width: usize) -> PaneContent {
    let mut lines = Vec::new();
    let mut rows = Vec::with_capacity(review.segments().len());
    let text_width = width.saturating_sub(2);

    for segment in review.segments() {
        let start = lines.len();
        let visual = review.segment_visual(segment.id());
        let style = theme.segment_style(visual);
        let marker = if visual == SegmentVisual::Active { "▌ " } else { "  " };

        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(segment.speaker().label(), theme.speaker_style(segment.speaker())),
            Span::styled(format!("  {}", format_timestamp(segment.start_ms())), theme.muted_style()),
        ]));
        for row in wrap_words(segment.text(), text_width) {
            lines.push(Line::from(vec![Span::styled(marker, style), Span::styled(row, style)]));
        }
        rows.push(RowSpan { start, height: lines.len() - start });
        lines.push(Line::default());
    }

    PaneContent { lines, rows }
}

fn note_content(review: &Review, theme: &TuiTheme, width: usize) -> PaneContent {
    let mut lines = Vec::new();
    let mut rows = vec![RowSpan { start: 0, height: 0 }; review.note_spans().len()];
    let text_width = width.saturating_sub(5);

    for group in spans_by_section(review.note_spans()) {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", group.section.letter()), theme.key_style()),
            Span::styled(group.section.label(), theme.section_style()),
            Span::styled(format!("  {}", group.section.description()), theme.muted_style()),
        ]));

        for position in group.span_indices {
            let span = &review.note_spans()[position];
            let visual = review.note_span_visual(position).unwrap_or(NoteSpanVisual::Default);
            let style = theme.note_span_style(visual);
            let editing = review.edit().is_editing_span(span.id());
            let badge = if span.needs_confirmation() {
                "[!] ".to_owned()
            } else {
                format!("[{}] ", span.citation_count())
            };
            let text = if editing {
                format!("{}▏", review.edit().draft())
            } else {
                span.text().to_owned()
            };
            let text_style = if editing { theme.panel_border_style(true) } else { style };

            let start = lines.len();
            for (idx, row) in wrap_words(&text, text_width).into_iter().enumerate() {
                let lead = if idx == 0 { badge.clone() } else { "    ".to_owned() };
                let lead_style = if span.needs_confirmation() { theme.warning_style() } else { theme.muted_style() };
                lines.push(Line::from(vec![
                    Span::raw(" "),
                    Span::styled(lead, lead_style),
                    Span::styled(row, text_style),
                ]));
            }
            rows[position] = RowSpan { start, height: lines.len() - start };
        }
        lines.push(Line::default());
    }

    PaneContent { lines, rows }
}

fn footer_line(app: &App) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let theme = &app.theme;

    if app.sign_prompt {
        let flagged = app.review.as_ref().map_or(0, Review::needs_confirmation_count);
        if flagged > 0 {
            spans.push(Span::styled(
                format!("{flagged} statements need review. "),
                theme.warning_style(),
            ));
        }
        spans.push(Span::styled("Sign this note? ", theme.base_style()));
        push_footer_entry(&mut spans, theme, "CONFIRM", "y");
        push_footer_entry(&mut spans, theme, "CANCEL", "any");
        return Line::from(spans);
    }

    match app.review.as_ref() {
        None => push_footer_entry(&mut spans, theme, "QUIT", "q"),
        Some(review) if review.edit().is_editing() => {
            push_footer_entry(&mut spans, theme, "SAVE", "⏎");
            push_footer_entry(&mut spans, theme, "CANCEL", "esc");
        }
        Some(review) => {
            push_footer_entry(&mut spans, theme, "MOVE", "jk");
            push_footer_entry(&mut spans, theme, "SELECT", "⏎");
            push_footer_entry(&mut spans, theme, "CLEAR", "esc");
            if !review.is_read_only() {
                push_footer_entry(&mut spans, theme, "EDIT", "e");
                push_footer_entry(&mut spans, theme, "SIGN", "S");
            }
            push_footer_entry(&mut spans, theme, "QUIT", "q");
        }
    }

    if let Some(toast) = app.toast.as_ref() {
        spans.push(Span::styled(" | ", theme.muted_style()));
        let style = match toast.level {
            NoticeLevel::Info => theme.base_style(),
            NoticeLevel::Error => theme.error_style(),
        };
        spans.push(Span::styled(toast.message.clone(), style));
    }
    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, theme: &TuiTheme, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", theme.muted_style()));
    }
    spans.push(Span::styled(format!("{}:", footer_label_ucfirst(label)), theme.muted_style()));
    spans.push(Span::styled(value.to_owned(), theme.key_style()));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first.to_uppercase().chain(chars).collect()
}
