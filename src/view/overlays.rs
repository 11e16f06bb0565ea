//! Overlay rendering (error notification, text prompt, help popup)

use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::terminal::{Prompt, PromptKind};
use super::utils::centered_rect;

pub fn render_error_notification(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let popup_width = 52u16.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize; // account for borders

    // Calculate how many lines the message will take when wrapped
    let line_count = message.chars().count().div_ceil(inner_width) as u16;
    let popup_height = 2 + line_count.max(1);

    let popup_area = centered_rect(area, popup_width, popup_height);

    // Clear the area behind the popup first
    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(error_widget, popup_area);
}

pub fn render_prompt(frame: &mut Frame, prompt: &Prompt) {
    let popup_area = centered_rect(frame.area(), 60, 3);
    frame.render_widget(Clear, popup_area);

    let text = match prompt.kind {
        PromptKind::ConfirmPerform => Line::from(Span::raw("y = perform, n / Esc = cancel")),
        _ => Line::from(vec![
            Span::raw(prompt.input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    };

    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(prompt.kind.title())
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(input, popup_area);
}

pub fn render_help_popup(frame: &mut Frame, sorting: bool) {
    let mut keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Switch pane"),
        ("Up / Down", "Select image, tag or output"),
        ("N / P", "Next / previous image"),
        ("", ""),
        ("", "── Tags ──"),
        ("Space / Enter", "Toggle highlighted tag"),
        ("1-9", "Toggle tag by number"),
        ("A", "Add tag"),
        ("R", "Rename highlighted tag"),
        ("D", "Delete highlighted tag"),
        ("", ""),
        ("", "── Project ──"),
        ("I", "Add image"),
        ("O", "Open project"),
        ("S / Ctrl+S", "Save"),
        ("Shift+S", "Save as"),
    ];
    if sorting {
        keybindings.extend([
            ("", ""),
            ("", "── Sorting ──"),
            ("Enter (outputs)", "Assign and go to next image"),
            ("U", "Unassign current image"),
            ("Shift+P", "Perform assignments"),
        ]);
    }
    keybindings.extend([
        ("", ""),
        ("", "── General ──"),
        ("H / ?", "Toggle this help"),
        ("Q", "Quit"),
    ]);

    let popup_area = centered_rect(frame.area(), 62, keybindings.len() as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
