//! Layout rendering (top bar, sidebar panes, details, status line)

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
};

use super::terminal::{Focus, TerminalView};
use super::utils::{border_style, item_style, render_scrollable_list, truncate_string};

/// Tags reachable through the 1-9 shortcuts
pub const SHORTCUT_TAGS: usize = 9;

pub fn render_top_bar(frame: &mut Frame, area: Rect, view: &TerminalView) {
    let project = match view.saved {
        Some((ref label, _)) => label.as_str(),
        None => "new project",
    };

    let title_style = if view.dirty {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };

    let line = Line::from(vec![
        Span::styled(view.title(), title_style),
        Span::raw("  "),
        Span::styled(project, Style::default().fg(Color::Cyan)),
    ]);

    let top = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(top, area);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, view: &TerminalView) {
    let mut constraints = vec![
        Constraint::Percentage(60), // Files
        Constraint::Min(0),         // Tags
    ];
    if let Some(ref sorting) = view.sorting {
        constraints.push(Constraint::Length(sorting.outputs.len() as u16 + 2));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_file_list(frame, chunks[0], view);
    render_tag_list(frame, chunks[1], view);
    if view.sorting.is_some() {
        render_output_list(frame, chunks[2], view);
    }
}

fn render_file_list(frame: &mut Frame, area: Rect, view: &TerminalView) {
    let focused = view.focus == Focus::Files;
    let selected = view.selected_file();
    let width = area.width.saturating_sub(10) as usize;

    let items: Vec<ListItem> = view
        .files
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let text = if entry.tag_count > 0 {
                format!("{} ({})", truncate_string(&entry.name, width), entry.tag_count)
            } else {
                truncate_string(&entry.name, width)
            };
            ListItem::new(text).style(item_style(Some(i) == selected, focused))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Files ({}) ", view.files.len()))
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused));

    render_scrollable_list(frame, area, items, selected, block);
}

fn render_tag_list(frame: &mut Frame, area: Rect, view: &TerminalView) {
    let focused = view.focus == Focus::Tags;

    let items: Vec<ListItem> = view
        .tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let check = if view.checked.contains(tag) { "[x]" } else { "[ ]" };
            let text = if i < SHORTCUT_TAGS {
                format!("{} {} {}", check, i + 1, tag)
            } else {
                format!("{}   {}", check, tag)
            };
            ListItem::new(text).style(item_style(i == view.tag_cursor, focused))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tags ")
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused));

    let selected = (!view.tags.is_empty()).then_some(view.tag_cursor);
    render_scrollable_list(frame, area, items, selected, block);
}

fn render_output_list(frame: &mut Frame, area: Rect, view: &TerminalView) {
    let Some(ref sorting) = view.sorting else {
        return;
    };
    let focused = view.focus == Focus::Outputs;

    let items: Vec<ListItem> = sorting
        .outputs
        .iter()
        .enumerate()
        .map(|(i, label)| ListItem::new(label.clone()).style(item_style(i == sorting.cursor, focused)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Outputs ")
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused));

    render_scrollable_list(frame, area, items, Some(sorting.cursor), block);
}

pub fn render_details(frame: &mut Frame, area: Rect, view: &TerminalView) {
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = match view.current_path {
        Some(ref path) => {
            let tags = if view.checked.is_empty() {
                "none".to_string()
            } else {
                view.checked
                    .iter()
                    .map(|tag| tag.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            vec![
                Line::from(vec![Span::styled("Path  ", label), Span::raw(path.display().to_string())]),
                Line::from(vec![Span::styled("Tags  ", label), Span::raw(tags)]),
            ]
        }
        None => vec![Line::from(Span::styled("No image selected", label))],
    };

    if let Some(ref sorting) = view.sorting {
        let assigned = sorting.assigned.as_deref().unwrap_or("unassigned");
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![Span::styled("Sort  ", label), Span::raw(assigned)]));
        lines.push(Line::from(vec![
            Span::styled("Queue ", label),
            Span::raw(format!("{} pending", sorting.pending)),
        ]));
    }

    let details = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Image ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(details, area);
}

pub fn render_status_line(frame: &mut Frame, area: Rect, view: &TerminalView) {
    let text = match (&view.status, &view.saved) {
        (Some(status), _) => status.clone(),
        (None, Some((label, at))) => format!("Saved to {} at {}", label, at.format("%H:%M:%S")),
        (None, None) => "Not saved yet".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", text), Style::default().fg(Color::White)),
        Span::styled(" H help · Q quit", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
