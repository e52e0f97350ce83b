use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::api::{ManageQueue, Meeting, User};
use crate::editor::ControllerKind;

use super::app::{EditorApp, Modal, Pane};
use super::resource::Resource;

const KEY_HELP: &str =
    "Tab pane · ↑/↓ select · a add · d remove · n rename · e description · D delete queue · r refresh · q quit";

pub fn render(f: &mut Frame, app: &mut EditorApp) {
    let snapshot = app.editor().snapshot();
    let status = app.page_status();
    app.sync_selection(snapshot.queue.as_ref());

    let banner_height = if status.error.is_some() || app.notice().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let fetch_status = app.editor().controller_status(ControllerKind::FetchQueue);
    let queue = Resource::from_snapshot(snapshot.queue.as_ref(), &fetch_status);

    render_header(f, chunks[0], app, &queue, status.loading);

    if let Some(message) = status.error_message() {
        let banner = Paragraph::new(message)
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Error"));
        f.render_widget(banner, chunks[1]);
    } else if let Some(notice) = app.notice() {
        let banner = Paragraph::new(notice.to_string())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(banner, chunks[1]);
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    match queue {
        Resource::Success(queue) => {
            render_hosts(f, body[0], app, queue, status.changing);
            render_meetings(f, body[1], app, queue, status.changing);
        }
        Resource::Loading | Resource::NotAsked => {
            let loading = Paragraph::new("Loading queue...")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(loading, chunks[2]);
        }
        Resource::Failure(_) => {
            let empty = Paragraph::new("The queue could not be loaded. Press r to retry.")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, chunks[2]);
        }
    }

    let instructions = Paragraph::new(KEY_HELP)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(instructions, chunks[3]);

    match app.modal() {
        Some(Modal::Input { kind, buffer }) => render_input(f, kind.title(), buffer),
        Some(Modal::Confirm { confirmation, confirm_selected }) => render_confirm(
            f,
            confirmation.title(),
            &confirmation.body(),
            *confirm_selected,
        ),
        None => {}
    }
}

fn render_header(
    f: &mut Frame,
    area: Rect,
    app: &EditorApp,
    queue: &Resource<&ManageQueue>,
    loading: bool,
) {
    let mut title = format!("Queue {}", app.editor().queue_id());
    if loading {
        title.push_str(" · loading…");
    }

    let lines = match queue {
        Resource::Success(queue) => vec![
            Line::from(Span::styled(
                queue.name.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("URL: ", Style::default().fg(Color::Gray)),
                Span::raw(app.queue_url()),
            ]),
            Line::from(vec![
                Span::styled("Created: ", Style::default().fg(Color::Gray)),
                Span::raw(queue.created_at.format("%B %-d, %Y").to_string()),
            ]),
            Line::from(vec![
                Span::styled("Description: ", Style::default().fg(Color::Gray)),
                Span::raw(queue.description.clone()),
            ]),
        ],
        _ => vec![Line::from(app.queue_url())],
    };

    let header = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(header, area);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn render_hosts(f: &mut Frame, area: Rect, app: &mut EditorApp, queue: &ManageQueue, changing: bool) {
    let removable = queue.can_remove_host() && !changing;
    let items: Vec<ListItem> = queue
        .hosts
        .iter()
        .map(|host: &User| {
            let remove_hint = if removable { "" } else { "  (cannot remove)" };
            ListItem::new(Line::from(vec![
                Span::styled(host.display_name(), Style::default().fg(Color::White)),
                Span::styled(remove_hint, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let focused = app.pane() == Pane::Hosts;
    let list = List::new(items)
        .block(pane_block(format!("Hosts ({})", queue.hosts.len()), focused))
        .highlight_style(highlight())
        .highlight_symbol("► ");
    f.render_stateful_widget(list, area, &mut app.hosts);
}

fn meeting_line(meeting: &Meeting) -> Line<'static> {
    let attendee = meeting
        .primary_attendee()
        .map(|u| u.display_name())
        .unwrap_or_else(|| "(no attendee)".to_string());

    let mut spans = vec![Span::styled(attendee, Style::default().fg(Color::White))];
    if let Some(url) = meeting.backend.join_url() {
        spans.push(Span::styled(format!("  {}", url), Style::default().fg(Color::Blue)));
    } else if let Some(backend) = meeting.backend.backend_type() {
        spans.push(Span::styled(format!("  [{}]", backend), Style::default().fg(Color::Gray)));
    }
    if meeting.started_at.is_some() {
        spans.push(Span::styled("  started", Style::default().fg(Color::Green)));
    }
    Line::from(spans)
}

fn render_meetings(f: &mut Frame, area: Rect, app: &mut EditorApp, queue: &ManageQueue, changing: bool) {
    let items: Vec<ListItem> = queue.meeting_set.iter().map(|m| ListItem::new(meeting_line(m))).collect();

    let mut title = format!("Meetings Up Next ({})", queue.meeting_set.len());
    if changing {
        title.push_str(" · saving…");
    }

    let focused = app.pane() == Pane::Meetings;
    let list = List::new(items)
        .block(pane_block(title, focused))
        .highlight_style(highlight())
        .highlight_symbol("► ");
    f.render_stateful_widget(list, area, &mut app.meetings);
}

/// Centered rect with the given percentage width and fixed height
fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_input(f: &mut Frame, title: &str, buffer: &str) {
    let area = centered(f.area(), 60, 5);
    f.render_widget(Clear, area);

    let input = Paragraph::new(vec![
        Line::from(format!("{}▏", buffer)),
        Line::from(Span::styled("Enter to save, Esc to cancel", Style::default().fg(Color::Gray))),
    ])
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(input, area);
}

fn render_confirm(f: &mut Frame, title: &str, message: &str, confirm_selected: bool) {
    let area = centered(f.area(), 50, 9);
    f.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(3)])
        .split(inner);

    let message = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let button = |label: &'static str, selected: bool, bg: Color| {
        let style = if selected {
            Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Paragraph::new(label)
            .block(Block::default().borders(Borders::ALL).border_style(style))
            .style(style)
            .alignment(Alignment::Center)
    };
    f.render_widget(button("Yes", confirm_selected, Color::Red), buttons[0]);
    f.render_widget(button("No", !confirm_selected, Color::Green), buttons[1]);
}
