use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, Wrap,
};

use crate::watchlist::{EntryStatus, ScheduleRow};

use super::super::display::{format_published, release_marker, truncate};
use super::super::state::AppState;
use super::{Pane, View};

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);
const TODAY: Color = Color::Rgb(120, 220, 140);
const PENDING: Color = Color::Rgb(215, 140, 255);

pub(super) fn draw_tui(frame: &mut Frame, state: &AppState, view: &mut View) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let rows = state.rows();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "SUBWATCH",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} releases", state.releases().len()),
            Style::default().fg(MUTED),
        ),
        Span::raw("   "),
        Span::styled(format!("{} watched", rows.len()), Style::default().fg(MUTED)),
        Span::raw("   "),
        Span::styled(view.focus.label(), Style::default().fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Dashboard", false));
    frame.render_widget(header, chunks[0]);

    draw_releases(frame, chunks[1], state, view);
    draw_watchlist(frame, chunks[2], &rows, view);

    let controls = Paragraph::new(Line::from(Span::styled(
        "Tab switch  ↑/↓ move  a add  d remove  Enter download  r refresh  q quit",
        Style::default().fg(MUTED),
    )))
    .alignment(Alignment::Center)
    .block(panel_block("Controls", false));
    frame.render_widget(controls, chunks[3]);

    let status = Paragraph::new(view.status.clone())
        .style(status_style(&view.status))
        .block(panel_block("Status", false));
    frame.render_widget(status, chunks[4]);

    if let Some(pending) = view.pending_remove.as_ref() {
        let text = format!(
            "Remove from watchlist?\n\n{}\n\n[y / Enter] Remove   [n / Esc] Cancel",
            truncate(&pending.series, 56)
        );
        let area = centered_rect(60, 9, frame.area());
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel_block("Confirm Remove", true).padding(Padding::new(2, 2, 1, 1)));
        frame.render_widget(popup, area);
    }
}

fn draw_releases(frame: &mut Frame, area: Rect, state: &AppState, view: &mut View) {
    let rows: Vec<Row> = state
        .releases()
        .iter()
        .enumerate()
        .map(|(index, release)| {
            let style = if release.in_watchlist {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(230, 230, 230))
            };
            let when_style = if release.is_today {
                Style::default().fg(TODAY)
            } else {
                Style::default().fg(MUTED)
            };
            Row::new(vec![
                Cell::from(index.to_string()),
                Cell::from(release_marker(release)),
                Cell::from(release.record.title.clone()),
                Cell::from(format_published(&release.record.published_at)).style(when_style),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(17),
        ],
    )
    .header(header_row(["#", "", "Release", "Published"]))
    .block(panel_block("Releases", view.focus == Pane::Releases))
    .row_highlight_style(highlight_style())
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, area, &mut view.releases);
}

fn draw_watchlist(frame: &mut Frame, area: Rect, rows: &[ScheduleRow], view: &mut View) {
    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let style = match row.status {
                EntryStatus::NoEpisodes => Style::default().fg(MUTED),
                EntryStatus::Pending => Style::default().fg(PENDING),
                EntryStatus::Downloaded => Style::default().fg(Color::Rgb(230, 230, 230)),
            };
            let next_style = if row.next_release_is_today && row.status == EntryStatus::Downloaded
            {
                Style::default().fg(TODAY).add_modifier(Modifier::BOLD)
            } else {
                style
            };
            Row::new(vec![
                Cell::from(row.index.to_string()),
                Cell::from(row.series.clone()),
                Cell::from(row.latest_episode.to_string()),
                Cell::from(row.status.label()),
                Cell::from(row.next_release_label()).style(next_style),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(18),
            Constraint::Length(17),
        ],
    )
    .header(header_row(["#", "Series", "Ep", "Status", "Next release"]))
    .block(panel_block("Watchlist", view.focus == Pane::Watchlist))
    .row_highlight_style(highlight_style())
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, area, &mut view.watchlist);
}

fn header_row<const N: usize>(labels: [&'static str; N]) -> Row<'static> {
    Row::new(labels.to_vec()).style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
}

fn highlight_style() -> Style {
    Style::default()
        .bg(ACCENT)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn panel_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(125, 135, 150))
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(title)
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(205, 165, 255))
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.max(1));
    let height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
