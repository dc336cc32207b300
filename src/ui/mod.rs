mod popup;
mod user_detail;
mod user_list;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, ListItem, Paragraph};
use ratatui::Frame;

use crate::app::{App, Screen};
use crate::error::{ListError, Resource};
use crate::list_machine::LoadMore;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.directory.detail() {
        Some(detail) => {
            user_detail::render(frame, detail, chunks[1]);
            if let Some(web) = detail.web() {
                popup::render_web(frame, web);
            }
        }
        None => user_list::render(frame, &app.directory, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.directory.detail() {
        Some(detail) => match detail.web() {
            Some(web) => format!("ghdir - {}", web.url()),
            None => format!("ghdir - {}", detail.user().username),
        },
        None => "ghdir - GitHub Users".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(status) = &app.status {
        Line::from(vec![Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.screen() {
            Screen::Directory => {
                "j/k/g/G: nav | Enter: open | n: load more | r: refresh | q: quit"
            }
            Screen::Detail => "j/k/g/G: nav | Enter: open | n: load more | r: refresh | q: back",
            Screen::Web => "o: open in browser | y: copy url | q: close",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Placeholder for the list region while the first page loads
fn render_loading(frame: &mut Frame, title: &str, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let loading = Paragraph::new("Loading...")
        .block(block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(loading, area);
}

/// The error replaces the list region until the next refresh
fn render_list_error(
    frame: &mut Frame,
    title: &str,
    error: ListError,
    resource: Resource,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            error.message(resource),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to refresh",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Trailing row below a loaded list
fn load_more_item(state: LoadMore, selected: bool) -> ListItem<'static> {
    let (text, color) = match state {
        LoadMore::Idle => ("Load more", Color::Blue),
        LoadMore::Loading => ("Loading...", Color::Yellow),
        LoadMore::Hidden => ("End of list.", Color::DarkGray),
    };
    let mut style = Style::default().fg(color);
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }
    ListItem::new(Line::from(Span::styled(format!("  {}", text), style)))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
