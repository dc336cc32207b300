use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::detail::{Profile, UserDetailScreen};
use crate::error::Resource;
use crate::list_machine::Phase;
use crate::types::Repository;

use super::{load_more_item, render_list_error, render_loading, truncate};

pub fn render(frame: &mut Frame, screen: &UserDetailScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    render_profile(frame, screen, chunks[0]);
    render_repositories(frame, screen, chunks[1]);
}

fn render_profile(frame: &mut Frame, screen: &UserDetailScreen, area: Rect) {
    let user = screen.user();

    let mut lines = Vec::with_capacity(3);
    match screen.profile() {
        Profile::Loaded(detail) => {
            let mut title = Vec::new();
            if let Some(name) = &detail.name {
                title.push(Span::styled(
                    name.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                title.push(Span::raw("  "));
            }
            title.push(Span::styled(
                format!("@{}", user.username),
                Style::default().fg(Color::Yellow),
            ));
            lines.push(Line::from(title));
            lines.push(Line::from(vec![
                Span::styled(
                    detail.followers.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(" FOLLOWERS   ", Style::default().fg(Color::Gray)),
                Span::styled(
                    detail.following.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(" FOLLOWING", Style::default().fg(Color::Gray)),
            ]));
        }
        Profile::Loading => {
            lines.push(Line::from(Span::styled(
                format!("@{}", user.username),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(Span::styled(
                "Loading profile...",
                Style::default().fg(Color::Gray),
            )));
        }
        Profile::Failed => {
            lines.push(Line::from(Span::styled(
                format!("@{}", user.username),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(Span::styled(
                "Profile unavailable",
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::from(Span::styled(
        user.avatar_url.as_str(),
        Style::default().fg(Color::DarkGray),
    )));

    let profile =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Profile"));
    frame.render_widget(profile, area);
}

fn render_repositories(frame: &mut Frame, screen: &UserDetailScreen, area: Rect) {
    let repos = screen.repos();
    match repos.phase() {
        Phase::InitialLoading => render_loading(frame, "Repositories", area),
        Phase::Error(error) => render_list_error(
            frame,
            "Repositories",
            error,
            Resource::Repositories,
            area,
        ),
        Phase::Loaded => {
            let w = area.width.saturating_sub(2) as usize;
            let fixed = 51; // name, stars, language and separators
            let flex = w.saturating_sub(fixed).max(10);

            let mut items: Vec<ListItem> = screen
                .visible_repositories()
                .enumerate()
                .map(|(i, repo)| repository_item(repo, i == screen.selected, flex))
                .collect();

            let shown = items.len();
            items.push(load_more_item(
                repos.load_more_state(),
                screen.selected == shown,
            ));

            let widget = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(
                            "Repositories ({}, page {})",
                            shown,
                            repos.cursor()
                        )),
                )
                .highlight_style(Style::default().bg(Color::DarkGray));

            let mut state = ListState::default();
            state.select(Some(screen.selected));

            frame.render_stateful_widget(widget, area, &mut state);
        }
    }
}

fn repository_item(repo: &Repository, selected: bool, flex: usize) -> ListItem<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let description = repo
        .description
        .as_deref()
        .map(|d| truncate(d, flex))
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(format!("{:<30}", truncate(&repo.name, 30)), style),
        Span::raw(" "),
        Span::styled(
            format!("★ {:>5}", repo.stars),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{:<10}", truncate(repo.language.as_deref().unwrap_or("-"), 10)),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(" "),
        Span::styled(description, Style::default().fg(Color::Gray)),
    ]);

    ListItem::new(line)
}
