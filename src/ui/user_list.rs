use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::error::Resource;
use crate::list_machine::Phase;
use crate::users::UserDirectory;

use super::{load_more_item, render_list_error, render_loading, truncate};

pub fn render(frame: &mut Frame, directory: &UserDirectory, area: Rect) {
    let list = directory.list();
    match list.phase() {
        Phase::InitialLoading => render_loading(frame, "Users", area),
        Phase::Error(error) => render_list_error(frame, "Users", error, Resource::Users, area),
        Phase::Loaded => {
            let w = area.width.saturating_sub(2) as usize;
            let fixed = 32; // id(8) + space(1) + login(20) + spaces(3)
            let flex = w.saturating_sub(fixed).max(10);

            let mut items: Vec<ListItem> = list
                .items()
                .iter()
                .enumerate()
                .map(|(i, user)| {
                    let style = if i == directory.selected {
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };

                    let line = Line::from(vec![
                        Span::styled(
                            format!("#{:<7}", user.id),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(" "),
                        Span::styled(format!("{:<20}", truncate(&user.username, 20)), style),
                        Span::raw("   "),
                        Span::styled(
                            truncate(&user.avatar_url, flex),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]);

                    ListItem::new(line)
                })
                .collect();

            let trailing_selected = directory.selected == list.items().len();
            items.push(load_more_item(list.load_more_state(), trailing_selected));

            let widget = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Users ({})", list.items().len())),
                )
                .highlight_style(Style::default().bg(Color::DarkGray));

            let mut state = ListState::default();
            state.select(Some(directory.selected));

            frame.render_stateful_widget(widget, area, &mut state);
        }
    }
}
