use tokio_util::sync::CancellationToken;

use crate::action::{Action, ScreenId};
use crate::app::Context;
use crate::detail::UserDetailScreen;
use crate::list_machine::{ListMachine, Phase, Ticket};
use crate::types::User;

/// Users are paged by the id of the last user already shown.
fn last_user_id(_: u64, users: &[User]) -> Option<u64> {
    users.last().map(|u| u.id)
}

/// Root screen: the paged user directory. Lives for the whole session and owns
/// at most one detail screen.
#[derive(Debug)]
pub struct UserDirectory {
    list: ListMachine<User, u64>,
    pub selected: usize,
    detail: Option<UserDetailScreen>,
    next_screen_id: u64,
    ctx: Context,
    cancel: CancellationToken,
}

impl UserDirectory {
    pub fn new(ctx: Context) -> Self {
        Self {
            list: ListMachine::new(0, last_user_id),
            selected: 0,
            detail: None,
            next_screen_id: 0,
            ctx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn list(&self) -> &ListMachine<User, u64> {
        &self.list
    }

    pub fn detail(&self) -> Option<&UserDetailScreen> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> Option<&mut UserDetailScreen> {
        self.detail.as_mut()
    }

    /// The presented detail screen, if it is the one `screen` refers to.
    pub fn detail_for(&mut self, screen: ScreenId) -> Option<&mut UserDetailScreen> {
        match self.detail.as_mut() {
            Some(detail) if detail.id() == screen => Some(detail),
            _ => {
                tracing::debug!(?screen, "no such detail screen, dropping completion");
                None
            }
        }
    }

    pub fn refresh(&mut self) {
        let ticket = self.list.reset();
        self.selected = 0;
        self.fetch(ticket);
    }

    pub fn load_more(&mut self) {
        match self.list.request_load_more() {
            Ok(Some(ticket)) => self.fetch(ticket),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cannot load more users"),
        }
    }

    fn fetch(&self, ticket: Ticket<u64>) {
        let client = self.ctx.client();
        self.ctx.spawn(&self.cancel, async move {
            match client.list_users(ticket.cursor).await {
                Ok(users) => Action::UsersLoaded { ticket, users },
                Err(e) => Action::UsersFailed {
                    ticket,
                    error: e.to_string(),
                },
            }
        });
    }

    pub fn on_users_loaded(&mut self, ticket: Ticket<u64>, users: Vec<User>) {
        let count = users.len();
        if self.list.on_page_arrived(ticket, users) {
            tracing::debug!(since = ticket.cursor, count, "users page applied");
        }
    }

    pub fn on_users_failed(&mut self, ticket: Ticket<u64>, error: &str) {
        if self.list.on_fetch_failed(ticket) {
            tracing::warn!(since = ticket.cursor, %error, "failed to list users");
        }
    }

    /// Present the detail screen for `user`. The list itself is left untouched.
    pub fn select_user(&mut self, user: User) {
        self.next_screen_id += 1;
        let id = ScreenId(self.next_screen_id);
        tracing::debug!(?id, username = %user.username, "presenting user detail");
        self.detail = Some(UserDetailScreen::open(
            self.ctx.clone(),
            &self.cancel,
            id,
            user,
        ));
    }

    pub fn dismiss_detail(&mut self, screen: ScreenId) {
        if self.detail.as_ref().is_some_and(|d| d.id() == screen) {
            self.detail = None;
        }
    }

    /// Number of selectable rows: every user plus the trailing load-more row.
    fn row_count(&self) -> usize {
        match self.list.phase() {
            Phase::Loaded => self.list.items().len() + 1,
            _ => 0,
        }
    }

    pub fn scroll_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.selected + 1 < self.row_count() {
            self.selected += 1;
        }
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected = self.row_count().saturating_sub(1);
    }

    /// Enter on a user opens it; Enter on the trailing row loads the next page.
    pub fn select_current(&mut self) {
        if self.list.phase() != Phase::Loaded {
            return;
        }
        let picked = self.list.items().get(self.selected).cloned();
        match picked {
            Some(user) => self.select_user(user),
            None => self.load_more(),
        }
    }
}

impl Drop for UserDirectory {
    fn drop(&mut self) {
        self.detail.take();
        self.cancel.cancel();
    }
}
