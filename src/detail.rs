use tokio_util::sync::CancellationToken;

use crate::action::{Action, ScreenId};
use crate::app::Context;
use crate::list_machine::{ListMachine, Phase, Ticket};
use crate::types::{Repository, User, UserDetail};
use crate::web::WebView;

/// Repositories are paged by page number, independent of their ids.
fn next_page(page: u32, _: &[Repository]) -> Option<u32> {
    page.checked_add(1)
}

/// Profile section of the detail screen. Fetched once, never refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Loading,
    Loaded(UserDetail),
    Failed,
}

/// Detail screen for one user: profile plus the user's repositories.
#[derive(Debug)]
pub struct UserDetailScreen {
    id: ScreenId,
    user: User,
    profile: Profile,
    repos: ListMachine<Repository, u32>,
    pub selected: usize,
    web: Option<WebView>,
    ctx: Context,
    cancel: CancellationToken,
}

impl UserDetailScreen {
    /// Build the screen and start its profile and first repository page fetches.
    /// Fetches are tied to a child of `parent`, so they stop when either side goes away.
    pub fn open(ctx: Context, parent: &CancellationToken, id: ScreenId, user: User) -> Self {
        let mut screen = Self {
            id,
            user,
            profile: Profile::Loading,
            repos: ListMachine::new(1, next_page),
            selected: 0,
            web: None,
            ctx,
            cancel: parent.child_token(),
        };
        screen.fetch_profile();
        screen.refresh();
        screen
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn repos(&self) -> &ListMachine<Repository, u32> {
        &self.repos
    }

    pub fn web(&self) -> Option<&WebView> {
        self.web.as_ref()
    }

    /// Repositories as presented. Forks stay in the machine so paging is unaffected.
    pub fn visible_repositories(&self) -> impl Iterator<Item = &Repository> {
        self.repos.items().iter().filter(|r| !r.is_forked)
    }

    fn fetch_profile(&self) {
        let client = self.ctx.client();
        let screen = self.id;
        let username = self.user.username.clone();
        self.ctx.spawn(&self.cancel, async move {
            match client.get_user_detail(&username).await {
                Ok(detail) => Action::UserDetailLoaded {
                    screen,
                    detail: Box::new(detail),
                },
                Err(e) => Action::UserDetailFailed {
                    screen,
                    error: e.to_string(),
                },
            }
        });
    }

    pub fn refresh(&mut self) {
        let ticket = self.repos.reset();
        self.selected = 0;
        self.fetch_repos(ticket);
    }

    pub fn load_more(&mut self) {
        match self.repos.request_load_more() {
            Ok(Some(ticket)) => self.fetch_repos(ticket),
            Ok(None) => {}
            Err(e) => tracing::warn!(
                error = %e,
                username = %self.user.username,
                "cannot load more repositories"
            ),
        }
    }

    fn fetch_repos(&self, ticket: Ticket<u32>) {
        let client = self.ctx.client();
        let screen = self.id;
        let username = self.user.username.clone();
        self.ctx.spawn(&self.cancel, async move {
            match client.list_user_repositories(&username, ticket.cursor).await {
                Ok(repos) => Action::ReposLoaded {
                    screen,
                    ticket,
                    repos,
                },
                Err(e) => Action::ReposFailed {
                    screen,
                    ticket,
                    error: e.to_string(),
                },
            }
        });
    }

    pub fn on_profile_loaded(&mut self, detail: UserDetail) {
        if self.profile == Profile::Loading {
            self.profile = Profile::Loaded(detail);
        }
    }

    pub fn on_profile_failed(&mut self, error: &str) {
        if self.profile == Profile::Loading {
            tracing::warn!(username = %self.user.username, %error, "failed to fetch user detail");
            self.profile = Profile::Failed;
        }
    }

    pub fn on_repos_loaded(&mut self, ticket: Ticket<u32>, repos: Vec<Repository>) {
        let count = repos.len();
        if self.repos.on_page_arrived(ticket, repos) {
            tracing::debug!(page = ticket.cursor, count, "repositories page applied");
        }
    }

    pub fn on_repos_failed(&mut self, ticket: Ticket<u32>, error: &str) {
        if self.repos.on_fetch_failed(ticket) {
            tracing::warn!(
                username = %self.user.username,
                page = ticket.cursor,
                %error,
                "failed to list repositories"
            );
        }
    }

    pub fn select_repository(&mut self, repo: &Repository) {
        tracing::debug!(url = %repo.url, "presenting web view");
        self.web = Some(WebView::new(self.ctx.clone(), self.id, repo.url.clone()));
    }

    /// Ask the owner to close this screen.
    pub fn dismiss(&self) {
        self.ctx.send(Action::DetailDismissed(self.id));
    }

    pub fn dismiss_web(&mut self) {
        self.web = None;
    }

    fn row_count(&self) -> usize {
        match self.repos.phase() {
            Phase::Loaded => self.visible_repositories().count() + 1,
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

    /// Enter on a repository opens it; Enter on the trailing row loads the next page.
    pub fn select_current(&mut self) {
        if self.repos.phase() != Phase::Loaded {
            return;
        }
        let picked = self.visible_repositories().nth(self.selected).cloned();
        match picked {
            Some(repo) => self.select_repository(&repo),
            None => self.load_more(),
        }
    }
}

impl Drop for UserDetailScreen {
    fn drop(&mut self) {
        self.web.take();
        self.cancel.cancel();
        tracing::debug!(id = ?self.id, "user detail destroyed");
    }
}
