use std::future::Future;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::client::DirectoryClient;
use crate::tui::Event;
use crate::users::UserDirectory;

/// What every screen needs to issue fetches and report back to the UI loop.
#[derive(Debug, Clone)]
pub struct Context {
    client: Arc<dyn DirectoryClient>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Context {
    pub fn new(client: Arc<dyn DirectoryClient>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { client, action_tx }
    }

    pub fn client(&self) -> Arc<dyn DirectoryClient> {
        Arc::clone(&self.client)
    }

    pub fn send(&self, action: Action) {
        self.action_tx.send(action).ok();
    }

    /// Run `fetch` in the background and feed its result back as an action,
    /// unless `cancel` fires first, in which case the result is dropped.
    pub fn spawn<F>(&self, cancel: &CancellationToken, fetch: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("fetch orphaned, result dropped");
                }
                action = fetch => {
                    tx.send(action).ok();
                }
            }
        });
    }
}

/// Topmost presented screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Directory,
    Detail,
    Web,
}

pub struct App {
    pub directory: UserDirectory,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(client: Arc<dyn DirectoryClient>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            directory: UserDirectory::new(Context::new(client, action_tx)),
            status: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.directory.detail() {
            Some(detail) if detail.web().is_some() => Screen::Web,
            Some(_) => Screen::Detail,
            None => Screen::Directory,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Refresh,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        let screen = self.screen();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => match screen {
                Screen::Directory => Action::Quit,
                _ => Action::Back,
            },
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('r') if screen != Screen::Web => Action::Refresh,
            KeyCode::Char('n') if screen != Screen::Web => Action::LoadMore,
            KeyCode::Char('o') if screen == Screen::Web => Action::OpenInBrowser,
            KeyCode::Char('y') if screen == Screen::Web => Action::YankUrl,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.status.is_some() && !matches!(action, Action::None | Action::Quit | Action::Back)
        {
            self.status = None;
        }

        let screen = self.screen();
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match screen {
                Screen::Web => {
                    if let Some(web) = self.directory.detail().and_then(|d| d.web()) {
                        web.dismiss();
                    }
                }
                Screen::Detail => {
                    if let Some(detail) = self.directory.detail() {
                        detail.dismiss();
                    }
                }
                Screen::Directory => {
                    self.should_quit = true;
                }
            },
            Action::ScrollUp => match self.directory.detail_mut() {
                Some(detail) if screen == Screen::Detail => detail.scroll_up(),
                None => self.directory.scroll_up(),
                _ => {}
            },
            Action::ScrollDown => match self.directory.detail_mut() {
                Some(detail) if screen == Screen::Detail => detail.scroll_down(),
                None => self.directory.scroll_down(),
                _ => {}
            },
            Action::GoToTop => match self.directory.detail_mut() {
                Some(detail) if screen == Screen::Detail => detail.go_to_top(),
                None => self.directory.go_to_top(),
                _ => {}
            },
            Action::GoToBottom => match self.directory.detail_mut() {
                Some(detail) if screen == Screen::Detail => detail.go_to_bottom(),
                None => self.directory.go_to_bottom(),
                _ => {}
            },
            Action::Select => match self.directory.detail_mut() {
                Some(detail) if screen == Screen::Detail => detail.select_current(),
                None => self.directory.select_current(),
                _ => {}
            },
            Action::Refresh => match self.directory.detail_mut() {
                Some(detail) if screen == Screen::Detail => detail.refresh(),
                None => self.directory.refresh(),
                _ => {}
            },
            Action::LoadMore => match self.directory.detail_mut() {
                Some(detail) if screen == Screen::Detail => detail.load_more(),
                None => self.directory.load_more(),
                _ => {}
            },
            Action::OpenInBrowser => {
                if let Some(web) = self.directory.detail().and_then(|d| d.web()) {
                    web.open_in_browser();
                }
            }
            Action::YankUrl => {
                if let Some(web) = self.directory.detail().and_then(|d| d.web()) {
                    if web.yank_url() {
                        self.status = Some(format!("Copied {}", web.url()));
                    }
                }
            }

            Action::UsersLoaded { ticket, users } => {
                self.directory.on_users_loaded(ticket, users);
            }
            Action::UsersFailed { ticket, error } => {
                self.directory.on_users_failed(ticket, &error);
            }
            Action::UserDetailLoaded { screen, detail } => {
                if let Some(detail_screen) = self.directory.detail_for(screen) {
                    detail_screen.on_profile_loaded(*detail);
                }
            }
            Action::UserDetailFailed { screen, error } => {
                if let Some(detail_screen) = self.directory.detail_for(screen) {
                    detail_screen.on_profile_failed(&error);
                }
            }
            Action::ReposLoaded {
                screen,
                ticket,
                repos,
            } => {
                if let Some(detail_screen) = self.directory.detail_for(screen) {
                    detail_screen.on_repos_loaded(ticket, repos);
                }
            }
            Action::ReposFailed {
                screen,
                ticket,
                error,
            } => {
                if let Some(detail_screen) = self.directory.detail_for(screen) {
                    detail_screen.on_repos_failed(ticket, &error);
                }
            }

            Action::DetailDismissed(screen) => {
                self.directory.dismiss_detail(screen);
            }
            Action::WebDismissed(owner) => {
                if let Some(detail) = self.directory.detail_for(owner) {
                    detail.dismiss_web();
                }
            }

            Action::Error(msg) => {
                self.status = Some(msg);
            }
            Action::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventKind;

    use super::*;
    use crate::detail::Profile;
    use crate::error::{DirectoryError, ListError};
    use crate::list_machine::{FetchKind, LoadMore, Phase, Ticket};
    use crate::test_utils::{repos, users, MockDirectory};

    fn app(mock: Arc<MockDirectory>) -> (App, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(mock, tx), rx)
    }

    async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = rx.recv().await.expect("channel closed");
        app.update(action);
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        })
    }

    /// Directory loaded with users 1..=3 and the detail screen for user 1 fully loaded.
    async fn with_detail_open(mock: MockDirectory) -> (App, mpsc::UnboundedReceiver<Action>) {
        let mock = Arc::new(mock.with_users(0, users(&[1, 2, 3])));
        let (mut app, mut rx) = app(mock);
        app.update(Action::Refresh);
        pump(&mut app, &mut rx).await;
        app.update(Action::Select);
        pump(&mut app, &mut rx).await;
        pump(&mut app, &mut rx).await;
        (app, rx)
    }

    #[tokio::test]
    async fn init_event_refreshes_directory() {
        let mock = Arc::new(MockDirectory::new().with_users(0, users(&[1, 2, 3])));
        let (mut app, mut rx) = app(mock);

        let action = app.handle_event(Event::Init);
        app.update(action);
        pump(&mut app, &mut rx).await;

        assert_eq!(app.directory.list().items(), users(&[1, 2, 3]).as_slice());
        assert_eq!(app.directory.list().phase(), Phase::Loaded);
        assert_eq!(app.screen(), Screen::Directory);
    }

    #[tokio::test]
    async fn full_navigation_round_trip() {
        let (mut app, mut rx) =
            with_detail_open(MockDirectory::new().with_repos(1, repos(&[10, 11]))).await;
        assert_eq!(app.screen(), Screen::Detail);

        let detail = app.directory.detail().unwrap();
        assert!(matches!(detail.profile(), Profile::Loaded(_)));
        assert_eq!(detail.repos().items().len(), 2);

        app.update(Action::Select);
        assert_eq!(app.screen(), Screen::Web);

        app.update(app.handle_event(key(KeyCode::Esc)));
        pump(&mut app, &mut rx).await;
        assert_eq!(app.screen(), Screen::Detail);

        app.update(app.handle_event(key(KeyCode::Char('q'))));
        pump(&mut app, &mut rx).await;
        assert_eq!(app.screen(), Screen::Directory);
        assert!(!app.should_quit);

        app.update(app.handle_event(key(KeyCode::Char('q'))));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn dismissing_detail_orphans_in_flight_repository_fetch() {
        let mock = Arc::new(
            MockDirectory::new()
                .with_users(0, users(&[1, 2]))
                .with_repos(1, repos(&[10]))
                .held_repos(),
        );
        let (mut app, mut rx) = app(mock.clone());
        app.update(Action::Refresh);
        pump(&mut app, &mut rx).await;
        let directory_before = app.directory.list().items().to_vec();

        app.update(Action::Select);
        // profile arrives, repositories stay in flight
        pump(&mut app, &mut rx).await;
        assert_eq!(
            app.directory.detail().unwrap().repos().phase(),
            Phase::InitialLoading
        );

        app.update(Action::Back);
        pump(&mut app, &mut rx).await;
        assert!(app.directory.detail().is_none());

        mock.release_repos();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(rx.try_recv().is_err());
        assert!(app.directory.detail().is_none());
        assert_eq!(app.directory.list().items(), directory_before.as_slice());
        assert_eq!(app.directory.list().phase(), Phase::Loaded);
    }

    #[tokio::test]
    async fn queued_completion_for_dismissed_screen_is_dropped() {
        let (mut app, mut rx) =
            with_detail_open(MockDirectory::new().with_repos(1, repos(&[10]))).await;
        let old = app.directory.detail().unwrap().id();
        // same load id and kind the next screen's first fetch will carry
        let ticket = Ticket {
            load_id: 1,
            kind: FetchKind::Initial,
            cursor: 1,
        };

        app.update(Action::Back);
        pump(&mut app, &mut rx).await;

        // open user 2, whose repositories are still loading
        app.update(Action::ScrollDown);
        app.update(Action::Select);
        let new = app.directory.detail().unwrap().id();
        assert_ne!(old, new);

        app.update(Action::ReposLoaded {
            screen: old,
            ticket,
            repos: repos(&[99]),
        });
        app.update(Action::DetailDismissed(old));

        let detail = app.directory.detail().expect("new detail survives");
        assert_eq!(detail.id(), new);
        assert!(detail.repos().items().is_empty());
    }

    #[tokio::test]
    async fn load_more_failure_allows_retry_of_same_page() {
        let (mut app, mut rx) = with_detail_open(
            MockDirectory::new()
                .with_repos(1, repos(&[10]))
                .with_repos(2, repos(&[11])),
        )
        .await;

        // swap in a failing page 2 by sending the failure directly
        app.update(Action::LoadMore);
        let ticket = match rx.recv().await.unwrap() {
            Action::ReposLoaded { ticket, .. } => ticket,
            other => panic!("unexpected {:?}", other),
        };
        let screen = app.directory.detail().unwrap().id();
        app.update(Action::ReposFailed {
            screen,
            ticket,
            error: "boom".to_string(),
        });

        let detail = app.directory.detail().unwrap();
        assert_eq!(detail.repos().load_more_state(), LoadMore::Idle);
        assert_eq!(detail.repos().cursor(), 1);
        assert_eq!(detail.repos().items().len(), 1);

        app.update(Action::LoadMore);
        pump(&mut app, &mut rx).await;
        let detail = app.directory.detail().unwrap();
        assert_eq!(detail.repos().items().len(), 2);
        assert_eq!(detail.repos().cursor(), 2);
    }

    #[tokio::test]
    async fn failed_repositories_show_transport_error() {
        let (app, _rx) = with_detail_open(MockDirectory::new().failing_repos()).await;
        assert_eq!(
            app.directory.detail().unwrap().repos().phase(),
            Phase::Error(ListError::TransportFailure)
        );
    }

    #[tokio::test]
    async fn refresh_on_detail_does_not_touch_directory() {
        let (mut app, mut rx) =
            with_detail_open(MockDirectory::new().with_repos(1, repos(&[10]))).await;

        app.update(app.handle_event(key(KeyCode::Char('r'))));
        assert_eq!(
            app.directory.detail().unwrap().repos().phase(),
            Phase::InitialLoading
        );
        assert_eq!(app.directory.list().phase(), Phase::Loaded);

        pump(&mut app, &mut rx).await;
        assert_eq!(app.directory.detail().unwrap().repos().phase(), Phase::Loaded);
    }

    #[test]
    fn keys_map_to_screen_specific_actions() {
        let (app, _rx) = app(Arc::new(MockDirectory::new()));

        assert!(matches!(
            app.handle_event(key(KeyCode::Char('q'))),
            Action::Quit
        ));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('n'))),
            Action::LoadMore
        ));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('o'))),
            Action::None
        ));
        assert!(matches!(app.handle_event(Event::Tick), Action::None));
    }

    #[test]
    fn directory_errors_show_in_status_line() {
        let (mut app, _rx) = app(Arc::new(MockDirectory::new()));

        let err = DirectoryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no browser",
        ));
        app.update(err.into());
        assert_eq!(app.status.as_deref(), Some("IO error: no browser"));

        app.update(Action::ScrollDown);
        assert!(app.status.is_none());
    }
}
