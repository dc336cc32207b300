use crate::error::DirectoryError;
use crate::list_machine::Ticket;
use crate::types::{Repository, User, UserDetail};

/// Identity of a presented screen instance. Completions are addressed to it so
/// results for a screen that has since been dismissed go nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(pub u64);

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    Select,
    Refresh,
    LoadMore,
    OpenInBrowser,
    YankUrl,

    // User directory
    UsersLoaded {
        ticket: Ticket<u64>,
        users: Vec<User>,
    },
    UsersFailed {
        ticket: Ticket<u64>,
        error: String,
    },

    // User detail
    UserDetailLoaded {
        screen: ScreenId,
        detail: Box<UserDetail>,
    },
    UserDetailFailed {
        screen: ScreenId,
        error: String,
    },
    ReposLoaded {
        screen: ScreenId,
        ticket: Ticket<u32>,
        repos: Vec<Repository>,
    },
    ReposFailed {
        screen: ScreenId,
        ticket: Ticket<u32>,
        error: String,
    },

    // Dismissal requests, addressed to the screen being closed
    DetailDismissed(ScreenId),
    WebDismissed(ScreenId),

    Error(String),
    None,
}

impl From<DirectoryError> for Action {
    fn from(err: DirectoryError) -> Self {
        Action::Error(err.to_string())
    }
}
