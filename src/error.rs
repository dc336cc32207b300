use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        DirectoryError::Api(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Why a list region cannot show items. Kept as state, never returned to the view as a failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    #[error("Something went wrong when fetching the list. Please try again later")]
    TransportFailure,

    #[error("No results found.")]
    EmptyResult,

    #[error("No cursor available to load more.")]
    NoCursorAvailable,
}

/// Wording for a list error, specific to the resource being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Repositories,
}

impl ListError {
    pub fn message(&self, resource: Resource) -> String {
        match (self, resource) {
            (ListError::TransportFailure, _) => self.to_string(),
            (ListError::EmptyResult, Resource::Users) => "No users found.".to_string(),
            (ListError::EmptyResult, Resource::Repositories) => {
                "No repositories found.".to_string()
            }
            (ListError::NoCursorAvailable, Resource::Users) => {
                "Last user id not found.".to_string()
            }
            (ListError::NoCursorAvailable, Resource::Repositories) => {
                "Last repository page not found.".to_string()
            }
        }
    }
}
