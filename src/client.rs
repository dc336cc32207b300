use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Repository, User, UserDetail};

/// Remote directory of users and their repositories.
#[async_trait]
pub trait DirectoryClient: Send + Sync + std::fmt::Debug {
    /// Users with an id strictly greater than `since`, in id order.
    async fn list_users(&self, since: u64) -> Result<Vec<User>>;

    async fn get_user_detail(&self, username: &str) -> Result<UserDetail>;

    /// One page of a user's repositories. Pages start at 1.
    async fn list_user_repositories(&self, username: &str, page: u32) -> Result<Vec<Repository>>;
}
