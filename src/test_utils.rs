//! Mock directory client and fixtures for controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::client::DirectoryClient;
use crate::error::{DirectoryError, Result};
use crate::types::{Repository, User, UserDetail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListUsers(u64),
    UserDetail(String),
    Repos(String, u32),
}

/// Canned responses keyed by cursor. Unknown cursors answer with an empty page.
#[derive(Debug, Default)]
pub struct MockDirectory {
    users: HashMap<u64, Vec<User>>,
    repos: HashMap<u32, Vec<Repository>>,
    fail_users: bool,
    fail_detail: bool,
    fail_repos: bool,
    /// If set, repository fetches wait here until released
    repos_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<Call>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, since: u64, page: Vec<User>) -> Self {
        self.users.insert(since, page);
        self
    }

    pub fn with_repos(mut self, page: u32, repos: Vec<Repository>) -> Self {
        self.repos.insert(page, repos);
        self
    }

    pub fn failing_users(mut self) -> Self {
        self.fail_users = true;
        self
    }

    pub fn failing_detail(mut self) -> Self {
        self.fail_detail = true;
        self
    }

    pub fn failing_repos(mut self) -> Self {
        self.fail_repos = true;
        self
    }

    pub fn held_repos(mut self) -> Self {
        self.repos_gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release_repos(&self) {
        if let Some(gate) = &self.repos_gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn list_users(&self, since: u64) -> Result<Vec<User>> {
        self.record(Call::ListUsers(since));
        if self.fail_users {
            return Err(DirectoryError::Api("users unavailable".to_string()));
        }
        Ok(self.users.get(&since).cloned().unwrap_or_default())
    }

    async fn get_user_detail(&self, username: &str) -> Result<UserDetail> {
        self.record(Call::UserDetail(username.to_string()));
        if self.fail_detail {
            return Err(DirectoryError::Api("detail unavailable".to_string()));
        }
        Ok(user_detail(username))
    }

    async fn list_user_repositories(&self, username: &str, page: u32) -> Result<Vec<Repository>> {
        self.record(Call::Repos(username.to_string(), page));
        if let Some(gate) = &self.repos_gate {
            gate.notified().await;
        }
        if self.fail_repos {
            return Err(DirectoryError::Api("repositories unavailable".to_string()));
        }
        Ok(self.repos.get(&page).cloned().unwrap_or_default())
    }
}

pub fn user(id: u64) -> User {
    User {
        id,
        username: format!("user{}", id),
        avatar_url: format!("https://avatars.githubusercontent.com/u/{}?v=4", id),
    }
}

pub fn users(ids: &[u64]) -> Vec<User> {
    ids.iter().copied().map(user).collect()
}

pub fn user_detail(username: &str) -> UserDetail {
    UserDetail {
        id: 1,
        name: Some(username.to_uppercase()),
        followers: 4,
        following: 3,
    }
}

pub fn repo(id: u64) -> Repository {
    Repository {
        id,
        is_forked: false,
        name: format!("repo{}", id),
        language: Some("Rust".to_string()),
        stars: id,
        description: None,
        url: format!("https://github.com/user1/repo{}", id),
    }
}

pub fn repos(ids: &[u64]) -> Vec<Repository> {
    ids.iter().copied().map(repo).collect()
}
