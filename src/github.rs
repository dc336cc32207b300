use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::client::DirectoryClient;
use crate::error::{DirectoryError, Result};
use crate::types::{Repository, User, UserDetail};

pub const DEFAULT_API_URL: &str = "https://api.github.com/";

pub struct GitHub {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GitHub {
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DirectoryError::Api(e.to_string()))?;

        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "ghdir")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DirectoryError::Api(format!(
                "GET {} failed with {}: {}",
                path, status, text
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DirectoryError::Api(format!("Failed to decode {}: {}", path, e)))
    }
}

/// The base URL is joined with relative paths, so it must end with a slash.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

fn users_path(since: u64) -> String {
    format!("users?since={}", since)
}

fn user_path(username: &str) -> String {
    format!("users/{}", urlencoding::encode(username))
}

fn repos_path(username: &str, page: u32) -> String {
    format!("users/{}/repos?page={}", urlencoding::encode(username), page)
}

#[async_trait]
impl DirectoryClient for GitHub {
    async fn list_users(&self, since: u64) -> Result<Vec<User>> {
        self.get_json(&users_path(since)).await
    }

    async fn get_user_detail(&self, username: &str) -> Result<UserDetail> {
        self.get_json(&user_path(username)).await
    }

    async fn list_user_repositories(&self, username: &str, page: u32) -> Result<Vec<Repository>> {
        self.get_json(&repos_path(username, page)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://api.github.com"),
            "https://api.github.com/"
        );
        assert_eq!(normalize_base_url(DEFAULT_API_URL), DEFAULT_API_URL);
        assert_eq!(
            normalize_base_url("  https://ghe.local/api/v3 "),
            "https://ghe.local/api/v3/"
        );
    }

    #[test]
    fn users_path_uses_since_cursor() {
        assert_eq!(users_path(0), "users?since=0");
        assert_eq!(users_path(46), "users?since=46");
    }

    #[test]
    fn user_paths_encode_username() {
        assert_eq!(user_path("octocat"), "users/octocat");
        assert_eq!(user_path("a b"), "users/a%20b");
        assert_eq!(repos_path("octocat", 2), "users/octocat/repos?page=2");
    }

    #[test]
    fn debug_does_not_leak_token() {
        let github = GitHub::new(DEFAULT_API_URL, "secret-token".to_string()).unwrap();
        let rendered = format!("{:?}", github);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("api.github.com"));
    }
}
