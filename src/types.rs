use serde::Deserialize;

/// Entry of the `users?since=` listing. `id` doubles as the pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "login")]
    pub username: String,
    pub avatar_url: String,
}

/// Profile returned by `users/<username>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDetail {
    pub id: u64,
    pub name: Option<String>,
    pub followers: u64,
    pub following: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub id: u64,
    #[serde(rename = "fork")]
    pub is_forked: bool,
    pub name: String,
    pub language: Option<String>,
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
    pub description: Option<String>,
    #[serde(rename = "html_url")]
    pub url: String,
}
