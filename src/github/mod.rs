//! Issue Host
//!
//! The GitHub Issues REST API seen as a schemaless document store:
//! - `IssueStore`: the four primitives the record adapter needs
//! - `GitHubClient`: reqwest-backed implementation
//! - `MemoryIssueStore`: in-process implementation for tests

mod client;
mod memory;

pub use client::{validate_credentials, GitHubClient};
pub use memory::MemoryIssueStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub returns at most 100 items per page; only the first page is read.
pub const MAX_PER_PAGE: u32 = 100;

/// Primitive operations over a repository's issues
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// List issues matching the query (first page only)
    async fn list_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>, StoreError>;

    /// Fetch a single issue by number, whatever its state
    async fn get_issue(&self, number: u64) -> Result<Issue, StoreError>;

    /// Create an issue
    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue, StoreError>;

    /// Update fields of an existing issue
    async fn update_issue(&self, number: u64, update: &IssueUpdate) -> Result<Issue, StoreError>;
}

/// An issue as returned by the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    /// Present when the "issue" is actually a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    /// Check if this issue carries a label
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

/// Open/closed state of an issue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// State filter for listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }

    pub fn matches(&self, state: IssueState) -> bool {
        match self {
            StateFilter::Open => state == IssueState::Open,
            StateFilter::Closed => state == IssueState::Closed,
            StateFilter::All => true,
        }
    }
}

/// Sort direction for listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Parameters for `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, PartialEq)]
pub struct IssueQuery {
    pub state: StateFilter,
    /// Only "created" is used; `None` leaves the host default
    pub sort: Option<String>,
    pub direction: Option<Direction>,
    pub per_page: u32,
    /// Every listed label must be present on the issue
    pub labels: Vec<String>,
}

impl IssueQuery {
    /// Open issues, first page of 100, host-default ordering
    pub fn open() -> Self {
        Self {
            state: StateFilter::Open,
            sort: None,
            direction: None,
            per_page: MAX_PER_PAGE,
            labels: Vec::new(),
        }
    }

    /// Builder method: newest first by creation time
    pub fn newest_first(mut self) -> Self {
        self.sort = Some("created".to_string());
        self.direction = Some(Direction::Desc);
        self
    }

    /// Builder method: require a label
    pub fn label(mut self, name: impl Into<String>) -> Self {
        self.labels.push(name.into());
        self
    }

    /// Query-string pairs in the order GitHub documents them
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("state", self.state.as_str().to_string())];
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.as_str().to_string()));
        }
        pairs.push(("per_page", self.per_page.min(MAX_PER_PAGE).to_string()));
        if !self.labels.is_empty() {
            pairs.push(("labels", self.labels.join(",")));
        }
        pairs
    }
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self::open()
    }
}

/// Body of `POST /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Body of `PATCH /repos/{owner}/{repo}/issues/{number}`
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
}

impl IssueUpdate {
    /// Replace title, body and labels wholesale
    pub fn replace(issue: NewIssue) -> Self {
        Self {
            title: Some(issue.title),
            body: Some(issue.body),
            labels: Some(issue.labels),
            state: None,
        }
    }

    /// Transition to closed
    pub fn close() -> Self {
        Self {
            state: Some(IssueState::Closed),
            ..Self::default()
        }
    }
}

/// Errors that can occur talking to the issue host
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Issue #{0} not found")]
    NotFound(u64),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_for_workout_listing() {
        let query = IssueQuery::open().newest_first();
        assert_eq!(
            query.to_pairs(),
            vec![
                ("state", "open".to_string()),
                ("sort", "created".to_string()),
                ("direction", "desc".to_string()),
                ("per_page", "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_with_labels() {
        let query = IssueQuery::open().label("daily-stats");
        let pairs = query.to_pairs();
        assert_eq!(pairs.last(), Some(&("labels", "daily-stats".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "sort"));
    }

    #[test]
    fn test_per_page_is_capped() {
        let mut query = IssueQuery::open();
        query.per_page = 500;
        assert!(query.to_pairs().contains(&("per_page", "100".to_string())));
    }

    #[test]
    fn test_close_update_serializes_state_only() {
        let json = serde_json::to_value(IssueUpdate::close()).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "closed" }));
    }

    #[test]
    fn test_issue_deserializes_from_github_shape() {
        let raw = r#"{
            "number": 7,
            "title": "Profile: Ada",
            "body": null,
            "labels": [{"id": 1, "name": "profile", "color": "ededed"}],
            "state": "open",
            "created_at": "2025-01-15T08:30:00Z",
            "user": {"login": "ada"}
        }"#;
        let issue: Issue = serde_json::from_str(raw).unwrap();
        assert_eq!(issue.number, 7);
        assert!(issue.body.is_none());
        assert!(issue.has_label("profile"));
        assert!(!issue.is_pull_request());
        assert_eq!(issue.state, IssueState::Open);
    }
}
