//! In-memory issue store
//!
//! Behaves like the subset of the GitHub Issues API the adapter uses:
//! sequential numbering, state/label filtering, newest-first ordering,
//! single page truncation, and closed issues still fetchable by number.

use super::*;
use tokio::sync::RwLock;

/// Issue store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryIssueStore {
    issues: RwLock<Vec<Issue>>,
}

impl MemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an issue with an arbitrary body, bypassing any record encoding
    pub async fn insert_raw(&self, title: &str, body: Option<&str>, labels: &[&str]) -> u64 {
        let mut issues = self.issues.write().await;
        let issue = Self::build(
            issues.len() as u64 + 1,
            title.to_string(),
            body.map(str::to_string),
            labels.iter().map(|l| l.to_string()).collect(),
        );
        let number = issue.number;
        issues.push(issue);
        number
    }

    /// Snapshot of one issue, whatever its state
    pub async fn issue(&self, number: u64) -> Option<Issue> {
        self.issues
            .read()
            .await
            .iter()
            .find(|i| i.number == number)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.issues.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.issues.read().await.is_empty()
    }

    fn build(number: u64, title: String, body: Option<String>, labels: Vec<String>) -> Issue {
        Issue {
            number,
            title,
            body,
            labels: labels.into_iter().map(|name| Label { name }).collect(),
            state: IssueState::Open,
            created_at: Utc::now(),
            pull_request: None,
        }
    }
}

#[async_trait]
impl IssueStore for MemoryIssueStore {
    async fn list_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>, StoreError> {
        let issues = self.issues.read().await;

        let mut matching: Vec<Issue> = issues
            .iter()
            .filter(|i| query.state.matches(i.state))
            .filter(|i| query.labels.iter().all(|l| i.has_label(l)))
            .cloned()
            .collect();

        // Host default is newest first; numbers break timestamp ties.
        matching.sort_by(|a, b| (b.created_at, b.number).cmp(&(a.created_at, a.number)));
        if query.direction == Some(Direction::Asc) {
            matching.reverse();
        }

        matching.truncate(query.per_page.min(MAX_PER_PAGE) as usize);
        Ok(matching)
    }

    async fn get_issue(&self, number: u64) -> Result<Issue, StoreError> {
        self.issue(number).await.ok_or(StoreError::NotFound(number))
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue, StoreError> {
        let mut issues = self.issues.write().await;
        let created = Self::build(
            issues.len() as u64 + 1,
            issue.title.clone(),
            Some(issue.body.clone()),
            issue.labels.clone(),
        );
        issues.push(created.clone());
        Ok(created)
    }

    async fn update_issue(&self, number: u64, update: &IssueUpdate) -> Result<Issue, StoreError> {
        let mut issues = self.issues.write().await;
        let issue = issues
            .iter_mut()
            .find(|i| i.number == number)
            .ok_or(StoreError::NotFound(number))?;

        if let Some(title) = &update.title {
            issue.title = title.clone();
        }
        if let Some(body) = &update.body {
            issue.body = Some(body.clone());
        }
        if let Some(labels) = &update.labels {
            issue.labels = labels.iter().map(|name| Label { name: name.clone() }).collect();
        }
        if let Some(state) = update.state {
            issue.state = state;
        }

        Ok(issue.clone())
    }
}
