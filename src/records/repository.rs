//! Record repository
//!
//! Four operations over an issue store: `list`, `get`, `save`, `delete`.
//!
//! Reads never fail: a fetch error is logged and reads as "no records".
//! Only the first page of 100 open issues is ever considered.
//! Writes replace the whole body and are last-writer-wins.

use super::codec::{decode_issue, encode_body, DecodeError, Document};
use super::types::{UserProfile, Workout};
use super::{Record, RecordError};
use crate::github::{Issue, IssueQuery, IssueStore, IssueUpdate, NewIssue, StoreError};

/// Typed access to records stored as issues
pub struct RecordRepository<S> {
    store: S,
}

impl<S: IssueStore> RecordRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records of kind `T` among the open issues, propagating fetch errors
    pub async fn try_list<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let issues = self.store.list_issues(&T::list_query()).await?;
        Ok(issues
            .iter()
            .filter(|issue| !issue.is_pull_request())
            .filter_map(|issue| keep(issue, decode_issue::<T>(issue)))
            .collect())
    }

    /// Records of kind `T`; empty when the fetch fails
    pub async fn list<T: Record>(&self) -> Vec<T> {
        match self.try_list::<T>().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to list {} records: {}", T::KIND, e);
                Vec::new()
            }
        }
    }

    /// One record by issue number.
    ///
    /// Closed issues are still returned; `list` does not show them.
    pub async fn get<T: Record>(&self, id: u64) -> Option<T> {
        let issue = match self.store.get_issue(id).await {
            Ok(issue) => issue,
            Err(e) => {
                tracing::warn!("Failed to fetch issue #{}: {}", id, e);
                return None;
            }
        };

        match decode_issue::<T>(&issue) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Issue #{} is not a {} record: {}", id, T::KIND, e);
                None
            }
        }
    }

    /// Create (no `id`) or fully replace (`id`) a record
    pub async fn save<T: Record>(&self, record: &T, id: Option<u64>) -> Result<(), RecordError> {
        record.validate().map_err(RecordError::Invalid)?;

        let issue = NewIssue {
            title: record.title(),
            body: encode_body(record)?,
            labels: vec![T::KIND.label().to_string()],
        };

        match id {
            Some(number) => {
                self.store
                    .update_issue(number, &IssueUpdate::replace(issue))
                    .await?;
                tracing::info!("Updated {} record #{}", T::KIND, number);
            }
            None => {
                let created = self.store.create_issue(&issue).await?;
                tracing::info!("Created {} record #{}", T::KIND, created.number);
            }
        }

        Ok(())
    }

    /// Close the issue. Closing an already closed issue succeeds.
    pub async fn delete(&self, id: u64) -> Result<(), RecordError> {
        self.store.update_issue(id, &IssueUpdate::close()).await?;
        tracing::info!("Closed record #{}", id);
        Ok(())
    }

    /// Every open issue that decodes as some record kind
    pub async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        let issues = self.store.list_issues(&IssueQuery::open()).await?;
        Ok(issues
            .iter()
            .filter(|issue| !issue.is_pull_request())
            .filter_map(|issue| keep(issue, Document::from_issue(issue)))
            .collect())
    }

    /// Workouts and profiles fetched concurrently; both complete before returning
    pub async fn overview(&self) -> (Vec<Workout>, Vec<UserProfile>) {
        tokio::join!(self.list::<Workout>(), self.list::<UserProfile>())
    }
}

fn keep<T>(issue: &Issue, decoded: Result<T, DecodeError>) -> Option<T> {
    match decoded {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!("Skipping issue #{}: {}", issue.number, e);
            None
        }
    }
}
