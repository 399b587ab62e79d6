//! Issue-backed Records
//!
//! Workouts, profiles and daily stats stored as JSON issue bodies:
//! - `types`: the three record structs
//! - `codec`: body encoding and the classification chain
//! - `repository`: list/get/save/delete over an `IssueStore`

mod codec;
mod dates;
mod numeric;
mod repository;
mod types;

pub use codec::{classify, decode_issue, encode_body, parse_body, DecodeError, Document};
pub use dates::{parse_day, short_date};
pub use numeric::NumberLike;
pub use repository::RecordRepository;
pub use types::{DailyStat, UserProfile, Workout};

use crate::github::{Issue, IssueQuery, StoreError};
use serde::{de::DeserializeOwned, Serialize};

/// The three logical record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    #[serde(rename = "workout")]
    Workout,
    #[serde(rename = "profile")]
    Profile,
    #[serde(rename = "daily-stats")]
    DailyStats,
}

impl RecordKind {
    /// Value of the `_type` field
    pub fn discriminator(&self) -> &'static str {
        match self {
            RecordKind::Workout => "workout",
            RecordKind::Profile => "profile",
            RecordKind::DailyStats => "daily-stats",
        }
    }

    /// Label attached on save
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Workout => "activity",
            RecordKind::Profile => "profile",
            RecordKind::DailyStats => "daily-stats",
        }
    }

    pub fn from_discriminator(tag: &str) -> Option<Self> {
        match tag {
            "workout" => Some(RecordKind::Workout),
            "profile" => Some(RecordKind::Profile),
            "daily-stats" => Some(RecordKind::DailyStats),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.discriminator())
    }
}

/// A record kind that can live in an issue body
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const KIND: RecordKind;

    /// Issue number, 0 for records not yet read back from the host
    fn id(&self) -> u64;

    /// Issue title written on save
    fn title(&self) -> String;

    /// Listing query; open issues, first page
    fn list_query() -> IssueQuery {
        IssueQuery::open()
    }

    /// Fill fields that come from the issue rather than the body
    fn attach(&mut self, issue: &Issue);

    /// Checked before any write
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A record serialized together with its issue number
#[derive(Debug, Serialize)]
pub struct WithId<'a, T> {
    pub id: u64,
    #[serde(flatten)]
    pub record: &'a T,
}

impl<'a, T: Record> WithId<'a, T> {
    pub fn new(record: &'a T) -> Self {
        Self {
            id: record.id(),
            record,
        }
    }
}

/// Errors from record writes
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    Invalid(String),
}
