//! # gitfit
//!
//! Fitness logging on top of GitHub Issues. Workouts, user profiles and
//! daily stats are stored as JSON issue bodies in a repository the user
//! owns; there is no other backend.
//!
//! ## Modules
//!
//! - [`github`]: the issue host as a document store
//! - [`records`]: record types, body codec and the typed repository
//! - [`credentials`]: the persisted `{token, owner, repo}` object
//! - [`activity`]: icon and default unit for an activity label
//! - [`summary`] and [`calendar`]: dashboard figures and the month grid
//! - [`forms`]: log and profile form assembly, defaults and edit merges
//! - [`render`]: table, JSON and CSV output for the CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gitfit::config::GitHubApiConfig;
//! use gitfit::{GitHubClient, GithubCredentials, RecordRepository, Workout};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = GithubCredentials::new("ghp_...", "ada", "fitness-log");
//!     let client = GitHubClient::new(&GitHubApiConfig::default(), credentials)?;
//!     let repo = RecordRepository::new(client);
//!
//!     repo.save(&Workout::new("Running", 5.0, "km", "2025-01-15"), None).await?;
//!
//!     for workout in repo.list::<Workout>().await {
//!         println!("#{} {}", workout.id, workout.activity);
//!     }
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod calendar;
pub mod config;
pub mod credentials;
pub mod forms;
pub mod github;
pub mod logging;
pub mod records;
pub mod render;
pub mod summary;

pub use activity::{activity_icon, activity_unit, ActivityIcon};

pub use calendar::{CalendarDay, CalendarMonth};

pub use config::{Config, ConfigError, LoggingConfig};

pub use credentials::{CredentialError, CredentialStore, GithubCredentials};

pub use forms::{FormError, ProfileForm, WorkoutForm};

pub use github::{
    validate_credentials, GitHubClient, Issue, IssueQuery, IssueState, IssueStore, IssueUpdate,
    MemoryIssueStore, NewIssue, StoreError,
};

pub use records::{
    DailyStat, DecodeError, Document, Record, RecordError, RecordKind, RecordRepository,
    UserProfile, Workout,
};

pub use render::{OutputFormat, RenderError};

pub use summary::{Dashboard, DayStats, HoursMinutes};
