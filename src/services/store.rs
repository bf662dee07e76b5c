use crate::models::{MatchResult, MenteeProfile, MentorProfile, RankedMatch};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading or writing profile and match data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Source of profiles and persisted matches
///
/// Active mentors are returned in a stable order so that ranking ties
/// resolve the same way on every refresh.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a mentee's scoring attributes
    async fn get_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, StoreError>;

    /// Fetch a mentor's scoring attributes and display fields
    async fn get_mentor(&self, mentor_id: &str) -> Result<MentorProfile, StoreError>;

    /// All active mentors, oldest account first
    async fn list_active_mentors(&self) -> Result<Vec<MentorProfile>, StoreError>;

    /// All active mentees, oldest account first
    async fn list_active_mentees(&self) -> Result<Vec<MenteeProfile>, StoreError>;

    /// Stored matches for a mentee joined with each mentor's profile, average
    /// rating and completed session count, highest score first
    ///
    /// Matches whose mentor no longer exists are left out.
    async fn get_ranked_matches(&self, mentee_id: &str) -> Result<Vec<RankedMatch>, StoreError>;

    /// Replace every stored match for a mentee
    ///
    /// Concurrent replacements for the same mentee are serialized; the last
    /// one to commit wins.
    async fn replace_matches(&self, mentee_id: &str, matches: &[MatchResult]) -> Result<(), StoreError>;

    /// Check that the store is reachable
    async fn health_check(&self) -> Result<bool, StoreError>;
}
