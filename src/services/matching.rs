use crate::core::{apply_filters, Matcher};
use crate::models::{ExplainMatchResponse, MatchFilters, MatchResult, MenteeMatch, RankedMatch};
use crate::services::cache::{CacheError, CacheKey, CacheManager};
use crate::services::store::{ProfileStore, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the matching service
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for MatchingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => MatchingError::NotFound(msg),
            StoreError::InvalidInput(msg) => MatchingError::InvalidInput(msg),
            other => MatchingError::Store(other),
        }
    }
}

/// Generates, persists and serves advisory matches
///
/// Match lists are cached per mentee and explanations per pair. The cache is
/// best effort: any cache failure is logged and the request falls through to
/// the store.
pub struct MatchingService {
    store: Arc<dyn ProfileStore>,
    cache: Arc<CacheManager>,
    matcher: Matcher,
}

impl MatchingService {
    pub fn new(store: Arc<dyn ProfileStore>, cache: Arc<CacheManager>, matcher: Matcher) -> Self {
        Self { store, cache, matcher }
    }

    /// Ranked, filtered matches for a mentee
    ///
    /// Matches are generated and stored on first use. The joined list is
    /// cached before filtering, so different filters share one entry.
    pub async fn matches_for_mentee(
        &self,
        mentee_id: &str,
        filters: &MatchFilters,
    ) -> Result<Vec<RankedMatch>, MatchingError> {
        let cache_key = CacheKey::matches(mentee_id);

        let ranked = match self.cached::<Vec<RankedMatch>>(&cache_key).await {
            Some(ranked) => ranked,
            None => {
                let mut ranked = self.store.get_ranked_matches(mentee_id).await?;
                if ranked.is_empty() {
                    tracing::info!("No stored matches for mentee {}, generating", mentee_id);
                    self.regenerate(mentee_id).await?;
                    ranked = self.store.get_ranked_matches(mentee_id).await?;
                }
                self.store_in_cache(&cache_key, &ranked).await;
                ranked
            }
        };

        let ranked = apply_filters(ranked, filters);

        tracing::debug!("Returning {} matches for mentee {}", ranked.len(), mentee_id);

        Ok(ranked)
    }

    /// Regenerate and persist a mentee's matches, returning how many were stored
    pub async fn refresh_matches(&self, mentee_id: &str) -> Result<usize, MatchingError> {
        let matches = self.regenerate(mentee_id).await?;

        self.invalidate(mentee_id).await;

        Ok(matches.len())
    }

    /// Score, reasoning and breakdown for a single pair
    pub async fn explain_match(
        &self,
        mentee_id: &str,
        mentor_id: &str,
    ) -> Result<ExplainMatchResponse, MatchingError> {
        let cache_key = CacheKey::pair(mentee_id, mentor_id);
        if let Some(explanation) = self.cached::<ExplainMatchResponse>(&cache_key).await {
            return Ok(explanation);
        }

        let mentee = self.store.get_mentee(mentee_id).await?;
        let mentor = self.store.get_mentor(mentor_id).await?;

        let explanation = self.matcher.explain(&mentee, &mentor).await;

        let response = ExplainMatchResponse {
            mentee_id: mentee.id,
            mentor_id: mentor.id,
            match_score: explanation.score,
            reasoning: explanation.reasoning,
            breakdown: explanation.breakdown,
        };

        self.store_in_cache(&cache_key, &response).await;

        Ok(response)
    }

    /// Active mentees ranked for a mentor, without reasoning
    pub async fn matches_for_mentor(&self, mentor_id: &str) -> Result<Vec<MenteeMatch>, MatchingError> {
        let mentor = self.store.get_mentor(mentor_id).await?;
        let mentees = self.store.list_active_mentees().await?;

        Ok(self.matcher.rank_mentees(&mentor, mentees))
    }

    /// Whether the backing store is reachable
    pub async fn health(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }

    async fn regenerate(&self, mentee_id: &str) -> Result<Vec<MatchResult>, MatchingError> {
        let mentee = self.store.get_mentee(mentee_id).await?;
        let mentors = self.store.list_active_mentors().await?;

        let matches = self.matcher.generate_matches(&mentee, &mentors).await;
        self.store.replace_matches(mentee_id, &matches).await?;

        tracing::info!("Generated {} matches for mentee {}", matches.len(), mentee_id);

        Ok(matches)
    }

    async fn invalidate(&self, mentee_id: &str) {
        if let Err(e) = self.cache.delete(&CacheKey::matches(mentee_id)).await {
            tracing::warn!("Failed to invalidate cache: {}", e);
        }
        if let Err(e) = self.cache.invalidate_prefix(&CacheKey::pair_prefix(mentee_id)).await {
            tracing::warn!("Failed to invalidate cache: {}", e);
        }
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(value) => Some(value),
            Err(CacheError::CacheMiss(_)) => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn store_in_cache<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }
}
