use crate::models::domain::{MatchBreakdown, MenteeMatch, RankedMatch};
use serde::{Deserialize, Serialize};

/// Response for the list matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMatchesResponse {
    #[serde(rename = "menteeId")]
    pub mentee_id: String,
    pub matches: Vec<RankedMatch>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Response for the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshMatchesResponse {
    pub count: usize,
    pub message: String,
}

/// Response for the explain endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainMatchResponse {
    #[serde(rename = "menteeId")]
    pub mentee_id: String,
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub reasoning: String,
    pub breakdown: MatchBreakdown,
}

/// Response for the mentor-side ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenteeMatchesResponse {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub mentees: Vec<MenteeMatch>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
