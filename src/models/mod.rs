// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    MatchBreakdown, MatchFilters, MatchResult, MenteeMatch, MenteeProfile, MentorProfile, MentorStats,
    MentorSummary, RankedMatch, ScoreComponents, ScoringWeights,
};
pub use requests::{ExplainMatchQuery, ListMatchesQuery, RefreshMatchesRequest};
pub use responses::{
    ErrorResponse, ExplainMatchResponse, HealthResponse, ListMatchesResponse, MenteeMatchesResponse,
    RefreshMatchesResponse,
};
