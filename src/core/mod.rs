// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod overlap;
pub mod reasoning;
pub mod scoring;
pub mod stage;

pub use filters::{apply_filters, matches_expertise, matches_industry, meets_min_rating};
pub use matcher::{MatchExplanation, Matcher};
pub use overlap::calculate_overlap;
pub use reasoning::{fallback_reasoning, DisabledReasoning, ReasoningError, ReasoningGenerator};
pub use scoring::{calculate_match_score, score_breakdown, score_components};
pub use stage::{stage_keywords, stage_relevance, StageRelevance};
