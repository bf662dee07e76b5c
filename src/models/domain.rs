use serde::{Deserialize, Serialize};

/// Mentee attributes used for scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenteeProfile {
    pub id: String,
    #[serde(rename = "industryFocus", default)]
    pub industry_focus: Vec<String>,
    #[serde(rename = "startupStage", default)]
    pub startup_stage: Option<String>,
}

impl MenteeProfile {
    /// Startup stage, with an empty string treated as absent
    pub fn stage(&self) -> Option<&str> {
        self.startup_stage
            .as_deref()
            .filter(|stage| !stage.is_empty())
    }
}

/// Mentor attributes used for scoring, plus display fields for reasoning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentorProfile {
    pub id: String,
    #[serde(rename = "expertiseAreas", default)]
    pub expertise_areas: Vec<String>,
    #[serde(rename = "industryFocus", default)]
    pub industry_focus: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl MentorProfile {
    /// Name shown to mentees: the mentor's name, else email, else id
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Scored mentee/mentor pair with its reasoning text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "menteeId")]
    pub mentee_id: String,
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub score: u8,
    pub reasoning: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Raw weighted contributions that add up to a match score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    pub industry: f64,
    pub expertise: f64,
    pub stage: f64,
    pub availability: f64,
}

impl ScoreComponents {
    /// Sum in the order the components are computed
    pub fn raw_total(&self) -> f64 {
        let mut total = 0.0;
        total += self.industry;
        total += self.expertise;
        total += self.stage;
        total += self.availability;
        total
    }
}

/// Per-component percentages returned by the explain endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(rename = "industryMatch")]
    pub industry_match: u8,
    #[serde(rename = "expertiseMatch")]
    pub expertise_match: u8,
    #[serde(rename = "stageRelevance")]
    pub stage_relevance: u8,
    pub availability: u8,
}

/// Mentor details attached to a ranked match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "expertiseAreas")]
    pub expertise_areas: Vec<String>,
    #[serde(rename = "industryFocus")]
    pub industry_focus: Vec<String>,
    pub bio: Option<String>,
    #[serde(rename = "averageRating")]
    pub average_rating: Option<f64>,
    #[serde(rename = "totalSessions")]
    pub total_sessions: i64,
}

impl MentorSummary {
    pub fn from_profile(mentor: &MentorProfile, stats: MentorStats) -> Self {
        Self {
            id: mentor.id.clone(),
            name: mentor.display_name().to_string(),
            expertise_areas: mentor.expertise_areas.clone(),
            industry_focus: mentor.industry_focus.clone(),
            bio: mentor.bio.clone(),
            average_rating: stats.average_rating,
            total_sessions: stats.completed_sessions,
        }
    }
}

/// Feedback and session aggregates for one mentor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MentorStats {
    pub average_rating: Option<f64>,
    pub completed_sessions: i64,
}

/// A stored match joined with its mentor, as served to list consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub mentor: MentorSummary,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub reasoning: String,
}

/// Mentee scored against a single mentor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenteeMatch {
    #[serde(rename = "menteeId")]
    pub mentee_id: String,
    #[serde(rename = "industryFocus")]
    pub industry_focus: Vec<String>,
    #[serde(rename = "startupStage")]
    pub startup_stage: Option<String>,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

/// Filters applied to a mentee's ranked matches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilters {
    pub expertise: Vec<String>,
    pub industry: Vec<String>,
    pub min_rating: Option<f64>,
    pub limit: Option<usize>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub industry: f64,
    pub expertise: f64,
    pub availability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            industry: 0.35,
            expertise: 0.35,
            availability: 0.10,
        }
    }
}
