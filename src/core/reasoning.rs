use crate::models::{MenteeProfile, MentorProfile};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a reasoning generator can report
#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("Reasoning request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Empty response from reasoning model")]
    EmptyResponse,

    #[error("Reasoning generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Reasoning generation is disabled: {0}")]
    Disabled(String),
}

/// Produces a short explanation of why a mentor suits a mentee
#[async_trait]
pub trait ReasoningGenerator: Send + Sync {
    async fn generate_reasoning(
        &self,
        mentee: &MenteeProfile,
        mentor: &MentorProfile,
        score: u8,
    ) -> Result<String, ReasoningError>;
}

/// Generator used when no model is configured; always fails
#[derive(Debug, Clone)]
pub struct DisabledReasoning {
    reason: String,
}

impl DisabledReasoning {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ReasoningGenerator for DisabledReasoning {
    async fn generate_reasoning(
        &self,
        _mentee: &MenteeProfile,
        _mentor: &MentorProfile,
        _score: u8,
    ) -> Result<String, ReasoningError> {
        Err(ReasoningError::Disabled(self.reason.clone()))
    }
}

/// Deterministic explanation used when the generator is unavailable
///
/// Only exact label matches between mentor expertise and mentee industries
/// count here; no fuzzy overlap is applied.
pub fn fallback_reasoning(mentee: &MenteeProfile, mentor: &MentorProfile) -> String {
    let expertise_match = mentor
        .expertise_areas
        .iter()
        .any(|area| mentee.industry_focus.contains(area));

    if expertise_match {
        format!(
            "Strong expertise match in {}. This mentor has relevant experience that aligns with your startup stage and industry focus.",
            mentor.expertise_areas.join(" and ")
        )
    } else {
        "This mentor offers valuable insights based on their background and expertise areas."
            .to_string()
    }
}

/// Prompt sent to a text-generation model
pub fn build_prompt(mentee: &MenteeProfile, mentor: &MentorProfile, score: u8) -> String {
    let industries = join_or(&mentee.industry_focus, "Not specified");
    let stage = mentee.stage().unwrap_or("Not specified");
    let expertise = join_or(&mentor.expertise_areas, "Not specified");
    let bio = mentor
        .bio
        .as_deref()
        .filter(|bio| !bio.is_empty())
        .unwrap_or("No bio available");

    format!(
        "You help startup founders find the right mentor for Office Hours sessions.\n\
         \n\
         Mentee Profile:\n\
         - Industry Focus: {industries}\n\
         - Startup Stage: {stage}\n\
         \n\
         Mentor Profile:\n\
         - Name: {name}\n\
         - Expertise Areas: {expertise}\n\
         - Bio: {bio}\n\
         \n\
         Match Score: {score}/100\n\
         \n\
         Write a brief, professional explanation (2-3 sentences) of why this mentor is a good match for this mentee. Cover:\n\
         1. How the mentor's expertise lines up with the mentee's needs\n\
         2. Why the match would be valuable\n\
         3. What the mentee can expect to learn\n\
         \n\
         Keep it concise and actionable.",
        name = mentor.display_name(),
    )
}

fn join_or(items: &[String], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}
