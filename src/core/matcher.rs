use crate::core::{
    reasoning::{fallback_reasoning, ReasoningError, ReasoningGenerator},
    scoring::{calculate_match_score, score_breakdown},
};
use crate::models::{MatchBreakdown, MatchResult, MenteeMatch, MenteeProfile, MentorProfile, ScoringWeights};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Scores at or below this value skip the reasoning generator
pub const DEFAULT_REASONING_THRESHOLD: u8 = 60;

/// Upper bound on a single reasoning call
pub const DEFAULT_REASONING_TIMEOUT: Duration = Duration::from_secs(10);

/// Score, reasoning and breakdown for a single pair
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExplanation {
    pub score: u8,
    pub reasoning: String,
    pub breakdown: MatchBreakdown,
}

/// Match orchestrator - scores mentors for a mentee and attaches reasoning
///
/// # Pipeline Stages
/// 1. Score every mentor (pure, synchronous)
/// 2. Request reasoning concurrently for matches above the threshold
/// 3. Substitute the templated fallback for failed, slow or skipped calls
/// 4. Rank by score, keeping input order between equal scores
#[derive(Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    reasoning: Arc<dyn ReasoningGenerator>,
    reasoning_timeout: Duration,
    reasoning_threshold: u8,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("weights", &self.weights)
            .field("reasoning_timeout", &self.reasoning_timeout)
            .field("reasoning_threshold", &self.reasoning_threshold)
            .finish_non_exhaustive()
    }
}

impl Matcher {
    pub fn new(weights: ScoringWeights, reasoning: Arc<dyn ReasoningGenerator>) -> Self {
        Self {
            weights,
            reasoning,
            reasoning_timeout: DEFAULT_REASONING_TIMEOUT,
            reasoning_threshold: DEFAULT_REASONING_THRESHOLD,
        }
    }

    pub fn with_default_weights(reasoning: Arc<dyn ReasoningGenerator>) -> Self {
        Self::new(ScoringWeights::default(), reasoning)
    }

    pub fn with_reasoning_timeout(mut self, timeout: Duration) -> Self {
        self.reasoning_timeout = timeout;
        self
    }

    pub fn with_reasoning_threshold(mut self, threshold: u8) -> Self {
        self.reasoning_threshold = threshold;
        self
    }

    /// Score a single pair
    pub fn score(&self, mentee: &MenteeProfile, mentor: &MentorProfile) -> u8 {
        calculate_match_score(mentee, mentor, &self.weights)
    }

    /// Score every mentor for a mentee and attach reasoning
    ///
    /// Reasoning calls run concurrently and never fail the batch: any error,
    /// timeout or panic yields the templated fallback.
    ///
    /// # Returns
    /// One result per mentor, sorted by descending score. Mentors with equal
    /// scores keep the order they were passed in.
    pub async fn generate_matches(
        &self,
        mentee: &MenteeProfile,
        mentors: &[MentorProfile],
    ) -> Vec<MatchResult> {
        let scores: Vec<u8> = mentors.iter().map(|mentor| self.score(mentee, mentor)).collect();

        let mut reasoning: Vec<Option<String>> = vec![None; mentors.len()];
        let mut tasks = JoinSet::new();
        let mentee_arc = Arc::new(mentee.clone());

        for (index, (mentor, score)) in mentors.iter().zip(&scores).enumerate() {
            if *score <= self.reasoning_threshold {
                continue;
            }

            let generator = Arc::clone(&self.reasoning);
            let mentee = Arc::clone(&mentee_arc);
            let mentor = mentor.clone();
            let score = *score;
            let timeout = self.reasoning_timeout;

            tasks.spawn(async move {
                let text = reasoning_with_timeout(generator.as_ref(), &mentee, &mentor, score, timeout).await;
                (index, text)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(text))) => reasoning[index] = Some(text),
                Ok((index, Err(e))) => {
                    tracing::warn!(
                        "Reasoning generation failed for mentor {}, using fallback: {}",
                        mentors[index].id,
                        e
                    );
                }
                Err(e) => tracing::error!("Reasoning task panicked: {}", e),
            }
        }

        let generated_at = chrono::Utc::now();

        let mut matches: Vec<MatchResult> = mentors
            .iter()
            .zip(scores)
            .zip(reasoning)
            .map(|((mentor, score), text)| MatchResult {
                mentee_id: mentee.id.clone(),
                mentor_id: mentor.id.clone(),
                score,
                reasoning: text.unwrap_or_else(|| fallback_reasoning(mentee, mentor)),
                generated_at,
            })
            .collect();

        // Stable sort keeps fetch order between equal scores
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            "Generated {} matches for mentee {}",
            matches.len(),
            mentee.id
        );

        matches
    }

    /// Score a single pair with a breakdown, always asking for reasoning
    pub async fn explain(&self, mentee: &MenteeProfile, mentor: &MentorProfile) -> MatchExplanation {
        let (score, breakdown) = score_breakdown(mentee, mentor, &self.weights);

        let reasoning = match reasoning_with_timeout(
            self.reasoning.as_ref(),
            mentee,
            mentor,
            score,
            self.reasoning_timeout,
        )
        .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "Reasoning generation failed for {} -> {}, using fallback: {}",
                    mentee.id,
                    mentor.id,
                    e
                );
                fallback_reasoning(mentee, mentor)
            }
        };

        MatchExplanation {
            score,
            reasoning,
            breakdown,
        }
    }

    /// Rank mentees for a mentor by score, without reasoning
    pub fn rank_mentees(&self, mentor: &MentorProfile, mentees: Vec<MenteeProfile>) -> Vec<MenteeMatch> {
        let mut ranked: Vec<MenteeMatch> = mentees
            .into_iter()
            .map(|mentee| {
                let match_score = self.score(&mentee, mentor);
                MenteeMatch {
                    mentee_id: mentee.id,
                    industry_focus: mentee.industry_focus,
                    startup_stage: mentee.startup_stage,
                    match_score,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        ranked
    }
}

/// Ask the generator for reasoning, bounded by `timeout`
///
/// Blank responses count as failures so callers can fall back.
async fn reasoning_with_timeout(
    generator: &dyn ReasoningGenerator,
    mentee: &MenteeProfile,
    mentor: &MentorProfile,
    score: u8,
    timeout: Duration,
) -> Result<String, ReasoningError> {
    let text = tokio::time::timeout(timeout, generator.generate_reasoning(mentee, mentor, score))
        .await
        .map_err(|_| ReasoningError::Timeout(timeout))??;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ReasoningError::EmptyResponse);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reasoning::DisabledReasoning;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedReasoning {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReasoningGenerator for FixedReasoning {
        async fn generate_reasoning(
            &self,
            _mentee: &MenteeProfile,
            mentor: &MentorProfile,
            score: u8,
        ) -> Result<String, ReasoningError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{} fits at {}", mentor.id, score))
        }
    }

    struct SlowReasoning;

    #[async_trait]
    impl ReasoningGenerator for SlowReasoning {
        async fn generate_reasoning(
            &self,
            _mentee: &MenteeProfile,
            _mentor: &MentorProfile,
            _score: u8,
        ) -> Result<String, ReasoningError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    struct PanickingReasoning;

    #[async_trait]
    impl ReasoningGenerator for PanickingReasoning {
        async fn generate_reasoning(
            &self,
            _mentee: &MenteeProfile,
            mentor: &MentorProfile,
            _score: u8,
        ) -> Result<String, ReasoningError> {
            panic!("generator blew up for {}", mentor.id);
        }
    }

    const HIGH_FALLBACK: &str = "Strong expertise match in Fundraising and FinTech. This mentor has relevant experience that aligns with your startup stage and industry focus.";

    fn create_mentee() -> MenteeProfile {
        MenteeProfile {
            id: "mentee".to_string(),
            industry_focus: vec!["FinTech".to_string()],
            startup_stage: Some("seed".to_string()),
        }
    }

    fn create_mentor(id: &str, expertise: &[&str], industries: &[&str]) -> MentorProfile {
        MentorProfile {
            id: id.to_string(),
            expertise_areas: expertise.iter().map(|s| s.to_string()).collect(),
            industry_focus: industries.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_matches_sorted_by_score() {
        let matcher = Matcher::with_default_weights(Arc::new(DisabledReasoning::new("test")));
        let mentors = vec![
            create_mentor("low", &["Design"], &["Retail"]),
            create_mentor("high", &["Fundraising", "FinTech"], &["FinTech"]),
            create_mentor("mid", &["Fundraising"], &["FinTech Solutions"]),
        ];

        let matches = matcher.generate_matches(&create_mentee(), &mentors).await;

        let ids: Vec<&str> = matches.iter().map(|m| m.mentor_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        let scores: Vec<u8> = matches.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![82, 54, 30]);
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let matcher = Matcher::with_default_weights(Arc::new(DisabledReasoning::new("test")));
        let mentors = vec![
            create_mentor("b", &["Design"], &[]),
            create_mentor("a", &["Design"], &[]),
            create_mentor("c", &["Design"], &[]),
        ];

        let matches = matcher.generate_matches(&create_mentee(), &mentors).await;

        let ids: Vec<&str> = matches.iter().map(|m| m.mentor_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_reasoning_only_above_threshold() {
        let generator = Arc::new(FixedReasoning {
            calls: AtomicUsize::new(0),
        });
        let matcher = Matcher::with_default_weights(generator.clone());
        let mentors = vec![
            create_mentor("high", &["Fundraising", "FinTech"], &["FinTech"]),
            create_mentor("low", &["Design"], &["Retail"]),
        ];

        let matches = matcher.generate_matches(&create_mentee(), &mentors).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(matches[0].reasoning, "high fits at 82");
        assert_eq!(
            matches[1].reasoning,
            "This mentor offers valuable insights based on their background and expertise areas."
        );
    }

    #[tokio::test]
    async fn test_failed_reasoning_uses_fallback() {
        let matcher = Matcher::with_default_weights(Arc::new(DisabledReasoning::new("test")));
        let mentors = vec![create_mentor("high", &["Fundraising", "FinTech"], &["FinTech"])];

        let matches = matcher.generate_matches(&create_mentee(), &mentors).await;

        assert_eq!(matches[0].reasoning, HIGH_FALLBACK);
    }

    #[tokio::test]
    async fn test_slow_reasoning_times_out() {
        let matcher = Matcher::with_default_weights(Arc::new(SlowReasoning))
            .with_reasoning_timeout(Duration::from_millis(50));
        let mentor = create_mentor("high", &["Fundraising", "FinTech"], &["FinTech"]);

        let explanation = matcher.explain(&create_mentee(), &mentor).await;

        assert_eq!(explanation.score, 82);
        assert!(explanation.reasoning.starts_with("Strong expertise match"));
    }

    #[tokio::test]
    async fn test_batch_timeout_falls_back() {
        let matcher = Matcher::with_default_weights(Arc::new(SlowReasoning))
            .with_reasoning_timeout(Duration::from_millis(50));
        let mentors = vec![
            create_mentor("low", &["Design"], &["Retail"]),
            create_mentor("high", &["Fundraising", "FinTech"], &["FinTech"]),
        ];

        let started = std::time::Instant::now();
        let matches = matcher.generate_matches(&create_mentee(), &mentors).await;

        assert!(started.elapsed() < Duration::from_secs(10));
        let ids: Vec<&str> = matches.iter().map(|m| m.mentor_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low"]);
        assert_eq!(matches[0].score, 82);
        assert_eq!(matches[0].reasoning, HIGH_FALLBACK);
    }

    #[tokio::test]
    async fn test_batch_panic_falls_back() {
        let matcher = Matcher::with_default_weights(Arc::new(PanickingReasoning));
        let mentors = vec![
            create_mentor("low", &["Design"], &["Retail"]),
            create_mentor("high", &["Fundraising", "FinTech"], &["FinTech"]),
            create_mentor("also-high", &["Fundraising", "FinTech"], &["FinTech"]),
        ];

        let matches = matcher.generate_matches(&create_mentee(), &mentors).await;

        let ids: Vec<&str> = matches.iter().map(|m| m.mentor_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "also-high", "low"]);
        assert_eq!(matches[0].reasoning, HIGH_FALLBACK);
        assert_eq!(matches[1].reasoning, HIGH_FALLBACK);
    }

    #[tokio::test]
    async fn test_explain_uses_generator() {
        let matcher = Matcher::with_default_weights(Arc::new(FixedReasoning {
            calls: AtomicUsize::new(0),
        }));
        // Below the list threshold, but explain always asks
        let mentor = create_mentor("low", &["Design"], &["Retail"]);

        let explanation = matcher.explain(&create_mentee(), &mentor).await;

        assert_eq!(explanation.score, 30);
        assert_eq!(explanation.reasoning, "low fits at 30");
    }

    #[test]
    fn test_rank_mentees() {
        let matcher = Matcher::with_default_weights(Arc::new(DisabledReasoning::new("test")));
        let mentor = create_mentor("mentor", &["Fundraising", "FinTech"], &["FinTech"]);

        let mentees = vec![
            MenteeProfile {
                id: "other".to_string(),
                industry_focus: vec!["Retail".to_string()],
                startup_stage: None,
            },
            create_mentee(),
        ];

        let ranked = matcher.rank_mentees(&mentor, mentees);

        assert_eq!(ranked[0].mentee_id, "mentee");
        assert_eq!(ranked[0].match_score, 82);
        assert_eq!(ranked[1].mentee_id, "other");
    }
}
