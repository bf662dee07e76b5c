use crate::core::{
    overlap::calculate_overlap,
    stage::{stage_relevance, STAGE_MATCH_SCORE},
};
use crate::models::{MatchBreakdown, MenteeProfile, MentorProfile, ScoreComponents, ScoringWeights};

/// Lowest raw score a match can receive
pub const MIN_RAW_SCORE: f64 = 0.30;

/// Highest raw score a match can receive
pub const MAX_RAW_SCORE: f64 = 0.95;

/// Calculate a match score (30-95) for a mentee/mentor pair
///
/// Scoring formula:
/// score = clamp(
///     industry_overlap * 0.35 +    # mentee industries vs mentor industries
///     expertise_overlap * 0.35 +   # mentee industries vs mentor expertise
///     stage_relevance +            # 0.20 / 0.12 / 0.05, or 0.10 without a stage
///     availability_bonus,          # flat 0.10
///     0.30, 0.95
/// ) * 100
///
/// Both overlap terms read the mentee's `industry_focus`; mentees have no
/// separate field describing what they need from a mentor.
pub fn calculate_match_score(
    mentee: &MenteeProfile,
    mentor: &MentorProfile,
    weights: &ScoringWeights,
) -> u8 {
    finalize_score(score_components(mentee, mentor, weights).raw_total())
}

/// Weighted contributions of each scoring factor, before clamping
pub fn score_components(
    mentee: &MenteeProfile,
    mentor: &MentorProfile,
    weights: &ScoringWeights,
) -> ScoreComponents {
    let industry_overlap = calculate_overlap(&mentee.industry_focus, &mentor.industry_focus);
    let expertise_overlap = calculate_overlap(&mentee.industry_focus, &mentor.expertise_areas);
    let stage = stage_relevance(mentee.stage(), &mentor.expertise_areas);

    ScoreComponents {
        industry: industry_overlap * weights.industry,
        expertise: expertise_overlap * weights.expertise,
        stage: stage.score(),
        availability: weights.availability,
    }
}

/// Score together with a per-component percentage breakdown
pub fn score_breakdown(
    mentee: &MenteeProfile,
    mentor: &MentorProfile,
    weights: &ScoringWeights,
) -> (u8, MatchBreakdown) {
    let components = score_components(mentee, mentor, weights);

    let breakdown = MatchBreakdown {
        industry_match: as_percentage(components.industry, weights.industry),
        expertise_match: as_percentage(components.expertise, weights.expertise),
        stage_relevance: as_percentage(components.stage, STAGE_MATCH_SCORE),
        availability: as_percentage(components.availability, weights.availability),
    };

    (finalize_score(components.raw_total()), breakdown)
}

/// Clamp a raw score and convert it to a rounded percentage
#[inline]
fn finalize_score(raw: f64) -> u8 {
    let clamped = raw.clamp(MIN_RAW_SCORE, MAX_RAW_SCORE);
    (clamped * 100.0).round() as u8
}

#[inline]
fn as_percentage(value: f64, max: f64) -> u8 {
    if max <= 0.0 {
        return 0;
    }
    ((value / max).clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentee(industries: &[&str], stage: Option<&str>) -> MenteeProfile {
        MenteeProfile {
            id: "mentee".to_string(),
            industry_focus: industries.iter().map(|s| s.to_string()).collect(),
            startup_stage: stage.map(str::to_string),
        }
    }

    fn mentor(expertise: &[&str], industries: &[&str]) -> MentorProfile {
        MentorProfile {
            id: "mentor".to_string(),
            expertise_areas: expertise.iter().map(|s| s.to_string()).collect(),
            industry_focus: industries.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_floor_when_nothing_overlaps() {
        // 0 + 0 + 0.10 + 0.10 = 0.20, clamped up to 0.30
        let score = calculate_match_score(
            &mentee(&["FinTech"], None),
            &mentor(&["Design"], &["Retail"]),
            &ScoringWeights::default(),
        );
        assert_eq!(score, 30);
    }

    #[test]
    fn test_ceiling_on_full_overlap() {
        // 0.35 + 0.35 + 0.20 + 0.10 = 1.00, clamped down to 0.95
        let score = calculate_match_score(
            &mentee(&["Fundraising"], Some("seed")),
            &mentor(&["Fundraising"], &["Fundraising"]),
            &ScoringWeights::default(),
        );
        assert_eq!(score, 95);
    }

    #[test]
    fn test_fintech_seed_scenario() {
        // industry 1.0, expertise (1.0 + 0) / 2 = 0.5, stage hit on "fundraising"
        // 0.35 + 0.175 + 0.20 + 0.10 accumulates to 0.8249999999999998
        let score = calculate_match_score(
            &mentee(&["FinTech"], Some("seed")),
            &mentor(&["Fundraising", "FinTech"], &["FinTech"]),
            &ScoringWeights::default(),
        );
        assert_eq!(score, 82);
    }

    #[test]
    fn test_general_expertise_tier() {
        // 0.35 + 0.35 + 0.12 + 0.10
        let score = calculate_match_score(
            &mentee(&["Product Management"], Some("late")),
            &mentor(&["Product Management"], &["Product Management"]),
            &ScoringWeights::default(),
        );
        assert_eq!(score, 92);
    }

    #[test]
    fn test_missing_fields_use_neutral_defaults() {
        let score = calculate_match_score(
            &MenteeProfile::default(),
            &MentorProfile::default(),
            &ScoringWeights::default(),
        );
        assert_eq!(score, 30);
    }

    #[test]
    fn test_score_is_idempotent() {
        let a = mentee(&["HealthTech", "AI/ML"], Some("early"));
        let b = mentor(&["Scaling Teams", "Machine Learning"], &["Healthcare"]);
        let weights = ScoringWeights::default();

        let first = calculate_match_score(&a, &b, &weights);
        let second = calculate_match_score(&a, &b, &weights);
        assert_eq!(first, second);
    }

    #[test]
    fn test_breakdown_percentages() {
        let (score, breakdown) = score_breakdown(
            &mentee(&["FinTech"], Some("seed")),
            &mentor(&["Fundraising", "FinTech"], &["FinTech"]),
            &ScoringWeights::default(),
        );

        assert_eq!(score, 82);
        assert_eq!(breakdown.industry_match, 100);
        assert_eq!(breakdown.expertise_match, 50);
        assert_eq!(breakdown.stage_relevance, 100);
        assert_eq!(breakdown.availability, 100);
    }

    #[test]
    fn test_breakdown_without_stage() {
        let (_, breakdown) = score_breakdown(
            &mentee(&["FinTech"], None),
            &mentor(&["Design"], &["Retail"]),
            &ScoringWeights::default(),
        );
        assert_eq!(breakdown.stage_relevance, 50);
        assert_eq!(breakdown.industry_match, 0);
    }
}
