//! Startup-stage relevance of a mentor's expertise.

/// Contribution when a mentor's expertise mentions a keyword for the stage
pub const STAGE_MATCH_SCORE: f64 = 0.20;

/// Contribution for general business expertise without a stage keyword
pub const GENERAL_EXPERTISE_SCORE: f64 = 0.12;

/// Contribution when the mentee has no startup stage
pub const UNSPECIFIED_STAGE_SCORE: f64 = 0.10;

/// Contribution when nothing in the mentor's expertise relates to the stage
pub const UNRELATED_STAGE_SCORE: f64 = 0.05;

/// Expertise areas that are useful at any stage (exact match)
pub const GENERAL_EXPERTISE: [&str; 4] = [
    "Startup Strategy",
    "Business Development",
    "Fundraising",
    "Product Management",
];

const PRE_SEED_KEYWORDS: &[&str] = &[
    "fundraising",
    "angel",
    "pre-seed",
    "startup strategy",
    "mvp",
    "validation",
];
const SEED_KEYWORDS: &[&str] = &[
    "fundraising",
    "seed",
    "venture",
    "growth",
    "go-to-market",
    "product-market fit",
];
const EARLY_KEYWORDS: &[&str] = &[
    "scaling",
    "growth",
    "team building",
    "hiring",
    "series a",
    "go-to-market",
];
const GROWTH_KEYWORDS: &[&str] = &[
    "scaling",
    "growth hacking",
    "series b",
    "expansion",
    "operations",
];
const LATE_KEYWORDS: &[&str] = &["scaling", "enterprise", "operations", "ipo", "acquisition"];
const FALLBACK_KEYWORDS: &[&str] = &["startup", "business"];

/// How a mentor's expertise relates to a mentee's startup stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRelevance {
    /// Mentee did not report a stage
    Unspecified,
    /// Mentor expertise contains a keyword for the stage
    Matched,
    /// Mentor has general business expertise only
    General,
    /// Nothing relevant
    Unrelated,
}

impl StageRelevance {
    /// Weighted contribution to the raw match score
    pub fn score(self) -> f64 {
        match self {
            StageRelevance::Unspecified => UNSPECIFIED_STAGE_SCORE,
            StageRelevance::Matched => STAGE_MATCH_SCORE,
            StageRelevance::General => GENERAL_EXPERTISE_SCORE,
            StageRelevance::Unrelated => UNRELATED_STAGE_SCORE,
        }
    }
}

/// Keywords that signal relevant expertise for a startup stage
///
/// Stage names are matched case-insensitively; unknown stages fall back to
/// generic startup keywords.
pub fn stage_keywords(stage: &str) -> &'static [&'static str] {
    match stage.to_lowercase().as_str() {
        "pre-seed" => PRE_SEED_KEYWORDS,
        "seed" => SEED_KEYWORDS,
        "early" => EARLY_KEYWORDS,
        "growth" => GROWTH_KEYWORDS,
        "late" => LATE_KEYWORDS,
        _ => FALLBACK_KEYWORDS,
    }
}

/// Classify a mentor's expertise against a mentee's (optional) stage
pub fn stage_relevance<S: AsRef<str>>(stage: Option<&str>, expertise_areas: &[S]) -> StageRelevance {
    let Some(stage) = stage else {
        return StageRelevance::Unspecified;
    };

    let keywords = stage_keywords(stage);
    let has_stage_expertise = expertise_areas.iter().any(|area| {
        let area = area.as_ref().to_lowercase();
        keywords.iter().any(|keyword| area.contains(keyword))
    });

    if has_stage_expertise {
        return StageRelevance::Matched;
    }

    let has_general_expertise = expertise_areas
        .iter()
        .any(|area| GENERAL_EXPERTISE.contains(&area.as_ref()));

    if has_general_expertise {
        StageRelevance::General
    } else {
        StageRelevance::Unrelated
    }
}
