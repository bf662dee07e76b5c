use crate::models::{MatchFilters, MentorSummary, RankedMatch};

/// Check if a mentor has any of the requested expertise areas (exact match)
#[inline]
pub fn matches_expertise(mentor: &MentorSummary, expertise: &[String]) -> bool {
    expertise.is_empty()
        || expertise
            .iter()
            .any(|area| mentor.expertise_areas.contains(area))
}

/// Check if a mentor covers any requested industry, either as an industry
/// focus or as an expertise area
#[inline]
pub fn matches_industry(mentor: &MentorSummary, industries: &[String]) -> bool {
    industries.is_empty()
        || industries.iter().any(|industry| {
            mentor.industry_focus.contains(industry) || mentor.expertise_areas.contains(industry)
        })
}

/// Check the mentor's average rating against a minimum
///
/// Mentors without any feedback yet are never excluded.
#[inline]
pub fn meets_min_rating(mentor: &MentorSummary, min_rating: Option<f64>) -> bool {
    match (min_rating, mentor.average_rating) {
        (Some(min), Some(average)) => average >= min,
        _ => true,
    }
}

/// Apply list filters to matches that are already sorted by score
///
/// The limit is applied after filtering, so it counts kept matches only.
pub fn apply_filters(matches: Vec<RankedMatch>, filters: &MatchFilters) -> Vec<RankedMatch> {
    let filtered = matches.into_iter().filter(|m| {
        matches_expertise(&m.mentor, &filters.expertise)
            && matches_industry(&m.mentor, &filters.industry)
            && meets_min_rating(&m.mentor, filters.min_rating)
    });

    match filters.limit {
        Some(limit) => filtered.take(limit).collect(),
        None => filtered.collect(),
    }
}
