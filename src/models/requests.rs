use crate::models::MatchFilters;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Query string for listing a mentee's matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_min_rating"))]
pub struct ListMatchesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "mentee_id", rename = "menteeId")]
    pub mentee_id: String,
    /// Comma-separated expertise areas
    #[serde(default)]
    pub expertise: Option<String>,
    /// Comma-separated industries
    #[serde(default)]
    pub industry: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(alias = "min_rating", rename = "minRating", default)]
    pub min_rating: Option<f64>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}

impl ListMatchesQuery {
    pub fn filters(&self) -> MatchFilters {
        MatchFilters {
            expertise: split_list(self.expertise.as_deref()),
            industry: split_list(self.industry.as_deref()),
            min_rating: self.min_rating,
            limit: self.limit.map(usize::from),
        }
    }
}

/// Range checks pass NaN through, so reject non-finite ratings here
fn validate_min_rating(query: &ListMatchesQuery) -> Result<(), ValidationError> {
    match query.min_rating {
        Some(rating) if !rating.is_finite() => Err(ValidationError::new("min_rating_not_finite")),
        _ => Ok(()),
    }
}

/// Request to regenerate a mentee's matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "mentee_id", rename = "menteeId")]
    pub mentee_id: String,
}

/// Query string for explaining a single pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExplainMatchQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "mentee_id", rename = "menteeId")]
    pub mentee_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "mentor_id", rename = "mentorId")]
    pub mentor_id: String,
}

/// Split a comma-separated query value, dropping blanks
fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_from_query() {
        let query = ListMatchesQuery {
            mentee_id: "m1".to_string(),
            expertise: Some("Fundraising, Product Management,".to_string()),
            industry: None,
            min_rating: Some(4.0),
            limit: Some(5),
        };

        let filters = query.filters();
        assert_eq!(filters.expertise, vec!["Fundraising", "Product Management"]);
        assert!(filters.industry.is_empty());
        assert_eq!(filters.min_rating, Some(4.0));
        assert_eq!(filters.limit, Some(5));
    }

    #[test]
    fn test_limit_validation() {
        let query = ListMatchesQuery {
            mentee_id: "m1".to_string(),
            expertise: None,
            industry: None,
            min_rating: None,
            limit: Some(500),
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_min_rating_must_be_finite() {
        let mut query = ListMatchesQuery {
            mentee_id: "m1".to_string(),
            expertise: None,
            industry: None,
            min_rating: Some(f64::NAN),
            limit: None,
        };
        assert!(query.validate().is_err());

        query.min_rating = Some(f64::INFINITY);
        assert!(query.validate().is_err());

        query.min_rating = Some(4.5);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_refresh_request_accepts_snake_case() {
        let req: RefreshMatchesRequest = serde_json::from_str(r#"{"mentee_id":"m1"}"#).unwrap();
        assert_eq!(req.mentee_id, "m1");
        assert!(req.validate().is_ok());
    }
}
