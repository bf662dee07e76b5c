//! Office Hours Match - mentor matching service for the Office Hours platform
//!
//! Scores mentee/mentor fit from industry, expertise and startup stage,
//! attaches a short reasoning text, and serves the ranked matches over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, calculate_overlap, Matcher};
pub use models::{MatchResult, MenteeProfile, MentorProfile, ScoringWeights};
