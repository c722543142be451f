//! Title matching thresholds

use serde::{Deserialize, Serialize};

/// Scoring tiers and the acceptance cutoff used by the match engine.
///
/// The values are empirical; they are kept here so a curated catalog with
/// unusual naming can be tuned without touching the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Score for titles that are identical after normalization
    #[serde(default = "default_exact_score")]
    pub exact_score: f64,

    /// Score when the catalog title is contained in the file title
    #[serde(default = "default_query_in_candidate")]
    pub query_in_candidate_score: f64,

    /// Score when the file title is contained in the catalog title
    #[serde(default = "default_candidate_in_query")]
    pub candidate_in_query_score: f64,

    /// Minimum best score for a match to be accepted
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f64,

    /// Let files with no detected platform compete for every platform
    #[serde(default = "default_include_unclassified")]
    pub include_unclassified: bool,
}

fn default_exact_score() -> f64 {
    1.0
}

fn default_query_in_candidate() -> f64 {
    0.8
}

fn default_candidate_in_query() -> f64 {
    0.7
}

fn default_accept_threshold() -> f64 {
    0.5
}

fn default_include_unclassified() -> bool {
    true
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            exact_score: default_exact_score(),
            query_in_candidate_score: default_query_in_candidate(),
            candidate_in_query_score: default_candidate_in_query(),
            accept_threshold: default_accept_threshold(),
            include_unclassified: default_include_unclassified(),
        }
    }
}

impl MatchConfig {
    /// Named scores, for validation and diagnostics
    pub fn scores(&self) -> [(&'static str, f64); 4] {
        [
            ("exact_score", self.exact_score),
            ("query_in_candidate_score", self.query_in_candidate_score),
            ("candidate_in_query_score", self.candidate_in_query_score),
            ("accept_threshold", self.accept_threshold),
        ]
    }
}
