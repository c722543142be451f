//! Tiered title similarity

use retro_config::MatchConfig;
use std::collections::HashSet;

/// Scores a normalized catalog title against a normalized file title.
///
/// Tiers are tried in order and the first that applies wins: identity,
/// query inside candidate, candidate inside query, then word overlap
/// relative to the longer word set.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    exact: f64,
    query_in_candidate: f64,
    candidate_in_query: f64,
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new(&MatchConfig::default())
    }
}

impl MatchScorer {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            exact: config.exact_score,
            query_in_candidate: config.query_in_candidate_score,
            candidate_in_query: config.candidate_in_query_score,
        }
    }

    /// Score returned for identical titles
    pub fn exact_score(&self) -> f64 {
        self.exact
    }

    /// Similarity in `[0, 1]`
    pub fn score(&self, query: &str, candidate: &str) -> f64 {
        // An empty side would be contained in everything
        if query.is_empty() || candidate.is_empty() {
            return 0.0;
        }

        let score = if query == candidate {
            self.exact
        } else if candidate.contains(query) {
            self.query_in_candidate
        } else if query.contains(candidate) {
            self.candidate_in_query
        } else {
            word_overlap(query, candidate)
        };

        score.clamp(0.0, 1.0)
    }
}

/// Shared words over the size of the larger word set
fn word_overlap(query: &str, candidate: &str) -> f64 {
    let query_words: HashSet<&str> = query.split_whitespace().collect();
    let candidate_words: HashSet<&str> = candidate.split_whitespace().collect();

    if query_words.is_empty() || candidate_words.is_empty() {
        return 0.0;
    }

    let common = query_words.intersection(&candidate_words).count();
    common as f64 / query_words.len().max(candidate_words.len()) as f64
}
