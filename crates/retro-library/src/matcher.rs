//! Catalog entry to ROM file matching

use crate::{CandidateFile, CandidateIndex, CatalogEntry, MatchScorer, SystemTag, normalize};
use rayon::prelude::*;
use retro_config::MatchConfig;
use serde::Serialize;

/// Outcome of looking up one catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub entry: CatalogEntry,
    /// Platform the entry was looked up under
    pub target: SystemTag,
    /// Set only when the match was accepted
    pub file: Option<CandidateFile>,
    /// Best score seen, absent when no eligible file scored above zero
    pub score: Option<f64>,
    pub accepted: bool,
}

/// Finds the best file for a catalog entry within its platform
#[derive(Debug, Clone)]
pub struct MatchEngine {
    scorer: MatchScorer,
    accept_threshold: f64,
    include_unclassified: bool,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(&MatchConfig::default())
    }
}

impl MatchEngine {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            scorer: MatchScorer::new(config),
            accept_threshold: config.accept_threshold,
            include_unclassified: config.include_unclassified,
        }
    }

    /// Match one entry against the index.
    ///
    /// Only files detected as the entry's platform (or not detected at all)
    /// are considered. Every title variant is scored against every such
    /// file; an exact hit ends the search, otherwise the first file holding
    /// the best score wins if it reaches the acceptance threshold.
    pub fn find_match(&self, entry: &CatalogEntry, index: &CandidateIndex) -> MatchResult {
        let target = SystemTag::from_label(&entry.system);
        let candidates = self.eligible(&target, index);

        let variants: Vec<String> = title_variants(&entry.name)
            .iter()
            .map(|v| normalize(v))
            .filter(|v| !v.is_empty())
            .collect();

        let mut best: Option<(&CandidateFile, f64)> = None;

        for variant in &variants {
            for &candidate in &candidates {
                let score = self.scorer.score(variant, &candidate.normalized_stem);

                if score > 0.0 && best.is_none_or(|(_, top)| score > top) {
                    best = Some((candidate, score));
                }

                if score >= self.scorer.exact_score() {
                    tracing::debug!(
                        "Exact match for {}: {}",
                        entry.name,
                        candidate.path.display()
                    );
                    return self.decide(entry, target, best);
                }
            }
        }

        self.decide(entry, target, best)
    }

    /// Match many entries in parallel, keeping input order
    pub fn match_all(&self, entries: &[CatalogEntry], index: &CandidateIndex) -> Vec<MatchResult> {
        entries
            .par_iter()
            .map(|entry| self.find_match(entry, index))
            .collect()
    }

    /// Files allowed to match an entry of platform `target`, in scan order
    fn eligible<'a>(&self, target: &SystemTag, index: &'a CandidateIndex) -> Vec<&'a CandidateFile> {
        let mut files: Vec<&CandidateFile> = index.group(target).iter().collect();

        if self.include_unclassified && !target.is_unknown() {
            files.extend(index.group(&SystemTag::Unknown));
        }

        // A file confidently placed on another platform never qualifies
        files.retain(|f| &f.detected_system == target || f.detected_system.is_unknown());
        files
    }

    fn decide(
        &self,
        entry: &CatalogEntry,
        target: SystemTag,
        best: Option<(&CandidateFile, f64)>,
    ) -> MatchResult {
        let accepted = best.is_some_and(|(_, score)| score >= self.accept_threshold);

        MatchResult {
            entry: entry.clone(),
            target,
            file: best.filter(|_| accepted).map(|(file, _)| file.clone()),
            score: best.map(|(_, score)| score),
            accepted,
        }
    }
}

/// Alternate titles encoded with a trailing slash group.
///
/// `"Pokemon Blue/Red"` yields `"Pokemon Blue"`, `"Pokemon Red"` and then the
/// original name, which is always the last variant.
pub fn title_variants(name: &str) -> Vec<String> {
    let mut variants = Vec::new();

    if name.contains('/') {
        let (base, tail) = name.rsplit_once(' ').unwrap_or(("", name));
        if tail.contains('/') {
            for alternative in tail.split('/').filter(|a| !a.is_empty()) {
                if base.is_empty() {
                    variants.push(alternative.to_string());
                } else {
                    variants.push(format!("{} {}", base, alternative));
                }
            }
        }
    }

    variants.push(name.to_string());
    variants
}
