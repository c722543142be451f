//! Candidate files grouped by platform

use crate::{CandidateFile, SystemTag};
use std::collections::BTreeMap;

/// Candidate files keyed by their detected platform.
///
/// Each group keeps scan order, which is what breaks ties between equally
/// good matches.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    groups: BTreeMap<SystemTag, Vec<CandidateFile>>,
}

impl CandidateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a batch of files
    pub fn build(files: impl IntoIterator<Item = CandidateFile>) -> Self {
        let mut index = Self::new();
        index.extend(files);
        index
    }

    pub fn insert(&mut self, file: CandidateFile) {
        self.groups
            .entry(file.detected_system.clone())
            .or_default()
            .push(file);
    }

    /// Append files after those already present
    pub fn extend(&mut self, files: impl IntoIterator<Item = CandidateFile>) {
        for file in files {
            self.insert(file);
        }
    }

    /// Append every group of another index
    pub fn merge(&mut self, other: CandidateIndex) {
        for (system, files) in other.groups {
            self.groups.entry(system).or_default().extend(files);
        }
    }

    /// Files detected as `system`, in scan order
    pub fn group(&self, system: &SystemTag) -> &[CandidateFile] {
        self.groups.get(system).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Platforms with at least one file, with their file counts
    pub fn systems(&self) -> impl Iterator<Item = (&SystemTag, usize)> {
        self.groups
            .iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(system, files)| (system, files.len()))
    }

    /// Total number of files
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
