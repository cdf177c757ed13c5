use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Sub-term of a residue-pair weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactCategory {
    BackboneBackbone,
    SidechainSidechain,
    SidechainBackbone,
    BackboneSidechain,
    NonAdjacent,
}

impl ContactCategory {
    pub const ALL: [ContactCategory; 5] = [
        ContactCategory::BackboneBackbone,
        ContactCategory::SidechainSidechain,
        ContactCategory::SidechainBackbone,
        ContactCategory::BackboneSidechain,
        ContactCategory::NonAdjacent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContactCategory::BackboneBackbone => "BB_BB",
            ContactCategory::SidechainSidechain => "SC_SC",
            ContactCategory::SidechainBackbone => "SC_BB",
            ContactCategory::BackboneSidechain => "BB_SC",
            ContactCategory::NonAdjacent => "non-adjacent",
        }
    }
}

impl fmt::Display for ContactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySummary {
    pub count: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    /// Most frequent raw count; the smallest value wins ties.
    pub mode: usize,
}

/// Raw (unnormalized) counts observed per category while building one structure's graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactStatistics {
    samples: BTreeMap<ContactCategory, Vec<usize>>,
}

impl ContactStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: ContactCategory, raw_count: usize) {
        self.samples.entry(category).or_default().push(raw_count);
    }

    pub fn samples(&self, category: ContactCategory) -> &[usize] {
        self.samples
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn summary(&self, category: ContactCategory) -> Option<CategorySummary> {
        let samples = self.samples(category);
        let min = *samples.iter().min()?;
        let max = *samples.iter().max()?;
        let mean = samples.iter().sum::<usize>() as f64 / samples.len() as f64;
        let mode = samples
            .iter()
            .counts()
            .into_iter()
            .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then(b.cmp(a)))
            .map(|(value, _)| *value)?;

        Some(CategorySummary {
            count: samples.len(),
            min,
            max,
            mean,
            mode,
        })
    }

    pub fn log(&self, structure: &str) {
        for category in ContactCategory::ALL {
            if let Some(s) = self.summary(category) {
                debug!(
                    structure,
                    category = category.label(),
                    count = s.count,
                    min = s.min,
                    max = s.max,
                    mean = s.mean,
                    mode = s.mode,
                    "Contact count statistics"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_none_without_samples() {
        let stats = ContactStatistics::new();
        assert!(stats.summary(ContactCategory::NonAdjacent).is_none());
        assert!(stats.samples(ContactCategory::NonAdjacent).is_empty());
    }

    #[test]
    fn summary_reports_descriptive_statistics() {
        let mut stats = ContactStatistics::new();
        for count in [3, 1, 3, 0, 8] {
            stats.record(ContactCategory::SidechainSidechain, count);
        }
        let summary = stats.summary(ContactCategory::SidechainSidechain).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 0);
        assert_eq!(summary.max, 8);
        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert_eq!(summary.mode, 3);
    }

    #[test]
    fn mode_prefers_smallest_value_on_ties() {
        let mut stats = ContactStatistics::new();
        for count in [5, 2, 5, 2] {
            stats.record(ContactCategory::BackboneBackbone, count);
        }
        assert_eq!(stats.summary(ContactCategory::BackboneBackbone).unwrap().mode, 2);
    }

    #[test]
    fn categories_have_stable_labels() {
        let labels: Vec<_> = ContactCategory::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["BB_BB", "SC_SC", "SC_BB", "BB_SC", "non-adjacent"]);
    }
}
