//! Budgeted selection of the most relevant discovered URLs.

use std::collections::HashSet;

use tracing::debug;

use crate::scorer::RelevanceScorer;

/// URLs chosen for fetching, best first, plus the counts behind the decision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Selected URLs, highest score first; ties keep discovery order.
    pub urls: Vec<String>,
    /// Number of URLs handed to the selector.
    pub considered: usize,
    /// Number of distinct URLs with a non-zero score, before truncation.
    pub eligible: usize,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// One-line description of the filtering decision.
    pub fn summary(&self) -> String {
        format!(
            "Filtered {} URLs down to {} valuable URLs",
            self.considered,
            self.urls.len()
        )
    }
}

/// Score, rank, and truncate `urls` to at most `limit` entries.
///
/// Zero-score URLs are dropped and repeated URLs keep only their first
/// occurrence. The sort is stable, so equal scores stay in input order.
pub fn select_urls<S: AsRef<str>>(
    scorer: &RelevanceScorer,
    urls: &[S],
    limit: usize,
) -> Selection {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut scored: Vec<(&str, f64)> = urls
        .iter()
        .map(AsRef::as_ref)
        .filter(|url| seen.insert(*url))
        .map(|url| (url, scorer.score(url)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    let eligible = scored.len();

    // Scores are finite and non-negative, so total_cmp is a plain ordering.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);

    let selection = Selection {
        urls: scored.into_iter().map(|(url, _)| url.to_string()).collect(),
        considered: urls.len(),
        eligible,
    };

    debug!(
        considered = selection.considered,
        eligible = selection.eligible,
        selected = selection.urls.len(),
        limit,
        "selected urls"
    );

    selection
}
