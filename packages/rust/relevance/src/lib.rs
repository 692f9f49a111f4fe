//! URL relevance scoring and budgeted selection.
//!
//! Given the noisy link list a site map returns, decide which few pages are
//! worth fetching:
//! - [`RelevanceScorer`]: additive heuristic with exclusion rules
//! - [`select_urls`]: rank by score, keep discovery order on ties, truncate

pub mod scorer;
pub mod selector;

pub use scorer::{
    DEFAULT_EXCLUDE_PATTERNS, DEFAULT_PRIORITY_PATHS, DEFAULT_VALUABLE_PATTERNS, RelevanceScorer,
};
pub use selector::{Selection, select_urls};
