//! Additive URL relevance heuristic.
//!
//! A URL scores 0 when it hits any exclusion pattern. Otherwise it starts at
//! [`BASE_SCORE`] and collects bonuses for valuable-content patterns, a
//! priority path fragment, and a shallow path, minus a penalty for very long
//! URLs. The result is clamped at zero.

/// Score of any URL that is not excluded, before bonuses.
pub const BASE_SCORE: f64 = 1.0;

/// Added once per distinct valuable pattern found in the URL.
pub const VALUABLE_MATCH_BONUS: f64 = 2.0;

/// Added when the path contains one of the priority fragments.
pub const PRIORITY_PATH_BONUS: f64 = 3.0;

/// Subtracted for URLs longer than [`LONG_URL_THRESHOLD`] characters.
pub const LONG_URL_PENALTY: f64 = 1.0;

/// URLs longer than this many characters take [`LONG_URL_PENALTY`].
pub const LONG_URL_THRESHOLD: usize = 100;

/// Added when the path has at most [`SHALLOW_PATH_MAX_DEPTH`] segments.
pub const SHALLOW_PATH_BONUS: f64 = 1.0;

/// Deepest path, in segments, that still earns [`SHALLOW_PATH_BONUS`].
pub const SHALLOW_PATH_MAX_DEPTH: usize = 2;

/// Legal, auth, transactional, and non-page markers.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "privacy",
    "cookie",
    "terms",
    "legal",
    "contact-form",
    "subscribe",
    "newsletter",
    "login",
    "signup",
    "cart",
    "checkout",
    "account",
    "admin",
    "wp-admin",
    "pdf",
    "download",
    "mailto:",
    "tel:",
    "javascript:",
];

/// Pages that usually describe who a company is and what it does.
pub const DEFAULT_VALUABLE_PATTERNS: &[&str] = &[
    "about",
    "team",
    "leadership",
    "services",
    "solutions",
    "products",
    "case-studies",
    "portfolio",
    "clients",
    "approach",
    "methodology",
    "culture",
    "values",
    "history",
    "story",
    "mission",
    "vision",
    "blog",
    "news",
    "insights",
    "careers",
    "jobs",
];

/// Path fragments that mark the canonical company pages.
pub const DEFAULT_PRIORITY_PATHS: &[&str] = &["/about", "/team", "/services"];

// ---------------------------------------------------------------------------
// RelevanceScorer
// ---------------------------------------------------------------------------

/// Immutable pattern sets plus the scoring rules that use them.
///
/// Scoring depends only on the URL and these sets, so the same URL always
/// gets the same score no matter what else is in the batch.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    exclude: Vec<String>,
    valuable: Vec<String>,
    priority_paths: Vec<String>,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXCLUDE_PATTERNS.iter().copied(),
            DEFAULT_VALUABLE_PATTERNS.iter().copied(),
            DEFAULT_PRIORITY_PATHS.iter().copied(),
        )
    }
}

impl RelevanceScorer {
    /// Build a scorer from explicit pattern sets.
    ///
    /// Patterns are lower-cased and de-duplicated; blank patterns are dropped
    /// since an empty substring would match every URL.
    pub fn new<E, V, P>(exclude: E, valuable: V, priority_paths: P) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            exclude: pattern_set(exclude),
            valuable: pattern_set(valuable),
            priority_paths: pattern_set(priority_paths),
        }
    }

    /// Default sets extended with user-supplied patterns.
    pub fn with_extra_patterns<E, V>(extra_exclude: E, extra_valuable: V) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let exclude: Vec<String> = DEFAULT_EXCLUDE_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .chain(extra_exclude.into_iter().map(|s| s.as_ref().to_string()))
            .collect();
        let valuable: Vec<String> = DEFAULT_VALUABLE_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .chain(extra_valuable.into_iter().map(|s| s.as_ref().to_string()))
            .collect();

        Self::new(exclude, valuable, DEFAULT_PRIORITY_PATHS.iter().copied())
    }

    /// Whether `url` contains any exclusion pattern.
    pub fn is_excluded(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        self.exclude.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Relevance of `url`; 0.0 means the URL must never be selected.
    pub fn score(&self, url: &str) -> f64 {
        let lower = url.to_lowercase();

        if self.exclude.iter().any(|p| lower.contains(p.as_str())) {
            return 0.0;
        }

        let path = extract_path(url).to_lowercase();
        let mut score = BASE_SCORE;

        let matches = self
            .valuable
            .iter()
            .filter(|p| lower.contains(p.as_str()))
            .count();
        score += VALUABLE_MATCH_BONUS * matches as f64;

        if self.priority_paths.iter().any(|p| path.contains(p.as_str())) {
            score += PRIORITY_PATH_BONUS;
        }

        if url.chars().count() > LONG_URL_THRESHOLD {
            score -= LONG_URL_PENALTY;
        }

        if path_depth(&path) <= SHALLOW_PATH_MAX_DEPTH {
            score += SHALLOW_PATH_BONUS;
        }

        score.max(0.0)
    }
}

fn pattern_set<I>(patterns: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut set: Vec<String> = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref().trim().to_lowercase();
        if !pattern.is_empty() && !set.contains(&pattern) {
            set.push(pattern);
        }
    }
    set
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Path component of `url`, taken verbatim.
///
/// Split lexically so dot segments and backslashes survive as written: the
/// authority is dropped when a `//` separator is present, and the query and
/// fragment are cut off.
fn extract_path(url: &str) -> &str {
    let after_authority = match url.find("//") {
        Some(idx) if url[..idx].is_empty() || url[..idx].ends_with(':') => {
            let rest = &url[idx + 2..];
            rest.find(['/', '?', '#']).map_or("", |end| &rest[end..])
        }
        _ => url,
    };
    let end = after_authority
        .find(['?', '#'])
        .unwrap_or(after_authority.len());
    &after_authority[..end]
}

/// Number of non-empty `/`-separated segments.
fn path_depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(url: &str) -> f64 {
        RelevanceScorer::default().score(url)
    }

    #[test]
    fn exclusion_zeroes_score() {
        assert_eq!(score("https://example.com/privacy-policy"), 0.0);
        assert_eq!(score("https://example.com/about?ref=login"), 0.0);
        assert_eq!(score("https://example.com/team/brochure.PDF"), 0.0);
        assert_eq!(score("mailto:hello@example.com"), 0.0);
        assert_eq!(score("https://example.com/Checkout"), 0.0);
    }

    #[test]
    fn about_page_scores_seven() {
        // base 1 + "about" 2 + "/about" 3 + shallow 1
        assert_eq!(score("https://example.com/about"), 7.0);
    }

    #[test]
    fn plain_shallow_page_keeps_base_and_shallow_bonus() {
        assert_eq!(score("https://x.com/random"), 2.0);
        assert_eq!(score("https://x.com"), 2.0);
    }

    #[test]
    fn valuable_patterns_count_once_each() {
        // "blog" appears twice but counts once; "news" adds another 2.
        assert_eq!(score("https://example.com/blog/blog-news"), 6.0);
        // about + team + "/about" + shallow
        assert_eq!(score("https://example.com/about/team"), 9.0);
    }

    #[test]
    fn deep_paths_lose_shallow_bonus() {
        assert_eq!(score("https://example.com/a/b/c"), 1.0);
    }

    #[test]
    fn long_urls_are_penalised() {
        let long = format!("https://example.com/{}", "a".repeat(100));
        assert!(long.len() > LONG_URL_THRESHOLD);
        assert_eq!(score(&long), 1.0);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let long_and_deep = format!("https://example.com/x/y/z/{}", "q".repeat(100));
        assert_eq!(score(&long_and_deep), 0.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(score("https://EXAMPLE.com/ABOUT"), 7.0);
        assert_eq!(score("https://example.com/Privacy"), 0.0);
    }

    #[test]
    fn malformed_urls_are_scored_lexically() {
        // No scheme: whole string is the path (two segments).
        assert_eq!(score("x.com/about"), 7.0);
        // Unparsable authority still yields a path.
        assert_eq!(score("https://exa mple.com/services?x=1"), 7.0);
        assert_eq!(score(""), 2.0);
    }

    #[test]
    fn dot_segments_are_not_resolved() {
        assert_eq!(extract_path("https://x.com/a/b/../../about"), "/a/b/../../about");
        // five segments: no shallow bonus
        assert_eq!(score("https://x.com/a/b/../../about"), 6.0);
    }

    #[test]
    fn backslash_stays_in_the_authority() {
        assert_eq!(extract_path("https://x.com\\about"), "");
        // base 1 + "about" 2 + shallow 1, no priority path
        assert_eq!(score("https://x.com\\about"), 4.0);
    }

    #[test]
    fn query_and_fragment_are_not_part_of_the_path() {
        assert_eq!(extract_path("https://x.com/team?tab=1#top"), "/team");
        assert_eq!(extract_path("https://x.com?q=/about"), "");
        assert_eq!(extract_path("//x.com/services"), "/services");
    }

    #[test]
    fn score_is_never_negative_and_idempotent() {
        let scorer = RelevanceScorer::default();
        let urls = [
            "https://example.com/",
            "https://example.com/careers/engineering/backend/senior",
            "https://example.com/terms",
            "not a url at all",
            "https://example.com/news?page=2#top",
        ];
        for url in urls {
            let first = scorer.score(url);
            assert!(first >= 0.0, "{url} scored {first}");
            assert_eq!(first, scorer.score(url));
        }
    }

    #[test]
    fn extra_patterns_extend_defaults() {
        let scorer = RelevanceScorer::with_extra_patterns(["/de/"], ["pricing"]);
        assert_eq!(scorer.score("https://example.com/de/about"), 0.0);
        // base 1 + pricing 2 + shallow 1
        assert_eq!(scorer.score("https://example.com/pricing"), 4.0);
        assert!(scorer.is_excluded("https://example.com/login"));
    }

    #[test]
    fn blank_patterns_are_ignored() {
        let scorer = RelevanceScorer::new(["", "  "], ["about"], ["/about"]);
        assert!(!scorer.is_excluded("https://example.com/anything"));
        assert_eq!(scorer.score("https://example.com/about"), 7.0);
    }

    #[test]
    fn path_extraction() {
        assert_eq!(extract_path("https://example.com/a/b?q=1"), "/a/b");
        assert_eq!(extract_path("example.com/a#frag"), "example.com/a");
        assert_eq!(extract_path("weird://"), "");
        assert_eq!(path_depth("/a//b/"), 2);
        assert_eq!(path_depth("/"), 0);
    }
}
