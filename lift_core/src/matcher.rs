//! Exercise-name resolution against the catalog.
//!
//! Resolution runs in tiers:
//! 1. exact key match (confidence 100), hyphens and spaces treated alike
//! 2. best fuzzy candidate scoring at least 70 (confidence 70..=99)
//! 3. synthesized unknown entry (confidence 0)

use crate::normalize::{fold_separators, normalize, to_canonical_token};
use crate::{Catalog, CatalogEntry, MatchResult, CONFIDENCE_THRESHOLD, EXACT_CONFIDENCE};
use serde::Serialize;

/// Highest confidence a fuzzy match may report; 100 is reserved for exact keys
const MAX_FUZZY_CONFIDENCE: u8 = EXACT_CONFIDENCE - 1;

/// One ranked search result
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SearchHit {
    pub key: String,
    pub score: u8,
}

/// Resolves raw exercise names against a borrowed catalog
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'c> {
    catalog: &'c Catalog,
}

impl<'c> Matcher<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Resolve a raw exercise name to a catalog entry and confidence
    pub fn resolve(&self, raw_name: &str) -> MatchResult {
        let key = normalize(raw_name);
        if key.is_empty() {
            tracing::debug!("Empty exercise name {:?}, treating as unknown", raw_name);
            return unknown(raw_name);
        }

        if let Some(entry) = self.catalog.lookup(&key) {
            return MatchResult {
                entry: entry.clone(),
                confidence: EXACT_CONFIDENCE,
            };
        }

        if let Some((catalog_key, entry)) = self.catalog.lookup_folded(&key) {
            tracing::debug!("Matched {:?} to {:?} ignoring separators", key, catalog_key);
            return MatchResult {
                entry: entry.clone(),
                confidence: EXACT_CONFIDENCE,
            };
        }

        if let Some(best) = self.best_candidate(&key) {
            if best.score >= CONFIDENCE_THRESHOLD {
                if let Some(entry) = self.catalog.lookup(&best.key) {
                    tracing::debug!(
                        "Fuzzy matched {:?} to {:?} ({}%)",
                        key,
                        best.key,
                        best.score
                    );
                    return MatchResult {
                        entry: entry.clone(),
                        confidence: best.score.min(MAX_FUZZY_CONFIDENCE),
                    };
                }
            }
            tracing::debug!(
                "Best candidate for {:?} was {:?} at {}%, below threshold",
                key,
                best.key,
                best.score
            );
        }

        unknown(raw_name)
    }

    /// Rank catalog keys by similarity to `query`.
    ///
    /// Descending by score, ties broken by key, at most `limit` results.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let key = normalize(query);
        if key.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits = self.score_all(&key);
        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.key.cmp(&b.key)));
        hits.truncate(limit);
        hits
    }

    fn best_candidate(&self, key: &str) -> Option<SearchHit> {
        // Keys arrive sorted, so keeping only strictly better scores leaves
        // the lexicographically first key among equals.
        let mut best: Option<SearchHit> = None;
        for hit in self.score_all(key) {
            match &best {
                Some(current) if hit.score <= current.score => {}
                _ => best = Some(hit),
            }
        }
        best
    }

    fn score_all(&self, key: &str) -> Vec<SearchHit> {
        self.catalog
            .all_keys()
            .into_iter()
            .map(|candidate| {
                let score = token_sort_ratio(key, &candidate);
                SearchHit {
                    key: candidate,
                    score,
                }
            })
            .collect()
    }
}

/// Word-order-insensitive similarity of two normalized names, 0..=100.
///
/// Both sides are split into words (hyphens count as breaks), sorted and
/// rejoined, then compared with [`indel_ratio`].
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let a = sorted_tokens(a);
    let b = sorted_tokens(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let ratio = indel_ratio(&a, &b);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// `2 * LCS / (len a + len b)` over chars, in 0.0..=1.0.
///
/// Only insertions and deletions count as edits, so an abbreviation like
/// "bb row" stays close to "barbell row".
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    (2 * longest_common_subsequence(&a, &b)) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

fn sorted_tokens(name: &str) -> String {
    let folded = fold_separators(name);
    let mut tokens: Vec<&str> = folded.split(' ').filter(|t| !t.is_empty()).collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn unknown(raw_name: &str) -> MatchResult {
    MatchResult {
        entry: CatalogEntry::unknown(to_canonical_token(raw_name.trim())),
        confidence: 0,
    }
}
