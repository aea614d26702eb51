//! Approximate symbol search
//!
//! Records are scored against a free-text query by edit distance, so that
//! typos, dropped letters and swapped letters still find the symbol:
//!
//! ```text
//! query "logn usr"  vs  loginUser (actions, context "user")
//!   "logn" ~ "login"  (1 edit / 4)  = 0.25
//!   "usr"  ~ "user"   (1 edit / 3)  = 0.33
//!   score = mean                    = 0.29
//! ```
//!
//! Each whitespace-separated token is matched against every searchable field
//! of the record (name, context, functional type) as an approximate
//! substring; the best field wins for that token. Scores run from 0.0
//! (exact) to 1.0 (nothing in common) and a record is kept when its score is
//! at or below the threshold.

use std::sync::Arc;

use crate::error::{Result, TangerineError};
use crate::schema::SymbolRecord;

/// Permissive tolerance for search-and-group filtering
pub const SEARCH_THRESHOLD: f64 = 0.6;

/// Strict tolerance for jumping straight to the best match
pub const JUMP_THRESHOLD: f64 = 0.4;

/// A record that matched a query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub record: &'a SymbolRecord,
    /// 0.0 = exact, 1.0 = no resemblance
    pub score: f64,
}

/// Fuzzy search over a flat record list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzySearcher {
    threshold: f64,
    limit: Option<usize>,
}

impl Default for FuzzySearcher {
    fn default() -> Self {
        Self::for_search()
    }
}

impl FuzzySearcher {
    /// Create a searcher with a custom threshold in `0.0..=1.0`
    pub fn new(threshold: f64) -> Result<Self> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
            limit: None,
        })
    }

    /// Permissive preset used by filter mode
    pub fn for_search() -> Self {
        Self {
            threshold: SEARCH_THRESHOLD,
            limit: None,
        }
    }

    /// Strict preset used by jump-to
    pub fn for_jump() -> Self {
        Self {
            threshold: JUMP_THRESHOLD,
            limit: None,
        }
    }

    /// Cap the number of results
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Rank records against `query`, best first.
    ///
    /// Equal scores keep their input order. An empty query matches
    /// everything with score 0.
    pub fn search<'a>(&self, records: &'a [SymbolRecord], query: &str) -> Vec<SearchHit<'a>> {
        let tokens = tokenize(query);

        let mut hits: Vec<SearchHit<'a>> = records
            .iter()
            .filter_map(|record| {
                let score = score_tokens(&tokens, record);
                (score <= self.threshold).then_some(SearchHit { record, score })
            })
            .collect();

        // Stable sort keeps walk order for ties
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));

        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }
        hits
    }

    /// The single best match, or `NoFuzzyMatch` when nothing clears the threshold
    pub fn best_match<'a>(&self, records: &'a [SymbolRecord], query: &str) -> Result<SearchHit<'a>> {
        self.search(records, query)
            .into_iter()
            .next()
            .ok_or_else(|| TangerineError::NoFuzzyMatch {
                query: query.to_string(),
            })
    }

    /// Matching records, cloned, in rank order
    pub fn filter(&self, records: &[SymbolRecord], query: &str) -> Vec<SymbolRecord> {
        self.search(records, query)
            .into_iter()
            .map(|hit| hit.record.clone())
            .collect()
    }
}

/// Filter transform for the index builder, backed by a fuzzy query
pub fn search_filter(
    query: impl Into<String>,
    searcher: FuzzySearcher,
) -> Arc<crate::builder::RecordFilter> {
    let query = query.into();
    Arc::new(move |records: &[SymbolRecord]| searcher.filter(records, &query))
}

/// Check that a threshold is a usable tolerance
pub fn validate_threshold(value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TangerineError::InvalidThreshold { value })
    }
}

/// Score a record against a raw query string
pub fn score(query: &str, record: &SymbolRecord) -> f64 {
    score_tokens(&tokenize(query), record)
}

fn tokenize(query: &str) -> Vec<Vec<char>> {
    query
        .split_whitespace()
        .map(|t| t.to_lowercase().chars().collect())
        .collect()
}

fn score_tokens(tokens: &[Vec<char>], record: &SymbolRecord) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }

    let mut fields: Vec<Vec<char>> = vec![
        record.name.to_lowercase().chars().collect(),
        record.functional_type.as_str().chars().collect(),
    ];
    if let Some(context) = &record.context {
        fields.push(context.to_lowercase().chars().collect());
    }

    let total: f64 = tokens
        .iter()
        .map(|token| {
            fields
                .iter()
                .map(|field| token_score(token, field))
                .fold(1.0_f64, f64::min)
        })
        .sum();
    total / tokens.len() as f64
}

/// Normalised approximate-substring distance of `token` inside `field`
fn token_score(token: &[char], field: &[char]) -> f64 {
    if token.is_empty() {
        return 0.0;
    }
    let distance = substring_distance(token, field);
    (distance as f64 / token.len() as f64).min(1.0)
}

/// Minimum edit distance between `pattern` and any substring of `text`.
///
/// Optimal string alignment distance (insert, delete, substitute, swap of
/// adjacent characters) where the match may start and end anywhere in
/// `text`.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    let (m, n) = (pattern.len(), text.len());
    if m == 0 {
        return 0;
    }
    if n == 0 {
        return m;
    }

    // d[i][j]: best distance of pattern[..i] ending at text[..j]
    let mut d = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(pattern[i - 1] != text[j - 1]);
            let mut best = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && pattern[i - 1] == text[j - 2] && pattern[i - 2] == text[j - 1] {
                best = best.min(d[i - 2][j - 2] + 1);
            }
            d[i][j] = best;
        }
    }

    d[m].iter().copied().min().unwrap_or(m)
}
