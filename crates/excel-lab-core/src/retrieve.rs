//! Keyword-overlap page retrieval.
//!
//! Selects the reference pages most relevant to a lab query and formats
//! them into a bounded text block for the outbound prompt.
//!
//! # Scoring Algorithm
//!
//! 1. Tokenize the query into a set of lowercase alphabetic words (≥ 3 letters).
//! 2. Tokenize every page the same way; pages without tokens are skipped.
//! 3. Score = |query ∩ page|, plus `bonus` when the page contains `bonus_token`.
//! 4. Sort by score (desc), page index (desc).
//! 5. Keep the top `max_pages` with score > 0, or fall back to the first
//!    `max_pages` pages in document order when nothing matched.
//! 6. Emit `Page N:` blocks until the next one, with its separator, would
//!    overflow `max_chars`.

use serde::Serialize;
use std::collections::HashSet;

/// Default cap on the number of pages returned.
pub const DEFAULT_MAX_PAGES: usize = 6;
/// Default cap on the accumulated page-block length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 7000;
/// Pages containing this token get [`DEFAULT_BONUS`] added to their score.
pub const DEFAULT_BONUS_TOKEN: &str = "prompt";
pub const DEFAULT_BONUS: usize = 2;

const MIN_TOKEN_LEN: usize = 3;

/// Placed between page blocks; counted against the budget.
const SEPARATOR: &str = "\n\n";

/// Retrieval tuning parameters, decoupled from application config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalParams {
    /// Maximum number of pages to include.
    pub max_pages: usize,
    /// Maximum total length of the included page blocks.
    pub max_chars: usize,
    /// Marker token that earns a fixed relevance bonus.
    pub bonus_token: String,
    /// Score added to pages containing `bonus_token`.
    pub bonus: usize,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_chars: DEFAULT_MAX_CHARS,
            bonus_token: DEFAULT_BONUS_TOKEN.to_string(),
            bonus: DEFAULT_BONUS,
        }
    }
}

/// Scoring breakdown for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageScore {
    /// 1-based page number.
    pub page: usize,
    /// Final score (overlap plus bonus).
    pub score: usize,
    /// Number of distinct query tokens found on the page.
    pub overlap: usize,
    /// Whether the bonus token was present.
    pub bonus: bool,
}

/// Splits text into its set of lowercase alphabetic tokens of length ≥ 3.
pub fn tokenize(text: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    let mut run = String::new();

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphabetic() {
            run.push(c);
            continue;
        }
        if run.len() >= MIN_TOKEN_LEN {
            tokens.insert(std::mem::take(&mut run));
        } else {
            run.clear();
        }
    }
    if run.len() >= MIN_TOKEN_LEN {
        tokens.insert(run);
    }

    tokens
}

/// Scores and ranks every page against `query`.
///
/// Returns an empty list when the query has no qualifying tokens. Pages
/// without any tokens are omitted.
pub fn rank_pages(query: &str, pages: &[String], params: &RetrievalParams) -> Vec<PageScore> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }
    score_pages(&query_tokens, pages, params)
}

fn score_pages(
    query_tokens: &HashSet<String>,
    pages: &[String],
    params: &RetrievalParams,
) -> Vec<PageScore> {
    let mut scored: Vec<PageScore> = pages
        .iter()
        .enumerate()
        .filter_map(|(i, text)| {
            let page_tokens = tokenize(text);
            if page_tokens.is_empty() {
                return None;
            }
            let overlap = query_tokens.intersection(&page_tokens).count();
            let bonus = page_tokens.contains(params.bonus_token.as_str());
            Some(PageScore {
                page: i + 1,
                score: overlap + if bonus { params.bonus } else { 0 },
                overlap,
                bonus,
            })
        })
        .collect();

    // Equal scores: later pages first.
    scored.sort_by(|a, b| b.score.cmp(&a.score).then(b.page.cmp(&a.page)));
    scored
}

/// Returns the most relevant pages as `Page N:` blocks, bounded by `params`.
///
/// Never fails: an empty query, an empty collection, or a query with no
/// qualifying tokens all yield an empty string.
pub fn retrieve(query: &str, pages: &[String], params: &RetrievalParams) -> String {
    if pages.is_empty() {
        return String::new();
    }
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return String::new();
    }

    let ranked = score_pages(&query_tokens, pages, params);
    let mut picked: Vec<usize> = ranked
        .iter()
        .take(params.max_pages)
        .filter(|s| s.score > 0)
        .map(|s| s.page - 1)
        .collect();
    if picked.is_empty() {
        picked = (0..params.max_pages.min(pages.len())).collect();
    }

    let mut blocks: Vec<String> = Vec::with_capacity(picked.len());
    let mut total = 0usize;
    for i in picked {
        let block = format!("Page {}:\n{}\n", i + 1, pages[i]);
        let sep = if blocks.is_empty() { 0 } else { SEPARATOR.len() };
        let len = block.chars().count();
        if total + sep + len > params.max_chars {
            break;
        }
        total += sep + len;
        blocks.push(block);
    }

    blocks.join(SEPARATOR).trim().to_string()
}
