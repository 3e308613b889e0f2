//! Literal substring search with snippet extraction.
//!
//! Every non-overlapping occurrence of the query in every page is a match.
//! Matches are numbered from 1 across the whole corpus in iteration order;
//! `start` is the first match number returned and `max` caps the page.
//!
//! A snippet is the text from 100 bytes before the match to 100 bytes after
//! the match start (extended to the match end for queries over 100 bytes),
//! clipped to the page and moved inward onto UTF-8 boundaries.
//! `query_position` is `[match_end, snippet_len]` relative to the snippet,
//! which is what existing clients highlight from.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bytes of context kept on each side of a match.
pub const CONTEXT_BYTES: usize = 100;

/// One match with its surrounding text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub url: String,
    pub snippet: String,
    pub query_position: [usize; 2],
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub has_more: bool,
}

impl SearchResults {
    fn empty(query: &str) -> Self {
        Self { query: query.to_string(), results: Vec::new(), has_more: false }
    }
}

/// Search `corpus` (pairs of url and content) for `query`.
///
/// An empty query matches nothing.
pub fn search<'a, I>(query: &str, start: usize, max: usize, corpus: I) -> SearchResults
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut page = SearchResults::empty(query);
    if query.is_empty() {
        return page;
    }

    let mut num_found = 0usize;

    'corpus: for (url, content) in corpus {
        for offset in occurrences(content, query) {
            num_found += 1;
            if num_found < start {
                continue;
            }
            if page.results.len() == max {
                page.has_more = true;
                break 'corpus;
            }
            page.results.push(snippet_at(url, content, offset, query.len()));
        }
    }

    page
}

/// Byte offsets of non-overlapping occurrences of `needle`, left to right.
fn occurrences<'h>(haystack: &'h str, needle: &'h str) -> impl Iterator<Item = usize> + 'h {
    let mut from = 0;
    std::iter::from_fn(move || {
        let at = from + haystack.get(from..)?.find(needle)?;
        from = at + needle.len();
        Some(at)
    })
}

fn snippet_at(url: &str, content: &str, at: usize, len: usize) -> SearchHit {
    let match_end = at + len;

    let mut window_start = at.saturating_sub(CONTEXT_BYTES);
    while !content.is_char_boundary(window_start) {
        window_start += 1;
    }

    let mut window_end = (at + CONTEXT_BYTES).max(match_end).min(content.len());
    while !content.is_char_boundary(window_end) {
        window_end -= 1;
    }

    SearchHit {
        url: url.to_string(),
        snippet: content[window_start..window_end].to_string(),
        query_position: [match_end - window_start, window_end - window_start],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panda_corpus() -> Vec<(&'static str, &'static str)> {
        vec![("a", "the red panda sleeps"), ("b", "red pandas are mammals")]
    }

    #[test]
    fn test_search_two_pages() {
        let page = search("red", 0, 15, panda_corpus());
        assert_eq!(page.query, "red");
        assert_eq!(page.results.len(), 2);
        assert!(!page.has_more);
        assert!(page.results.iter().all(|hit| hit.snippet.contains("red")));
        assert_eq!(page.results[0].url, "a");
        assert_eq!(page.results[1].url, "b");
    }

    #[test]
    fn test_query_position_marks_match_end() {
        let page = search("red", 0, 15, panda_corpus());

        // whole page fits in the window, so the snippet is the page
        let first = &page.results[0];
        assert_eq!(first.snippet, "the red panda sleeps");
        assert_eq!(first.query_position, [7, 20]);

        let second = &page.results[1];
        assert_eq!(second.snippet, "red pandas are mammals");
        assert_eq!(second.query_position, [3, 22]);
    }

    #[test]
    fn test_empty_query() {
        let page = search("", 0, 15, panda_corpus());
        assert!(page.results.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_no_match() {
        let page = search("otter", 0, 15, panda_corpus());
        assert!(page.results.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_matches_do_not_overlap() {
        let page = search("aa", 0, 15, vec![("u", "aaaaa")]);
        let ends: Vec<_> = page.results.iter().map(|hit| hit.query_position[0]).collect();
        assert_eq!(ends, vec![2, 4]);
    }

    #[test]
    fn test_window_is_clipped() {
        let content = format!("{}needle{}", "x".repeat(300), "y".repeat(300));
        let page = search("needle", 0, 15, vec![("u", content.as_str())]);
        let hit = &page.results[0];

        assert_eq!(hit.snippet.len(), 2 * CONTEXT_BYTES);
        assert!(hit.snippet.starts_with(&"x".repeat(100)));
        assert_eq!(hit.query_position, [106, 200]);
        assert_eq!(&hit.snippet[100..106], "needle");
    }

    #[test]
    fn test_snippet_bounds() {
        let content = "ab ".repeat(150);
        let page = search("ab", 0, usize::MAX, vec![("u", content.as_str())]);
        assert_eq!(page.results.len(), 150);
        for hit in &page.results {
            assert!(hit.snippet.len() <= 2 * CONTEXT_BYTES);
            assert!(hit.query_position[0] <= hit.query_position[1]);
            assert_eq!(hit.query_position[1], hit.snippet.len());
        }
    }

    #[test]
    fn test_long_query_keeps_whole_match() {
        let query = "q".repeat(150);
        let content = format!("start {query} end");
        let page = search(&query, 0, 15, vec![("u", content.as_str())]);
        let hit = &page.results[0];
        assert!(hit.snippet.contains(&query));
        assert_eq!(hit.query_position[0], 156);
    }

    #[test]
    fn test_multibyte_content_stays_on_char_boundaries() {
        let content = format!("{}panda{}", "é".repeat(80), "ü".repeat(80));
        let page = search("panda", 0, 15, vec![("u", content.as_str())]);
        let hit = &page.results[0];
        assert!(hit.snippet.contains("panda"));
        assert!(hit.snippet.len() <= 2 * CONTEXT_BYTES);
        assert!(hit.snippet.starts_with('é'));
        assert!(hit.snippet.ends_with('ü'));
    }

    #[test]
    fn test_start_counts_matches_globally() {
        let corpus = vec![("a", "red red"), ("b", "red"), ("c", "red red")];

        let all = search("red", 0, 10, corpus.clone());
        assert_eq!(all.results.len(), 5);

        // start is 1-based: start=3 skips the first two matches
        let tail = search("red", 3, 10, corpus.clone());
        assert_eq!(tail.results.len(), 3);
        assert_eq!(tail.results[0].url, "b");

        assert_eq!(search("red", 1, 10, corpus).results.len(), 5);
    }

    #[test]
    fn test_pagination_has_no_gaps_or_overlap() {
        let corpus = vec![("a", "red red red"), ("b", "red red"), ("c", "red")];

        let first = search("red", 0, 4, corpus.clone());
        assert_eq!(first.results.len(), 4);
        assert!(first.has_more);

        let second = search("red", 5, 4, corpus.clone());
        assert_eq!(second.results.len(), 2);
        assert!(!second.has_more);

        let all = search("red", 0, 100, corpus);
        let stitched: Vec<_> = first.results.into_iter().chain(second.results).collect();
        assert_eq!(stitched, all.results);
    }

    #[test]
    fn test_has_more_exactly_when_more_than_max() {
        let corpus = vec![("a", "red red"), ("b", "red")];
        assert!(!search("red", 0, 3, corpus.clone()).has_more);
        assert!(!search("red", 0, 4, corpus.clone()).has_more);
        assert!(search("red", 0, 2, corpus).has_more);
    }

    #[test]
    fn test_serialized_shape() {
        let page = search("red", 0, 1, panda_corpus());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["results"][0]["queryPosition"], serde_json::json!([7, 20]));
    }
}
