//! Weighted prefix tree for autocomplete.
//!
//! Tokens are lowercased and reduced to `[a-z-]` before insertion. Every node
//! counts how many inserted tokens ended on it. Completion walks the query
//! prefix, then scores every node in the subtree below it:
//!
//! ```text
//! score = weight + (len(candidate) - len(query)) * 3
//! ```
//!
//! Longer completions are favored so that short, frequent words do not mask
//! the word the user is typing. Children are kept in a `BTreeMap`, so the
//! depth-first walk visits them in character order and ties go to the first
//! candidate in that order.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Extra score per character a completion adds beyond the query.
const LENGTH_BONUS: i64 = 3;

#[derive(Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    weight: u64,
}

// Tokens can be as long as a page, so teardown must not recurse per level.
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut pending: Vec<TrieNode> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

/// Best completion for a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Completion {
    pub word: String,
    pub weight: u64,
}

/// Prefix tree over every token ever indexed.
///
/// Nodes are never removed. Forgetting a page does not retract the weights its
/// words contributed.
#[derive(Default)]
pub struct PrefixTree {
    root: TrieNode,
    nodes: usize,
}

impl fmt::Debug for PrefixTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixTree").field("nodes", &self.nodes).finish()
    }
}

/// Lowercase `token` and drop every character outside `[a-z-]`.
pub fn clean_token(token: &str) -> String {
    token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == '-')
        .collect()
}

fn score(weight: u64, extra_chars: usize) -> i64 {
    weight as i64 + extra_chars as i64 * LENGTH_BONUS
}

impl PrefixTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Record one occurrence of `token`. Tokens that clean to nothing are ignored.
    pub fn insert(&mut self, token: &str) {
        let token = clean_token(token);
        if token.is_empty() {
            return;
        }

        let mut created = 0;
        let mut node = &mut self.root;
        for c in token.chars() {
            node = node.children.entry(c).or_insert_with(|| {
                created += 1;
                TrieNode::default()
            });
        }
        node.weight += 1;
        self.nodes += created;
    }

    /// Insert every whitespace-separated word of `text`.
    pub fn insert_text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            self.insert(word);
        }
    }

    /// Occurrence count of exactly `word` (already cleaned), or 0.
    pub fn weight_of(&self, word: &str) -> u64 {
        self.find(word).map_or(0, |node| node.weight)
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Best-scoring word that starts with `query`.
    ///
    /// The query is matched as given; callers lowercase it. Returns `None` when
    /// no indexed token starts with `query`. The prefix node itself competes,
    /// even with weight 0.
    pub fn complete(&self, query: &str) -> Option<Completion> {
        let start = self.find(query)?;

        // pre-order DFS on an explicit stack; children are pushed in reverse
        // so they pop in character order. `trail` holds (char, parent) links
        // so the winning word is spelled out once, at the end.
        let mut trail: Vec<(char, Option<usize>)> = Vec::new();
        let mut stack: Vec<(&TrieNode, usize, Option<usize>)> = vec![(start, 0, None)];
        let mut best: Option<(i64, Option<usize>, u64)> = None;

        while let Some((node, depth, link)) = stack.pop() {
            let candidate = score(node.weight, depth);
            if best.is_none_or(|(top, _, _)| candidate > top) {
                best = Some((candidate, link, node.weight));
            }

            for (c, child) in node.children.iter().rev() {
                trail.push((*c, link));
                stack.push((child, depth + 1, Some(trail.len() - 1)));
            }
        }

        let (_, mut link, weight) = best?;
        let mut suffix = Vec::new();
        while let Some(i) = link {
            let (c, parent) = trail[i];
            suffix.push(c);
            link = parent;
        }

        let mut word = query.to_string();
        word.extend(suffix.into_iter().rev());
        Some(Completion { word, weight })
    }
}
