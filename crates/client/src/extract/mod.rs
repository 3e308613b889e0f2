//! Visible text extraction from HTML.
//!
//! Text nodes are concatenated in document order, skipping anything inside
//! `script`, `style`, `noscript` or `template`. Tags contribute no separator of
//! their own; whitespace between tags in the source is what keeps words
//! apart, and it is collapsed afterwards by [`normalize_whitespace`].

pub mod normalize;

pub use normalize::normalize_whitespace;

use scraper::Html;

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Concatenated visible text nodes of `html`, unnormalized.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });

        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}

/// Searchable text of a page body: visible text, whitespace-collapsed and trimmed.
pub fn page_text(html: &str) -> String {
    normalize_whitespace(&visible_text(html)).trim().to_string()
}
