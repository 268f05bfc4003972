use crate::types::{RetrievalResult, SourceCitation};
use std::collections::HashSet;

/// Maximum snippet length in characters
pub const SNIPPET_CHARS: usize = 200;

/// One citation per `(source, page)`, in retrieval order; the first hit wins
pub fn build_citations(results: &[RetrievalResult]) -> Vec<SourceCitation> {
    let mut seen: HashSet<(&str, u32)> = HashSet::new();

    results
        .iter()
        .filter(|result| seen.insert((result.metadata.source.as_str(), result.metadata.page)))
        .map(|result| SourceCitation {
            title: result.metadata.source.clone(),
            page: Some(result.metadata.page),
            snippet: snippet(&result.content),
            category: result.metadata.category.clone(),
        })
        .collect()
}

/// First [`SNIPPET_CHARS`] characters, with an ellipsis only when cut
pub fn snippet(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
