//! Merge, rank, and extract: turns fan-out matches into one context string
//! plus the references behind it.

use rag_store::SearchMatch;

use crate::api_types::{Reference, SearchScope};

/// How each context fragment names its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceTag {
    /// `[Source: namespace 'ns']`
    Namespace,
    /// `[Source: index 'idx', namespace 'ns']`
    IndexAndNamespace,
}

impl SourceTag {
    /// Whole-database search spans indexes, so its fragments also name the index.
    pub fn for_scope(scope: &SearchScope) -> Self {
        match scope {
            SearchScope::Database => SourceTag::IndexAndNamespace,
            SearchScope::Namespace { .. } | SearchScope::Index { .. } => SourceTag::Namespace,
        }
    }

    fn line(self, m: &SearchMatch) -> String {
        match self {
            SourceTag::Namespace => format!("[Source: namespace '{}']", m.namespace),
            SourceTag::IndexAndNamespace => format!(
                "[Source: index '{}', namespace '{}']",
                m.index_name, m.namespace
            ),
        }
    }
}

/// Context handed to the answer generator, with the references it was built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RetrievedContext {
    /// Fragments joined by a blank line; empty when no match carried text.
    pub context: String,
    /// One entry per surviving match that had both `file_name` and `page`.
    pub references: Vec<Reference>,
}

impl RetrievedContext {
    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }
}

/// Sorts by score (highest first) and keeps the first `top_k`.
///
/// The sort is stable: equal scores keep the order the searches returned them in.
pub fn merge_and_rank(mut matches: Vec<SearchMatch>, top_k: usize) -> Vec<SearchMatch> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(top_k);
    matches
}

/// Builds context fragments and references from already-ranked matches.
///
/// `text` and `file_name`/`page` are independent: a match may add a fragment,
/// a reference, both, or neither.
pub fn extract(matches: &[SearchMatch], tag: SourceTag) -> RetrievedContext {
    let mut fragments = Vec::with_capacity(matches.len());
    let mut references = Vec::new();

    for m in matches {
        if let Some(text) = m.text() {
            fragments.push(format!("{}\n{}", tag.line(m), text));
        }
        if let (Some(file_name), Some(page)) = (m.file_name(), m.page()) {
            references.push(Reference {
                file_name: file_name.to_string(),
                page,
                namespace: m.namespace.clone(),
                index_name: m.index_name.clone(),
            });
        }
    }

    RetrievedContext {
        context: fragments.join("\n\n"),
        references,
    }
}

/// [`merge_and_rank`] followed by [`extract`].
pub fn aggregate(matches: Vec<SearchMatch>, top_k: usize, tag: SourceTag) -> RetrievedContext {
    let ranked = merge_and_rank(matches, top_k);
    extract(&ranked, tag)
}
