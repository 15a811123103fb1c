//! Normalization of raw Hypothesis search rows.
//!
//! Maps each `AnnotationRow` to a flat `Annotation` record, one-to-one and
//! order-preserving. The only non-trivial part is recovering the quoted
//! source text: only the first target's selector list is consulted, and only
//! a `TextQuoteSelector` with an `exact` payload counts. Anything else —
//! no targets, no selectors, no matching selector, missing payload — leaves
//! the highlight empty; the row still appears in the output.

use crate::models::{Annotation, AnnotationRow, Target};

const TEXT_QUOTE_SELECTOR: &str = "TextQuoteSelector";

/// Exact quote from the first target's first `TextQuoteSelector`, if any.
fn first_quote(targets: &[Target]) -> Option<&str> {
    targets
        .first()?
        .selector
        .iter()
        .find(|s| s.kind == TEXT_QUOTE_SELECTOR)?
        .exact
        .as_deref()
}

/// Normalize raw search rows into annotation records.
pub fn normalize(rows: Vec<AnnotationRow>) -> Vec<Annotation> {
    rows.into_iter()
        .map(|row| {
            let highlight = first_quote(&row.target).unwrap_or_default().to_string();
            Annotation {
                title: row.document.title.first().cloned().unwrap_or_default(),
                uri: row.uri,
                context: row.links.incontext,
                text: row.text,
                highlight,
                tags: row.tags,
                user: row.user,
                group: row.group,
                created: row.created,
                updated: row.updated,
            }
        })
        .collect()
}
