//! Formatting normalized annotations into a block tree.
//!
//! Each annotation becomes one sibling block: the templated highlight text
//! with its tags appended, and — when the annotation carries a note — a
//! single child block with the templated note. The last sibling's text ends
//! with two trailing spaces, the host's separator convention for the final
//! block of a batch write.

use regex::Regex;

use crate::models::{Annotation, BlockNode};

/// Placeholder replaced by the quoted source text in the highlight template.
pub const PLACEHOLDER_HIGHLIGHT: &str = "HIGHLIGHT";
/// Placeholder replaced by the note body in the note template.
pub const PLACEHOLDER_NOTE: &str = "NOTE";
/// Placeholder replaced by the annotation's in-context link in both templates.
pub const PLACEHOLDER_URL: &str = "URL";

// ============================================================================
// Template Substitution
// ============================================================================

/// Substitute a highlight and its in-context link into the highlight
/// template. Each placeholder is replaced at its first occurrence only, URL
/// after HIGHLIGHT, so the URL replacement can land inside text the
/// highlight substitution introduced.
pub fn format_highlight(template: &str, highlight: &str, url: &str) -> String {
    template
        .replacen(PLACEHOLDER_HIGHLIGHT, highlight.trim(), 1)
        .replacen(PLACEHOLDER_URL, url, 1)
        .trim()
        .to_string()
}

/// Substitute a note body and its in-context link into the note template.
pub fn format_note(template: &str, note: &str, url: &str) -> String {
    template
        .replacen(PLACEHOLDER_NOTE, note.trim(), 1)
        .replacen(PLACEHOLDER_URL, url, 1)
        .trim()
        .to_string()
}

/// Collapse runs of three or more newlines to a single newline. Quotes that
/// span page furniture often arrive with large blank gaps.
fn collapse_blank_runs(text: &str) -> String {
    let re = Regex::new(r"\n{3,}").unwrap();
    re.replace_all(text, "\n").into_owned()
}

// ============================================================================
// Block Assembly
// ============================================================================

/// Turn normalized annotations into sibling blocks, one per record, in input
/// order.
pub fn format_blocks(
    annotations: &[Annotation],
    highlight_template: &str,
    note_template: &str,
) -> Vec<BlockNode> {
    let last = annotations.len().saturating_sub(1);
    annotations
        .iter()
        .enumerate()
        .map(|(i, annotation)| {
            let mut text = if annotation.highlight.is_empty() {
                String::new()
            } else {
                format_highlight(
                    highlight_template,
                    &collapse_blank_runs(&annotation.highlight),
                    &annotation.context,
                )
            };
            text = text.trim().to_string();

            for tag in &annotation.tags {
                text.push_str(&format!(" #[[{}]]", tag));
            }

            // Host convention: the final sibling of a batch write carries a
            // two-space line-break suffix.
            if i == last {
                text.push_str("  ");
            }

            let children = if annotation.text.is_empty() {
                Vec::new()
            } else {
                vec![BlockNode::new(format_note(
                    note_template,
                    &annotation.text,
                    &annotation.context,
                ))]
            };

            BlockNode::with_children(text, children)
        })
        .collect()
}
