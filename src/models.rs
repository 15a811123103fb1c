//! Data models for the Hypothesis import extension.
//!
//! This module contains the wire-format structures returned by the
//! Hypothesis search and profile endpoints, the normalized annotation
//! record derived from them, and the block-node tree handed to the host
//! application's write API.

use serde::{Deserialize, Serialize};

// ============================================================================
// Wire Format (Hypothesis API)
// ============================================================================

/// One raw annotation row as returned by `GET /search`.
///
/// Every field defaults so that a partial row (annotations frequently omit
/// `target` or carry an empty `document`) still deserializes; the normalizer
/// decides what to do with the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationRow {
    #[serde(default)]
    pub document: DocumentInfo,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub links: LinkInfo,
    /// Free-text note the user attached to the highlight (may be empty).
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Account identifier, e.g. `acct:user@hypothes.is`.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub created: f64,
    #[serde(default)]
    pub updated: f64,
    /// Anchoring targets; only the first target's selectors are consulted.
    #[serde(default)]
    pub target: Vec<Target>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    #[serde(default)]
    pub title: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkInfo {
    /// Shareable in-context link back to the annotation on the source page.
    #[serde(default)]
    pub incontext: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub selector: Vec<Selector>,
}

/// One anchoring selector. Only `TextQuoteSelector` entries carry the exact
/// quoted source text; other kinds (position, range) are ignored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selector {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub exact: Option<String>,
}

/// Envelope of `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub rows: Vec<AnnotationRow>,
}

/// Envelope of `GET /profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub userid: String,
}

// ============================================================================
// Normalized Annotation
// ============================================================================

/// A simplified annotation record, immutable once built.
///
/// `highlight` is the exact quoted source text when the row carries a
/// recoverable `TextQuoteSelector`, otherwise empty; a row without a
/// recoverable highlight still yields a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotation {
    pub title: String,
    pub uri: String,
    /// In-context link, substituted for `URL` in the output templates.
    pub context: String,
    pub text: String,
    pub highlight: String,
    pub tags: Vec<String>,
    pub user: String,
    pub group: String,
    pub created: f64,
    pub updated: f64,
}

// ============================================================================
// Block Tree
// ============================================================================

/// One outline block destined for the host application: its text plus any
/// child blocks. Produced transiently per command invocation and owned by
/// the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    pub text: String,
    #[serde(default)]
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    pub fn new(text: impl Into<String>) -> Self {
        BlockNode {
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(text: impl Into<String>, children: Vec<BlockNode>) -> Self {
        BlockNode {
            text: text.into(),
            children,
        }
    }
}
