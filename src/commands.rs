//! Command-palette and template-macro operations.
//!
//! Three operations tie a block's embedded URL to the annotation service:
//! importing the current user's annotations, importing all public
//! annotations, and opening the page in the Hypothesis viewer. Each is
//! reachable two ways:
//! - palette mode: operates on the focused block and writes the generated
//!   nodes directly under it;
//! - macro mode: operates on an explicit target block and returns the
//!   generated nodes to the host's template engine.

use crate::annotations::normalize;
use crate::client::{ClientError, SearchQuery};
use crate::format::format_blocks;
use crate::models::{AnnotationRow, BlockNode};
use crate::settings::{self, SettingsStore};
use crate::url_extract::extract_url;
use crate::Extension;

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

/// Page size used when a macro argument is missing or unusable.
pub const DEFAULT_LIMIT: u32 = 20;

/// Shown when an operation has no focused block or no URL to work from.
pub const NO_FOCUS_WARNING: &str = "Must fire this command while focused on a block with a URL";

/// Proxy viewer that overlays Hypothesis annotations on the original page.
pub const VIA_BASE_URL: &str = "https://via.hypothes.is/";

// ============================================================================
// Command Table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    ImportPrivate,
    ImportPublic,
    OpenSite,
}

/// Whether a search is scoped to the calling user or covers all public
/// annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationScope {
    Private,
    Public,
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub palette_label: &'static str,
    pub macro_name: &'static str,
}

/// Every command this extension contributes, in registration order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::ImportPrivate,
        palette_label: "Import Private Hypothesis Annotations",
        macro_name: "HYPOTHESISINSERTANNOTATIONS",
    },
    CommandSpec {
        kind: CommandKind::ImportPublic,
        palette_label: "Import Public Hypothesis Annotations",
        macro_name: "HYPOTHESISPUBLICANNOTATIONS",
    },
    CommandSpec {
        kind: CommandKind::OpenSite,
        palette_label: "Open Site in Hypothesis",
        macro_name: "HYPOTHESISOPENSITE",
    },
];

/// Register every palette entry and macro with the host.
pub fn register_commands(palette: &dyn crate::host::CommandPalette) {
    for spec in COMMANDS {
        palette.add_command(spec.palette_label, spec.kind);
        palette.add_macro(spec.macro_name, spec.kind);
    }
}

/// Remove every palette entry and macro, in reverse registration order.
pub fn unregister_commands(palette: &dyn crate::host::CommandPalette) {
    for spec in COMMANDS.iter().rev() {
        palette.remove_macro(spec.macro_name);
        palette.remove_command(spec.palette_label);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum CommandError {
    Client(ClientError),
    /// A host capability (block write, browser open) refused the operation.
    Host(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Client(e) => write!(f, "{}", e),
            CommandError::Host(msg) => write!(f, "host operation failed: {}", msg),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Client(e) => Some(e),
            CommandError::Host(_) => None,
        }
    }
}

impl From<ClientError> for CommandError {
    fn from(e: ClientError) -> Self {
        CommandError::Client(e)
    }
}

// ============================================================================
// Limit Parsing
// ============================================================================

/// Page size from an optional macro argument. Missing, non-numeric, and
/// zero values all fall back to the default of 20.
pub fn effective_limit(arg: Option<&str>) -> u32 {
    arg.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&n| n != 0)
        .unwrap_or(DEFAULT_LIMIT)
}

// ============================================================================
// Import Pipeline
// ============================================================================

/// Pure tail of the import pipeline: raw rows through normalization and the
/// user's templates into sibling blocks.
pub fn annotation_blocks(rows: Vec<AnnotationRow>, settings: &dyn SettingsStore) -> Vec<BlockNode> {
    let annotations = normalize(rows);
    let highlight_template = settings::highlight_format(settings);
    let note_template = settings::note_format(settings);
    format_blocks(&annotations, &highlight_template, &note_template)
}

/// Search the service for annotations on `url` and format them as blocks.
/// Private scope resolves the current user first and restricts the search
/// to them; results arrive ascending so blocks read in creation order.
async fn fetch_annotation_blocks(
    ext: &Extension,
    scope: AnnotationScope,
    url: &str,
    limit: u32,
) -> Result<Vec<BlockNode>, CommandError> {
    let mut query = SearchQuery::new().limit(limit).order("asc").uri(url);
    if scope == AnnotationScope::Private {
        query = query.user(ext.client.current_user().await?);
    }
    let rows = ext.client.search(&query).await?;
    Ok(annotation_blocks(rows, &*ext.settings))
}

// ============================================================================
// Palette Mode
// ============================================================================

/// Dispatch a palette selection back into the matching operation.
pub async fn run_palette_command(ext: &Extension, kind: CommandKind) -> Result<(), CommandError> {
    match kind {
        CommandKind::ImportPrivate => run_import_command(ext, AnnotationScope::Private).await,
        CommandKind::ImportPublic => run_import_command(ext, AnnotationScope::Public).await,
        CommandKind::OpenSite => run_open_site_command(ext),
    }
}

/// Import annotations for the URL in the focused block and append them as
/// its children, one sequential write per generated node.
pub async fn run_import_command(
    ext: &Extension,
    scope: AnnotationScope,
) -> Result<(), CommandError> {
    let uid = match ext.blocks.focused_block() {
        Some(uid) => uid,
        None => {
            ext.notifier.warn(NO_FOCUS_WARNING);
            return Ok(());
        }
    };
    let text = ext.blocks.block_text(&uid).unwrap_or_default();
    let url = match extract_url(&text) {
        Some(url) => url.to_string(),
        None => {
            ext.notifier.warn(NO_FOCUS_WARNING);
            return Ok(());
        }
    };

    let nodes = fetch_annotation_blocks(ext, scope, &url, DEFAULT_LIMIT).await?;
    let base = ext.blocks.child_count(&uid);
    for (offset, node) in nodes.iter().enumerate() {
        ext.blocks
            .create_block(&uid, base + offset, node)
            .await
            .map_err(CommandError::Host)?;
    }
    Ok(())
}

/// Open the focused block's URL in the Hypothesis viewer.
pub fn run_open_site_command(ext: &Extension) -> Result<(), CommandError> {
    let uid = match ext.blocks.focused_block() {
        Some(uid) => uid,
        None => {
            ext.notifier.warn(NO_FOCUS_WARNING);
            return Ok(());
        }
    };
    open_site_for_block(ext, &uid)
}

// ============================================================================
// Macro Mode
// ============================================================================

/// Expand a template macro against its target block. Import macros return a
/// single empty-text wrapper node whose children are the generated blocks;
/// the open-site macro opens the viewer and returns nothing.
pub async fn expand_macro(
    ext: &Extension,
    kind: CommandKind,
    target_uid: &str,
    limit_arg: Option<&str>,
) -> Result<Vec<BlockNode>, CommandError> {
    match kind {
        CommandKind::ImportPrivate => {
            expand_import_macro(ext, AnnotationScope::Private, target_uid, limit_arg).await
        }
        CommandKind::ImportPublic => {
            expand_import_macro(ext, AnnotationScope::Public, target_uid, limit_arg).await
        }
        CommandKind::OpenSite => {
            open_site_for_block(ext, target_uid)?;
            Ok(Vec::new())
        }
    }
}

pub async fn expand_import_macro(
    ext: &Extension,
    scope: AnnotationScope,
    target_uid: &str,
    limit_arg: Option<&str>,
) -> Result<Vec<BlockNode>, CommandError> {
    let text = ext.blocks.block_text(target_uid).unwrap_or_default();
    let url = match extract_url(&text) {
        Some(url) => url.to_string(),
        None => {
            ext.notifier.warn(NO_FOCUS_WARNING);
            return Ok(Vec::new());
        }
    };

    let children = fetch_annotation_blocks(ext, scope, &url, effective_limit(limit_arg)).await?;
    Ok(vec![BlockNode::with_children(String::new(), children)])
}

// ============================================================================
// Open Site
// ============================================================================

fn open_site_for_block(ext: &Extension, uid: &str) -> Result<(), CommandError> {
    let text = ext.blocks.block_text(uid).unwrap_or_default();
    let url = match extract_url(&text) {
        Some(url) => url,
        None => {
            ext.notifier.warn(NO_FOCUS_WARNING);
            return Ok(());
        }
    };
    ext.browser
        .open(&format!("{}{}", VIA_BASE_URL, url))
        .map_err(CommandError::Host)
}
