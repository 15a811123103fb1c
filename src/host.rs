//! Capability traits for the host note-taking application.
//!
//! The extension never touches host globals directly; everything it needs
//! from the host — block access, writes, notifications, the command palette,
//! the browser — arrives through these traits so the client, normalizer, and
//! formatter stay testable without a live host.

use async_trait::async_trait;

use crate::commands::CommandKind;
use crate::models::BlockNode;

// ============================================================================
// Blocks
// ============================================================================

/// Read access to the host's block tree plus the single write operation the
/// extension needs: creating a new child block (with its own children) under
/// a parent at a given order offset.
#[async_trait]
pub trait BlockHost: Send + Sync {
    /// Identifier of the block the user currently has focused, if any.
    fn focused_block(&self) -> Option<String>;

    /// Raw text of a block, or `None` when the host doesn't know the id.
    fn block_text(&self, uid: &str) -> Option<String>;

    /// Number of existing children under a block; new imports are appended
    /// after them.
    fn child_count(&self, uid: &str) -> usize;

    /// Writes `node` (and, recursively, its children) under `parent_uid` at
    /// position `order`.
    async fn create_block(
        &self,
        parent_uid: &str,
        order: usize,
        node: &BlockNode,
    ) -> Result<(), String>;
}

// ============================================================================
// Notifications and Browser
// ============================================================================

/// Transient, non-fatal user-facing notification.
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
}

/// Opens a URL in a new browser context.
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), String>;
}

// ============================================================================
// Command Palette
// ============================================================================

/// Registration surface for named command-palette entries and named
/// template-expansion macros. The host dispatches a selected entry back
/// through the command layer using the `CommandKind` it was registered with.
pub trait CommandPalette: Send + Sync {
    fn add_command(&self, label: &str, kind: CommandKind);
    fn remove_command(&self, label: &str);
    fn add_macro(&self, name: &str, kind: CommandKind);
    fn remove_macro(&self, name: &str);
}
