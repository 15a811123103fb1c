//! Hypothesis annotation import for a block-structured note host.
//!
//! This library pulls a user's web annotations (highlights and notes) from
//! the Hypothesis service into the host application's outline as block
//! trees. The host is reached only through capability traits, so every
//! piece is testable without a live host:
//!
//! - `models`: wire-format rows, normalized annotations, block nodes
//! - `settings`: setting ids, defaults, panel descriptors, settings capability
//! - `host`: block/notification/browser/command-palette capabilities
//! - `url_extract`: first web address in a block's text
//! - `client`: authenticated Hypothesis REST client and search queries
//! - `annotations`: raw rows to normalized annotation records
//! - `format`: annotation records to templated block trees
//! - `commands`: palette commands, template macros, registration

use std::sync::Arc;

pub mod annotations;
pub mod client;
pub mod commands;
pub mod format;
pub mod host;
pub mod models;
pub mod settings;
pub mod url_extract;

// ============================================================================
// Extension State
// ============================================================================

/// The extension's capability handles plus its API client. One instance is
/// created when the host loads the extension; every command invocation reads
/// settings fresh through it.
pub struct Extension {
    pub settings: Arc<dyn settings::SettingsStore>,
    pub blocks: Arc<dyn host::BlockHost>,
    pub notifier: Arc<dyn host::Notifier>,
    pub browser: Arc<dyn host::BrowserOpener>,
    pub client: client::AnnotationClient,
}

impl Extension {
    pub fn new(
        settings: Arc<dyn settings::SettingsStore>,
        blocks: Arc<dyn host::BlockHost>,
        notifier: Arc<dyn host::Notifier>,
        browser: Arc<dyn host::BrowserOpener>,
    ) -> Self {
        Extension::with_api_base(settings, blocks, notifier, browser, client::API_BASE)
    }

    /// Extension against a non-production API root (tests, staging).
    pub fn with_api_base(
        settings: Arc<dyn settings::SettingsStore>,
        blocks: Arc<dyn host::BlockHost>,
        notifier: Arc<dyn host::Notifier>,
        browser: Arc<dyn host::BrowserOpener>,
        api_base: impl Into<String>,
    ) -> Self {
        let client = client::AnnotationClient::with_base_url(settings.clone(), api_base);
        Extension {
            settings,
            blocks,
            notifier,
            browser,
            client,
        }
    }

    /// Register every palette entry and macro with the host.
    pub fn register(&self, palette: &dyn host::CommandPalette) {
        commands::register_commands(palette);
    }

    /// Remove everything [`register`](Self::register) added.
    pub fn unregister(&self, palette: &dyn host::CommandPalette) {
        commands::unregister_commands(palette);
    }
}

// Re-export commonly used types
pub use annotations::normalize;
pub use client::{AnnotationClient, ClientError, SearchQuery, API_BASE};
pub use commands::{
    annotation_blocks, effective_limit, expand_import_macro, expand_macro, register_commands,
    run_import_command, run_open_site_command, run_palette_command, unregister_commands,
    AnnotationScope, CommandError, CommandKind, CommandSpec, COMMANDS, DEFAULT_LIMIT,
    NO_FOCUS_WARNING, VIA_BASE_URL,
};
pub use format::{format_blocks, format_highlight, format_note};
pub use host::{BlockHost, BrowserOpener, CommandPalette, Notifier};
pub use models::{
    Annotation, AnnotationRow, BlockNode, DocumentInfo, LinkInfo, ProfileResponse, SearchResponse,
    Selector, Target,
};
pub use settings::{
    api_token, highlight_format, note_format, SettingsField, SettingsStore,
    DEFAULT_HIGHLIGHT_FORMAT, DEFAULT_NOTE_FORMAT, SETTINGS_PANEL, SETTING_HIGHLIGHT_FORMAT,
    SETTING_NOTE_FORMAT, SETTING_TOKEN,
};
pub use url_extract::extract_url;
