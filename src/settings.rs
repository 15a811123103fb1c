//! Settings access for the extension.
//!
//! The host application persists three user-provided strings: the Hypothesis
//! API token and the two output templates. Storage is the host's concern;
//! this module defines the capability trait the host implements, the field
//! ids and defaults, and the panel descriptors a host shell can use to build
//! its configuration tab.

// ============================================================================
// Setting Ids and Defaults
// ============================================================================

pub const SETTING_TOKEN: &str = "token";
pub const SETTING_HIGHLIGHT_FORMAT: &str = "highlights";
pub const SETTING_NOTE_FORMAT: &str = "notes";

/// Template applied to each highlight. `HIGHLIGHT` is replaced by the quoted
/// source text, `URL` by the annotation's in-context link.
pub const DEFAULT_HIGHLIGHT_FORMAT: &str = "HIGHLIGHT [->](URL)";

/// Template applied to each note. `NOTE` is replaced by the note body, `URL`
/// by the annotation's in-context link.
pub const DEFAULT_NOTE_FORMAT: &str = "NOTE";

// ============================================================================
// Settings Panel
// ============================================================================

/// One field of the host's settings panel for this extension.
#[derive(Debug, Clone, Copy)]
pub struct SettingsField {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
}

/// The three fields, in display order.
pub const SETTINGS_PANEL: &[SettingsField] = &[
    SettingsField {
        id: SETTING_TOKEN,
        name: "API Token",
        description: "Input your Hypothesis User API Token here, which could be obtained from https://hypothes.is/account/developer",
        placeholder: "xxx",
    },
    SettingsField {
        id: SETTING_HIGHLIGHT_FORMAT,
        name: "Highlights Format",
        description: "The output format to a block from a highlight",
        placeholder: DEFAULT_HIGHLIGHT_FORMAT,
    },
    SettingsField {
        id: SETTING_NOTE_FORMAT,
        name: "Notes Format",
        description: "The output format to a block from a note",
        placeholder: DEFAULT_NOTE_FORMAT,
    },
];

// ============================================================================
// Capability Trait
// ============================================================================

/// Named-string settings persisted by the host application.
pub trait SettingsStore: Send + Sync {
    /// Returns the stored value for a setting id, or `None` when unset.
    fn get(&self, id: &str) -> Option<String>;

    /// Stores a value for a setting id.
    fn set(&self, id: &str, value: &str);
}

/// API token, read fresh at call time. Unset means empty; the service's
/// rejection of an empty bearer token propagates like any other HTTP error.
pub fn api_token(settings: &dyn SettingsStore) -> String {
    settings.get(SETTING_TOKEN).unwrap_or_default()
}

/// Highlight template, falling back to the default when unset or empty.
pub fn highlight_format(settings: &dyn SettingsStore) -> String {
    settings
        .get(SETTING_HIGHLIGHT_FORMAT)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_HIGHLIGHT_FORMAT.to_string())
}

/// Note template, falling back to the default when unset or empty.
pub fn note_format(settings: &dyn SettingsStore) -> String {
    settings
        .get(SETTING_NOTE_FORMAT)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_NOTE_FORMAT.to_string())
}
