//! Web-address extraction from block text.
//!
//! A block that triggers an import command is expected to contain the URL of
//! the annotated page somewhere in its raw text. The pattern is a permissive
//! derivative of url-regex-safe: `http://`/`https://` URLs and bare `www.`
//! hosts, Unicode-aware host labels, optional port, and an optional
//! path/query/fragment that stops at whitespace and quote characters.

use regex::Regex;

const PROTOCOL: &str = "(?:https?://)";
const HOST: &str = "(?:(?:[a-z\\x{00a1}-\\x{ffff}0-9][-_]*)*[a-z\\x{00a1}-\\x{ffff}0-9]+)";
const DOMAIN: &str = "(?:\\.(?:[a-z\\x{00a1}-\\x{ffff}0-9]-*)*[a-z\\x{00a1}-\\x{ffff}0-9]+)*";
const TLD: &str = "(?:\\.(?:[a-z\\x{00a1}-\\x{ffff}]{2,}))";
const PORT: &str = "(?::\\d{2,5})?";
const PATH: &str = "(?:[/?#][^\\s\"')]*)?";

fn url_regex() -> Regex {
    let pattern = format!("(?i)(?:{PROTOCOL}|www\\.)(?:{HOST}{DOMAIN}{TLD}){PORT}{PATH}");
    Regex::new(&pattern).unwrap()
}

/// Return the first web address embedded in `text`, or `None`.
///
/// When the text contains several URLs the first match wins; callers cannot
/// pick a different one.
pub fn extract_url(text: &str) -> Option<&str> {
    url_regex().find(text).map(|m| m.as_str())
}
