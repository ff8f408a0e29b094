//! Title clean-up used before re-querying the catalog for lyrics.
//!
//! This is a lossy heuristic. Anything after the first `- ` is dropped, so a
//! real title such as `"Hide - And - Seek"` loses its tail, and we can't tell an
//! `"Artist - Title"` prefix from a `"Title - Version"` suffix. A standalone
//! `ft.` word also cuts the title there.

use regex::Regex;
use std::sync::LazyLock;

static PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*").expect("valid regex"));
static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\]]*\]\s*").expect("valid regex"));
static FEATURING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:feat|ft)\.").expect("valid regex"));

/// Strip version/featuring decorations from a track title.
///
/// Steps, in order: drop `(...)` groups, drop `[...]` groups, cut at a
/// `feat.`/`ft.` credit, cut at the first `- `, trim.
pub fn normalize_title(raw: &str) -> String {
    let s = PARENS.replace_all(raw, " ");
    let s = BRACKETS.replace_all(&s, " ");

    let mut s: &str = &s;
    if let Some(m) = FEATURING.find(s) {
        s = &s[..m.start()];
    }
    if let Some(pos) = s.find("- ") {
        s = &s[..pos];
    }
    s.trim().to_string()
}
