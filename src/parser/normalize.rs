use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*_{5,}\s*$").unwrap());

/// Canonical form used for every title/date comparison: trimmed, straight quotes,
/// plain hyphens, single spaces.
pub fn normalize(text: &str) -> String {
    let unified: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect();
    unified.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A divider line made only of underscores (5 or more), optionally padded.
pub fn is_separator(line: &str) -> bool {
    SEPARATOR_RE.is_match(line)
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
