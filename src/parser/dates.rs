use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::normalize::{is_blank, normalize};

/// Number of non-blank lines, counted from the end of an entry, searched for a date.
pub const TRAILING_DATE_WINDOW: usize = 6;

const YEAR: &str = r"(?:1[89]\d{2}|20\d{2})";

static YEAR_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(r"^{YEAR}$")).unwrap());
// 14 July 1963, 14th Jul 1963, 14 July, 1963
static DAY_MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\d{{1,2}}(?:st|nd|rd|th)?\s+[A-Za-z]{{3,9}},?\s+{YEAR}$")).unwrap()
});
// July 14, 1963
static MONTH_DAY_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^[A-Za-z]{{3,9}}\s+\d{{1,2}}(?:st|nd|rd|th)?,\s*{YEAR}$")).unwrap()
});
static MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^[A-Za-z]{{3,9}}\s+{YEAR}$")).unwrap());

/// Which grammar a date line matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateForm {
    YearOnly,
    DayMonthYear,
    MonthDayYear,
    MonthYear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub form: DateForm,
    pub text: String,
}

/// Peel one layer of wrapping parentheses and any trailing `.;:,` off a line.
fn strip_wrapping_punct(line: &str) -> &str {
    let mut t = line.trim();
    if t.len() >= 2 && t.starts_with('(') && t.ends_with(')') {
        t = t[1..t.len() - 1].trim();
    }
    t.trim_end_matches([' ', '.', ';', ':', ','])
}

fn classify(candidate: &str) -> Option<DateForm> {
    if YEAR_ONLY_RE.is_match(candidate) {
        Some(DateForm::YearOnly)
    } else if DAY_MONTH_YEAR_RE.is_match(candidate) {
        Some(DateForm::DayMonthYear)
    } else if MONTH_DAY_YEAR_RE.is_match(candidate) {
        Some(DateForm::MonthDayYear)
    } else if MONTH_YEAR_RE.is_match(candidate) {
        Some(DateForm::MonthYear)
    } else {
        None
    }
}

/// Test a candidate line against every date grammar.
pub fn recognize(line: &str) -> Option<DateMatch> {
    let text = normalize(strip_wrapping_punct(line));
    classify(&text).map(|form| DateMatch { form, text })
}

pub fn looks_like_date(line: &str) -> bool {
    recognize(line).is_some()
}

/// Canonical text of a date line: unwrapped, trailing punctuation removed, normalized.
pub fn extract_date(line: &str) -> String {
    normalize(strip_wrapping_punct(line))
}

/// Find the date closest to the end among the last few non-blank lines, remove it
/// (and the blank lines it leaves trailing) and return it.
pub fn pop_trailing_date(lines: Vec<String>) -> (Vec<String>, Option<String>) {
    let hit = lines
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, l)| !is_blank(l))
        .take(TRAILING_DATE_WINDOW)
        .find_map(|(i, l)| recognize(l).map(|m| (i, m)));

    let Some((idx, date)) = hit else {
        return (lines, None);
    };
    debug!(line = idx, form = ?date.form, date = %date.text, "trailing date");

    let mut rest = lines;
    rest.remove(idx);
    while rest.last().is_some_and(|l| is_blank(l)) {
        rest.pop();
    }
    (rest, Some(date.text))
}
