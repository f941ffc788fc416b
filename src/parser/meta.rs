use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::normalize::is_blank;
use crate::model::Metadata;

/// Only this many leading lines are searched for metadata.
const META_SCAN_LINES: usize = 300;
/// Window for the book title and subtitle.
const TITLE_SCAN_LINES: usize = 60;

static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)written by\s*\n(.+)").unwrap());
static COPYRIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Copyright\s*\n(.+)").unwrap());

/// Pull the front-matter fields out of the start of the document. Every field is
/// independent; a pattern that does not match just leaves its field unset.
pub fn extract_metadata(lines: &[String], publisher: &str) -> Metadata {
    let mut meta = Metadata::default();

    let mut heads = lines
        .iter()
        .take(TITLE_SCAN_LINES)
        .filter(|l| !is_blank(l))
        .map(|l| l.trim().to_string());
    meta.book_title = heads.next();
    meta.subtitle = heads.next();

    let text = lines
        .iter()
        .take(META_SCAN_LINES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    meta.author = capture_next_line(&AUTHOR_RE, &text);
    meta.copyright = capture_next_line(&COPYRIGHT_RE, &text);

    if !publisher.is_empty() {
        if let Some((name, year)) = find_publisher(&text, publisher) {
            meta.publisher = Some(name);
            meta.year_hijri_gregorian = Some(year);
        }
    }

    meta
}

fn capture_next_line(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].trim().to_string())
}

/// The publisher's own line followed by a dual-calendar year such as `1447/2025`.
fn find_publisher(text: &str, publisher: &str) -> Option<(String, String)> {
    let pattern = format!(r"\n({})\s*\n(\d{{3,4}}/\d{{4}})", regex::escape(publisher));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!(publisher, error = %e, "publisher pattern rejected, skipping");
            return None;
        }
    };
    let caps = re.captures(text)?;
    Some((caps[1].trim().to_string(), caps[2].trim().to_string()))
}
