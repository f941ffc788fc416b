pub mod dates;
pub mod entries;
pub mod locate;
pub mod meta;
pub mod normalize;
pub mod sections;
pub mod toc;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::ParseError;
use crate::model::Book;
use crate::settings::Settings;

// CRLF, lone CR, LF and the other Unicode line boundaries (VT, FF, FS/GS/RS, NEL, LS, PS).
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]").unwrap());

/// Split raw text into the immutable line sequence every stage works on.
/// A break at the very end does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = LINE_BREAK_RE.split(text).map(String::from).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Full pipeline: metadata, TOC, title location, entry extraction, raw sections.
pub fn parse_book(text: &str, settings: &Settings) -> Result<Book, ParseError> {
    let lines = split_lines(text);
    parse_lines(&lines, settings)
}

pub fn parse_lines(lines: &[String], settings: &Settings) -> Result<Book, ParseError> {
    let marker = settings.heading_marker.as_str();
    let meta = meta::extract_metadata(lines, &settings.publisher);

    let block = toc::find_toc(lines, marker).ok_or_else(|| ParseError::HeadingNotFound {
        marker: marker.to_string(),
    })?;
    let Some(first) = block.entries.first() else {
        return Err(ParseError::EmptyToc {
            marker: marker.to_string(),
            line: block.heading + 1,
        });
    };

    let start = locate::body_start(lines, block.end, &first.title);
    let located = locate::locate_titles(lines, start, &block.entries);
    debug!(start, located = located.len(), "titles located");

    let entries = entries::extract_entries(lines, &block.entries, &located, &settings.category);

    // Back matter is never split off the final entry; it starts at end of document.
    let bounds = sections::Bounds {
        heading: block.heading,
        toc_end: block.end,
        back_matter_start: lines.len(),
    };
    let raw_sections = sections::build_sections(lines, bounds);

    info!(
        lines = lines.len(),
        toc = block.entries.len(),
        entries = entries.len(),
        "parsed book"
    );
    Ok(Book::new(meta, block.entries, raw_sections, entries))
}
