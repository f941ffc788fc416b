use tracing::debug;

use super::normalize::{is_blank, is_separator, normalize};
use crate::model::TocEntry;

/// First line at or after `from` whose normalized text is `title`, or `from`
/// itself when the title never appears. Anchors title location past the TOC.
pub fn body_start(lines: &[String], from: usize, title: &str) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, l)| normalize(l) == title)
        .map_or(from, |(i, _)| i)
}

/// Find the heading line of each TOC entry, in TOC order, with a forward-only cursor.
///
/// Stops at the first title that cannot be found, so the result is always a prefix
/// of `toc`; `result.len() == toc.len()` means every entry was located.
pub fn locate_titles(lines: &[String], start: usize, toc: &[TocEntry]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(toc.len());
    let mut cursor = start;

    for entry in toc {
        let found = (cursor..lines.len()).find(|&i| {
            let line = &lines[i];
            !is_blank(line) && !is_separator(line) && normalize(line) == entry.title
        });
        match found {
            Some(i) => {
                indices.push(i);
                cursor = i + 1;
            }
            None => {
                debug!(title = %entry.title, cursor, "title not found, stopping");
                break;
            }
        }
    }

    indices
}
