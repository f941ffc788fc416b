use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::normalize::{is_blank, normalize};
use crate::model::TocEntry;

// "Title<spaces>13"
static TOC_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<title>.+?)\s+(?P<page>\d{1,4})\s*$").unwrap());
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d$").unwrap());

/// The parsed TOC plus where it sits in the document.
#[derive(Debug, Clone)]
pub struct TocBlock {
    pub entries: Vec<TocEntry>,
    /// Line index of the heading marker.
    pub heading: usize,
    /// First line index after the TOC block.
    pub end: usize,
}

pub fn parse_toc_line(line: &str) -> Option<TocEntry> {
    let caps = TOC_LINE_RE.captures(line.trim())?;
    let page = caps["page"]
        .chars()
        .try_fold(0u32, |acc, c| Some(acc * 10 + digit_value(c)?))?;
    Some(TocEntry {
        title: normalize(&caps["title"]),
        page,
    })
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DIGIT_RE.is_match(c.encode_utf8(&mut buf))
}

/// Value of a decimal digit in any script (`٣`, `５`, `3`). Unicode decimal digits
/// come in runs of ten starting at zero, so the value is the offset into the run.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let offset = (1..=c as u32)
        .map_while(|k| char::from_u32(c as u32 - k))
        .take_while(|&p| is_decimal_digit(p))
        .count();
    Some(offset as u32 % 10)
}

/// Locate the heading marker and read the contiguous TOC block after it.
/// Returns `None` when the marker never appears.
pub fn find_toc(lines: &[String], marker: &str) -> Option<TocBlock> {
    let heading = lines.iter().position(|l| l.trim() == marker)?;

    let start = heading + 1;
    let mut entries = Vec::new();
    let mut end = start;

    for (j, line) in lines.iter().enumerate().skip(start) {
        if is_blank(line) {
            end = j + 1;
            continue;
        }
        if let Some(entry) = parse_toc_line(line) {
            entries.push(entry);
            end = j + 1;
            continue;
        }
        if !entries.is_empty() {
            end = j;
            break;
        }
        // Noise between the marker and the first entry is absorbed into the block.
        end = j + 1;
    }

    debug!(heading, end, entries = entries.len(), "toc block");
    Some(TocBlock {
        entries,
        heading,
        end,
    })
}
