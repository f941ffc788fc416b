use crate::model::{RawSection, SectionKind};

/// Line boundaries of the unparsed blocks around the entries.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub heading: usize,
    pub toc_end: usize,
    pub back_matter_start: usize,
}

/// Partition the raw text outside the entries into front matter, TOC and back matter.
/// Blocks whose joined text is blank are left out.
pub fn build_sections(lines: &[String], bounds: Bounds) -> Vec<RawSection> {
    let mut sections = Vec::new();
    let mut push = |kind: SectionKind, range: &[String]| {
        let body = range.join("\n").trim().to_string();
        if !body.is_empty() {
            sections.push(RawSection { kind, body });
        }
    };

    if bounds.heading > 0 {
        push(SectionKind::FrontMatter, &lines[..bounds.heading]);
    }
    if bounds.toc_end > bounds.heading {
        push(SectionKind::Toc, &lines[bounds.heading..bounds.toc_end.min(lines.len())]);
    }
    if bounds.back_matter_start < lines.len() {
        push(SectionKind::BackMatter, &lines[bounds.back_matter_start..]);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    fn kinds(sections: &[RawSection]) -> Vec<SectionKind> {
        sections.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn front_and_toc() {
        let lines = doc("Title\nby X\n\nPoems\nDawn 3\n\nDawn\ntext");
        let bounds = Bounds {
            heading: 3,
            toc_end: 6,
            back_matter_start: lines.len(),
        };
        let sections = build_sections(&lines, bounds);
        assert_eq!(kinds(&sections), [SectionKind::FrontMatter, SectionKind::Toc]);
        assert_eq!(sections[0].body, "Title\nby X");
        assert_eq!(sections[1].body, "Poems\nDawn 3");
    }

    #[test]
    fn blank_front_matter_omitted() {
        let lines = doc("\n  \nPoems\nDawn 3");
        let bounds = Bounds {
            heading: 2,
            toc_end: 4,
            back_matter_start: 4,
        };
        assert_eq!(kinds(&build_sections(&lines, bounds)), [SectionKind::Toc]);
    }

    #[test]
    fn heading_on_first_line_has_no_front_matter() {
        let lines = doc("Poems\nDawn 3");
        let bounds = Bounds {
            heading: 0,
            toc_end: 2,
            back_matter_start: 2,
        };
        assert_eq!(kinds(&build_sections(&lines, bounds)), [SectionKind::Toc]);
    }

    #[test]
    fn back_matter_when_start_is_inside_document() {
        let lines = doc("Poems\nDawn 3\nDawn\ntext\nAbout the author");
        let bounds = Bounds {
            heading: 0,
            toc_end: 2,
            back_matter_start: 4,
        };
        let sections = build_sections(&lines, bounds);
        assert_eq!(sections.last().map(|s| s.kind), Some(SectionKind::BackMatter));
        assert_eq!(sections[1].body, "About the author");
    }
}
