use super::dates::pop_trailing_date;
use super::normalize::{is_blank, is_separator, normalize};
use crate::model::{Entry, TocEntry};

/// Slice the document between consecutive located headings and clean each slice
/// into an entry. `located[i]` is the heading line of `toc[i]`.
pub fn extract_entries(
    lines: &[String],
    toc: &[TocEntry],
    located: &[usize],
    category: &str,
) -> Vec<Entry> {
    located
        .iter()
        .zip(toc)
        .enumerate()
        .map(|(i, (&heading, item))| {
            let end = located.get(i + 1).copied().unwrap_or(lines.len());
            let (body, date) = clean_body(&lines[heading + 1..end], &item.title);
            Entry {
                id: i as u32 + 1,
                category: category.to_string(),
                title: item.title.clone(),
                page: Some(item.page),
                date,
                body,
            }
        })
        .collect()
}

/// Separators out, blank edges trimmed, echoed title headings dropped, trailing
/// date popped. Returns the joined body and the date if one was found.
fn clean_body(chunk: &[String], title: &str) -> (String, Option<String>) {
    let mut cleaned: Vec<String> = chunk
        .iter()
        .filter(|l| !is_separator(l))
        .map(|l| l.trim_end().to_string())
        .collect();

    trim_blank_edges(&mut cleaned);

    while cleaned.first().is_some_and(|l| normalize(l) == title) {
        cleaned.remove(0);
        let lead = cleaned.iter().take_while(|l| is_blank(l)).count();
        cleaned.drain(..lead);
    }

    let (rest, date) = pop_trailing_date(cleaned);
    (rest.join("\n").trim().to_string(), date)
}

fn trim_blank_edges(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| is_blank(l)) {
        lines.pop();
    }
    let lead = lines.iter().take_while(|l| is_blank(l)).count();
    lines.drain(..lead);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    fn item(title: &str, page: u32) -> TocEntry {
        TocEntry {
            title: title.to_string(),
            page,
        }
    }

    #[test]
    fn slices_between_headings() {
        let lines = doc("Dawn\nfirst line\nsecond line\n14 July 1963\nDusk\nonly line");
        let toc = [item("Dawn", 3), item("Dusk", 5)];
        let entries = extract_entries(&lines, &toc, &[0, 4], "Uncategorized");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].title, "Dawn");
        assert_eq!(entries[0].page, Some(3));
        assert_eq!(entries[0].date.as_deref(), Some("14 July 1963"));
        assert_eq!(entries[0].body, "first line\nsecond line");
        assert_eq!(entries[1].id, 2);
        assert_eq!(entries[1].date, None);
        assert_eq!(entries[1].body, "only line");
        assert_eq!(entries[1].category, "Uncategorized");
    }

    #[test]
    fn separators_removed_blank_lines_kept_inside() {
        let lines = doc("Dawn\n\n______\nstanza one\n\n_______\nstanza two\n\n__________\n");
        let entries = extract_entries(&lines, &[item("Dawn", 1)], &[0], "c");
        assert_eq!(entries[0].body, "stanza one\n\nstanza two");
        assert!(!entries[0].body.contains("_____"));
    }

    #[test]
    fn echoed_titles_dropped() {
        let lines = doc("Aqa Sahib\n\nAqa  Sahib\n\n\u{201C}Aqa Sahib\u{201D}\nAqa Sahib\n\nverse");
        let entries = extract_entries(&lines, &[item("Aqa Sahib", 1)], &[0], "c");
        assert_eq!(entries[0].body, "\u{201C}Aqa Sahib\u{201D}\nAqa Sahib\n\nverse");

        let lines = doc("Ode\nOde\n\nOde\nline");
        let entries = extract_entries(&lines, &[item("Ode", 1)], &[0], "c");
        assert_eq!(entries[0].body, "line");
    }

    #[test]
    fn trailing_whitespace_trimmed_per_line() {
        let lines = doc("Dawn\n  indented   \nnext\t");
        let entries = extract_entries(&lines, &[item("Dawn", 1)], &[0], "c");
        assert_eq!(entries[0].body, "indented\nnext");
    }

    #[test]
    fn empty_body() {
        let lines = doc("Dawn\n\n(1963)\nDusk");
        let toc = [item("Dawn", 1), item("Dusk", 2)];
        let entries = extract_entries(&lines, &toc, &[0, 3], "c");
        assert_eq!(entries[0].body, "");
        assert_eq!(entries[0].date.as_deref(), Some("1963"));
        assert_eq!(entries[1].body, "");
    }

    #[test]
    fn only_located_prefix_produces_entries() {
        let lines = doc("Dawn\ntext");
        let toc = [item("Dawn", 1), item("Dusk", 2)];
        assert_eq!(extract_entries(&lines, &toc, &[0], "c").len(), 1);
        assert!(extract_entries(&lines, &toc, &[], "c").is_empty());
    }
}
