use std::collections::BTreeMap;

use serde::Serialize;

/// Front-matter fields. Absent fields are omitted from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_hijri_gregorian: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: u32,
    pub category: String,
    pub title: String,
    pub page: Option<u32>,
    pub date: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    #[serde(rename = "front_matter_raw")]
    FrontMatter,
    #[serde(rename = "toc_raw")]
    Toc,
    #[serde(rename = "back_matter_raw")]
    BackMatter,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::FrontMatter => "front_matter_raw",
            SectionKind::Toc => "toc_raw",
            SectionKind::BackMatter => "back_matter_raw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSection {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub body: String,
}

/// Everything one parse produces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub meta: Metadata,
    pub toc: Vec<TocEntry>,
    pub sections: Vec<RawSection>,
    #[serde(rename = "poems")]
    pub entries: Vec<Entry>,
    pub id_to_title: BTreeMap<u32, String>,
    pub title_to_id: BTreeMap<String, u32>,
}

impl Book {
    pub fn new(meta: Metadata, toc: Vec<TocEntry>, sections: Vec<RawSection>, entries: Vec<Entry>) -> Self {
        let id_to_title = entries.iter().map(|e| (e.id, e.title.clone())).collect();
        // a repeated title keeps the id of its last entry
        let title_to_id = entries.iter().map(|e| (e.title.clone(), e.id)).collect();
        Book {
            meta,
            toc,
            sections,
            entries,
            id_to_title,
            title_to_id,
        }
    }

    /// Every TOC title was located in the body.
    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.toc.len()
    }

    /// TOC entries that produced no entry, starting with the one that stopped extraction.
    pub fn missing_titles(&self) -> &[TocEntry] {
        &self.toc[self.entries.len().min(self.toc.len())..]
    }

    pub fn section(&self, kind: SectionKind) -> Option<&RawSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}
