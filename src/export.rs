use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{Book, Entry};

const CSV_HEADER: [&str; 6] = ["Category", "Number", "Title", "Body", "Page", "Date"];

pub fn write_json(book: &Book, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn write_csv(book: &Book, path: &Path) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_csv_to(&mut out, &book.entries)?;
    out.flush()?;
    Ok(())
}

/// One row per entry, RFC 4180 quoting, CRLF row endings.
pub fn write_csv_to<W: Write>(out: &mut W, entries: &[Entry]) -> Result<()> {
    write_row(out, &CSV_HEADER.map(String::from))?;
    for e in entries {
        let row = [
            e.category.clone(),
            e.id.to_string(),
            e.title.clone(),
            e.body.clone(),
            e.page.map(|p| p.to_string()).unwrap_or_default(),
            e.date.clone().unwrap_or_default(),
        ];
        write_row(out, &row)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String]) -> Result<()> {
    let line = cells.iter().map(|c| quote(c)).collect::<Vec<_>>().join(",");
    write!(out, "{}\r\n", line)?;
    Ok(())
}

fn quote(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
