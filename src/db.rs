use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::model::Book;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS books (
            id                   INTEGER PRIMARY KEY,
            source               TEXT UNIQUE NOT NULL,
            book_title           TEXT,
            subtitle             TEXT,
            author               TEXT,
            publisher            TEXT,
            year_hijri_gregorian TEXT,
            copyright            TEXT,
            toc_count            INTEGER NOT NULL,
            entry_count          INTEGER NOT NULL,
            parsed_at            TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS toc_entries (
            book_id   INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            position  INTEGER NOT NULL,
            title     TEXT NOT NULL,
            page      INTEGER NOT NULL,
            PRIMARY KEY (book_id, position)
        );

        CREATE TABLE IF NOT EXISTS entries (
            book_id   INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            id        INTEGER NOT NULL,
            category  TEXT NOT NULL,
            title     TEXT NOT NULL,
            page      INTEGER,
            date      TEXT,
            body      TEXT NOT NULL,
            PRIMARY KEY (book_id, id)
        );
        CREATE INDEX IF NOT EXISTS idx_entries_title ON entries(title);

        CREATE TABLE IF NOT EXISTS raw_sections (
            book_id   INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            kind      TEXT NOT NULL CHECK(kind IN ('front_matter_raw','toc_raw','back_matter_raw')),
            body      TEXT NOT NULL,
            UNIQUE(book_id, kind)
        );
        ",
    )?;
    Ok(())
}

/// Store one parsed book in a single transaction, replacing any earlier export of
/// the same source. Returns the book's row id.
pub fn save_book(conn: &Connection, source: &str, book: &Book) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM books WHERE source = ?1", [source])?;
    let m = &book.meta;
    tx.execute(
        "INSERT INTO books
         (source, book_title, subtitle, author, publisher, year_hijri_gregorian, copyright,
          toc_count, entry_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            source, m.book_title, m.subtitle, m.author, m.publisher, m.year_hijri_gregorian,
            m.copyright, book.toc.len() as i64, book.entries.len() as i64,
        ],
    )?;
    let book_id = tx.last_insert_rowid();
    {
        let mut t_stmt = tx.prepare(
            "INSERT INTO toc_entries (book_id, position, title, page) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (i, t) in book.toc.iter().enumerate() {
            t_stmt.execute(rusqlite::params![book_id, i as i64 + 1, t.title, t.page])?;
        }

        let mut e_stmt = tx.prepare(
            "INSERT INTO entries (book_id, id, category, title, page, date, body)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for e in &book.entries {
            e_stmt.execute(rusqlite::params![
                book_id, e.id, e.category, e.title, e.page, e.date, e.body,
            ])?;
        }

        let mut s_stmt =
            tx.prepare("INSERT INTO raw_sections (book_id, kind, body) VALUES (?1, ?2, ?3)")?;
        for s in &book.sections {
            s_stmt.execute(rusqlite::params![book_id, s.kind.as_str(), s.body])?;
        }
    }
    tx.commit()?;
    Ok(book_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_book;
    use crate::settings::Settings;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn save_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let conn = connect(&dir.path().join("book.sqlite")).unwrap();
        init_schema(&conn).unwrap();

        let text = "Front\nPoems\nDawn 3\nDusk 5\n\nDawn\nline\n1963\nDusk\nother";
        let book = parse_book(text, &Settings::default()).unwrap();

        save_book(&conn, "a.txt", &book).unwrap();
        save_book(&conn, "a.txt", &book).unwrap();

        assert_eq!(count(&conn, "books"), 1);
        assert_eq!(count(&conn, "toc_entries"), 2);
        assert_eq!(count(&conn, "entries"), 2);
        assert_eq!(count(&conn, "raw_sections"), 2);

        let date: Option<String> = conn
            .query_row("SELECT date FROM entries WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(date.as_deref(), Some("1963"));
    }
}
