//! Turns a plain-text book (a table of contents followed by titled entries) into a
//! structured [`model::Book`]: metadata, TOC, entries with dates, and raw sections.

pub mod db;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod settings;

pub use error::ParseError;
pub use model::Book;
pub use parser::parse_book;
pub use settings::Settings;
