use thiserror::Error;

/// Conditions that make a document unparseable as a whole.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not find the TOC heading: no line reads exactly {marker:?}")]
    HeadingNotFound { marker: String },
    #[error("found {marker:?} on line {line} but no TOC entries (`<title> <page>`) follow it")]
    EmptyToc { marker: String, line: usize },
}
