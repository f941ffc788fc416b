use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "book_parser";
const ENV_PREFIX: &str = "BOOK";

/// Parser settings: defaults, then `book_parser.toml`, then `BOOK_*` variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Line that opens the table of contents.
    pub heading_marker: String,
    /// Category given to every entry.
    pub category: String,
    /// Publisher line looked for in the front matter.
    pub publisher: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            heading_marker: "Poems".to_string(),
            category: "Uncategorized".to_string(),
            publisher: "Fatemi Dawat Publications".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .context("Failed to load settings")
    }

    pub fn with_overrides(mut self, heading: Option<String>, category: Option<String>) -> Self {
        if let Some(h) = heading {
            self.heading_marker = h;
        }
        if let Some(c) = category {
            self.category = c;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.heading_marker, "Poems");
        assert_eq!(s.category, "Uncategorized");
        assert_eq!(s.publisher, "Fatemi Dawat Publications");
    }

    #[test]
    fn partial_source_keeps_defaults() {
        let s: Settings = Config::builder()
            .set_override("heading_marker", "Contents")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.heading_marker, "Contents");
        assert_eq!(s.category, "Uncategorized");
    }

    #[test]
    fn overrides() {
        let s = Settings::default().with_overrides(Some("Verses".into()), None);
        assert_eq!(s.heading_marker, "Verses");
        assert_eq!(s.category, "Uncategorized");
    }
}
