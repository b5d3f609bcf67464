//! Title normalization for release-style file and directory names.
//!
//! `normalize` is the only entry point the catalog writer uses. It never
//! fails: when no title can be extracted it yields an empty string.

mod parser;

pub use parser::ReleaseNameParser;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Structured result of parsing a release name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedTitle {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleParseError {
    #[error("No title found in '{0}'")]
    NoTitle(String),
}

/// Extracts a human title from a noisy release name.
pub trait TitleParser: Send + Sync {
    fn parse(&self, raw_name: &str) -> Result<ParsedTitle, TitleParseError>;
}

/// Best-effort clean title; parse errors become `""`.
pub fn normalize(parser: &dyn TitleParser, raw_name: &str) -> String {
    match parser.parse(raw_name) {
        Ok(parsed) => parsed.title,
        Err(e) => {
            debug!("{}", e);
            String::new()
        }
    }
}
