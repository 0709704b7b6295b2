//! YAML front matter for Markdown blog posts.
//!
//! A post starts with a `---` fenced YAML header followed by the Markdown
//! body:
//!
//! ```text
//! ---
//! title: Building Production-Ready AI Agents
//! date: 2024-01-15
//! tags: [AI, Engineering]
//! ---
//! # Building Production-Ready AI Agents
//! ...
//! ```

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

lazy_static! {
    static ref FRONTMATTER_RE: Regex =
        Regex::new(r"(?s)\A(?:\x{FEFF})?---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)").unwrap();
}

/// A document split into its raw header and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<'a> {
    /// YAML between the fences; empty when the document has no header.
    pub header: &'a str,
    pub body: &'a str,
}

pub fn split(document: &str) -> Split<'_> {
    match FRONTMATTER_RE.captures(document) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
            Split {
                header: caps.get(1).map(|m| m.as_str()).unwrap_or(""),
                body: &document[whole..],
            }
        }
        None => Split {
            header: "",
            body: document,
        },
    }
}

/// Deserializes the header into `T` and returns it with the body.
///
/// A document without a header deserializes from an empty mapping, so
/// every field of `T` must have a default for that case to succeed.
pub fn parse<T: DeserializeOwned>(document: &str) -> Result<(T, String)> {
    let parts = split(document);
    let header = if parts.header.trim().is_empty() {
        "{}"
    } else {
        parts.header
    };
    let data: T =
        serde_yaml::from_str(header).with_context(|| "Failed to parse front matter header")?;
    Ok((data, parts.body.trim_start_matches(['\r', '\n']).to_string()))
}
