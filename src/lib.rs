//! # Portfolio API
//!
//! Content and search backend for a personal portfolio site.
//!
//! Portfolio content (experiences, projects, blog posts, education entries,
//! case studies) lives as JSON and Markdown files in a content directory.
//! The HTTP API serves each collection as-is and answers free-text
//! questions through a keyword search, optionally preceded by an external AI
//! search process.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  content/   │──▶│   Loader     │──▶│   Scorer +   │
//! │ JSON + .md  │   │ (per request)│   │  Responder   │
//! └─────────────┘   └──────┬───────┘   └──────┬───────┘
//!                          │                  │ fallback
//!                          ▼                  ▼
//!                   ┌──────────────┐   ┌──────────────┐
//!                   │ GET /content │   │ POST /search │◀── delegate
//!                   └──────────────┘   └──────────────┘    (subprocess)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! portfolio status                         # check the content directory
//! portfolio search "rag architecture"      # search from the terminal
//! portfolio serve                          # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Content records and search results |
//! | [`frontmatter`] | YAML front matter for blog posts |
//! | [`content`] | Content directory loading |
//! | [`search`] | Keyword relevance scoring |
//! | [`respond`] | Templated answers |
//! | [`provider`] | Search provider trait and fallback composition |
//! | [`delegate`] | External AI search subprocess |
//! | [`server`] | HTTP server |

pub mod config;
pub mod content;
pub mod delegate;
pub mod frontmatter;
pub mod models;
pub mod provider;
pub mod respond;
pub mod search;
pub mod server;
