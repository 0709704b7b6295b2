//! Content loading from the content directory.
//!
//! Each category lives in its own directory under `[content].root`:
//!
//! | Directory | Format | Record |
//! |-----------|--------|--------|
//! | `experiences/` | `*.json` | [`Experience`] |
//! | `projects/` | `*.json` | [`Project`] |
//! | `blogs/` | `*.md` with YAML front matter | [`BlogPost`] |
//! | `education/` | `*.json` | [`EducationEntry`] |
//! | `case-studies/` | `*.json` | [`CaseStudy`] |
//!
//! Content is read fresh on every call; nothing is cached.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::frontmatter;
use crate::models::{
    BlogPost, CaseStudy, Category, ContentRecord, EducationEntry, Experience, Project,
};

pub const CASE_STUDIES_DIR: &str = "case-studies";

/// A collection served under `GET /content/{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Category(Category),
    CaseStudies,
}

impl Collection {
    pub fn from_name(name: &str) -> Option<Self> {
        if name == CASE_STUDIES_DIR {
            return Some(Collection::CaseStudies);
        }
        Category::from_dir_name(name).map(Collection::Category)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Category(c) => c.dir_name(),
            Collection::CaseStudies => CASE_STUDIES_DIR,
        }
    }

    pub fn all() -> [Collection; 5] {
        [
            Collection::Category(Category::Experience),
            Collection::Category(Category::Project),
            Collection::Category(Category::Blog),
            Collection::Category(Category::Education),
            Collection::CaseStudies,
        ]
    }
}

/// Loads every record of one category, in directory path order (blogs
/// newest first).
///
/// Files that cannot be read or parsed are skipped with a warning, as are
/// records whose id repeats an earlier one. A missing category directory
/// is an error.
pub fn load_category(config: &Config, category: Category) -> Result<Vec<ContentRecord>> {
    let mut records: Vec<ContentRecord> = match category {
        Category::Experience => load_json_dir::<Experience>(config, category.dir_name())?
            .into_iter()
            .map(|(stem, r)| with_default_id(ContentRecord::Experience(r), stem))
            .collect(),
        Category::Project => load_json_dir::<Project>(config, category.dir_name())?
            .into_iter()
            .map(|(stem, r)| with_default_id(ContentRecord::Project(r), stem))
            .collect(),
        Category::Education => load_json_dir::<EducationEntry>(config, category.dir_name())?
            .into_iter()
            .map(|(stem, r)| with_default_id(ContentRecord::Education(r), stem))
            .collect(),
        Category::Blog => load_blogs(config)?
            .into_iter()
            .map(ContentRecord::Blog)
            .collect(),
    };

    dedup_by_id(&mut records, category);
    Ok(records)
}

/// Loads the full search corpus: experiences, projects, blogs, education.
///
/// Never fails. A category that cannot be loaded is logged and contributes
/// no records.
pub fn load_all(config: &Config) -> Vec<ContentRecord> {
    let mut all = Vec::new();
    for category in Category::ALL {
        match load_category(config, category) {
            Ok(records) => all.extend(records),
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "failed to load content");
            }
        }
    }
    all
}

/// Loads case studies ordered by `priority`, then id.
pub fn load_case_studies(config: &Config) -> Result<Vec<CaseStudy>> {
    let mut studies: Vec<CaseStudy> = load_json_dir::<CaseStudy>(config, CASE_STUDIES_DIR)?
        .into_iter()
        .map(|(stem, mut s)| {
            if s.id.is_empty() {
                s.id = stem;
            }
            s
        })
        .collect();

    let mut seen = HashSet::new();
    studies.retain(|s| {
        let fresh = seen.insert(s.id.clone());
        if !fresh {
            tracing::warn!(id = %s.id, "duplicate case study id, skipping");
        }
        fresh
    });

    studies.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
    Ok(studies)
}

pub fn find_case_study(config: &Config, id: &str) -> Result<Option<CaseStudy>> {
    Ok(load_case_studies(config)?.into_iter().find(|s| s.id == id))
}

/// Loads a collection as the JSON array served by the content endpoints.
///
/// Each element is the normalized record (see [`crate::models`]), serialized
/// without the `"type"` tag used for search.
pub fn load_collection(config: &Config, collection: Collection) -> Result<Value> {
    match collection {
        Collection::Category(category) => {
            let records = load_category(config, category)?;
            let values = records
                .iter()
                .map(untagged_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(values))
        }
        Collection::CaseStudies => Ok(serde_json::to_value(load_case_studies(config)?)?),
    }
}

fn untagged_value(record: &ContentRecord) -> serde_json::Result<Value> {
    match record {
        ContentRecord::Experience(r) => serde_json::to_value(r),
        ContentRecord::Project(r) => serde_json::to_value(r),
        ContentRecord::Blog(r) => serde_json::to_value(r),
        ContentRecord::Education(r) => serde_json::to_value(r),
    }
}

/// Health of one content collection, as shown by `portfolio status`.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStatus {
    pub name: &'static str,
    pub path: PathBuf,
    pub exists: bool,
    pub records: usize,
    pub error: Option<String>,
}

pub fn content_status(config: &Config) -> Vec<CollectionStatus> {
    Collection::all()
        .into_iter()
        .map(|collection| {
            let path = config.content.root.join(collection.name());
            let exists = path.is_dir();
            let loaded = match collection {
                Collection::Category(c) => load_category(config, c).map(|r| r.len()),
                Collection::CaseStudies => load_case_studies(config).map(|r| r.len()),
            };
            let (records, error) = match loaded {
                Ok(n) => (n, None),
                Err(e) => (0, Some(e.to_string())),
            };
            CollectionStatus {
                name: collection.name(),
                path,
                exists,
                records,
                error,
            }
        })
        .collect()
}

pub fn print_status(config: &Config) {
    println!("{:<16} {:<8} {:<8} PATH", "COLLECTION", "HEALTHY", "RECORDS");
    for status in content_status(config) {
        println!(
            "{:<16} {:<8} {:<8} {}",
            status.name,
            status.error.is_none(),
            status.records,
            status.path.display()
        );
        if let Some(err) = status.error {
            println!("  error: {}", err);
        }
    }
}

// ============ Scanning ============

fn load_json_dir<T: DeserializeOwned>(config: &Config, dir_name: &str) -> Result<Vec<(String, T)>> {
    let mut out = Vec::new();
    for path in scan_dir(config, dir_name, "**/*.json")? {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable content file, skipping");
                continue;
            }
        };
        match serde_json::from_str::<T>(&text) {
            Ok(record) => out.push((file_stem(&path), record)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid content file, skipping");
            }
        }
    }
    Ok(out)
}

fn load_blogs(config: &Config) -> Result<Vec<BlogPost>> {
    let mut posts = Vec::new();
    for path in scan_dir(config, Category::Blog.dir_name(), "**/*.md")? {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable blog post, skipping");
                continue;
            }
        };
        let (mut post, body) = match frontmatter::parse::<BlogPost>(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid blog front matter, skipping");
                continue;
            }
        };
        if post.id.is_empty() {
            post.id = file_stem(&path);
        }
        if post.slug.is_empty() {
            post.slug = post.id.clone();
        }
        post.content = body;
        posts.push(post);
    }

    // Newest first; undated posts last. The sort is stable, so equal dates
    // keep path order.
    posts.sort_by(|a, b| parse_date(b).cmp(&parse_date(a)));
    Ok(posts)
}

fn parse_date(post: &BlogPost) -> Option<NaiveDate> {
    post.date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
}

/// Returns matching files under `<root>/<dir_name>`, sorted by relative path.
fn scan_dir(config: &Config, dir_name: &str, include: &str) -> Result<Vec<PathBuf>> {
    let dir = config.content.root.join(dir_name);
    if !dir.is_dir() {
        bail!("Content directory does not exist: {}", dir.display());
    }

    let include_set = build_globset(&[include.to_string()])?;

    let mut excludes = vec!["**/.*".to_string(), "**/.*/**".to_string()];
    excludes.extend(config.content.exclude_globs.clone());
    let exclude_set = build_globset(&excludes)?;

    let mut files = Vec::new();
    let walker = WalkDir::new(&dir).follow_links(config.content.follow_symlinks);
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "unreadable directory entry, skipping");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&dir).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }
        files.push((rel_str, path.to_path_buf()));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, p)| p).collect())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn with_default_id(mut record: ContentRecord, stem: String) -> ContentRecord {
    if record.id().is_empty() {
        record.set_id(stem);
    }
    record
}

fn dedup_by_id(records: &mut Vec<ContentRecord>, category: Category) {
    let mut seen = HashSet::new();
    records.retain(|r| {
        let fresh = seen.insert(r.id().to_string());
        if !fresh {
            tracing::warn!(category = %category, id = %r.id(), "duplicate id, skipping");
        }
        fresh
    });
}
