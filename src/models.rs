//! Core data models used throughout the portfolio API.
//!
//! Content records are loaded from the content directory, flattened into a
//! single [`ContentRecord`] list for search, and turned into transient
//! [`SearchResult`]s per query.
//!
//! Record structs name the fields the API reasons about and keep every other
//! JSON field in `extra`. What the content endpoints serve is the normalized
//! record, not the file verbatim: missing `id` (and a blog's `slug`) is filled
//! in, absent list fields become `[]`, `null` optionals are omitted, and
//! object keys come back in alphabetical order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The searchable content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Experience,
    Project,
    Blog,
    Education,
}

impl Category {
    /// Load order for the flattened search corpus.
    pub const ALL: [Category; 4] = [
        Category::Experience,
        Category::Project,
        Category::Blog,
        Category::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Experience => "experience",
            Category::Project => "project",
            Category::Blog => "blog",
            Category::Education => "education",
        }
    }

    /// Capitalized name used in citations (`"Experience: ..."`).
    pub fn label(&self) -> &'static str {
        match self {
            Category::Experience => "Experience",
            Category::Project => "Project",
            Category::Blog => "Blog",
            Category::Education => "Education",
        }
    }

    /// Directory under the content root and path segment under `/content`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Experience => "experiences",
            Category::Project => "projects",
            Category::Blog => "blogs",
            Category::Education => "education",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .or_else(|| Self::from_dir_name(s))
            .ok_or_else(|| {
                format!(
                    "unknown category '{}'. Use experience, project, blog, or education.",
                    s
                )
            })
    }
}

/// A work experience entry (`experiences/*.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A side or open-source project (`projects/*.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A blog post (`blogs/*.md`). Header fields come from the YAML front
/// matter; `content` is the Markdown body after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publication date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A degree or program (`education/*.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One unit of portfolio content, tagged with its category.
///
/// Serializes with a `"type"` field naming the category, which is the form
/// the keyword scorer matches against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentRecord {
    Experience(Experience),
    Project(Project),
    Blog(BlogPost),
    Education(EducationEntry),
}

impl ContentRecord {
    pub fn category(&self) -> Category {
        match self {
            ContentRecord::Experience(_) => Category::Experience,
            ContentRecord::Project(_) => Category::Project,
            ContentRecord::Blog(_) => Category::Blog,
            ContentRecord::Education(_) => Category::Education,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ContentRecord::Experience(r) => &r.id,
            ContentRecord::Project(r) => &r.id,
            ContentRecord::Blog(r) => &r.id,
            ContentRecord::Education(r) => &r.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            ContentRecord::Experience(r) => r.id = id,
            ContentRecord::Project(r) => r.id = id,
            ContentRecord::Blog(r) => r.id = id,
            ContentRecord::Education(r) => r.id = id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ContentRecord::Experience(r) => r.title.as_deref(),
            ContentRecord::Project(r) => r.title.as_deref(),
            ContentRecord::Blog(r) => r.title.as_deref(),
            ContentRecord::Education(r) => r.title.as_deref(),
        }
    }

    /// Alternate display label for records without a title.
    pub fn label(&self) -> Option<&str> {
        match self {
            ContentRecord::Education(r) => r.institution.as_deref(),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            ContentRecord::Experience(r) => r.summary.as_deref(),
            ContentRecord::Project(r) => r.summary.as_deref(),
            ContentRecord::Blog(r) => r.summary.as_deref(),
            ContentRecord::Education(r) => r.summary.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ContentRecord::Experience(r) => r.description.as_deref(),
            ContentRecord::Project(r) => r.description.as_deref(),
            ContentRecord::Blog(r) => r.description.as_deref(),
            ContentRecord::Education(r) => r.description.as_deref(),
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            ContentRecord::Experience(r) => &r.tags,
            ContentRecord::Project(r) => &r.tags,
            ContentRecord::Blog(r) => &r.tags,
            ContentRecord::Education(r) => &r.tags,
        }
    }

    /// Title, then alternate label, then `"Untitled"`.
    pub fn display_title(&self) -> &str {
        self.title().or_else(|| self.label()).unwrap_or("Untitled")
    }
}

/// A unified case study (`case-studies/*.json`). Served to the frontend but
/// not part of the search corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// `work`, `project`, `education`, or `research`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: bool,
    /// Display order, ascending.
    #[serde(default)]
    pub priority: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A ranked search hit.
///
/// `relevance` is the integer rank 1-3 for keyword matches; delegated
/// results may carry fractional similarity scores instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub summary: String,
    pub relevance: f64,
    pub citation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Body of a `POST /search` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub response: String,
}
