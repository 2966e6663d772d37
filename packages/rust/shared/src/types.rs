//! Core domain types for qhelpkit help projects.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current schema version for the build report format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one build run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// A record exactly as an extractor found it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyword {
    /// Rendered text of the index entry.
    pub name: String,
    /// Link target (file path, optionally with `#fragment`).
    pub reference: String,
}

impl RawKeyword {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }
}

/// A consolidated keyword: normalized, non-empty display name plus its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Display name shown in the help viewer's index.
    pub name: String,
    /// Relative locator of the page (and anchor) the keyword points at.
    #[serde(rename = "ref")]
    pub reference: String,
}

// ---------------------------------------------------------------------------
// Index sources
// ---------------------------------------------------------------------------

/// The legacy index representations an extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexFormat {
    /// HTML Help `.hhk` style: `<li>` marker followed by a ref line and a name line.
    PairedLineList,
    /// Every `<a>` in the document is an index entry.
    AnchorScan,
    /// Every `<code>` span is an entry; the target comes from its enclosing `<a>`.
    CodeInAnchorScan,
    /// Index laid out as table rows.
    TableRowScan,
}

impl IndexFormat {
    /// All formats, in declaration order.
    pub const ALL: [IndexFormat; 4] = [
        IndexFormat::PairedLineList,
        IndexFormat::AnchorScan,
        IndexFormat::CodeInAnchorScan,
        IndexFormat::TableRowScan,
    ];

    /// The configuration/CLI spelling of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexFormat::PairedLineList => "paired-line-list",
            IndexFormat::AnchorScan => "anchor-scan",
            IndexFormat::CodeInAnchorScan => "code-in-anchor-scan",
            IndexFormat::TableRowScan => "table-row-scan",
        }
    }
}

impl std::fmt::Display for IndexFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IndexFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|f| f.as_str()).collect();
                format!("unknown index format '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// One legacy index document to extract keywords from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSource {
    /// Which extractor reads this document.
    pub format: IndexFormat,
    /// Path to the document, relative to the product's documentation root.
    pub path: PathBuf,
    /// Reference targets to drop (e.g. self-referential duplicate links).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_refs: Vec<String>,
}

// ---------------------------------------------------------------------------
// Table of contents
// ---------------------------------------------------------------------------

/// A hand-authored TOC node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocSection {
    /// Title shown in the contents tree.
    pub title: String,
    /// Page the node opens.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Nested child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<TocSection>,
}

/// The static contents skeleton of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocSkeleton {
    /// Opaque markup inserted verbatim inside `<toc>`.
    Fragment(String),
    /// Structured sections rendered as nested `<section>` elements.
    Sections(Vec<TocSection>),
}

impl Default for TocSkeleton {
    fn default() -> Self {
        TocSkeleton::Sections(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// HelpProjectDescriptor
// ---------------------------------------------------------------------------

/// Everything needed to render a `.qhp` help project.
#[derive(Debug, Clone)]
pub struct HelpProjectDescriptor {
    /// Unique documentation namespace (e.g. `org.kde.maxima`).
    pub namespace: String,
    /// Virtual folder the files are mounted under.
    pub virtual_folder: String,
    /// Custom filter name.
    pub filter_name: String,
    /// Attributes attached to the custom filter.
    pub filter_attributes: Vec<String>,
    /// Contents skeleton.
    pub toc: TocSkeleton,
    /// Consolidated keyword index, in encounter order.
    pub keywords: Vec<KeywordEntry>,
    /// Glob patterns of files bundled into the archive.
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let s = id.to_string();
        let parsed: RunId = s.parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn index_format_spellings() {
        for format in IndexFormat::ALL {
            let parsed: IndexFormat = format.as_str().parse().expect("parse format");
            assert_eq!(parsed, format);
        }
        let err = "hhk".parse::<IndexFormat>().unwrap_err();
        assert!(err.contains("paired-line-list"));
    }

    #[test]
    fn index_source_deserializes_from_toml() {
        let source: IndexSource = toml::from_str(
            r#"
format = "code-in-anchor-scan"
path = "maxima_363.html"
"#,
        )
        .expect("parse source");
        assert_eq!(source.format, IndexFormat::CodeInAnchorScan);
        assert!(source.exclude_refs.is_empty());
    }

    #[test]
    fn keyword_entry_serializes_ref_field() {
        let entry = KeywordEntry {
            name: "abs".into(),
            reference: "maxima_6.html#IDX100".into(),
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert_eq!(json, r#"{"name":"abs","ref":"maxima_6.html#IDX100"}"#);
    }

    #[test]
    fn toc_section_nesting() {
        let section: TocSection = toml::from_str(
            r#"
title = "Maxima Manual"
ref = "maxima.html"

[[sections]]
title = "Introduction"
ref = "maxima_1.html"
"#,
        )
        .expect("parse toc");
        assert_eq!(section.sections.len(), 1);
        assert_eq!(section.sections[0].reference, "maxima_1.html");
    }
}
