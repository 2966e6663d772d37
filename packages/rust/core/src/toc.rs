//! TOC skeleton loading and rendering.
//!
//! The contents tree of a help project is hand-authored per product, either
//! as a markup fragment file or as inline `[[products.toc]]` sections. Nothing
//! here derives structure from the documents.

use std::fmt::Write as _;

use tracing::debug;

use qhelpkit_shared::{ProductConfig, QhelpkitError, Result, TocSection, TocSkeleton};

use crate::descriptor::escape;

/// Resolve a product's skeleton: the `toc_file` fragment if set, else its inline sections.
pub fn load_skeleton(product: &ProductConfig) -> Result<TocSkeleton> {
    match &product.toc_file {
        Some(file) => {
            let path = product.resolve(file);
            let fragment =
                std::fs::read_to_string(&path).map_err(|e| QhelpkitError::io(&path, e))?;
            debug!(path = %path.display(), bytes = fragment.len(), "loaded TOC fragment");
            Ok(TocSkeleton::Fragment(fragment))
        }
        None => Ok(TocSkeleton::Sections(product.toc.clone())),
    }
}

/// Render the skeleton as the body of a `<toc>` element.
///
/// Fragments are emitted verbatim (trailing whitespace trimmed); sections are
/// written as nested `<section title ref>` elements starting at `indent` spaces.
pub fn render_toc(skeleton: &TocSkeleton, indent: usize) -> String {
    match skeleton {
        TocSkeleton::Fragment(markup) => {
            let trimmed = markup.trim_end();
            if trimmed.is_empty() {
                String::new()
            } else {
                format!("{trimmed}\n")
            }
        }
        TocSkeleton::Sections(sections) => {
            let mut out = String::new();
            for section in sections {
                write_section(&mut out, section, indent);
            }
            out
        }
    }
}

fn write_section(out: &mut String, section: &TocSection, indent: usize) {
    let pad = " ".repeat(indent);
    let title = escape(&section.title);
    let reference = escape(&section.reference);

    if section.sections.is_empty() {
        let _ = writeln!(out, r#"{pad}<section title="{title}" ref="{reference}"/>"#);
        return;
    }

    let _ = writeln!(out, r#"{pad}<section title="{title}" ref="{reference}">"#);
    for child in &section.sections {
        write_section(out, child, indent + 4);
    }
    let _ = writeln!(out, "{pad}</section>");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
