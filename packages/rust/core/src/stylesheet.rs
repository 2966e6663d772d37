//! Stylesheet injection into documentation pages.
//!
//! Links a product stylesheet into the `<head>` of every top-level HTML page
//! so the help viewer renders them consistently. Running it twice is a no-op.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::{debug, instrument, warn};

use qhelpkit_shared::{QhelpkitError, Result};

use crate::descriptor::escape;

static HEAD_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"</head\s*>")
        .case_insensitive(true)
        .build()
        .expect("valid regex")
});

static HEAD_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"<head(\s[^>]*)?>")
        .case_insensitive(true)
        .build()
        .expect("valid regex")
});

/// Counts from one injection pass over a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectStats {
    /// HTML pages examined.
    pub scanned: usize,
    /// Pages rewritten with the new link.
    pub updated: usize,
}

/// The `<link>` element for `href`.
pub fn link_tag(href: &str) -> String {
    format!(
        r#"<link rel="stylesheet" type="text/css" href="{}">"#,
        escape(href)
    )
}

/// Insert a stylesheet link into `html`.
///
/// Placed before `</head>`, else right after `<head…>`, else at the very
/// start. Returns `None` when the page already links `href`.
pub fn inject_stylesheet(html: &str, href: &str) -> Option<String> {
    if already_linked(html, href) {
        return None;
    }

    let tag = link_tag(href);
    let at = HEAD_CLOSE_RE
        .find(html)
        .map(|m| m.start())
        .or_else(|| HEAD_OPEN_RE.find(html).map(|m| m.end()))
        .unwrap_or(0);

    let mut out = String::with_capacity(html.len() + tag.len() + 1);
    out.push_str(&html[..at]);
    out.push_str(&tag);
    if at == 0 {
        out.push('\n');
    }
    out.push_str(&html[at..]);
    Some(out)
}

fn already_linked(html: &str, href: &str) -> bool {
    let escaped = escape(href);
    let pattern = format!(
        r#"<link[^>]*href\s*=\s*["']?({}|{})["'\s>]"#,
        regex::escape(href),
        regex::escape(&escaped)
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(html))
        .unwrap_or(false)
}

/// Inject the stylesheet into every `*.html` file directly under `doc_root`.
///
/// Pages that are not valid UTF-8 are left untouched.
#[instrument(skip_all, fields(doc_root = %doc_root.display(), href = %href))]
pub fn inject_dir(doc_root: &Path, href: &str) -> Result<InjectStats> {
    let entries = std::fs::read_dir(doc_root).map_err(|e| QhelpkitError::io(doc_root, e))?;

    let mut pages: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
        .collect();
    pages.sort();

    let mut stats = InjectStats::default();
    for page in pages {
        stats.scanned += 1;

        let bytes = std::fs::read(&page).map_err(|e| QhelpkitError::io(&page, e))?;
        let Ok(html) = String::from_utf8(bytes) else {
            warn!(page = %page.display(), "page is not UTF-8, stylesheet not injected");
            continue;
        };

        if let Some(updated) = inject_stylesheet(&html, href) {
            std::fs::write(&page, updated).map_err(|e| QhelpkitError::io(&page, e))?;
            stats.updated += 1;
            debug!(page = %page.display(), "stylesheet linked");
        }
    }

    Ok(stats)
}
