//! Table-row-scan extractor.
//!
//! Rows look like `<tr><td>…</td><td><a href="…">name</a></td></tr>`: the
//! entry is the first element nested in the row's second cell.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{Extraction, IndexExtractor};

static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid selector"));

/// Reads one candidate entry per table row, keeping plain-ASCII names only.
pub struct TableRowExtractor;

impl IndexExtractor for TableRowExtractor {
    fn extract(&self, document: &str) -> Extraction {
        let doc = Html::parse_document(document);
        let mut out = Extraction::default();

        for row in doc.select(&ROW_SEL) {
            let Some(entry) = row_entry(row) else {
                continue;
            };
            let Some(href) = entry.value().attr("href").filter(|h| !h.is_empty()) else {
                continue;
            };

            let text: String = entry.text().collect();
            if !is_printable_ascii(&text) {
                debug!(text = %text, "non-ASCII index entry dropped");
                continue;
            }

            out.push(text, href);
        }

        out
    }

    fn name(&self) -> &'static str {
        "table-row-scan"
    }
}

/// First element nested inside the row's second element child.
fn row_entry(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let cell = row.children().filter_map(ElementRef::wrap).nth(1)?;
    cell.descendants().skip(1).find_map(ElementRef::wrap)
}

fn is_printable_ascii(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_graphic() || c.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhelpkit_shared::RawKeyword;

    #[test]
    fn reads_second_cell_link() {
        let html = r#"
<table>
  <tr><td>A</td><td><a href="func_abs.html">abs</a></td></tr>
  <tr><td>B</td><td><a href="func_beta.html#top">beta</a> and more</td></tr>
</table>"#;

        let out = TableRowExtractor.extract(html);
        assert_eq!(
            out.records,
            vec![
                RawKeyword::new("abs", "func_abs.html"),
                RawKeyword::new("beta", "func_beta.html#top"),
            ]
        );
    }

    #[test]
    fn drops_names_outside_ascii() {
        let html = r#"
<table>
  <tr><td></td><td><a href="pi.html">π</a></td></tr>
  <tr><td></td><td><a href="deg.html">degree°</a></td></tr>
  <tr><td></td><td><a href="gamma.html">gamma</a></td></tr>
</table>"#;

        let out = TableRowExtractor.extract(html);
        assert_eq!(out.records, vec![RawKeyword::new("gamma", "gamma.html")]);
    }

    #[test]
    fn rows_without_entry_are_skipped_silently() {
        let html = r#"
<table>
  <tr><th>Name</th></tr>
  <tr><td>x</td><td>plain text</td></tr>
  <tr><td>y</td><td><span>no link</span></td></tr>
  <tr><td>z</td><td><a href="zeta.html">zeta</a></td></tr>
</table>"#;

        let out = TableRowExtractor.extract(html);
        assert_eq!(out.records, vec![RawKeyword::new("zeta", "zeta.html")]);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn printable_ascii_check() {
        assert!(is_printable_ascii("sin(x) + cos(x)"));
        assert!(!is_printable_ascii("naïve"));
        assert!(!is_printable_ascii("bell\u{7}"));
    }
}
