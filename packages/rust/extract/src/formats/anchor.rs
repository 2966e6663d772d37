//! Anchor-scan extractor (Sphinx-style `genindex.html`).

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use super::{Extraction, IndexExtractor};

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// Every anchor in the document is one index entry: its text and `href`.
pub struct AnchorScanExtractor;

impl IndexExtractor for AnchorScanExtractor {
    fn extract(&self, document: &str) -> Extraction {
        let doc = Html::parse_document(document);
        let mut out = Extraction::default();

        for anchor in doc.select(&ANCHOR_SEL) {
            let text: String = anchor.text().collect();
            if text.is_empty() {
                continue;
            }

            match anchor.value().attr("href").filter(|href| !href.is_empty()) {
                Some(href) => out.push(text, href),
                None => {
                    debug!(text = %text, "anchor without href, skipped");
                    out.skipped += 1;
                }
            }
        }

        out
    }

    fn name(&self) -> &'static str {
        "anchor-scan"
    }
}
