//! Code-in-anchor-scan extractor (texinfo-generated index pages).
//!
//! Index entries are `<code>` spans; the link target belongs to the nearest
//! enclosing `<a>`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{Extraction, IndexExtractor};

static CODE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("code").expect("valid selector"));

/// Emits one record per `<code>` span that sits inside a link.
pub struct CodeInAnchorExtractor;

impl IndexExtractor for CodeInAnchorExtractor {
    fn extract(&self, document: &str) -> Extraction {
        let doc = Html::parse_document(document);
        let mut out = Extraction::default();

        for code in doc.select(&CODE_SEL) {
            let text: String = code.text().collect();

            match enclosing_href(code) {
                Some(href) => out.push(text, href),
                None => {
                    debug!(text = %text, "code span outside a link, skipped");
                    out.skipped += 1;
                }
            }
        }

        out
    }

    fn name(&self) -> &'static str {
        "code-in-anchor-scan"
    }
}

/// `href` of the closest ancestor `<a>`, if it has a non-empty one.
fn enclosing_href<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "a")
        .and_then(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.is_empty())
}
