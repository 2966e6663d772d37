//! Paired-line-list extractor (HTML Help `.hhk` keyword files).
//!
//! Each record is three lines of fixed boilerplate:
//!
//! ```text
//! <LI> <OBJECT type="text/sitemap">
//!      <param name="Local" value="maxima_6.html#IDX1">
//!      <param name="Name" value="abs">
//! ```

use tracing::{debug, warn};

use super::{Extraction, IndexExtractor};

const MARKER: &str = "<li>";
const VALUE_ATTR: &str = "value=\"";

/// Reads `<li>`-led line triples: marker, reference line, name line.
pub struct PairedLineListExtractor;

impl IndexExtractor for PairedLineListExtractor {
    fn extract(&self, document: &str) -> Extraction {
        let mut out = Extraction::default();
        let mut lines = document.lines().enumerate();

        while let Some((lineno, line)) = lines.next() {
            if !is_marker(line) {
                continue;
            }

            let (Some((_, ref_line)), Some((_, name_line))) = (lines.next(), lines.next()) else {
                warn!(line = lineno + 1, "index ends mid-record, stopping");
                out.truncated = true;
                break;
            };

            match (quoted_value(ref_line), quoted_value(name_line)) {
                (Some(reference), Some(name)) if !reference.is_empty() => {
                    out.push(name, reference);
                }
                _ => {
                    debug!(line = lineno + 1, "record without quoted ref/name, skipped");
                    out.skipped += 1;
                }
            }
        }

        out
    }

    fn name(&self) -> &'static str {
        "paired-line-list"
    }
}

fn is_marker(line: &str) -> bool {
    line.trim_start()
        .get(..MARKER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MARKER))
}

/// The quoted field of a boilerplate line: from `value="` (or the first quote)
/// to the last quote on the line.
fn quoted_value(line: &str) -> Option<&str> {
    let start = match line.find(VALUE_ATTR) {
        Some(i) => i + VALUE_ATTR.len(),
        None => line.find('"')? + 1,
    };
    let end = line.rfind('"')?;
    (end >= start).then(|| &line[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhelpkit_shared::RawKeyword;

    fn hhk_record(reference: &str, name: &str) -> String {
        format!(
            "<LI> <OBJECT type=\"text/sitemap\">\n\
             \t<param name=\"Local\" value=\"{reference}\">\n\
             \t<param name=\"Name\" value=\"{name}\">\n\
             \t</OBJECT>\n"
        )
    }

    #[test]
    fn reads_records_in_document_order() {
        let doc = format!(
            "<HTML>\n<BODY>\n<UL>\n{}{}{}</UL>\n</BODY>\n",
            hhk_record("maxima_6.html#IDX1", "abs"),
            hhk_record("maxima_6.html#IDX2", "acos"),
            hhk_record("maxima_9.html#IDX40", "diff (Function)"),
        );

        let out = PairedLineListExtractor.extract(&doc);
        assert_eq!(
            out.records,
            vec![
                RawKeyword::new("abs", "maxima_6.html#IDX1"),
                RawKeyword::new("acos", "maxima_6.html#IDX2"),
                RawKeyword::new("diff (Function)", "maxima_9.html#IDX40"),
            ]
        );
        assert!(!out.truncated);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn truncated_record_is_dropped() {
        let doc = "<li>\nhref=\"a.html\"\n\"Alpha\"\n<li>\nhref=\"b.html\"\n\"Beta\"\n<li>\n";
        let out = PairedLineListExtractor.extract(doc);
        assert_eq!(out.records.len(), 2);
        assert!(out.truncated);
    }

    #[test]
    fn truncated_after_reference_line() {
        let doc = "<li>\nhref=\"a.html\"\n\"Alpha\"\n<li>\nhref=\"b.html\"";
        let out = PairedLineListExtractor.extract(doc);
        assert_eq!(out.records, vec![RawKeyword::new("Alpha", "a.html")]);
        assert!(out.truncated);
    }

    #[test]
    fn plain_quoted_lines() {
        let doc = "<li>\n  href=\"a.html\"\n  \"Alpha (intro)\"\n<li>\n  href=\"b.html\"\n  \"Beta\"\n";
        let out = PairedLineListExtractor.extract(doc);
        assert_eq!(
            out.records,
            vec![
                RawKeyword::new("Alpha (intro)", "a.html"),
                RawKeyword::new("Beta", "b.html"),
            ]
        );
    }

    #[test]
    fn name_may_contain_quotes() {
        let doc = hhk_record("maxima_5.html#IDX9", "\"");
        let out = PairedLineListExtractor.extract(&doc);
        assert_eq!(out.records, vec![RawKeyword::new("\"", "maxima_5.html#IDX9")]);
    }

    #[test]
    fn record_without_quotes_is_skipped() {
        let doc = "<li>\nno quotes here\n\"Alpha\"\n<li>\nhref=\"b.html\"\n\"Beta\"\n";
        let out = PairedLineListExtractor.extract(doc);
        assert_eq!(out.records, vec![RawKeyword::new("Beta", "b.html")]);
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn marker_match_is_case_insensitive_and_indented() {
        assert!(is_marker("<li>"));
        assert!(is_marker("   <LI> <OBJECT type=\"text/sitemap\">"));
        assert!(!is_marker("<link rel=\"stylesheet\">"));
        assert!(!is_marker("<l"));
    }
}
