//! Format-specific index extractors.
//!
//! Each legacy index representation has one extractor. The set is closed:
//! callers pick a format explicitly via [`IndexFormat`] and [`extract`]
//! dispatches with a plain `match`, there is no detection step.

mod anchor;
mod code_in_anchor;
mod paired_line;
mod table_row;

use qhelpkit_shared::{IndexFormat, RawKeyword};

pub use anchor::AnchorScanExtractor;
pub use code_in_anchor::CodeInAnchorExtractor;
pub use paired_line::PairedLineListExtractor;
pub use table_row::TableRowExtractor;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Records pulled out of one index document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Raw records in document order.
    pub records: Vec<RawKeyword>,
    /// Records that could not be parsed and were skipped.
    pub skipped: usize,
    /// Records dropped by the source's exclusion rule.
    pub excluded: usize,
    /// The document ended in the middle of a record.
    pub truncated: bool,
}

impl Extraction {
    fn push(&mut self, name: impl Into<String>, reference: impl Into<String>) {
        self.records.push(RawKeyword::new(name, reference));
    }

    /// Drop records whose reference is listed in `exclude_refs`.
    pub fn exclude(&mut self, exclude_refs: &[String]) {
        if exclude_refs.is_empty() {
            return;
        }
        let before = self.records.len();
        self.records
            .retain(|record| !exclude_refs.iter().any(|r| *r == record.reference));
        self.excluded += before - self.records.len();
    }
}

/// Capability shared by every index extractor.
pub trait IndexExtractor {
    /// Scan `document` and return its records in first-seen order.
    ///
    /// Never fails: unparseable records are skipped and counted.
    fn extract(&self, document: &str) -> Extraction;

    /// Human-readable extractor name for tracing.
    fn name(&self) -> &'static str;
}

/// The extractor that handles `format`.
pub fn extractor_for(format: IndexFormat) -> &'static dyn IndexExtractor {
    match format {
        IndexFormat::PairedLineList => &PairedLineListExtractor,
        IndexFormat::AnchorScan => &AnchorScanExtractor,
        IndexFormat::CodeInAnchorScan => &CodeInAnchorExtractor,
        IndexFormat::TableRowScan => &TableRowExtractor,
    }
}

/// Run the extractor for `format` over `document`.
pub fn extract(format: IndexFormat, document: &str) -> Extraction {
    extractor_for(format).extract(document)
}
