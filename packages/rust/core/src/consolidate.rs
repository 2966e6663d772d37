//! Keyword consolidation.
//!
//! Merges extractor output from several sources into the single keyword list
//! of a help project. Order is preserved within and across sources; there is
//! no deduplication (the viewer tolerates repeated name/ref pairs).

use tracing::debug;

use qhelpkit_extract::normalize;
use qhelpkit_shared::{KeywordEntry, RawKeyword};

/// The merged keyword list of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidated {
    /// Normalized entries in source order.
    pub entries: Vec<KeywordEntry>,
    /// Records whose name normalized to the empty string.
    pub dropped_empty: usize,
}

/// Normalize and concatenate raw records from `sources`, in the order supplied.
pub fn consolidate<I>(sources: I) -> Consolidated
where
    I: IntoIterator<Item = Vec<RawKeyword>>,
{
    let mut out = Consolidated::default();

    for records in sources {
        for RawKeyword { name, reference } in records {
            let name = normalize(&name);
            if name.is_empty() {
                out.dropped_empty += 1;
                continue;
            }
            out.entries.push(KeywordEntry { name, reference });
        }
    }

    debug!(
        entries = out.entries.len(),
        dropped_empty = out.dropped_empty,
        "keywords consolidated"
    );

    out
}
