//! Loading an [`IndexSource`] from disk and running its extractor.

use std::path::Path;

use tracing::{debug, instrument, warn};

use qhelpkit_shared::{IndexSource, QhelpkitError, Result};

use crate::formats::{self, Extraction};

/// Read the source document under `doc_root`, extract it, and apply its
/// exclusion rule.
///
/// Only failing to read the document is an error; bad records are skipped.
/// Legacy pages are not always UTF-8, so invalid bytes are replaced.
#[instrument(skip_all, fields(path = %source.path.display(), format = %source.format))]
pub fn load_source(source: &IndexSource, doc_root: &Path) -> Result<Extraction> {
    let path = doc_root.join(&source.path);
    let bytes = std::fs::read(&path).map_err(|e| QhelpkitError::io(&path, e))?;
    let document = String::from_utf8_lossy(&bytes);

    let extractor = formats::extractor_for(source.format);
    let mut extraction = extractor.extract(&document);
    extraction.exclude(&source.exclude_refs);

    if extraction.truncated {
        warn!(path = %path.display(), "index truncated mid-record");
    }

    debug!(
        extractor = extractor.name(),
        records = extraction.records.len(),
        skipped = extraction.skipped,
        excluded = extraction.excluded,
        "source extracted"
    );

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use qhelpkit_shared::IndexFormat;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from("../../../fixtures/index")
    }

    #[test]
    fn loads_hhk_fixture_with_exclusion() {
        let source = IndexSource {
            format: IndexFormat::PairedLineList,
            path: PathBuf::from("index.hhk"),
            exclude_refs: vec!["maxima_7.html#IDX227".into()],
        };

        let out = load_source(&source, &fixtures_dir()).expect("load fixture");
        assert_eq!(out.excluded, 1);
        assert!(!out.truncated);
        let names: Vec<_> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["!", "abs", "diff (Function)", "%e"]);
    }

    #[test]
    fn loads_genindex_fixture() {
        let source = IndexSource {
            format: IndexFormat::AnchorScan,
            path: PathBuf::from("genindex.html"),
            exclude_refs: Vec::new(),
        };

        let out = load_source(&source, &fixtures_dir()).expect("load fixture");
        // jump-box letter plus three entries; the empty anchor yields nothing
        assert_eq!(out.records.len(), 4);
        assert_eq!(out.records[0].reference, "#A");
        assert_eq!(
            out.records[1].reference,
            "reference/generated/numpy.absolute.html#numpy.absolute"
        );
    }

    #[test]
    fn missing_document_is_fatal() {
        let source = IndexSource {
            format: IndexFormat::AnchorScan,
            path: PathBuf::from("does-not-exist.html"),
            exclude_refs: Vec::new(),
        };

        let err = load_source(&source, &fixtures_dir()).unwrap_err();
        assert!(matches!(err, QhelpkitError::Io { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = std::env::temp_dir().join(format!("qhk-source-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("latin1.html"), b"<a href=\"x.html\">caf\xe9</a>").unwrap();

        let source = IndexSource {
            format: IndexFormat::AnchorScan,
            path: PathBuf::from("latin1.html"),
            exclude_refs: Vec::new(),
        };
        let out = load_source(&source, &dir).expect("load");
        assert_eq!(out.records.len(), 1);
        assert!(out.records[0].name.starts_with("caf"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
