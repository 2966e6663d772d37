//! Descriptor set assembler.
//!
//! Writes the rendered project and collection descriptors into the product's
//! doc root, then records what was produced in `qhelpkit-report.json`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use qhelpkit_shared::{IndexFormat, OutputNames, QhelpkitError, Result, RunId};

use crate::compiler::CompileOutcome;
use crate::descriptor::RenderedDescriptors;

/// File name of the build report written next to the descriptors.
pub const REPORT_FILE_NAME: &str = "qhelpkit-report.json";

/// Metadata for a single written descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Per-source extraction counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub path: PathBuf,
    pub format: IndexFormat,
    /// Records kept after the exclusion rule.
    pub extracted: usize,
    /// Malformed records skipped.
    pub skipped: usize,
    /// Records removed by `exclude_refs`.
    pub excluded: usize,
    /// Extraction stopped at an incomplete trailing record.
    pub truncated: bool,
}

/// The `qhelpkit-report.json` structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    pub run_id: RunId,
    pub product: String,
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    /// Keywords written to the project descriptor.
    pub keyword_count: usize,
    /// Records dropped because their name normalized to nothing.
    pub dropped_empty: usize,
    pub sources: Vec<SourceReport>,
    pub artifacts: Vec<ArtifactMeta>,
    pub compiler: CompileOutcome,
}

/// Write both descriptors into `doc_root` and return their checksums.
///
/// Each file is written to a temp name first and renamed into place, so a
/// crash never leaves a half-written descriptor behind.
#[instrument(skip_all, fields(doc_root = %doc_root.display()))]
pub fn write_descriptors(
    doc_root: &Path,
    names: &OutputNames,
    rendered: &RenderedDescriptors,
) -> Result<Vec<ArtifactMeta>> {
    std::fs::create_dir_all(doc_root).map_err(|e| QhelpkitError::io(doc_root, e))?;

    let files = [
        (names.project.as_str(), rendered.project.as_str()),
        (names.collection.as_str(), rendered.collection.as_str()),
    ];

    let mut metas = Vec::with_capacity(files.len());
    for (filename, content) in files {
        metas.push(write_atomic(doc_root, filename, content)?);
    }

    info!(count = metas.len(), "descriptors written");
    Ok(metas)
}

/// Write the build report into `doc_root`.
pub fn write_report(doc_root: &Path, report: &BuildReport) -> Result<PathBuf> {
    let path = doc_root.join(REPORT_FILE_NAME);
    write_json(&path, report)?;
    Ok(path)
}

/// Read a previously written build report.
pub fn load_report(doc_root: &Path) -> Result<BuildReport> {
    let path = doc_root.join(REPORT_FILE_NAME);
    let content = std::fs::read_to_string(&path).map_err(|e| QhelpkitError::io(&path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| QhelpkitError::validation(format!("invalid {REPORT_FILE_NAME}: {e}")))
}

/// Record a new compiler outcome in an existing report.
pub fn update_report_compiler(doc_root: &Path, outcome: CompileOutcome) -> Result<BuildReport> {
    let mut report = load_report(doc_root)?;
    report.compiler = outcome;
    write_report(doc_root, &report)?;
    debug!("report updated with compiler outcome");
    Ok(report)
}

/// Check that the descriptor files named in `names` exist in `doc_root`.
pub fn validate_descriptors(doc_root: &Path, names: &OutputNames) -> Result<()> {
    for filename in [&names.project, &names.collection] {
        if !doc_root.join(filename).is_file() {
            return Err(QhelpkitError::validation(format!(
                "missing {filename} in {}; run `qhelpkit build` first",
                doc_root.display()
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<ArtifactMeta> {
    let target = dir.join(filename);
    let parent = target.parent().unwrap_or(dir);
    let base = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| QhelpkitError::validation(format!("invalid output file name '{filename}'")))?;
    let temp = parent.join(format!(".{base}.tmp"));

    std::fs::create_dir_all(parent).map_err(|e| QhelpkitError::io(parent, e))?;
    std::fs::write(&temp, content).map_err(|e| QhelpkitError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| QhelpkitError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    debug!(file = %filename, size = content.len(), "wrote descriptor");

    Ok(ArtifactMeta {
        filename: filename.to_string(),
        sha256: hash,
        size_bytes: content.len(),
    })
}

/// Write a JSON file (pretty-printed).
fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| QhelpkitError::Serialization(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| QhelpkitError::io(path, e))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use qhelpkit_shared::CURRENT_SCHEMA_VERSION;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "qhk-assembler-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn rendered() -> RenderedDescriptors {
        RenderedDescriptors {
            project: "<QtHelpProject/>\n".into(),
            collection: "<QHelpCollectionProject/>\n".into(),
        }
    }

    fn report(artifacts: Vec<ArtifactMeta>) -> BuildReport {
        BuildReport {
            schema_version: CURRENT_SCHEMA_VERSION,
            run_id: RunId::new(),
            product: "maxima".into(),
            tool_version: "0.1.0-test".into(),
            generated_at: Utc::now(),
            keyword_count: 2,
            dropped_empty: 0,
            sources: vec![SourceReport {
                path: "index.hhk".into(),
                format: IndexFormat::PairedLineList,
                extracted: 2,
                skipped: 0,
                excluded: 0,
                truncated: false,
            }],
            artifacts,
            compiler: CompileOutcome::Skipped,
        }
    }

    #[test]
    fn writes_both_descriptors_with_checksums() {
        let tmp = temp_dir();
        let names = OutputNames::default();

        let metas = write_descriptors(&tmp, &names, &rendered()).expect("write");
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].filename, "help.qhp");
        assert_eq!(metas[0].size_bytes, "<QtHelpProject/>\n".len());
        assert_eq!(metas[0].sha256.len(), 64);
        assert!(tmp.join("help.qhp").is_file());
        assert!(tmp.join("help.qhcp").is_file());
        assert!(!tmp.join(".help.qhp.tmp").exists());

        validate_descriptors(&tmp, &names).expect("valid");
        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn writes_descriptors_into_output_subdirectory() {
        let tmp = temp_dir();
        let names = OutputNames {
            project: "out/help.qhp".into(),
            ..OutputNames::default()
        };

        let metas = write_descriptors(&tmp, &names, &rendered()).expect("write");
        assert_eq!(metas[0].filename, "out/help.qhp");
        assert!(tmp.join("out/help.qhp").is_file());
        assert!(!tmp.join("out/.help.qhp.tmp").exists());
        assert!(!tmp.join(".out").exists());

        validate_descriptors(&tmp, &names).expect("valid");
        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn validate_reports_missing_descriptor() {
        let tmp = temp_dir();
        let err = validate_descriptors(&tmp, &OutputNames::default()).unwrap_err();
        assert!(err.to_string().contains("help.qhp"));
        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn report_roundtrip_and_compiler_update() {
        let tmp = temp_dir();
        let metas = write_descriptors(&tmp, &OutputNames::default(), &rendered()).expect("write");
        write_report(&tmp, &report(metas)).expect("report");

        let loaded = load_report(&tmp).expect("load");
        assert_eq!(loaded.product, "maxima");
        assert_eq!(loaded.compiler, CompileOutcome::Skipped);

        let updated = update_report_compiler(&tmp, CompileOutcome::Succeeded).expect("update");
        assert_eq!(updated.run_id, loaded.run_id);
        assert_eq!(load_report(&tmp).unwrap().compiler, CompileOutcome::Succeeded);

        std::fs::remove_dir_all(&tmp).ok();
    }
}
