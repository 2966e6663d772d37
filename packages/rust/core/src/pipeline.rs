//! End-to-end `build` pipeline: styles → extract → consolidate → render → write → compile.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, instrument, warn};

use qhelpkit_extract::load_source;
use qhelpkit_shared::{
    AppConfig, CURRENT_SCHEMA_VERSION, CompilerConfig, IndexSource, OutputNames, ProductConfig,
    Result, RunId,
};

use crate::assembler::{self, BuildReport, SourceReport};
use crate::compiler::{self, CompileOutcome};
use crate::consolidate::{Consolidated, consolidate};
use crate::descriptor;
use crate::stylesheet::{self, InjectStats};
use crate::toc;

/// Switches for one `build` run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Link the product stylesheet into its pages (when the profile names one).
    pub inject_styles: bool,
    /// Run the external help compiler after writing descriptors.
    pub compile: bool,
    /// Tool version recorded in the report.
    pub tool_version: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            inject_styles: true,
            compile: true,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Result of building one product.
#[derive(Debug)]
pub struct BuildResult {
    /// Directory the descriptors were written to.
    pub doc_root: PathBuf,
    /// Path of the written build report.
    pub report_path: PathBuf,
    /// The report contents.
    pub report: BuildReport,
    /// Stylesheet injection counts, when injection ran.
    pub styles: Option<InjectStats>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each index source is extracted.
    fn source_extracted(&self, path: &Path, records: usize, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_extracted(&self, _path: &Path, _records: usize, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Extract and consolidate `sources` (paths relative to `doc_root`), in order.
///
/// Fails only when a source document cannot be read.
pub fn collect_keywords(
    sources: &[IndexSource],
    doc_root: &Path,
    progress: &dyn ProgressReporter,
) -> Result<(Consolidated, Vec<SourceReport>)> {
    let mut batches = Vec::with_capacity(sources.len());
    let mut reports = Vec::with_capacity(sources.len());

    for (i, source) in sources.iter().enumerate() {
        let extraction = load_source(source, doc_root)?;
        progress.source_extracted(&source.path, extraction.records.len(), i + 1, sources.len());

        reports.push(SourceReport {
            path: source.path.clone(),
            format: source.format,
            extracted: extraction.records.len(),
            skipped: extraction.skipped,
            excluded: extraction.excluded,
            truncated: extraction.truncated,
        });
        batches.push(extraction.records);
    }

    Ok((consolidate(batches), reports))
}

/// Run the full `build` pipeline for one product.
///
/// 1. Link the stylesheet into top-level pages (optional)
/// 2. Extract every index source
/// 3. Consolidate keywords
/// 4. Render and write the descriptors
/// 5. Run the help compiler (optional; failures become warnings)
/// 6. Write the build report
#[instrument(skip_all, fields(product = %product.name))]
pub fn build_product(
    config: &AppConfig,
    product: &ProductConfig,
    options: &BuildOptions,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();
    let run_id = RunId::new();
    product.validate()?;

    info!(%run_id, doc_root = %product.doc_root.display(), "starting build");

    // --- Phase 1: Stylesheet ---
    let styles = match (&product.stylesheet, options.inject_styles) {
        (Some(href), true) => {
            progress.phase("Linking stylesheet");
            let stats = stylesheet::inject_dir(&product.doc_root, href)?;
            info!(scanned = stats.scanned, updated = stats.updated, "stylesheet pass complete");
            Some(stats)
        }
        _ => None,
    };

    // --- Phase 2: Extraction + consolidation ---
    progress.phase("Extracting keywords");
    let (consolidated, sources) = collect_keywords(&product.sources, &product.doc_root, progress)?;
    if consolidated.entries.is_empty() {
        warn!("no keywords extracted; the help index will be empty");
    }

    // --- Phase 3: Descriptors ---
    progress.phase("Writing descriptors");
    let skeleton = toc::load_skeleton(product)?;
    let keyword_count = consolidated.entries.len();
    let help_project = product.descriptor(consolidated.entries, skeleton);
    let rendered = descriptor::render(&help_project, &config.output);
    let artifacts = assembler::write_descriptors(&product.doc_root, &config.output, &rendered)?;

    // --- Phase 4: Compile ---
    let compiler = if options.compile {
        progress.phase("Compiling help collection");
        compiler::compile(&config.compiler, &product.doc_root, &config.output)
    } else {
        CompileOutcome::Skipped
    };

    // --- Phase 5: Report ---
    let report = BuildReport {
        schema_version: CURRENT_SCHEMA_VERSION,
        run_id,
        product: product.name.clone(),
        tool_version: options.tool_version.clone(),
        generated_at: Utc::now(),
        keyword_count,
        dropped_empty: consolidated.dropped_empty,
        sources,
        artifacts,
        compiler,
    };
    let report_path = assembler::write_report(&product.doc_root, &report)?;

    let result = BuildResult {
        doc_root: product.doc_root.clone(),
        report_path,
        report,
        styles,
        elapsed: start.elapsed(),
    };

    info!(
        keywords = keyword_count,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "build complete"
    );
    progress.done(&result);

    Ok(result)
}

/// Re-run the compiler over descriptors written by an earlier build.
#[instrument(skip_all, fields(product = %product.name))]
pub fn recompile(
    compiler: &CompilerConfig,
    names: &OutputNames,
    product: &ProductConfig,
) -> Result<CompileOutcome> {
    assembler::validate_descriptors(&product.doc_root, names)?;
    let outcome = compiler::compile(compiler, &product.doc_root, names);

    if product.doc_root.join(assembler::REPORT_FILE_NAME).is_file() {
        assembler::update_report_compiler(&product.doc_root, outcome.clone())?;
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
