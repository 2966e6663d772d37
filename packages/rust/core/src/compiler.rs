//! External help compiler invocation.
//!
//! Runs `qhelpgenerator <collection> -o <collection_output>` in the product's
//! doc root. A failed or missing compiler is reported, never raised: the
//! descriptor files stay on disk and the compile can simply be re-run.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use qhelpkit_shared::{CompilerConfig, OutputNames};

/// How the compiler step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompileOutcome {
    /// Compilation was not requested.
    Skipped,
    /// The compiler exited successfully.
    Succeeded,
    /// The compiler ran but exited non-zero (or was killed by a signal).
    Failed {
        code: Option<i32>,
        stderr: String,
    },
    /// The compiler program could not be started.
    NotFound { program: String },
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompileOutcome::Succeeded)
    }
}

/// Compile the collection in `doc_root`. Blocks until the compiler exits.
#[instrument(skip_all, fields(program = %config.program, doc_root = %doc_root.display()))]
pub fn compile(config: &CompilerConfig, doc_root: &Path, names: &OutputNames) -> CompileOutcome {
    let output = Command::new(&config.program)
        .arg(&names.collection)
        .arg("-o")
        .arg(&names.collection_output)
        .current_dir(doc_root)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            info!(output = %names.collection_output, "help collection compiled");
            CompileOutcome::Succeeded
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                code = ?output.status.code(),
                stderr = %stderr,
                "help compiler failed; descriptors left in place"
            );
            CompileOutcome::Failed {
                code: output.status.code(),
                stderr,
            }
        }
        Err(e) => {
            warn!(error = %e, "could not run help compiler; descriptors left in place");
            CompileOutcome::NotFound {
                program: config.program.clone(),
            }
        }
    }
}
