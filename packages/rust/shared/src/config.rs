//! Application configuration for qhelpkit.
//!
//! The project config lives at `./qhelpkit.toml` unless `--config` points
//! elsewhere. It holds one `[[products]]` profile per documentation set.
//! Relative `doc_root` values are resolved against the config file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QhelpkitError, Result};
use crate::types::{
    HelpProjectDescriptor, IndexFormat, IndexSource, KeywordEntry, TocSection, TocSkeleton,
};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "qhelpkit.toml";

// ---------------------------------------------------------------------------
// Config structs (matching qhelpkit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// External help compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Names of the generated descriptor files.
    #[serde(default)]
    pub output: OutputNames,

    /// Documentation product profiles.
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// `[compiler]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Program invoked with the collection descriptor.
    #[serde(default = "default_compiler_program")]
    pub program: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_compiler_program(),
        }
    }
}

fn default_compiler_program() -> String {
    "qhelpgenerator".into()
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputNames {
    /// Help project descriptor file name.
    #[serde(default = "default_project")]
    pub project: String,

    /// Collection descriptor file name.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Compiled collection produced by the external compiler.
    #[serde(default = "default_collection_output")]
    pub collection_output: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            project: default_project(),
            collection: default_collection(),
            collection_output: default_collection_output(),
        }
    }
}

impl OutputNames {
    /// Compiled archive name, derived from the project file stem (`help.qhp` → `help.qch`).
    pub fn archive(&self) -> String {
        let stem = Path::new(&self.project)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("help");
        format!("{stem}.qch")
    }
}

fn default_project() -> String {
    "help.qhp".into()
}
fn default_collection() -> String {
    "help.qhcp".into()
}
fn default_collection_output() -> String {
    "help.qhc".into()
}

/// `[[products]]` entry — one documentation set turned into one help archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Short identifier used on the command line.
    pub name: String,

    /// Directory holding the HTML pages; descriptors are written here.
    pub doc_root: PathBuf,

    /// Qt help namespace (e.g. `org.kde.maxima`).
    pub namespace: String,

    /// Virtual folder name.
    #[serde(default = "default_virtual_folder")]
    pub virtual_folder: String,

    /// Custom filter name.
    pub filter_name: String,

    /// Custom filter attributes.
    #[serde(default)]
    pub filter_attributes: Vec<String>,

    /// File manifest glob patterns, relative to `doc_root`.
    #[serde(default)]
    pub files: Vec<String>,

    /// Stylesheet linked into every top-level page before compiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,

    /// Markup fragment file holding the TOC skeleton (wins over inline `toc`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc_file: Option<PathBuf>,

    /// Index documents, extracted in this order.
    #[serde(default)]
    pub sources: Vec<IndexSource>,

    /// Inline TOC skeleton.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocSection>,
}

fn default_virtual_folder() -> String {
    "doc".into()
}

impl ProductConfig {
    /// Absolute (or config-relative) path of a file under this product's doc root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.doc_root.join(relative)
    }

    /// Reject profiles the help compiler cannot accept.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(QhelpkitError::validation("product name must not be empty"));
        }
        if self.namespace.trim().is_empty() {
            return Err(QhelpkitError::validation(format!(
                "product '{}': namespace must not be empty",
                self.name
            )));
        }
        if self.filter_name.trim().is_empty() {
            return Err(QhelpkitError::validation(format!(
                "product '{}': filter_name must not be empty",
                self.name
            )));
        }
        Ok(())
    }

    /// Assemble the descriptor for this product from a keyword list and skeleton.
    pub fn descriptor(&self, keywords: Vec<KeywordEntry>, toc: TocSkeleton) -> HelpProjectDescriptor {
        HelpProjectDescriptor {
            namespace: self.namespace.clone(),
            virtual_folder: self.virtual_folder.clone(),
            filter_name: self.filter_name.clone(),
            filter_attributes: self.filter_attributes.clone(),
            toc,
            keywords,
            files: self.files.clone(),
        }
    }
}

impl AppConfig {
    /// Look up a product profile by name.
    pub fn product(&self, name: &str) -> Result<&ProductConfig> {
        self.products.iter().find(|p| p.name == name).ok_or_else(|| {
            let known: Vec<_> = self.products.iter().map(|p| p.name.as_str()).collect();
            QhelpkitError::config(format!(
                "unknown product '{name}' (configured: {})",
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            ))
        })
    }

    /// Resolve relative `doc_root` paths against `base` (the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        for product in &mut self.products {
            if product.doc_root.is_relative() {
                product.doc_root = base.join(&product.doc_root);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config from a specific file path.
///
/// Relative product roots are resolved against the file's directory and every
/// profile is validated.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QhelpkitError::io(path, e))?;

    let mut config: AppConfig = toml::from_str(&content).map_err(|e| {
        QhelpkitError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);

    for product in &config.products {
        product.validate()?;
    }

    tracing::debug!(?path, products = config.products.len(), "config loaded");
    Ok(config)
}

/// Write a sample config file to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(QhelpkitError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| QhelpkitError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&sample_config())
        .map_err(|e| QhelpkitError::Serialization(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| QhelpkitError::io(path, e))?;
    tracing::info!(?path, "created sample config file");

    Ok(path.to_path_buf())
}

/// A config with one example product profile.
pub fn sample_config() -> AppConfig {
    AppConfig {
        compiler: CompilerConfig::default(),
        output: OutputNames::default(),
        products: vec![ProductConfig {
            name: "maxima".into(),
            doc_root: PathBuf::from("docs/maxima"),
            namespace: "org.kde.maxima".into(),
            virtual_folder: default_virtual_folder(),
            filter_name: "Maxima".into(),
            filter_attributes: vec!["Maxima Documentation".into(), "5.42".into()],
            files: vec![
                "*.html".into(),
                "figures/*.gif".into(),
                "figures/*.png".into(),
                "main.css".into(),
            ],
            stylesheet: Some("main.css".into()),
            toc_file: None,
            sources: vec![IndexSource {
                format: IndexFormat::PairedLineList,
                path: PathBuf::from("index.hhk"),
                exclude_refs: vec!["maxima_7.html#IDX227".into()],
            }],
            toc: vec![TocSection {
                title: "Maxima 5.42 Documentation".into(),
                reference: "maxima.html".into(),
                sections: vec![TocSection {
                    title: "Introduction to Maxima".into(),
                    reference: "maxima_1.html".into(),
                    sections: Vec::new(),
                }],
            }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("qhelpgenerator"));
        assert!(toml_str.contains("help.qhp"));
    }

    #[test]
    fn sample_config_roundtrip() {
        let toml_str = toml::to_string_pretty(&sample_config()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.products.len(), 1);
        let maxima = &parsed.products[0];
        assert_eq!(maxima.namespace, "org.kde.maxima");
        assert_eq!(maxima.sources[0].exclude_refs, vec!["maxima_7.html#IDX227"]);
        assert_eq!(maxima.toc[0].sections.len(), 1);
    }

    #[test]
    fn product_defaults_apply() {
        let toml_str = r#"
[[products]]
name = "numpy"
doc_root = "docs/numpy"
namespace = "org.kde.numpy.1.19"
filter_name = "NumPy"

[[products.sources]]
format = "anchor-scan"
path = "genindex.html"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        let numpy = config.product("numpy").expect("product");
        assert_eq!(numpy.virtual_folder, "doc");
        assert!(numpy.files.is_empty());
        assert!(numpy.stylesheet.is_none());
        assert_eq!(numpy.sources[0].format, IndexFormat::AnchorScan);
        assert_eq!(config.compiler.program, "qhelpgenerator");
        assert_eq!(config.output.collection, "help.qhcp");
    }

    #[test]
    fn unknown_product_lists_known_names() {
        let config = sample_config();
        let err = config.product("octave").unwrap_err();
        assert!(err.to_string().contains("maxima"));
    }

    #[test]
    fn archive_name_derives_from_project() {
        let names = OutputNames {
            project: "maxima.qhp".into(),
            ..OutputNames::default()
        };
        assert_eq!(names.archive(), "maxima.qch");
        assert_eq!(OutputNames::default().archive(), "help.qch");
    }

    #[test]
    fn relative_doc_roots_resolve_against_base() {
        let mut config = sample_config();
        config.resolve_paths(Path::new("/srv/help"));
        assert_eq!(config.products[0].doc_root, PathBuf::from("/srv/help/docs/maxima"));
        assert_eq!(
            config.products[0].resolve(Path::new("index.hhk")),
            PathBuf::from("/srv/help/docs/maxima/index.hhk")
        );
    }

    #[test]
    fn validation_rejects_empty_namespace() {
        let mut config = sample_config();
        config.products[0].namespace = "  ".into();
        let err = config.products[0].validate().unwrap_err();
        assert!(err.to_string().contains("namespace"));
    }
}
