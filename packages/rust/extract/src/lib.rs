//! Keyword extraction from legacy documentation indexes.
//!
//! This crate provides:
//! - [`normalize`] — display-name cleanup applied to every extracted keyword
//! - [`formats`] — the four index extractors behind [`IndexExtractor`]
//! - [`load_source`] — read an [`IndexSource`](qhelpkit_shared::IndexSource) and extract it

pub mod formats;
mod normalize;
mod source;

pub use formats::{
    AnchorScanExtractor, CodeInAnchorExtractor, Extraction, IndexExtractor,
    PairedLineListExtractor, TableRowExtractor, extract,
};
pub use normalize::normalize;
pub use source::load_source;
