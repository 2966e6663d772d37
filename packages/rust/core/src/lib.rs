//! Core pipeline orchestration and domain logic for qhelpkit.
//!
//! This crate ties together keyword extraction, consolidation, descriptor
//! rendering, and the help compiler into the end-to-end `build` workflow.

pub mod assembler;
pub mod compiler;
pub mod consolidate;
pub mod descriptor;
pub mod pipeline;
pub mod stylesheet;
pub mod toc;
