//! hunkview - a git diff inspector.
//!
//! Runs `git diff`, splits the output into per-file hunks with structured
//! line-offset information, and renders the result as plain text, JSON, or
//! annotated HTML.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hunkview::prelude::*;
//!
//! let repo = RepoRoot::discover(std::path::Path::new("."))?;
//! let report = hunkview::core::diff_report(&repo, &DiffOptions::default())?;
//! ```

#![deny(missing_docs)]

pub mod core;
pub mod highlight;
pub mod metrics;
pub mod prelude;
pub mod render;
