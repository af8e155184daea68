//! Common re-exports for convenient importing.
//!
//! # Example
//!
//! ```rust,ignore
//! use hunkview::prelude::*;
//! ```

pub use crate::core::{
    DiffOptions, DiffReport, DiffSource, FileHunk, HunkLocation, RelPath, RepoError, RepoRoot,
};
