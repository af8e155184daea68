//! Core primitives for hunkview (no rendering dependencies).

mod diff;
mod editor;
mod hunk;
mod repo;
mod timefmt;
mod watcher;

pub use diff::*;
pub use editor::*;
pub use hunk::*;
pub use repo::*;
pub use timefmt::*;
pub use watcher::*;
