//! Output rendering: plain text and HTML.
//!
//! JSON output needs no renderer; the report types derive `Serialize` and
//! the binary feeds them to serde_json directly.

mod html;
mod text;

pub use html::*;
pub use text::*;
