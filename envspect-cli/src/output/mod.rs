//! Output formatting for CLI.

mod text;

pub use text::render_summary;
