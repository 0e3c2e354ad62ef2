pub mod diff;
pub mod render;
pub mod runs;
pub mod vulgaligner;

pub use diff::{check_conservation, diff_runs};
pub use render::{column_texts, render_matrix};
pub use runs::resolve_runs;
pub use vulgaligner::build_alignment_matrix;
