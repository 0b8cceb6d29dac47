pub mod header;
pub mod popups;
pub mod table;

pub use header::render_header;
pub use popups::{centered_rect, render_error_popup, render_help_popup, truncate_string};
pub use table::render_table;
