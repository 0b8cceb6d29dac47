//! Icons and emoji constants used throughout the UI.

// Spinner animation frames (braille characters)
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// Merge status
pub const MERGED: &str = "✓";
pub const NOT_MERGED: &str = "·";
pub const MERGED_DISPLAY: &str = "✓ Merged PR";
pub const NOT_MERGED_DISPLAY: &str = "· None";

// Selection/Navigation indicators
pub const SELECTOR: &str = "▶ ";

// List/UI elements
pub const SEPARATOR_CHAR: &str = "─";
