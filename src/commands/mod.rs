pub mod clean;
pub mod completions;
