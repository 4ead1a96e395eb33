//! Subcommand implementations.

pub mod completions;
pub mod delete;
pub mod list;

pub use completions::generate_completions;
pub use delete::run_delete;
pub use list::run_list;
