//! CLI command implementations.

mod info;
mod serve;
mod summarize;

pub use info::run_info;
pub use serve::run_serve;
pub use summarize::run_summarize;
