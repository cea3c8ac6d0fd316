//! Assembly of generation requests.
//!
//! The [`PromptBuilder`] is a pure function of the selected model, the user's
//! text and the retrieved passages; it performs no I/O.

mod builder;
mod config;
mod schema;

pub use self::builder::PromptBuilder;
pub use self::config::PromptConfig;
pub use self::schema::response_schema;

/// Tracing target for prompt assembly.
pub const TRACING_TARGET: &str = "eddy_rig::prompt";
