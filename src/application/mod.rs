mod application;
pub mod data;
mod output;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use output::{TreeView, render_paths, stdout_supports_color};
pub use runtime_config::RuntimeConfig;
