mod application;
pub mod data;
mod listing;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use listing::render_tree;
pub use runtime_config::RuntimeConfig;
