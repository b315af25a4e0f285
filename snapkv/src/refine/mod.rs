mod api;
pub mod prompts;
mod provider;

pub use api::RefinementClient;
pub use provider::{RefinementBackend, RefinementProvider};
