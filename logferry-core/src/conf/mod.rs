mod error;
mod loader;
mod types;
mod validation;


pub use error::ConfigError;
pub use loader::load_config;
pub use types::*;
pub use validation::validate;
