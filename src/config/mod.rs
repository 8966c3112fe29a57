pub mod parser;
pub mod schema;
pub mod types;
pub mod credentials;
pub mod resolve;

pub use types::*;
pub use parser::parse_config;
pub use resolve::{load_config, resolve_config, validate_config, ConfigOverrides};
