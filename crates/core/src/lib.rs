pub mod config;
pub mod descriptor;
pub mod error;
pub mod types;

pub use config::{parse_site_toml, parse_site_toml_str};
pub use descriptor::produce_configuration;
pub use error::{Error, Result};
pub use types::*;
