//! Configuration: host filesystem roots and clone settings.
//!
//! The core never reads ambient state. Frontends load an [`ArtxConfig`]
//! once (see [`ConfigStore`]) and inject the resulting [`HostPaths`] and
//! [`CloneConfig`] into the services.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_artx_toml, parse_artx_toml_str};
pub use paths::{HostPaths, InstallTarget};
pub use schema::{ArtxConfig, CloneConfig, PathsConfig};
pub use store::ConfigStore;
