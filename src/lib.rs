//! Flavor abstraction for MySQL-compatible replication control.
//!
//! Vendor modules register a [`MysqlFlavor`] implementation into a
//! [`FlavorRegistry`]; the host process builds a [`FlavorSelector`] once and
//! drives replication through the resolved [`ActiveFlavor`].

pub mod binlog;
pub mod config;
pub mod error;
pub mod flavor;
pub mod network;
pub mod replication;
pub mod types;

pub use config::FlavorConfig;
pub use error::{ErrorKind, FlavorError, Result};
pub use flavor::{ActiveFlavor, FlavorRegistry, FlavorSelector, MysqlFlavor};
