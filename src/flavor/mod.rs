pub mod active;
pub mod registry;
pub mod selector;
pub mod traits;
pub mod wait;

#[cfg(test)]
pub(crate) mod mock;

pub use active::{ActiveFlavor, Selection};
pub use registry::{FlavorRegistry, FlavorRegistryBuilder, RegisterFn};
pub use selector::FlavorSelector;
pub use traits::MysqlFlavor;
