use super::traits::MysqlFlavor;
use crate::config::{DuplicatePolicy, FlavorConfig};
use crate::error::{FlavorError, Result};
use crate::replication::{Gtid, ReplicationPosition};
use crate::types::FlavorName;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Entry point a flavor module exposes to add itself to a registry.
pub type RegisterFn = fn(&mut FlavorRegistryBuilder) -> Result<()>;

/// Registration handle handed to flavor modules during start-up.
///
/// Call [`build`](Self::build) once every module has registered; the
/// resulting [`FlavorRegistry`] cannot be changed.
pub struct FlavorRegistryBuilder {
    flavors: BTreeMap<FlavorName, Arc<dyn MysqlFlavor>>,
    duplicate_policy: DuplicatePolicy,
}

impl Default for FlavorRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlavorRegistryBuilder {
    pub fn new() -> Self {
        Self {
            flavors: BTreeMap::new(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn from_config(config: &FlavorConfig) -> Self {
        Self::new().with_duplicate_policy(config.duplicate_policy)
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn register(&mut self, name: &str, flavor: Arc<dyn MysqlFlavor>) -> Result<()> {
        if name.is_empty() {
            return Err(FlavorError::InvalidConfig(
                "flavor name cannot be empty".to_string(),
            ));
        }
        if name.contains('/') {
            return Err(FlavorError::InvalidConfig(format!(
                "flavor name {:?} must not contain '/'",
                name
            )));
        }
        if flavor.name() != name {
            return Err(FlavorError::InvalidConfig(format!(
                "flavor {:?} registered under mismatched name {:?}",
                flavor.name(),
                name
            )));
        }

        if self.flavors.contains_key(name) {
            match self.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(FlavorError::DuplicateFlavor(name.to_string()));
                }
                DuplicatePolicy::Overwrite => {
                    warn!("MySQL flavor {} registered twice, replacing previous implementation", name);
                }
            }
        }

        debug!("Registered MySQL flavor {}", name);
        self.flavors.insert(name.to_string(), flavor);
        Ok(())
    }

    /// Run each flavor module's registration function in order.
    pub fn register_all(mut self, modules: &[RegisterFn]) -> Result<Self> {
        for register in modules {
            register(&mut self)?;
        }
        Ok(self)
    }

    pub fn build(self) -> FlavorRegistry {
        FlavorRegistry {
            flavors: self.flavors,
        }
    }
}

/// Frozen name -> implementation table.
#[derive(Clone, Default)]
pub struct FlavorRegistry {
    flavors: BTreeMap<FlavorName, Arc<dyn MysqlFlavor>>,
}

impl FlavorRegistry {
    pub fn builder() -> FlavorRegistryBuilder {
        FlavorRegistryBuilder::new()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<FlavorName> {
        self.flavors.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn MysqlFlavor>> {
        self.flavors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flavors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.flavors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty()
    }

    /// The only registered flavor, if there is exactly one.
    pub(crate) fn sole(&self) -> Option<(&FlavorName, &Arc<dyn MysqlFlavor>)> {
        if self.flavors.len() == 1 {
            self.flavors.iter().next()
        } else {
            None
        }
    }

    /// Decode a position written by `ReplicationPosition::encode`.
    pub fn decode_position(&self, encoded: &str) -> Result<ReplicationPosition> {
        let (flavor, text) = self.split_encoded("replication position", encoded)?;
        flavor.parse_replication_position(text)
    }

    /// Decode a GTID written by `replication::encode_gtid`.
    pub fn decode_gtid(&self, encoded: &str) -> Result<Arc<dyn Gtid>> {
        let (flavor, text) = self.split_encoded("GTID", encoded)?;
        flavor.parse_gtid(text)
    }

    fn split_encoded<'a>(
        &self,
        what: &'static str,
        encoded: &'a str,
    ) -> Result<(Arc<dyn MysqlFlavor>, &'a str)> {
        let (name, text) = encoded.split_once('/').ok_or_else(|| {
            FlavorError::parse("", what, encoded, "expected <flavor>/<value>")
        })?;
        let flavor = self.get(name).ok_or_else(|| {
            FlavorError::parse(name, what, encoded, "flavor is not registered")
        })?;
        Ok((flavor, text))
    }
}

impl fmt::Debug for FlavorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlavorRegistry")
            .field("flavors", &self.names())
            .finish()
    }
}
