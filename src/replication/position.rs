use crate::error::{FlavorError, Result};
use crate::types::FlavorName;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Flavor-specific payload of a [`ReplicationPosition`].
///
/// Implementations only need to order themselves against values of their own
/// concrete type; `compare` returns `None` for anything else.
pub trait PositionValue: fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    fn compare(&self, other: &dyn PositionValue) -> Option<Ordering>;
}

/// Point in a replication stream, tagged with the flavor that produced it.
///
/// Positions from different flavors never compare: `==` is false and
/// `partial_cmp` is `None`.
#[derive(Clone)]
pub struct ReplicationPosition {
    flavor: FlavorName,
    value: Arc<dyn PositionValue>,
}

impl ReplicationPosition {
    pub fn new<V: PositionValue>(flavor: impl Into<FlavorName>, value: V) -> Self {
        Self {
            flavor: flavor.into(),
            value: Arc::new(value),
        }
    }

    pub fn flavor(&self) -> &str {
        &self.flavor
    }

    pub fn value(&self) -> &dyn PositionValue {
        self.value.as_ref()
    }

    pub fn downcast_ref<V: PositionValue>(&self) -> Option<&V> {
        self.value.as_any().downcast_ref::<V>()
    }

    pub fn is_same_flavor(&self, other: &ReplicationPosition) -> bool {
        self.flavor == other.flavor
    }

    /// True when this position has reached `target`.
    pub fn at_least(&self, target: &ReplicationPosition) -> Result<bool> {
        if !self.is_same_flavor(target) {
            return Err(FlavorError::InvalidArgument {
                flavor: self.flavor.clone(),
                operation: "compare_positions",
                found: target.flavor.clone(),
            });
        }
        Ok(matches!(
            self.value.compare(target.value()),
            Some(Ordering::Greater | Ordering::Equal)
        ))
    }

    /// `<flavor>/<position>`, the form accepted by `FlavorRegistry::decode_position`.
    pub fn encode(&self) -> String {
        format!("{}/{}", self.flavor, self.value)
    }
}

impl PartialEq for ReplicationPosition {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for ReplicationPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.is_same_flavor(other) {
            return None;
        }
        self.value.compare(other.value())
    }
}

impl fmt::Display for ReplicationPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for ReplicationPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplicationPosition({}/{:?})", self.flavor, self.value)
    }
}
