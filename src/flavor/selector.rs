use super::active::{ActiveFlavor, Selection};
use super::registry::FlavorRegistry;
use crate::config::FlavorConfig;
use crate::error::{FlavorError, Result};
use crate::types::FlavorName;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Picks the one flavor this process runs with and remembers the outcome.
///
/// The first `resolve` call runs the policy under a lock; every later call,
/// concurrent or not, returns the cached flavor or the cached error.
pub struct FlavorSelector {
    registry: Arc<FlavorRegistry>,
    requested: Option<FlavorName>,
    default_flavor: FlavorName,
    poll_interval: Duration,
    resolved: Mutex<Option<Result<ActiveFlavor>>>,
    attempts: AtomicUsize,
}

impl FlavorSelector {
    pub fn new(registry: Arc<FlavorRegistry>, config: &FlavorConfig) -> Self {
        Self {
            registry,
            requested: config.requested_flavor().map(str::to_string),
            default_flavor: config.default_flavor.clone(),
            poll_interval: config.wait_poll_interval(),
            resolved: Mutex::new(None),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<FlavorRegistry> {
        &self.registry
    }

    pub fn resolve(&self) -> Result<ActiveFlavor> {
        let mut resolved = self.resolved.lock();
        if let Some(outcome) = resolved.as_ref() {
            return outcome.clone();
        }

        self.attempts.fetch_add(1, Ordering::SeqCst);
        let outcome = select(&self.registry, self.requested.as_deref(), &self.default_flavor)
            .map(|flavor| flavor.with_poll_interval(self.poll_interval));
        match &outcome {
            Ok(flavor) => match flavor.selection() {
                Selection::Explicit => info!("Using MySQL flavor {}", flavor.name()),
                Selection::OnlyRegistered => {
                    info!("Only one MySQL flavor declared, using {}", flavor.name())
                }
                Selection::Default => info!(
                    "MySQL flavor is not set, using {} flavor by default",
                    flavor.name()
                ),
            },
            Err(e) => error!("MySQL flavor resolution failed: {}", e),
        }

        *resolved = Some(outcome.clone());
        outcome
    }

    /// Cached outcome, without triggering resolution.
    pub fn resolved(&self) -> Option<Result<ActiveFlavor>> {
        self.resolved.lock().clone()
    }

    /// Number of times the selection policy actually ran (0 or 1).
    pub fn resolution_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// The selection policy, without caching.
///
/// An explicit request never falls back to implicit rules.
pub fn select(
    registry: &FlavorRegistry,
    requested: Option<&str>,
    default_flavor: &str,
) -> Result<ActiveFlavor> {
    if let Some(name) = requested.filter(|n| !n.is_empty()) {
        return registry
            .get(name)
            .map(|flavor| ActiveFlavor::new(name.to_string(), Selection::Explicit, flavor))
            .ok_or_else(|| FlavorError::UnknownFlavor {
                requested: name.to_string(),
                known: registry.names(),
            });
    }

    if let Some((name, flavor)) = registry.sole() {
        return Ok(ActiveFlavor::new(
            name.clone(),
            Selection::OnlyRegistered,
            flavor.clone(),
        ));
    }

    if let Some(flavor) = registry.get(default_flavor) {
        return Ok(ActiveFlavor::new(
            default_flavor.to_string(),
            Selection::Default,
            flavor,
        ));
    }

    Err(FlavorError::AmbiguousFlavor {
        known: registry.names(),
    })
}
