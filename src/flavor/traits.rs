use crate::binlog::BinlogEvent;
use crate::error::{FlavorError, Result};
use crate::network::{ServerConnection, SlaveConnection};
use crate::replication::{Gtid, ReplicationPosition, ReplicationStatus};
use crate::types::ConnectionParams;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

/// Everything a replication controller needs that differs between builds
/// and forks of MySQL.
///
/// Values handed in (positions, statuses) must have been produced by the
/// same flavor; implementations reject anything else with
/// `FlavorError::InvalidArgument` (see [`check_flavor`]).
#[async_trait]
pub trait MysqlFlavor: Send + Sync {
    /// Name this flavor registers under and stamps on every value it produces
    fn name(&self) -> &str;

    /// Current position of a server acting as master.
    async fn master_position(&self, server: &mut dyn ServerConnection) -> Result<ReplicationPosition>;

    /// Replication state of a replica, or `None` if the server is not replicating.
    async fn slave_status(&self, server: &mut dyn ServerConnection) -> Result<Option<ReplicationStatus>>;

    /// Commands that turn a replica into a master, in execution order.
    fn promote_slave_commands(&self) -> Vec<String>;

    /// Commands that start replicating from `params` at `status.position`, in
    /// execution order.
    fn start_replication_commands(
        &self,
        params: &ConnectionParams,
        status: &ReplicationStatus,
    ) -> Result<Vec<String>>;

    /// Parse a GTID in this flavor's canonical text form.
    fn parse_gtid(&self, text: &str) -> Result<Arc<dyn Gtid>>;

    /// Parse a replication position in this flavor's canonical text form.
    fn parse_replication_position(&self, text: &str) -> Result<ReplicationPosition>;

    /// Write this flavor's binlog dump request for `start_pos` to the stream.
    async fn send_binlog_dump_command(
        &self,
        conn: &mut dyn SlaveConnection,
        start_pos: &ReplicationPosition,
    ) -> Result<()>;

    /// Wrap a raw frame read from the binlog stream.
    fn make_binlog_event(&self, buf: Bytes) -> Result<Box<dyn BinlogEvent>>;

    /// Block until the replica has applied at least `target_pos`, giving up
    /// with `FlavorError::Timeout` once `wait_timeout` has elapsed.
    async fn wait_master_pos(
        &self,
        server: &mut dyn ServerConnection,
        target_pos: &ReplicationPosition,
        wait_timeout: Duration,
    ) -> Result<()>;
}

/// Reject a value stamped by flavor `found` when `expected` was required.
pub fn check_flavor(expected: &str, operation: &'static str, found: &str) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(FlavorError::InvalidArgument {
            flavor: expected.to_string(),
            operation,
            found: found.to_string(),
        })
    }
}
