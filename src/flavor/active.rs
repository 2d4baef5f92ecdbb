use super::traits::{check_flavor, MysqlFlavor};
use super::wait::{poll_until_position, with_deadline};
use crate::config::FlavorConfig;
use crate::binlog::BinlogEvent;
use crate::error::Result;
use crate::network::{ServerConnection, SlaveConnection};
use crate::replication::{Gtid, ReplicationPosition, ReplicationStatus};
use crate::types::ConnectionParams;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How the active flavor was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Named by configuration
    Explicit,
    /// The only flavor registered
    OnlyRegistered,
    /// Fell back to the designated default
    Default,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Explicit => write!(f, "explicit"),
            Selection::OnlyRegistered => write!(f, "only registered"),
            Selection::Default => write!(f, "default"),
        }
    }
}

/// The flavor resolved for this process.
///
/// Every capability call goes through here so that values from another
/// flavor are rejected before they reach the implementation and
/// `wait_master_pos` always honours its timeout.
#[derive(Clone)]
pub struct ActiveFlavor {
    name: String,
    selection: Selection,
    inner: Arc<dyn MysqlFlavor>,
    poll_interval: Duration,
}

impl ActiveFlavor {
    pub(crate) fn new(name: String, selection: Selection, inner: Arc<dyn MysqlFlavor>) -> Self {
        Self {
            name,
            selection,
            inner,
            poll_interval: FlavorConfig::default().wait_poll_interval(),
        }
    }

    pub(crate) fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn implementation(&self) -> &Arc<dyn MysqlFlavor> {
        &self.inner
    }

    /// Delay between status queries in [`ActiveFlavor::poll_master_pos`].
    pub fn wait_poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// True when both handles wrap the same implementation object.
    pub fn same_instance(&self, other: &ActiveFlavor) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }

    fn guard(&self, operation: &'static str, found: &str) -> Result<()> {
        check_flavor(&self.name, operation, found).map_err(|e| {
            warn!("Rejected {} for flavor {}: {}", operation, self.name, e);
            e
        })
    }

    pub async fn master_position(&self, server: &mut dyn ServerConnection) -> Result<ReplicationPosition> {
        debug!("{}: reading master position", self.name);
        self.inner.master_position(server).await
    }

    pub async fn slave_status(&self, server: &mut dyn ServerConnection) -> Result<Option<ReplicationStatus>> {
        debug!("{}: reading slave status", self.name);
        self.inner.slave_status(server).await
    }

    pub fn promote_slave_commands(&self) -> Vec<String> {
        self.inner.promote_slave_commands()
    }

    pub fn start_replication_commands(
        &self,
        params: &ConnectionParams,
        status: &ReplicationStatus,
    ) -> Result<Vec<String>> {
        self.guard("start_replication_commands", status.flavor())?;
        self.inner.start_replication_commands(params, status)
    }

    pub fn parse_gtid(&self, text: &str) -> Result<Arc<dyn Gtid>> {
        self.inner.parse_gtid(text)
    }

    pub fn parse_replication_position(&self, text: &str) -> Result<ReplicationPosition> {
        self.inner.parse_replication_position(text)
    }

    pub async fn send_binlog_dump_command(
        &self,
        conn: &mut dyn SlaveConnection,
        start_pos: &ReplicationPosition,
    ) -> Result<()> {
        self.guard("send_binlog_dump_command", start_pos.flavor())?;
        debug!("{}: requesting binlog dump from {}", self.name, start_pos);
        self.inner.send_binlog_dump_command(conn, start_pos).await
    }

    pub fn make_binlog_event(&self, buf: Bytes) -> Result<Box<dyn BinlogEvent>> {
        self.inner.make_binlog_event(buf)
    }

    pub async fn wait_master_pos(
        &self,
        server: &mut dyn ServerConnection,
        target_pos: &ReplicationPosition,
        wait_timeout: Duration,
    ) -> Result<()> {
        self.guard("wait_master_pos", target_pos.flavor())?;
        debug!("{}: waiting up to {:?} for position {}", self.name, wait_timeout, target_pos);
        with_deadline(
            &self.name,
            target_pos,
            wait_timeout,
            self.inner.wait_master_pos(server, target_pos, wait_timeout),
        )
        .await
    }

    /// Wait for `target_pos` by polling `slave_status` at the configured
    /// `wait_poll_interval_ms`, for hosts that cannot use the server-side wait.
    pub async fn poll_master_pos(
        &self,
        server: &mut dyn ServerConnection,
        target_pos: &ReplicationPosition,
        wait_timeout: Duration,
    ) -> Result<()> {
        self.guard("wait_master_pos", target_pos.flavor())?;
        debug!(
            "{}: polling every {:?} for position {}",
            self.name, self.poll_interval, target_pos
        );
        poll_until_position(self.inner.as_ref(), server, target_pos, wait_timeout, self.poll_interval).await
    }
}

impl fmt::Debug for ActiveFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveFlavor")
            .field("name", &self.name)
            .field("selection", &self.selection)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
