use super::position::ReplicationPosition;
use std::time::Duration;

/// Snapshot of a replica's state. A fresh value is produced by every
/// `slave_status` call; callers replace snapshots rather than edit them.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicationStatus {
    pub position: ReplicationPosition,
    pub slave_io_running: bool,
    pub slave_sql_running: bool,
    /// `None` when the server cannot compute lag (e.g. IO thread down)
    pub seconds_behind_master: Option<u32>,
    pub master_host: String,
    pub master_port: u16,
    pub master_connect_retry: Duration,
}

impl ReplicationStatus {
    pub fn flavor(&self) -> &str {
        self.position.flavor()
    }

    pub fn slave_running(&self) -> bool {
        self.slave_io_running && self.slave_sql_running
    }

    pub fn master_addr(&self) -> String {
        format!("{}:{}", self.master_host, self.master_port)
    }
}
