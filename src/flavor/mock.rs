//! Minimal flavor, server and stream doubles for unit tests.

use super::traits::{check_flavor, MysqlFlavor};
use super::wait::poll_until_position;
use crate::binlog::BinlogEvent;
use crate::error::{FlavorError, Result};
use crate::network::{ServerConnection, SlaveConnection};
use crate::replication::{Gtid, PositionValue, ReplicationPosition, ReplicationStatus};
use crate::types::{ConnectionParams, QueryRow};
use async_trait::async_trait;
use bytes::Bytes;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub struct SeqPosition(pub u64);

impl fmt::Display for SeqPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PositionValue for SeqPosition {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn compare(&self, other: &dyn PositionValue) -> Option<Ordering> {
        other.as_any().downcast_ref::<SeqPosition>().map(|o| self.0.cmp(&o.0))
    }
}

#[derive(Debug)]
pub struct SeqGtid {
    flavor: String,
    sequence: u64,
}

impl fmt::Display for SeqGtid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence)
    }
}

impl Gtid for SeqGtid {
    fn flavor(&self) -> &str {
        &self.flavor
    }

    fn source_server(&self) -> String {
        "1".to_string()
    }

    fn sequence_number(&self) -> u64 {
        self.sequence
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct StubEvent {
    flavor: String,
    buf: Bytes,
}

impl BinlogEvent for StubEvent {
    fn flavor(&self) -> &str {
        &self.flavor
    }

    fn bytes(&self) -> &[u8] {
        &self.buf
    }

    fn is_valid(&self) -> bool {
        !self.buf.is_empty()
    }

    fn event_type(&self) -> u8 {
        self.buf[0]
    }

    fn timestamp(&self) -> u32 {
        0
    }

    fn server_id(&self) -> u32 {
        1
    }

    fn is_format_description(&self) -> bool {
        self.event_type() == 15
    }

    fn is_query(&self) -> bool {
        self.event_type() == 2
    }

    fn is_xid(&self) -> bool {
        self.event_type() == 16
    }

    fn is_rotate(&self) -> bool {
        self.event_type() == 4
    }

    fn has_gtid(&self) -> bool {
        false
    }

    fn gtid(&self) -> Result<Option<Arc<dyn Gtid>>> {
        Ok(None)
    }
}

/// Flavor whose positions and GTIDs are plain integers.
pub struct StubFlavor {
    name: String,
}

impl StubFlavor {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }

    pub fn arc(name: &str) -> Arc<dyn MysqlFlavor> {
        Arc::new(Self::new(name))
    }

    pub fn position(&self, seq: u64) -> ReplicationPosition {
        ReplicationPosition::new(self.name.clone(), SeqPosition(seq))
    }

    fn parse_seq(&self, what: &'static str, text: &str) -> Result<u64> {
        text.parse::<u64>()
            .map_err(|e| FlavorError::parse(self.name.clone(), what, text, e.to_string()))
    }

    fn column(&self, row: &QueryRow, name: &str) -> Result<String> {
        row.get(name).cloned().ok_or_else(|| FlavorError::Communication {
            flavor: self.name.clone(),
            operation: "fetch_rows",
            message: format!("missing column {}", name),
        })
    }
}

#[async_trait]
impl MysqlFlavor for StubFlavor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn master_position(&self, server: &mut dyn ServerConnection) -> Result<ReplicationPosition> {
        let rows = server
            .fetch_rows("SHOW MASTER STATUS")
            .await
            .map_err(|e| FlavorError::communication(self.name.clone(), "master_position", &e))?;
        let row = rows.first().ok_or_else(|| FlavorError::Communication {
            flavor: self.name.clone(),
            operation: "master_position",
            message: "binary logging is disabled".to_string(),
        })?;
        let text = self.column(row, "Position")?;
        self.parse_replication_position(&text)
    }

    async fn slave_status(&self, server: &mut dyn ServerConnection) -> Result<Option<ReplicationStatus>> {
        let rows = server
            .fetch_rows("SHOW SLAVE STATUS")
            .await
            .map_err(|e| FlavorError::communication(self.name.clone(), "slave_status", &e))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        Ok(Some(ReplicationStatus {
            position: self.parse_replication_position(&self.column(row, "Exec_Position")?)?,
            slave_io_running: self.column(row, "Slave_IO_Running")? == "Yes",
            slave_sql_running: self.column(row, "Slave_SQL_Running")? == "Yes",
            seconds_behind_master: row.get("Seconds_Behind_Master").and_then(|s| s.parse().ok()),
            master_host: self.column(row, "Master_Host")?,
            master_port: 3306,
            master_connect_retry: Duration::from_secs(10),
        }))
    }

    fn promote_slave_commands(&self) -> Vec<String> {
        vec!["STOP SLAVE".to_string(), "RESET SLAVE".to_string()]
    }

    fn start_replication_commands(
        &self,
        params: &ConnectionParams,
        status: &ReplicationStatus,
    ) -> Result<Vec<String>> {
        check_flavor(&self.name, "start_replication_commands", status.flavor())?;
        Ok(vec![
            format!("CHANGE MASTER TO MASTER_HOST = '{}', MASTER_POS = {}", params.host, status.position),
            "START SLAVE".to_string(),
        ])
    }

    fn parse_gtid(&self, text: &str) -> Result<Arc<dyn Gtid>> {
        let sequence = self.parse_seq("GTID", text)?;
        Ok(Arc::new(SeqGtid {
            flavor: self.name.clone(),
            sequence,
        }))
    }

    fn parse_replication_position(&self, text: &str) -> Result<ReplicationPosition> {
        Ok(self.position(self.parse_seq("replication position", text)?))
    }

    async fn send_binlog_dump_command(
        &self,
        conn: &mut dyn SlaveConnection,
        start_pos: &ReplicationPosition,
    ) -> Result<()> {
        check_flavor(&self.name, "send_binlog_dump_command", start_pos.flavor())?;
        let packet = Bytes::from(format!("DUMP {} {}", conn.server_id(), start_pos));
        conn.write_packet(packet)
            .await
            .map_err(|e| FlavorError::communication(self.name.clone(), "send_binlog_dump_command", &e))
    }

    fn make_binlog_event(&self, buf: Bytes) -> Result<Box<dyn BinlogEvent>> {
        if buf.is_empty() {
            return Err(FlavorError::parse(self.name.clone(), "binlog event", "", "empty frame"));
        }
        Ok(Box::new(StubEvent {
            flavor: self.name.clone(),
            buf,
        }))
    }

    async fn wait_master_pos(
        &self,
        server: &mut dyn ServerConnection,
        target_pos: &ReplicationPosition,
        wait_timeout: Duration,
    ) -> Result<()> {
        poll_until_position(self, server, target_pos, wait_timeout, Duration::from_millis(1)).await
    }
}

/// Scripted server. As a replica, its position moves forward by `advance`
/// on every status query.
pub struct MockServer {
    master_position: u64,
    replica_position: Option<u64>,
    advance: u64,
    fail: bool,
    status_queries: usize,
    pub executed: Vec<String>,
}

impl MockServer {
    pub fn master(position: u64) -> Self {
        Self {
            master_position: position,
            replica_position: None,
            advance: 0,
            fail: false,
            status_queries: 0,
            executed: Vec::new(),
        }
    }

    pub fn replica(position: u64) -> Self {
        Self {
            replica_position: Some(position),
            ..Self::master(0)
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::master(0)
        }
    }

    pub fn advancing_by(mut self, advance: u64) -> Self {
        self.advance = advance;
        self
    }

    pub fn status_queries(&self) -> usize {
        self.status_queries
    }
}

#[async_trait]
impl ServerConnection for MockServer {
    async fn fetch_rows(&mut self, query: &str) -> io::Result<Vec<QueryRow>> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        }
        match query {
            "SHOW MASTER STATUS" => {
                let mut row = QueryRow::new();
                row.insert("Position".to_string(), self.master_position.to_string());
                Ok(vec![row])
            }
            "SHOW SLAVE STATUS" => {
                self.status_queries += 1;
                let Some(position) = self.replica_position else {
                    return Ok(Vec::new());
                };
                self.replica_position = Some(position + self.advance);
                let mut row = QueryRow::new();
                row.insert("Exec_Position".to_string(), position.to_string());
                row.insert("Slave_IO_Running".to_string(), "Yes".to_string());
                row.insert("Slave_SQL_Running".to_string(), "Yes".to_string());
                row.insert("Seconds_Behind_Master".to_string(), "0".to_string());
                row.insert("Master_Host".to_string(), "db-master-1".to_string());
                Ok(vec![row])
            }
            other => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unexpected query {}", other),
            )),
        }
    }

    async fn execute(&mut self, commands: &[String]) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        }
        self.executed.extend_from_slice(commands);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockStream {
    pub written: Vec<Bytes>,
    pub fail: bool,
}

#[async_trait]
impl SlaveConnection for MockStream {
    fn server_id(&self) -> u32 {
        7
    }

    async fn write_packet(&mut self, packet: Bytes) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        self.written.push(packet);
        Ok(())
    }

    async fn read_packet(&mut self) -> io::Result<Bytes> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more packets"))
    }
}
