use async_trait::async_trait;
use bytes::Bytes;
use crate::types::QueryRow;
use std::io;

/// Administrative connection to a MySQL-compatible server.
///
/// Handles are owned by one caller at a time; capability methods borrow
/// them mutably for the duration of a call.
#[async_trait]
pub trait ServerConnection: Send {
    /// Run a query and return every row keyed by column name
    async fn fetch_rows(&mut self, query: &str) -> io::Result<Vec<QueryRow>>;

    /// Execute commands in order, stopping at the first failure
    async fn execute(&mut self, commands: &[String]) -> io::Result<()>;
}

/// Connection registered with a master as a replica, used to request and
/// read the raw binlog stream.
#[async_trait]
pub trait SlaveConnection: Send {
    /// Server id this connection announces to the master
    fn server_id(&self) -> u32;

    async fn write_packet(&mut self, packet: Bytes) -> io::Result<()>;

    async fn read_packet(&mut self) -> io::Result<Bytes>;
}
