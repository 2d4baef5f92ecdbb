use crate::error::Result;
use crate::replication::Gtid;
use std::fmt;
use std::sync::Arc;

/// Read-only view over one raw frame from the binlog stream.
///
/// The frame is held as `bytes::Bytes`, so building an event never copies
/// the payload. Header accessors are only meaningful when `is_valid` is true.
pub trait BinlogEvent: fmt::Debug + Send + Sync {
    /// Name of the flavor that built this view
    fn flavor(&self) -> &str;

    /// The wrapped frame, untouched
    fn bytes(&self) -> &[u8];

    fn is_valid(&self) -> bool;

    fn event_type(&self) -> u8;

    fn timestamp(&self) -> u32;

    fn server_id(&self) -> u32;

    fn is_format_description(&self) -> bool;

    fn is_query(&self) -> bool;

    fn is_xid(&self) -> bool;

    fn is_rotate(&self) -> bool;

    fn has_gtid(&self) -> bool;

    /// The GTID carried by this event, if any.
    fn gtid(&self) -> Result<Option<Arc<dyn Gtid>>>;

    fn len(&self) -> usize {
        self.bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}
