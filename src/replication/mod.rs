pub mod gtid;
pub mod position;
pub mod status;

pub use gtid::{encode_gtid, Gtid};
pub use position::{PositionValue, ReplicationPosition};
pub use status::ReplicationStatus;
