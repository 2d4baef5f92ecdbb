use std::any::Any;
use std::fmt;

/// Global transaction id as understood by one flavor.
///
/// `Display` must produce the flavor's canonical text form, the same form
/// its `parse_gtid` accepts.
pub trait Gtid: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Name of the flavor that parsed this GTID
    fn flavor(&self) -> &str;

    /// Originating server (server UUID or server id, depending on flavor)
    fn source_server(&self) -> String;

    fn sequence_number(&self) -> u64;

    /// Replication domain for flavors that partition GTIDs by domain
    fn sequence_domain(&self) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// `<flavor>/<gtid>`, the form accepted by `FlavorRegistry::decode_gtid`.
pub fn encode_gtid(gtid: &dyn Gtid) -> String {
    format!("{}/{}", gtid.flavor(), gtid)
}
