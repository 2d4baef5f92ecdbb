use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type FlavorName = String;

/// One result row keyed by column name.
pub type QueryRow = HashMap<String, String>;

/// How to reach a master server. Built by the host process and never
/// modified by flavor code.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_name: String,
    pub unix_socket: Option<String>,
    pub charset: Option<String>,
    pub flags: u64,
    pub ssl_ca: Option<String>,
    pub ssl_ca_path: Option<String>,
    pub ssl_cert: Option<String>,
    pub ssl_cipher: Option<String>,
    pub ssl_key: Option<String>,
}

impl ConnectionParams {
    pub fn new(host: impl Into<String>, port: u16, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn ssl_enabled(&self) -> bool {
        self.ssl_ca.is_some() || self.ssl_ca_path.is_some() || self.ssl_cert.is_some()
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("unix_socket", &self.unix_socket)
            .field("charset", &self.charset)
            .field("flags", &self.flags)
            .field("ssl", &self.ssl_enabled())
            .finish()
    }
}
