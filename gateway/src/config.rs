//! Gateway configuration from flags and environment

use clap::{Parser, ValueEnum};
use site_store::{ConnectionMode, DbLocation, StoreConfig};
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectionModeArg {
    /// Open a new connection for every request
    PerRequest,
    /// Keep one connection for the process lifetime
    Shared,
}

impl From<ConnectionModeArg> for ConnectionMode {
    fn from(arg: ConnectionModeArg) -> Self {
        match arg {
            ConnectionModeArg::PerRequest => ConnectionMode::PerRequest,
            ConnectionModeArg::Shared => ConnectionMode::Shared,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gridrisk-gateway",
    about = "Score grid-connection sites, persist them and render PDF reports"
)]
pub struct GatewayConfig {
    /// Interface to bind
    #[arg(long, env = "GRIDRISK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "GRIDRISK_PORT", default_value_t = 8000)]
    pub port: u16,

    /// SQLite database file (":memory:" for an in-memory database)
    #[arg(long, env = "GRIDRISK_DB_PATH", default_value = "gridrisk.db")]
    pub db_path: String,

    /// Database connection strategy
    #[arg(
        long,
        env = "GRIDRISK_CONNECTION_MODE",
        value_enum,
        default_value_t = ConnectionModeArg::PerRequest
    )]
    pub connection_mode: ConnectionModeArg,
}

impl GatewayConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(DbLocation::parse(&self.db_path), self.connection_mode.into())
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
