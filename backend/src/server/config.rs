//! Server settings and the assembled configuration handed to `create_server`.

use std::net::{IpAddr, SocketAddr};

use actix_web::cookie::{Key, SameSite};
use backend::domain::BookingUpdatePolicy;
use backend::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_HOST: &str = "0.0.0.0";

/// Process settings loaded from `BOOKING_*` variables, config files and CLI
/// flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKING")]
pub struct ServerSettings {
    /// Interface to bind; all interfaces when unset.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// `strict` or `legacy` re-validation on booking updates.
    pub update_policy: Option<BookingUpdatePolicy>,
}

impl ServerSettings {
    /// Resolve the bind address from `host` and `port`.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let ip: IpAddr = self.host.as_deref().unwrap_or(DEFAULT_HOST).trim().parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Configured update policy, `strict` unless overridden.
    #[must_use]
    pub fn update_policy(&self) -> BookingUpdatePolicy {
        self.update_policy.unwrap_or_default()
    }
}

/// Everything `create_server` needs besides the health state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) update_policy: BookingUpdatePolicy,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            update_policy: BookingUpdatePolicy::default(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Store data in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_update_policy(mut self, policy: BookingUpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
