//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use idtrack::domain::AdminSeed;
use idtrack::outbound::persistence::DbPool;
use idtrack::outbound::security::JwtAccessTokens;
use idtrack::outbound::storage::FsDocumentStore;

/// Adapters and listener settings resolved at startup.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origin: Option<String>,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) tokens: Arc<JwtAccessTokens>,
    pub(crate) documents: Arc<FsDocumentStore>,
    pub(crate) admin_seed: Option<AdminSeed>,
}

impl ServerConfig {
    /// Construct a configuration using the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: JwtAccessTokens, documents: FsDocumentStore) -> Self {
        Self {
            bind_addr,
            cors_origin: None,
            db_pool: None,
            tokens: Arc::new(tokens),
            documents: Arc::new(documents),
            admin_seed: None,
        }
    }

    /// Attach a database connection pool; repositories switch to Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Restrict CORS to a single origin.
    #[must_use]
    pub fn with_cors_origin(mut self, origin: Option<String>) -> Self {
        self.cors_origin = origin;
        self
    }

    /// Administrator account upserted before the listener starts.
    #[must_use]
    pub fn with_admin_seed(mut self, seed: Option<AdminSeed>) -> Self {
        self.admin_seed = seed;
        self
    }
}
