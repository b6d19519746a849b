//! HTTP server configuration object.

use std::net::SocketAddr;

use food_api::domain::TokenService;
use food_api::outbound::persistence::DbPool;

/// Everything the server needs once bootstrap has finished.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) tokens: TokenService,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, tokens: TokenService) -> Self {
        Self {
            bind_addr,
            db_pool,
            tokens,
        }
    }
}
