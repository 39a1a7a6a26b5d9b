use std::sync::Arc;

use anyhow::{Context, Result};

use super::{aliases::DbPool, auth::TokenVerifier, config::AppConfig, db};
use crate::{
    payments::PaymentGateways,
    repositories::{
        accounts::PgAccountRepository, carts::PgCartRepository, orders::PgOrderRepository,
    },
};

/// Shared handles every request handler receives. The pool and HTTP client
/// live inside the repositories and gateways built from them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_verifier: Arc<TokenVerifier>,
    pub gateways: PaymentGateways,
    pub carts: Arc<PgCartRepository>,
    pub orders: Arc<PgOrderRepository>,
    pub accounts: Arc<PgAccountRepository>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> Result<Self> {
        let db_pool = db::create_pool(&config.database.url).await?;
        Self::with_pool(config, db_pool)
    }

    pub fn with_pool(config: AppConfig, db_pool: DbPool) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http.timeout)
            .build()
            .context("Failed to build the HTTP client")?;

        let gateways = PaymentGateways::from_config(&config, http_client);
        let token_verifier = Arc::new(TokenVerifier::new(&config.auth));

        Ok(Self {
            carts: Arc::new(PgCartRepository::new(db_pool.clone())),
            orders: Arc::new(PgOrderRepository::new(db_pool.clone())),
            accounts: Arc::new(PgAccountRepository::new(db_pool)),
            config: Arc::new(config),
            token_verifier,
            gateways,
        })
    }
}
