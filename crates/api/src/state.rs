use std::sync::Arc;

use ideaforge_core::billing::CheckoutService;
use ideaforge_core::generator::{GeneratorConfig, IdeaGenerator};
use ideaforge_core::providers::{GenerationBackend, PaymentProvider};
use ideaforge_core::quota::{QuotaLedger, QuotaPolicy};
use ideaforge_core::role_authority::RoleAuthority;
use ideaforge_db::stores::{PgIdentityProvider, PgQuotaStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: ideaforge_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub generator: Arc<IdeaGenerator>,
    pub role_authority: Arc<RoleAuthority>,
    pub checkout: Arc<CheckoutService>,
}

impl AppState {
    /// Wire the services over PostgreSQL-backed stores and the given
    /// external clients.
    pub fn new(
        pool: ideaforge_db::DbPool,
        config: ServerConfig,
        backend: Arc<dyn GenerationBackend>,
        payments: Arc<dyn PaymentProvider>,
        quota_policy: QuotaPolicy,
        generator_config: GeneratorConfig,
    ) -> Self {
        let ledger = QuotaLedger::new(Arc::new(PgQuotaStore::new(pool.clone())), quota_policy);
        let generator = IdeaGenerator::new(backend, ledger, generator_config);
        let role_authority = RoleAuthority::new(Arc::new(PgIdentityProvider::new(pool.clone())));

        Self {
            pool,
            config: Arc::new(config),
            generator: Arc::new(generator),
            role_authority: Arc::new(role_authority),
            checkout: Arc::new(CheckoutService::new(payments)),
        }
    }

    pub fn ledger(&self) -> &QuotaLedger {
        self.generator.ledger()
    }
}
