//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ProofyConfig;
use crate::services::WebhookVerifier;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ProofyConfig,
    pool: PgPool,
    webhook_verifier: Option<WebhookVerifier>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The billing webhook verifier exists only when a webhook secret is
    /// configured; without it the webhook endpoint answers 503.
    #[must_use]
    pub fn new(config: ProofyConfig, pool: PgPool) -> Self {
        let webhook_verifier = config
            .billing_webhook_secret
            .clone()
            .map(WebhookVerifier::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                webhook_verifier,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &ProofyConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the billing webhook verifier, if configured.
    #[must_use]
    pub fn webhook_verifier(&self) -> Option<&WebhookVerifier> {
        self.inner.webhook_verifier.as_ref()
    }
}
