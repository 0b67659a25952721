//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use xpensa_types::FinanceRepository;

use super::auth::auth_middleware;
use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::FinanceService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Xpensa API.
pub struct HttpServer<R: FinanceRepository> {
    state: Arc<AppState<R>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<R: FinanceRepository> HttpServer<R> {
    /// Creates a new HTTP server with the default limit of 100 requests per minute.
    pub fn new(service: FinanceService<R>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()),
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: FinanceService<R>, requests_per_minute: u32) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::per_minute(requests_per_minute)),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Uses the globally set MeterProvider
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            // Auth
            .route("/api/auth/signup", post(handlers::signup::<R>))
            .route("/api/auth/login", post(handlers::login::<R>))
            .route("/api/auth/logout", post(handlers::logout::<R>))
            .route("/api/auth/me", get(handlers::me::<R>))
            .route("/api/auth/profile", put(handlers::update_profile::<R>))
            // Transactions
            .route(
                "/api/transactions",
                post(handlers::add_transaction::<R>).get(handlers::list_transactions::<R>),
            )
            .route(
                "/api/transactions/total-spent",
                post(handlers::total_spent::<R>),
            )
            .route(
                "/api/transactions/{id}",
                delete(handlers::delete_transaction::<R>),
            )
            // Budgets & goals
            .route(
                "/api/budgets",
                post(handlers::add_budgets::<R>).get(handlers::list_budgets::<R>),
            )
            .route("/api/budgets/status", get(handlers::budget_status::<R>))
            .route(
                "/api/goals",
                post(handlers::upsert_goals::<R>).get(handlers::list_goals::<R>),
            )
            .route("/api/goals/status", get(handlers::goal_status::<R>))
            // Analytics
            .route("/api/analytics", get(handlers::analytics::<R>))
            .route("/api/profile/health", get(handlers::health_report::<R>))
            .route("/api/assistant/query", post(handlers::ask_assistant::<R>))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware::<R>,
            ))
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
