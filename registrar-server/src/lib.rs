pub mod api;
pub mod config;
pub mod dynamo;
pub mod errors;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use registrar_core::{InMemoryUserStore, UserRegistrar, UserStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, StoreBackend};
use crate::dynamo::DynamoUserStore;
use crate::errors::ServerError;

const DEFAULT_LOG_FILTER: &str = "registrar_server=info,registrar_core=info,tower_http=info";

#[derive(Clone)]
pub struct AppState {
    pub registrar: UserRegistrar,
    pub allow_origin: HeaderValue,
}

impl AppState {
    pub fn new(registrar: UserRegistrar, frontend_origin: &str) -> Result<Self, ServerError> {
        let allow_origin = HeaderValue::from_str(frontend_origin).map_err(|e| {
            ServerError::InvalidConfig(format!("FRONTEND_ENDPOINT {frontend_origin:?}: {e}"))
        })?;

        Ok(Self {
            registrar,
            allow_origin,
        })
    }

    pub fn from_config(config: &ServerConfig, store: Arc<dyn UserStore>) -> Result<Self, ServerError> {
        let registrar = UserRegistrar::new(store).with_write_mode(config.write_mode);
        Self::new(registrar, config.frontend_origin())
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(api::dispatch)
        // API Gateway enforces the payload cap before requests reach us.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the store client once for the lifetime of the process.
pub async fn build_store(config: &ServerConfig) -> Arc<dyn UserStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; records will not survive a restart");
            Arc::new(InMemoryUserStore::new())
        }
        StoreBackend::Dynamodb => {
            let shared_config = dynamo::load_aws_config(config).await;
            if config.log_caller_identity {
                dynamo::log_caller_identity(&shared_config).await;
            }
            let store = DynamoUserStore::from_config(&shared_config, config);
            tracing::info!(table = store.table_name(), region = %config.region, "Using DynamoDB user store");
            Arc::new(store)
        }
    }
}

/// Installs the global subscriber. Lambda output goes to CloudWatch, which
/// timestamps lines itself and does not render ANSI colours.
pub fn init_tracing(in_lambda: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if in_lambda {
        builder.with_ansi(false).without_time().init();
    } else {
        builder.init();
    }
}
