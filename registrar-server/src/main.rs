use clap::Parser;
use registrar_server::{
    build_store, config::ServerConfig, errors::ServerError, init_tracing, router, AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = ServerConfig::parse();
    let in_lambda = std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok();
    init_tracing(in_lambda);

    let store = build_store(&config).await;
    let state = match AppState::from_config(&config, store) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(%e, "Failed to build application state");
            return Err(e);
        }
    };
    let app = router(state);

    if in_lambda {
        tracing::info!(write_mode = %config.write_mode, "Starting Lambda handler");
        return lambda_http::run(app).await.map_err(ServerError::Lambda);
    }

    tracing::info!("Starting registrar server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .inspect_err(|e| tracing::error!(%e, addr = %config.bind_address, "Failed to bind"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
