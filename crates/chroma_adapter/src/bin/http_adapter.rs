#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chroma_adapter::wire::{RpcEnvelope, RpcErrorBody};
use chroma_adapter::{
    request_context_from_header, AdapterConfig, AdapterHealthResponse, AdapterRuntime,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    runtime: Arc<Mutex<AdapterRuntime>>,
    identity_header: Arc<str>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,chroma_adapter=info")),
        )
        .init();

    let config = AdapterConfig::from_env()?;
    let runtime = AdapterRuntime::from_config(&config)?;
    let state = AppState {
        runtime: Arc::new(Mutex::new(runtime)),
        identity_header: Arc::from(config.identity_header.as_str()),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/rpc/:operation", post(run_rpc))
        .with_state(state);

    info!(
        addr = %config.bind,
        identity_header = %config.identity_header,
        "chroma_adapter_http listening"
    );
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("chroma_adapter_http shutting down");
}

async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<AdapterHealthResponse>) {
    match state.runtime.lock() {
        Ok(runtime) => (StatusCode::OK, Json(runtime.health_report())),
        Err(_) => {
            error!("adapter runtime lock poisoned");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AdapterHealthResponse {
                    status: "error".to_string(),
                    palettes: 0,
                    colors: 0,
                }),
            )
        }
    }
}

async fn run_rpc(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<RpcEnvelope>) {
    let caller = headers
        .get(&*state.identity_header)
        .and_then(|v| v.to_str().ok());
    let ctx = request_context_from_header(caller);

    let mut runtime = match state.runtime.lock() {
        Ok(runtime) => runtime,
        Err(_) => {
            error!(operation = %operation, "adapter runtime lock poisoned");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcEnvelope {
                    success: false,
                    data: None,
                    error: Some(RpcErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "adapter runtime lock poisoned".to_string(),
                    }),
                }),
            );
        }
    };
    let (status, envelope) = runtime.handle_rpc(&operation, &ctx, &body);
    (status, Json(envelope))
}
