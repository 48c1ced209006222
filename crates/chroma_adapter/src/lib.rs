#![forbid(unsafe_code)]

pub mod seed;
pub mod wire;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;
use chroma_contracts::identity::{RequestContext, UserId};
use chroma_contracts::palette::PaletteRpcRequest;
use chroma_contracts::{ContractViolation, MonotonicTimeNs};
use chroma_os::access::require_caller;
use chroma_os::{PaletteError, PaletteRuntime};
use chroma_storage::store::PaletteStore;
use tracing::{info, warn};

use crate::wire::{decode_request, encode_response, RpcEnvelope};

pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_IDENTITY_HEADER: &str = "x-chroma-user-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub bind: SocketAddr,
    pub identity_header: String,
    pub seed_path: Option<PathBuf>,
}

impl AdapterConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_env_var_map(|key| env::var(key).ok())
    }

    pub fn from_env_var_map<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let bind_raw = non_blank("CHROMA_HTTP_BIND").unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|err| format!("invalid CHROMA_HTTP_BIND '{bind_raw}': {err}"))?;
        let identity_header = non_blank("CHROMA_IDENTITY_HEADER")
            .unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.to_string())
            .to_ascii_lowercase();
        Ok(Self {
            bind,
            identity_header,
            seed_path: non_blank("CHROMA_SEED_PATH").map(PathBuf::from),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdapterHealthResponse {
    pub status: String,
    pub palettes: usize,
    pub colors: usize,
}

fn system_time_now_ns() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(1);
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

/// Maps a core outcome onto an HTTP status. The only place status codes exist.
pub fn status_for(err: &PaletteError) -> StatusCode {
    match err {
        PaletteError::Unauthorized => StatusCode::UNAUTHORIZED,
        PaletteError::Forbidden { .. } => StatusCode::FORBIDDEN,
        PaletteError::NotFound { .. } => StatusCode::NOT_FOUND,
        PaletteError::Validation(_) => StatusCode::BAD_REQUEST,
        PaletteError::Storage(_) | PaletteError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Caller identity as handed over by the upstream auth layer. Blank or invalid ids count as absent.
pub fn request_context_from_header(value: Option<&str>) -> RequestContext {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => match UserId::new(v) {
            Ok(user_id) => RequestContext::for_user(user_id),
            Err(_) => RequestContext::anonymous(),
        },
        None => RequestContext::anonymous(),
    }
}

#[derive(Debug, Default)]
pub struct AdapterRuntime {
    store: PaletteStore,
    runtime: PaletteRuntime,
    last_now: u64,
}

impl AdapterRuntime {
    pub fn new(store: PaletteStore) -> Self {
        Self {
            store,
            runtime: PaletteRuntime,
            last_now: 0,
        }
    }

    pub fn from_config(config: &AdapterConfig) -> Result<Self, String> {
        let mut runtime = Self::new(PaletteStore::new_in_memory());
        if let Some(path) = &config.seed_path {
            let seed = seed::read_seed_file(path)?;
            let now = runtime.next_now();
            let (palettes, colors) = seed::apply_seed(&mut runtime.store, &seed, now)?;
            info!(
                path = %path.display(),
                palettes,
                colors,
                "system palettes seeded"
            );
        }
        Ok(runtime)
    }

    pub fn store(&self) -> &PaletteStore {
        &self.store
    }

    /// Wall clock, forced strictly increasing so `updatedAt` always advances.
    fn next_now(&mut self) -> MonotonicTimeNs {
        let now = system_time_now_ns().max(self.last_now.saturating_add(1));
        self.last_now = now;
        MonotonicTimeNs(now)
    }

    pub fn health_report(&self) -> AdapterHealthResponse {
        AdapterHealthResponse {
            status: "ok".to_string(),
            palettes: self.store.palettes().len(),
            colors: self.store.palette_colors().len(),
        }
    }

    /// Runs one remote call. `body` is the raw JSON request body; an empty body means `{}`.
    pub fn handle_rpc(
        &mut self,
        operation: &str,
        ctx: &RequestContext,
        body: &[u8],
    ) -> (StatusCode, RpcEnvelope) {
        match self.try_handle_rpc(operation, ctx, body) {
            Ok(data) => (StatusCode::OK, RpcEnvelope::ok(data)),
            Err(err) => {
                warn!(operation, code = err.code(), error = %err, "palette rpc rejected");
                (status_for(&err), RpcEnvelope::err(&err))
            }
        }
    }

    fn try_handle_rpc(
        &mut self,
        operation: &str,
        ctx: &RequestContext,
        body: &[u8],
    ) -> Result<serde_json::Value, PaletteError> {
        require_caller(ctx)?;
        let body: serde_json::Value = if body.iter().all(u8::is_ascii_whitespace) {
            serde_json::json!({})
        } else {
            serde_json::from_slice(body).map_err(|_| {
                PaletteError::Validation(ContractViolation::InvalidValue {
                    field: "request_body",
                    reason: "must be a JSON object",
                })
            })?
        };
        let request = decode_request(operation, &body)?;
        let now = self.next_now();
        let response = self
            .runtime
            .run(&mut self.store, ctx, &PaletteRpcRequest::v1(now, request))?;
        encode_response(&response).map_err(|err| PaletteError::Internal {
            detail: err.to_string(),
        })
    }
}
