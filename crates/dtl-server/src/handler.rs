use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use dtl_dispatch::{Channel, DispatchError, Dispatcher, ErrorKind, Operation};
use dtl_ledger::TxClock;
use dtl_store::StateStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

/// Dispatcher over type-erased host services.
pub type SharedDispatcher = Dispatcher<Arc<dyn StateStore>, Arc<dyn TxClock>>;

/// Router state. Calls are serialized through the mutex, one transaction at
/// a time.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Mutex<SharedDispatcher>>,
}

impl AppState {
    pub fn new(dispatcher: SharedDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
        }
    }
}

/// Body of `/v1/invoke` and `/v1/query`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Successful call result; `payload` is hex-encoded entity bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResponse {
    pub payload: Option<String>,
}

/// Failed call result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

/// A dispatch failure rendered as an HTTP response.
pub struct ApiError(DispatchError);

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            k if k.is_caller_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!(%kind, error = %self.0, "call failed");
        }
        let body = ErrorResponse {
            kind,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    let operations: Vec<_> = Operation::ALL
        .iter()
        .map(|op| {
            json!({
                "name": op.name(),
                "channel": op.channel(),
                "params": op.params(),
            })
        })
        .collect();
    Json(json!({
        "name": "dtl-server",
        "version": env!("CARGO_PKG_VERSION"),
        "operations": operations,
    }))
}

pub async fn invoke_handler(
    State(state): State<AppState>,
    Json(req): Json<CallRequest>,
) -> Result<Json<CallResponse>, ApiError> {
    call(&state, Channel::Invoke, req).await
}

pub async fn query_handler(
    State(state): State<AppState>,
    Json(req): Json<CallRequest>,
) -> Result<Json<CallResponse>, ApiError> {
    call(&state, Channel::Query, req).await
}

async fn call(
    state: &AppState,
    channel: Channel,
    req: CallRequest,
) -> Result<Json<CallResponse>, ApiError> {
    let dispatcher = state.dispatcher.lock().await;
    let payload = match channel {
        Channel::Invoke => dispatcher.invoke(&req.function, &req.args)?,
        Channel::Query => dispatcher.query(&req.function, &req.args)?,
    };
    Ok(Json(CallResponse {
        payload: payload.map(hex::encode),
    }))
}
