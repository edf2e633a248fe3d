mod config;
mod contract_config;
mod form;
mod lookup;
mod submit;
mod wallet;


use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use bb_api_types::{ChainId, Mood, Outcome, OutcomeKind};
use bb_chain_base::BaseAdapter;
use bb_chain_client::{ChainRegistry, WalletProvider};
use bb_lookup::{BookSource, LookupClient, OpenLibrarySource};
use bb_mint_core::{Draft, SubmissionWorkflow};
use bb_storage::ContractConfigStore;
use bb_wallet_session::WalletSessionManager;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServiceConfig;

#[derive(Debug, Serialize)]
struct HealthResponse {
    service: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<OutcomeKind>,
    error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);
pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

/// Everything one user session needs. The draft is the only state that
/// lives solely in memory.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config_store: ContractConfigStore,
    pub(crate) lookup: Arc<LookupClient>,
    pub(crate) wallet: Arc<WalletSessionManager>,
    pub(crate) workflow: Arc<SubmissionWorkflow>,
    pub(crate) draft: Arc<RwLock<Draft>>,
    pub(crate) submit_pending: Arc<AtomicBool>,
}

impl AppState {
    pub(crate) fn new(
        config_store: ContractConfigStore,
        source: Arc<dyn BookSource>,
        provider: Arc<dyn WalletProvider>,
        chains: ChainRegistry,
        chain: ChainId,
    ) -> Self {
        Self {
            config_store,
            lookup: Arc::new(LookupClient::new(source)),
            wallet: Arc::new(WalletSessionManager::new(provider)),
            workflow: Arc::new(SubmissionWorkflow::new(chains, chain)),
            draft: Arc::new(RwLock::new(Draft::default())),
            submit_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    fn from_config(config: &ServiceConfig) -> Self {
        let base = Arc::new(BaseAdapter::new(
            Some(config.wallet_rpc_url.clone()),
            config.network,
        ));
        let mut chains = ChainRegistry::default();
        chains.register(base.clone());

        Self::new(
            ContractConfigStore::open_or_noop(&config.data_dir),
            Arc::new(OpenLibrarySource::new(Some(config.openlibrary_url.clone()))),
            base,
            chains,
            ChainId(config.network.slug().to_owned()),
        )
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/moods", get(moods))
        .route(
            "/config",
            get(contract_config::get_config).put(contract_config::save_config),
        )
        .route(
            "/form",
            get(form::get_form)
                .patch(form::update_form)
                .delete(form::reset_form),
        )
        .route("/lookup", get(lookup::get_lookup).post(lookup::run_lookup))
        .route("/lookup/select/{index}", post(lookup::select_candidate))
        .route("/wallet/session", get(wallet::wallet_session))
        .route("/wallet/connect", post(wallet::wallet_connect))
        .route("/wallet/disconnect", post(wallet::wallet_disconnect))
        .route("/submit", post(submit::submit))
        .route("/submit/status", get(submit::submit_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::from_env()?;
    let state = AppState::from_config(&config);
    let app = router(state);

    info!(
        "bookbase-service listening on {} (chain {}, wallet rpc {:?})",
        config.bind_addr,
        config.network.slug(),
        config.wallet_rpc_url
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "bookbase-service",
        status: "ok",
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "bookbase-service",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn moods() -> Json<Vec<&'static str>> {
    Json(Mood::ALL.iter().map(|mood| mood.as_str()).collect())
}

pub(crate) fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            kind: None,
            error: message.to_owned(),
        }),
    )
}

pub(crate) fn busy(message: &str) -> ApiError {
    failure(Outcome::new(OutcomeKind::Busy, message))
}

/// Maps a user-facing outcome onto a status code.
pub(crate) fn failure(outcome: Outcome) -> ApiError {
    let status = match outcome.kind {
        OutcomeKind::Busy => StatusCode::CONFLICT,
        OutcomeKind::LookupFailed
        | OutcomeKind::NoWalletAvailable
        | OutcomeKind::WalletConnectionRejected
        | OutcomeKind::SubmissionFailed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            kind: Some(outcome.kind),
            error: outcome.message,
        }),
    )
}
