use axum::{Json, extract::State};
use bb_api_types::{ConfigResponse, Outcome, OutcomeKind, SaveConfigRequest};
use tracing::info;

use crate::{AppState, ApiResult};

pub(crate) async fn get_config(State(state): State<AppState>) -> ApiResult<ConfigResponse> {
    Ok(Json(ConfigResponse {
        contract_address: state.config_store.load().await,
        notice: None,
    }))
}

/// Saves the deployed contract address. No format check happens here; the
/// submission workflow validates it when it is used.
pub(crate) async fn save_config(
    State(state): State<AppState>,
    Json(request): Json<SaveConfigRequest>,
) -> ApiResult<ConfigResponse> {
    let address = request.contract_address.trim();
    state.config_store.save(address).await;
    info!("contract address saved: {:?}", address);

    Ok(Json(ConfigResponse {
        contract_address: state.config_store.load().await,
        notice: Some(Outcome::new(OutcomeKind::Saved, "Saved")),
    }))
}
