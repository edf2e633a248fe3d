use axum::{Json, extract::State};
use bb_api_types::{Outcome, OutcomeKind, WalletSessionResponse};

use crate::{AppState, ApiResult, failure};

pub(crate) async fn wallet_session(State(state): State<AppState>) -> ApiResult<WalletSessionResponse> {
    Ok(Json(state.wallet.response().await))
}

pub(crate) async fn wallet_connect(State(state): State<AppState>) -> ApiResult<WalletSessionResponse> {
    let address = state
        .wallet
        .connect()
        .await
        .map_err(|err| failure(err.outcome()))?;

    Ok(Json(WalletSessionResponse {
        notice: Some(Outcome::new(
            OutcomeKind::Connected,
            format!("Connected as {address}"),
        )),
        ..state.wallet.response().await
    }))
}

pub(crate) async fn wallet_disconnect(
    State(state): State<AppState>,
) -> ApiResult<WalletSessionResponse> {
    state.wallet.disconnect().await;
    Ok(Json(WalletSessionResponse {
        notice: Some(Outcome::new(OutcomeKind::Disconnected, "Wallet disconnected")),
        ..state.wallet.response().await
    }))
}
