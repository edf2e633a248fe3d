use axum::{Json, extract::State};
use bb_api_types::{ContractConfig, Outcome, OutcomeKind, SubmitResponse, SubmitStatusResponse};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{AppState, ApiResult, busy, failure};

/// Holds the pending flag for the lifetime of one submission.
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub(crate) async fn submit(State(state): State<AppState>) -> ApiResult<SubmitResponse> {
    let Some(_pending) = PendingGuard::acquire(&state.submit_pending) else {
        return Err(busy("a submission is already in progress"));
    };

    // Re-read on every attempt so a freshly saved address is picked up.
    let config = ContractConfig::new(state.config_store.load().await.unwrap_or_default());
    let wallet = state.wallet.session().await;

    // The draft lock is not held across the wallet write; the workflow works
    // on a snapshot that replaces the live draft only on success.
    let mut snapshot = state.draft.read().await.clone();

    let receipt = state
        .workflow
        .submit(&mut snapshot, &config, &wallet)
        .await
        .map_err(|err| failure(err.outcome()))?;

    *state.draft.write().await = snapshot;

    Ok(Json(SubmitResponse {
        tx_hash: receipt.tx_hash.0,
        chain: receipt.chain.0,
        notice: Outcome::new(
            OutcomeKind::Submitted,
            "Submitted! Check your wallet / explorer.",
        ),
    }))
}

pub(crate) async fn submit_status(State(state): State<AppState>) -> ApiResult<SubmitStatusResponse> {
    let phase = state.workflow.phase().await;
    Ok(Json(SubmitStatusResponse {
        chain: state.workflow.chain().0.clone(),
        phase: phase.label().to_owned(),
        pending: state.submit_pending.load(Ordering::SeqCst),
    }))
}
