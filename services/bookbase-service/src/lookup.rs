use axum::{
    Json,
    extract::{Path, State},
};
use bb_api_types::{LookupResponse, Outcome, OutcomeKind};
use bb_mint_core::FormState;

use tracing::debug;

use crate::{AppState, ApiResult, bad_request, busy, failure};

pub(crate) async fn get_lookup(State(state): State<AppState>) -> ApiResult<LookupResponse> {
    Ok(Json(LookupResponse {
        loading: state.lookup.is_loading(),
        candidates: state.draft.read().await.candidates.clone(),
        notice: None,
    }))
}

/// Looks up the title currently in the form. The lookup client admits one
/// search at a time, so an overlapping request gets 409.
pub(crate) async fn run_lookup(State(state): State<AppState>) -> ApiResult<LookupResponse> {
    if state.lookup.is_loading() {
        return Err(busy("a lookup is already in progress"));
    }

    let title = {
        let mut draft = state.draft.write().await;
        draft.candidates.clear();
        draft.form.title.clone()
    };

    let candidates = state
        .lookup
        .search(&title)
        .await
        .map_err(|err| failure(err.outcome()))?;

    let notice = if candidates.is_empty() {
        Outcome::new(OutcomeKind::NoResults, "No results found.")
    } else {
        Outcome::new(
            OutcomeKind::CandidatesFound,
            format!("{} suggestions, pick one to fill the form", candidates.len()),
        )
    };

    {
        let mut draft = state.draft.write().await;
        // The form may have been submitted or retitled while the request ran.
        if draft.form.title == title {
            draft.candidates = candidates.clone();
        } else {
            debug!("dropping lookup results for {:?}, form title changed", title);
        }
    }

    Ok(Json(LookupResponse {
        loading: state.lookup.is_loading(),
        candidates,
        notice: Some(notice),
    }))
}

pub(crate) async fn select_candidate(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<FormState> {
    let mut draft = state.draft.write().await;
    if !draft.select_candidate(index) {
        return Err(bad_request("no candidate at that position"));
    }
    Ok(Json(draft.form.clone()))
}
