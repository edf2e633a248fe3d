use axum::{Json, extract::State};
use bb_api_types::Mood;
use bb_mint_core::{FormField, FormState};
use serde::Deserialize;

use crate::{AppState, ApiResult, bad_request};

#[derive(Debug, Deserialize)]
pub(crate) struct FormPatchRequest {
    field: FormField,
    value: String,
}

pub(crate) async fn get_form(State(state): State<AppState>) -> ApiResult<FormState> {
    Ok(Json(state.draft.read().await.form.clone()))
}

pub(crate) async fn update_form(
    State(state): State<AppState>,
    Json(request): Json<FormPatchRequest>,
) -> ApiResult<FormState> {
    if request.field == FormField::Mood
        && !request.value.is_empty()
        && Mood::parse(&request.value).is_none()
    {
        return Err(bad_request("mood must be one of the listed moods or empty"));
    }

    let mut draft = state.draft.write().await;
    draft.set_field(request.field, request.value);
    Ok(Json(draft.form.clone()))
}

pub(crate) async fn reset_form(State(state): State<AppState>) -> ApiResult<FormState> {
    let mut draft = state.draft.write().await;
    draft.form = FormState::reset();
    Ok(Json(draft.form.clone()))
}
