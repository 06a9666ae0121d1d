//! Category Routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::AppState;

/// Legal values for each categorical form field
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub data: BTreeMap<&'static str, Vec<String>>,
    pub enforced: bool,
}

/// Get dropdown choices
pub async fn get_categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    let data = state
        .universe
        .all_choices()
        .into_iter()
        .map(|(field, values)| (field, values.into_iter().map(str::to_string).collect()))
        .collect();

    Json(CategoriesResponse {
        data,
        enforced: state.predictor.validator().universe().is_some(),
    })
}
