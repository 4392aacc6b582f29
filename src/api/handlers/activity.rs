use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{ActivityPage, ActivityQuery},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ActivityListQuery {
    pub page: Option<i64>,
    // Dashboard clients send camelCase.
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub group: Option<String>,
    pub actor: Option<Uuid>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActivityListQuery>,
) -> Result<Json<ActivityPage>> {
    let query = ActivityQuery {
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(20),
        search: params.search.filter(|s| !s.trim().is_empty()),
        group: params.group.filter(|s| !s.trim().is_empty()),
        actor: params.actor,
    };

    let page = state.service_context.activity_service.list(&query).await?;

    Ok(Json(page))
}
