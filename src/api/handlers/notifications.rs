use std::{convert::Infallible, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures_util::{stream::unfold, Stream};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::{middleware::identity::CurrentUser, state::AppState},
    domain::Notification,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let notifications = state
        .service_context
        .notification_service
        .list(user.recipient.id, limit, offset)
        .await?;

    Ok(Json(notifications))
}

pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>> {
    let count = state
        .service_context
        .notification_service
        .unread_count(user.recipient.id)
        .await?;

    Ok(Json(json!({ "count": count })))
}

/// Whether the recipient currently holds a live-feed connection; the
/// bell UI shows this as its connected indicator.
pub async fn status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Json<serde_json::Value> {
    let connected = state
        .service_context
        .notification_service
        .is_connected(user.recipient.id);

    Json(json!({ "connected": connected }))
}

/// Live-update channel: an SSE stream that periodically pushes the
/// unread count. The feed subscription guard lives inside the stream
/// state, so the recipient counts as connected exactly as long as the
/// stream does.
pub async fn stream(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let recipient_id = user.recipient.id;
    let service = state.service_context.notification_service.clone();
    let subscription = service.subscribe(recipient_id);
    let interval = Duration::from_secs(state.settings.feed.stream_interval_secs.max(1));

    let stream = unfold(
        (subscription, service, recipient_id, interval),
        |(subscription, service, recipient_id, interval)| async move {
            tokio::time::sleep(interval).await;
            let count = service.unread_count(recipient_id).await.unwrap_or(0);
            let event = Event::default().event("unread").data(count.to_string());
            Some((
                Ok::<_, Infallible>(event),
                (subscription, service, recipient_id, interval),
            ))
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Notification>> {
    let notification = state
        .service_context
        .notification_service
        .mark_read(user.recipient.id, id)
        .await?;

    Ok(Json(notification))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>> {
    let updated = state
        .service_context
        .notification_service
        .mark_all_read(user.recipient.id)
        .await?;

    Ok(Json(json!({ "updated": updated })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state
        .service_context
        .notification_service
        .delete(user.recipient.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>> {
    let deleted = state
        .service_context
        .notification_service
        .clear_read(user.recipient.id)
        .await?;

    Ok(Json(json!({ "deleted": deleted })))
}
