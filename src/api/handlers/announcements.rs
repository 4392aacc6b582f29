use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::identity::CurrentUser, state::AppState},
    domain::{Announcement, AnnouncementType, Audience},
    error::{AppError, Result},
    service::announcement_service::{CreateDraft, EditAnnouncement},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub announcement_type: AnnouncementType,
    #[serde(default)]
    pub audience: Audience,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub announcement_type: Option<AnnouncementType>,
    pub audience: Option<Audience>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleAnnouncementRequest {
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListAnnouncementsQuery>,
) -> Result<Json<Vec<Announcement>>> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let announcements = state
        .service_context
        .announcement_service
        .list(limit, offset)
        .await?;

    Ok(Json(announcements))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service.get(id).await?;

    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let announcement = state
        .service_context
        .announcement_service
        .create_draft(
            &user.recipient,
            CreateDraft {
                title: request.title,
                content: request.content,
                announcement_type: request.announcement_type,
                audience: request.audience,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .announcement_service
        .edit(
            id,
            &user.recipient,
            EditAnnouncement {
                title: request.title,
                content: request.content,
                announcement_type: request.announcement_type,
                audience: request.audience,
            },
        )
        .await?;

    Ok(Json(announcement))
}

pub async fn schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<ScheduleAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .announcement_service
        .schedule(id, &user.recipient, request.scheduled_at)
        .await?;

    Ok(Json(announcement))
}

pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .announcement_service
        .publish_now(id, Some(&user.recipient))
        .await?;

    Ok(Json(announcement))
}

pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .announcement_service
        .archive(id, &user.recipient)
        .await?;

    Ok(Json(announcement))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state
        .service_context
        .announcement_service
        .delete(id, &user.recipient)
        .await?;

    Ok(StatusCode::OK)
}
