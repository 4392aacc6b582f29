use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Recipient, RecipientRole},
    error::AppError,
};

/// Header set by the upstream gateway once it has authenticated the
/// caller. Session handling itself lives outside this service.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct CurrentUser {
    pub recipient: Recipient,
}

async fn load_user(
    state: &AppState,
    headers: &axum::http::HeaderMap,
) -> Result<CurrentUser, AppError> {
    let header = headers.get(USER_ID_HEADER).ok_or(AppError::Unauthorized)?;

    let id = header
        .to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(AppError::Unauthorized)?;

    let recipient = state
        .service_context
        .recipient_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !recipient.active {
        return Err(AppError::Unauthorized);
    }

    Ok(CurrentUser { recipient })
}

pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = load_user(&state, request.headers()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = load_user(&state, request.headers()).await?;

    if user.recipient.role != RecipientRole::Admin {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
