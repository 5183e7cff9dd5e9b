//! Toast notification endpoints.

use axum::{Json, extract::Path, http::StatusCode};
use serde::Serialize;
use smiley_day_core::notify::Toast;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::services::notifications;

/// `GET /api/notifications` body.
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub toasts: Vec<Toast>,
}

/// Live toasts for this session; expired ones are dropped.
#[instrument(skip(session))]
pub async fn index(session: Session) -> Result<Json<NotificationsResponse>> {
    let toasts = notifications::active(&session).await?;
    Ok(Json(NotificationsResponse { toasts }))
}

/// Dismiss a toast.
#[instrument(skip(session))]
pub async fn dismiss(session: Session, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if notifications::dismiss(&session, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Notification"))
    }
}
