//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use learnhub_core::error::AppError;

use crate::error::ApiError;
use learnhub_entity::Notification;
use learnhub_service::notification::service::NotificationPage;

use crate::dto::request::{BulkCreateNotificationRequest, CreateNotificationRequest};
use crate::dto::response::{ApiResponse, CountResponse, MarkedResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<NotificationPage>>, ApiError> {
    let unread_only = params.unread_only;
    let page = state
        .notification_service
        .list(auth.user_id, params.into_page_request(), unread_only)
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
///
/// Idempotent; an unknown or foreign id yields `data: null` rather than
/// an error, so notification existence never leaks across users.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<Notification>>>, ApiError> {
    let updated = state
        .notification_service
        .mark_read(id, auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state
        .notification_service
        .mark_all_read(auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<Notification>>>, ApiError> {
    let deleted = state.notification_service.delete(id, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(deleted)))
}

/// POST /api/notifications — privileged producers only
pub async fn create_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    require_producer(&auth)?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let created = state
        .notification_service
        .create(req.into_new_notification(auth.user_id))
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// POST /api/notifications/bulk — privileged producers only
pub async fn create_bulk_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BulkCreateNotificationRequest>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    require_producer(&auth)?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let created = state
        .notification_service
        .create_bulk(req.into_bulk_notification(auth.user_id))
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

fn require_producer(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.role.can_create_notifications() {
        return Err(AppError::authorization(
            "Only administrators may create notifications",
        ));
    }
    Ok(())
}
