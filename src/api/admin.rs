//! Admin endpoints (bookings listing, closed-day register)
//!
//! Failures here surface the underlying error text.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Booking, ClosedDay, CreateClosedDay},
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct BookingsListResponse {
    pub success: bool,
    /// Ordered by start instant
    pub bookings: Vec<Booking>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosedDayResponse {
    pub success: bool,
    pub closed_day: ClosedDay,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosedDaysListResponse {
    pub success: bool,
    pub closed_days: Vec<ClosedDay>,
}

/// List all bookings
#[utoipa::path(
    get,
    path = "/admin/bookings",
    tag = "admin",
    responses(
        (status = 200, description = "All bookings", body = BookingsListResponse)
    )
)]
pub async fn list_bookings(State(state): State<AppState>) -> AppResult<Json<BookingsListResponse>> {
    let bookings = state
        .services
        .bookings
        .list_all()
        .await
        .map_err(AppError::expose)?;
    Ok(Json(BookingsListResponse {
        success: true,
        bookings,
    }))
}

/// Declare a closed day
#[utoipa::path(
    post,
    path = "/admin/closed-days",
    tag = "admin",
    request_body = CreateClosedDay,
    responses(
        (status = 201, description = "Closed day stored", body = ClosedDayResponse),
        (status = 400, description = "Invalid date or type", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_closed_day(
    State(state): State<AppState>,
    payload: Result<Json<CreateClosedDay>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ClosedDayResponse>)> {
    let Json(data) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let closed_day = state
        .services
        .closed_days
        .add(&data)
        .await
        .map_err(AppError::expose)?;
    Ok((
        StatusCode::CREATED,
        Json(ClosedDayResponse {
            success: true,
            closed_day,
        }),
    ))
}

/// List declared closed days
#[utoipa::path(
    get,
    path = "/admin/closed-days",
    tag = "admin",
    responses(
        (status = 200, description = "Declared closed days", body = ClosedDaysListResponse)
    )
)]
pub async fn list_closed_days(
    State(state): State<AppState>,
) -> AppResult<Json<ClosedDaysListResponse>> {
    let closed_days = state
        .services
        .closed_days
        .list()
        .await
        .map_err(AppError::expose)?;
    Ok(Json(ClosedDaysListResponse {
        success: true,
        closed_days,
    }))
}
