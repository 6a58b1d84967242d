//! Public booking endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{BookingConfirmation, CreateBooking},
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: BookingConfirmation,
}

/// Book a slot
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking confirmed", body = BookingResponse),
        (status = 400, description = "Missing or malformed fields", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot no longer available", body = crate::error::ErrorResponse),
        (status = 500, description = "Calendar or storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBooking>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let Json(data) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let booking = state.services.bookings.create(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            booking,
        }),
    ))
}
