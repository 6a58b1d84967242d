//! Day slots endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::SlotAvailability,
    services::slots::parse_date,
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct SlotsResponse {
    pub success: bool,
    pub date: NaiveDate,
    /// Empty for past or closed dates
    pub slots: Vec<SlotAvailability>,
}

/// Get the bookable slots of a day
#[utoipa::path(
    get,
    path = "/slots/{date}",
    tag = "availability",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Slots of the day", body = SlotsResponse),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_day_slots(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<SlotsResponse>> {
    let date = parse_date(&date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", date)))?;
    let slots = state.services.availability.day_slots(date).await?;
    Ok(Json(SlotsResponse {
        success: true,
        date,
        slots,
    }))
}
