//! Month availability endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::CalendarDay,
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct MonthResponse {
    pub success: bool,
    /// One entry per day of the month, ascending
    pub data: Vec<CalendarDay>,
    /// YYYY-MM
    pub month: String,
}

/// Get the status of every day of a month
#[utoipa::path(
    get,
    path = "/calendar/{year}/{month}",
    tag = "availability",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month (1-12)")
    ),
    responses(
        (status = 200, description = "Month availability", body = MonthResponse),
        (status = 400, description = "Invalid year or month", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(String, String)>,
) -> AppResult<Json<MonthResponse>> {
    let year: i32 = year
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid year: {}", year)))?;
    let month: u32 = month
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid month: {}", month)))?;

    let view = state
        .services
        .availability
        .month_availability(year, month)
        .await?;

    Ok(Json(MonthResponse {
        success: true,
        data: view.days,
        month: view.month,
    }))
}
