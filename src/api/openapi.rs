//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, bookings, calendar, health, slots};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Studio Booking API",
        version = "0.1.0",
        description = "Studio availability calendar and slot booking"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        health::health_check,
        calendar::get_month,
        slots::get_day_slots,
        bookings::create_booking,
        admin::list_bookings,
        admin::create_closed_day,
        admin::list_closed_days,
    ),
    components(
        schemas(
            // Availability
            calendar::MonthResponse,
            slots::SlotsResponse,
            crate::models::CalendarDay,
            crate::models::DayStatus,
            crate::models::SlotAvailability,
            // Bookings
            bookings::BookingResponse,
            crate::models::CreateBooking,
            crate::models::booking::DurationInput,
            crate::models::BookingConfirmation,
            crate::models::Booking,
            // Admin
            admin::BookingsListResponse,
            admin::ClosedDayResponse,
            admin::ClosedDaysListResponse,
            crate::models::ClosedDay,
            crate::models::ClosedDayType,
            crate::models::CreateClosedDay,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "availability", description = "Month and day availability"),
        (name = "bookings", description = "Slot booking"),
        (name = "admin", description = "Bookings listing and closed days")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
