//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{DeletedResponse, PublishNoticeRequest};
use super::handlers::{appointment, barber, calendar, insight, notice, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Path of the generated OpenAPI JSON document.
pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Aggregated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "barber-desk",
        description = "Administrative API for a small barbershop: appointments, calendar, barbers, notices and reports."
    ),
    paths(
        appointment::list_appointments,
        appointment::get_appointment,
        appointment::create_appointment,
        appointment::update_appointment,
        appointment::patch_appointment,
        appointment::delete_appointment,
        calendar::month_calendar,
        calendar::today_schedule,
        barber::list_barbers,
        barber::get_barber,
        barber::create_barber,
        barber::update_barber,
        barber::toggle_barber_status,
        barber::delete_barber,
        notice::list_notices,
        notice::active_notice,
        notice::publish_notice,
        notice::activate_notice,
        notice::deactivate_notice,
        notice::delete_notice,
        insight::dashboard,
        insight::report,
        system::health_handler,
    ),
    components(schemas(ErrorResponse, ErrorBody, DeletedResponse, PublishNoticeRequest)),
    tags(
        (name = "Appointments", description = "Booking lifecycle"),
        (name = "Calendar", description = "Month grid and today's schedule"),
        (name = "Barbers", description = "Staff roster"),
        (name = "Notices", description = "Broadcast notices"),
        (name = "Insights", description = "Dashboard and reports"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;
