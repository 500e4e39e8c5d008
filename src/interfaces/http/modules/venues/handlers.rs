//! Venue HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::*;
use crate::application::{ReservationService, VenueService};
use crate::domain::venue::VenueDetails;
use crate::interfaces::http::common::{ApiResponse, CurrentCaller, EmptyData, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::modules::reservations::ReservationDto;

#[derive(Clone)]
pub struct VenueHandlerState {
    pub venues: Arc<VenueService>,
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/venues",
    tag = "Venues",
    request_body = VenueRequest,
    responses(
        (status = 201, description = "Venue registered", body = ApiResponse<VenueDto>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 409, description = "Name already used by an active venue"),
        (status = 422, description = "Capacity does not fit the venue type")
    )
)]
pub async fn register_venue(
    State(state): State<VenueHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(body): ValidatedJson<VenueRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VenueDto>>), ApiError> {
    caller.require_admin("register venues")?;
    let details = VenueDetails::try_from(body)?;
    let venue = state.venues.register(details).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(venue.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues",
    tag = "Venues",
    responses((status = 200, description = "Active venues", body = ApiResponse<Vec<VenueDto>>))
)]
pub async fn list_venues(State(state): State<VenueHandlerState>) -> ApiResult<Vec<VenueDto>> {
    let venues = state.venues.list_active().await?;
    Ok(Json(ApiResponse::success(
        venues.into_iter().map(VenueDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{id}",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue details", body = ApiResponse<VenueDto>),
        (status = 404, description = "Unknown or deactivated venue")
    )
)]
pub async fn get_venue(
    State(state): State<VenueHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<VenueDto> {
    let venue = state.venues.get(&id).await?;
    Ok(Json(ApiResponse::success(venue.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/venues/{id}",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue ID")),
    request_body = VenueRequest,
    responses(
        (status = 200, description = "Venue updated", body = ApiResponse<VenueDto>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown or deactivated venue"),
        (status = 409, description = "Name already used by another active venue"),
        (status = 422, description = "Capacity does not fit the venue type")
    )
)]
pub async fn update_venue(
    State(state): State<VenueHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<VenueRequest>,
) -> ApiResult<VenueDto> {
    caller.require_admin("update venues")?;
    let details = VenueDetails::try_from(body)?;
    let venue = state.venues.update(&id, details).await?;
    Ok(Json(ApiResponse::success(venue.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/venues/{id}",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue deactivated", body = ApiResponse<EmptyData>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown or already deactivated venue"),
        (status = 409, description = "Venue still has scheduled bookings")
    )
)]
pub async fn delete_venue(
    State(state): State<VenueHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    caller.require_admin("deactivate venues")?;
    state.venues.deactivate(&id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{id}/occupied-dates",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Dates held by non-cancelled bookings", body = ApiResponse<OccupiedDatesResponse>),
        (status = 404, description = "Unknown or deactivated venue")
    )
)]
pub async fn occupied_dates(
    State(state): State<VenueHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<OccupiedDatesResponse> {
    let dates = state.reservations.occupied_dates(&id).await?;
    Ok(Json(ApiResponse::success(OccupiedDatesResponse {
        venue_id: id,
        dates,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/venues/{id}/availability",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue ID")),
    request_body = DatesRequest,
    responses(
        (status = 200, description = "Whether every date is free", body = ApiResponse<AvailabilityResponse>),
        (status = 404, description = "Unknown or deactivated venue"),
        (status = 422, description = "Empty or past dates")
    )
)]
pub async fn check_availability(
    State(state): State<VenueHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<DatesRequest>,
) -> ApiResult<AvailabilityResponse> {
    let available = state.reservations.are_dates_available(&body.dates, &id).await?;
    Ok(Json(ApiResponse::success(AvailabilityResponse {
        venue_id: id,
        available,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{id}/reservations",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Every reservation of the venue", body = ApiResponse<Vec<ReservationDto>>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown venue")
    )
)]
pub async fn venue_reservations(
    State(state): State<VenueHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state.reservations.list_for_venue(&id, &caller).await?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}
