//! Event HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::*;
use crate::application::EventService;
use crate::interfaces::http::common::{ApiResponse, CurrentCaller, EmptyData, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct EventHandlerState {
    pub events: Arc<EventService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventDto>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_event(
    State(state): State<EventHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(body): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventDto>>), ApiError> {
    caller.require_admin("create events")?;
    let event = state.events.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(event.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    responses((status = 200, description = "Active events", body = ApiResponse<Vec<EventDto>>))
)]
pub async fn list_events(State(state): State<EventHandlerState>) -> ApiResult<Vec<EventDto>> {
    let events = state.events.list_active().await?;
    Ok(Json(ApiResponse::success(
        events.into_iter().map(EventDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = ApiResponse<EventDto>),
        (status = 404, description = "Unknown or deactivated event")
    )
)]
pub async fn get_event(
    State(state): State<EventHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<EventDto> {
    let event = state.events.get(&id).await?;
    Ok(Json(ApiResponse::success(event.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deactivated", body = ApiResponse<EmptyData>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown or already deactivated event"),
        (status = 409, description = "Event still has scheduled bookings")
    )
)]
pub async fn delete_event(
    State(state): State<EventHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    caller.require_admin("deactivate events")?;
    state.events.deactivate(&id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
