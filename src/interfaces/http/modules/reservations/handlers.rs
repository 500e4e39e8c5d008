//! Reservation HTTP handlers
//!
//! Every route acts on behalf of the caller forwarded by the gateway.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::*;
use crate::application::{PaymentService, ReservationService};
use crate::interfaces::http::common::{ApiResponse, CurrentCaller, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::modules::payments::PaymentDto;

#[derive(Clone)]
pub struct ReservationHandlerState {
    pub reservations: Arc<ReservationService>,
    pub payments: Arc<PaymentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    params(
        ("X-User-Id" = String, Header, description = "Caller user id"),
        ("X-User-Role" = Option<String>, Header, description = "CLIENT or ADMIN")
    ),
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 401, description = "Missing caller identity"),
        (status = 404, description = "Unknown venue, event or user"),
        (status = 409, description = "Dates already booked, or the venue is busy"),
        (status = 422, description = "Invalid dates, guest count or venue capacity")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(body): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state.reservations.create(body.into(), &caller).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(
        ("id" = String, Path, description = "Reservation ID"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Not the caller's reservation"),
        (status = 404, description = "Unknown reservation")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.reservations.get(&id, &caller).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(
        ("id" = String, Path, description = "Reservation ID"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Not the caller's reservation"),
        (status = 404, description = "Unknown reservation"),
        (status = 409, description = "Already cancelled or completed")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.reservations.cancel(&id, &caller).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/complete",
    tag = "Reservations",
    params(
        ("id" = String, Path, description = "Reservation ID"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 200, description = "Reservation completed", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Unknown reservation"),
        (status = 409, description = "Not scheduled, or dates not yet elapsed")
    )
)]
pub async fn complete_reservation(
    State(state): State<ReservationHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.reservations.complete(&id, &caller).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/complete-elapsed",
    tag = "Reservations",
    params(
        ("X-User-Id" = String, Header, description = "Caller user id"),
        ("X-User-Role" = String, Header, description = "Must be ADMIN")
    ),
    responses(
        (status = 200, description = "Reservations moved to COMPLETADA", body = ApiResponse<Vec<ReservationDto>>),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn complete_elapsed(
    State(state): State<ReservationHandlerState>,
    CurrentCaller(caller): CurrentCaller,
) -> ApiResult<Vec<ReservationDto>> {
    let completed = state.reservations.complete_elapsed(&caller).await?;
    Ok(Json(ApiResponse::success(
        completed.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/payment",
    tag = "Payments",
    params(
        ("id" = String, Path, description = "Reservation ID"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 201, description = "Pending payment created", body = ApiResponse<PaymentDto>),
        (status = 404, description = "Unknown reservation"),
        (status = 409, description = "Reservation already has a payment"),
        (status = 422, description = "Reservation is not scheduled")
    )
)]
pub async fn create_payment(
    State(state): State<ReservationHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentDto>>), ApiError> {
    let payment = state.payments.create_for_reservation(&id, &caller).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(payment.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}/payment",
    tag = "Payments",
    params(
        ("id" = String, Path, description = "Reservation ID"),
        ("X-User-Id" = String, Header, description = "Caller user id")
    ),
    responses(
        (status = 200, description = "Payment of the reservation", body = ApiResponse<PaymentDto>),
        (status = 404, description = "Unknown reservation or no payment yet")
    )
)]
pub async fn get_payment(
    State(state): State<ReservationHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<PaymentDto> {
    let payment = state.payments.find_by_reservation(&id, &caller).await?;
    Ok(Json(ApiResponse::success(payment.into())))
}
