//! User HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::*;
use crate::application::{ReservationService, UserService};
use crate::domain::user::NewUser;
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiResponse, CurrentCaller, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::modules::reservations::ReservationDto;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn register_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(body): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let new = NewUser::try_from(body)?;
    let user = state.users.register(new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with booking view", body = ApiResponse<UserDto>),
        (status = 403, description = "Caller may not view this user"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<UserDto> {
    if !caller.may_act_for(&id) {
        return Err(DomainError::Forbidden(format!(
            "user {} may not view user {id}",
            caller.user_id
        ))
        .into());
    }
    let user = state.users.get(&id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/reservations",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Reservations of the user", body = ApiResponse<Vec<ReservationDto>>),
        (status = 403, description = "Caller may not view this user"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn user_reservations(
    State(state): State<UserHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state.reservations.list_for_user(&id, &caller).await?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}
