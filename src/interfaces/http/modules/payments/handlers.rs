//! Payment HTTP handlers
//!
//! Creation and lookup hang off the reservation routes; this module only
//! settles payments.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use super::dto::*;
use crate::application::PaymentService;
use crate::interfaces::http::common::{ApiResponse, CurrentCaller};
use crate::interfaces::http::error::ApiResult;

#[derive(Clone)]
pub struct PaymentHandlerState {
    pub payments: Arc<PaymentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/complete",
    tag = "Payments",
    params(("id" = String, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment settled", body = ApiResponse<PaymentDto>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Payment belongs to another user"),
        (status = 404, description = "Unknown payment"),
        (status = 409, description = "Payment is not pending")
    )
)]
pub async fn complete_payment(
    State(state): State<PaymentHandlerState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> ApiResult<PaymentDto> {
    let payment = state.payments.complete(&id, &caller).await?;
    Ok(Json(ApiResponse::success(payment.into())))
}
