//! Domain error to HTTP status mapping
//!
//! The only place in the crate that knows about status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::common::ApiResponse;
use crate::shared::errors::{DomainError, ErrorKind};

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// No usable caller identity on the request
    Unauthorized(String),
    /// Request could not be parsed
    BadRequest(String),
    /// Request parsed but broke a field rule
    Unprocessable(String),
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict | ErrorKind::StateTransition | ErrorKind::DeletionNotAllowed => {
            StatusCode::CONFLICT
        }
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Integrity => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(e) => status_for(e.kind()),
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Domain(e) => e.to_string(),
            Self::Unauthorized(m) | Self::BadRequest(m) | Self::Unprocessable(m) => m.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        }
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn domain_kinds_map_to_statuses() {
        let cases = [
            (DomainError::VenueNotFound("v1".into()), StatusCode::NOT_FOUND),
            (
                DomainError::AvailabilityConflict {
                    venue_id: "v1".into(),
                    dates: vec![NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()],
                },
                StatusCode::CONFLICT,
            ),
            (DomainError::BookingConflict("venue:v1".into()), StatusCode::CONFLICT),
            (
                DomainError::ReservationCompletedCannotCancel("r1".into()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::DeletionNotAllowed {
                    entity: "venue",
                    id: "v1".into(),
                    scheduled: 1,
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::GuestCountExceedsCapacity {
                    guests: 300,
                    capacity: 200,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (DomainError::Integrity("mirror".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Storage("db".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err.clone()).status(), expected, "{err}");
        }
    }

    #[test]
    fn transport_errors_have_fixed_statuses() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }
}
