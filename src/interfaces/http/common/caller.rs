//! Caller identity extractor
//!
//! Authentication happens upstream; the gateway forwards the resolved
//! identity as `X-User-Id` and `X-User-Role`. A missing role means CLIENT.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::user::{Caller, UserRole};
use crate::interfaces::http::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extracts the [`Caller`] on whose behalf a request runs.
#[derive(Debug, Clone)]
pub struct CurrentCaller(pub Caller);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for CurrentCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("missing X-User-Id header".into()))?;

        let role = match header(parts, USER_ROLE_HEADER) {
            None => UserRole::Client,
            Some(raw) => UserRole::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown role '{raw}'")))?,
        };

        Ok(Self(Caller::new(user_id, role)))
    }
}
