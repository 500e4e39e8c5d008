//! Shared HTTP building blocks: response envelope, caller extraction and
//! validated request bodies.

mod caller;
mod validated_json;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use caller::{CurrentCaller, USER_ID_HEADER, USER_ROLE_HEADER};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Envelope returned by every JSON endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload, `null` on error
    pub data: Option<T>,
    /// Error description, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body for operations with nothing to return
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}
