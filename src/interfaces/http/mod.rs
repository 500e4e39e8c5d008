//! HTTP REST API
//!
//! - `common`: response envelope, caller extractor, validated JSON bodies
//! - `error`: domain error to status code mapping
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table, OpenAPI document and Swagger UI

pub mod common;
pub mod dto;
pub mod error;
pub mod modules;
pub mod router;

pub use error::{ApiError, ApiResult};
pub use router::{create_api_router, ApiDoc, AppState};
