//! Row <-> domain conversion helpers shared by the SeaORM repositories

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{DomainError, DomainResult};
use crate::shared::errors::InfraError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> DomainResult<String> {
    serde_json::to_string(value).map_err(|e| InfraError::Serialization(e).into())
}

pub(crate) fn from_json<T: DeserializeOwned>(column: &str, raw: &str) -> DomainResult<T> {
    serde_json::from_str(raw)
        .map_err(|e| DomainError::Storage(format!("Corrupt {column} column: {e}")))
}

pub(crate) fn decimal(column: &str, raw: &str) -> DomainResult<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| DomainError::Storage(format!("Corrupt {column} column '{raw}': {e}")))
}

pub(crate) fn parse_enum<T>(column: &str, raw: &str, parse: fn(&str) -> Option<T>) -> DomainResult<T> {
    parse(raw).ok_or_else(|| DomainError::Storage(format!("Unknown {column} value '{raw}'")))
}

pub(crate) fn to_i32(column: &str, value: u32) -> DomainResult<i32> {
    i32::try_from(value).map_err(|_| DomainError::Validation(format!("{column} {value} is too large")))
}

pub(crate) fn to_u32(column: &str, value: i32) -> DomainResult<u32> {
    u32::try_from(value).map_err(|_| DomainError::Storage(format!("Negative {column} value {value}")))
}
