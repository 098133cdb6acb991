//! Response helpers. Bodies are bare JSON: records, arrays of records, or `null`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}
