//! Protected calculator
//! Mission: Prove the token gate works by adding two integers for an authenticated caller

use crate::auth::models::{ErrorBody, Identity};
use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CalculateParams {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Calculation {
    pub user: String,
    pub result: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculateError {
    InvalidOperands(String),
    Overflow,
}

impl std::fmt::Display for CalculateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalculateError::InvalidOperands(reason) => write!(f, "Invalid operands: {}", reason),
            CalculateError::Overflow => write!(f, "Result does not fit in a 64-bit integer"),
        }
    }
}

impl std::error::Error for CalculateError {}

impl IntoResponse for CalculateError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Add two operands on behalf of an already-validated identity.
///
/// Does no authentication of its own.
pub fn compute(identity: &Identity, a: i64, b: i64) -> Result<Calculation, CalculateError> {
    let result = a.checked_add(b).ok_or(CalculateError::Overflow)?;

    Ok(Calculation {
        user: identity.to_string(),
        result,
    })
}

/// Calculate endpoint - GET /calculate?a=..&b=..
///
/// Must sit behind `auth_middleware`, which supplies the `Identity`.
pub async fn calculate(
    Extension(identity): Extension<Identity>,
    params: Result<Query<CalculateParams>, QueryRejection>,
) -> Result<Json<Calculation>, CalculateError> {
    let Query(params) =
        params.map_err(|rejection| CalculateError::InvalidOperands(rejection.body_text()))?;

    let calculation = compute(&identity, params.a, params.b)?;
    info!(user = %identity, result = calculation.result, "🧮 Calculation served");

    Ok(Json(calculation))
}
