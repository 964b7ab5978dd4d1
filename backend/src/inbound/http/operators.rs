//! Operator administration and login-check handlers.
//!
//! ```text
//! GET /api/v1/operators            (owner only)
//! PUT /api/v1/operators/{id}       (owner only)
//! GET /api/v1/check-login/{id}
//! ```

use actix_web::{get, put, web};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{LoginStatus, OperatorSummary, UserRecord};

use super::auth::Authenticated;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;

/// Response body listing enriched operators.
#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorListBody {
    /// Every operator account with lifetime deposit totals.
    pub operators: Vec<OperatorSummary>,
}

/// Response body for an operator profile update.
#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorUpdatedBody {
    /// Always true; kept for client compatibility.
    pub success: bool,
    /// The merged record as stored.
    pub operator: UserRecord,
}

/// List operators enriched with deposit totals.
#[utoipa::path(
    get,
    path = "/api/v1/operators",
    responses(
        (status = 200, description = "Operators", body = OperatorListBody),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Owner role required", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["operators"],
    operation_id = "listOperators",
    security(("BearerToken" = []))
)]
#[get("/operators")]
pub async fn list_operators(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<OperatorListBody>> {
    let operators = state.analytics.list_operators(auth.principal()).await?;
    Ok(web::Json(OperatorListBody { operators }))
}

/// Merge profile fields into an operator record.
#[utoipa::path(
    put,
    path = "/api/v1/operators/{id}",
    request_body = Object,
    params(("id" = Uuid, Path, description = "Operator account id")),
    responses(
        (status = 200, description = "Operator updated", body = OperatorUpdatedBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Owner role required", body = ApiError),
        (status = 409, description = "Update lost the race", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["operators"],
    operation_id = "updateOperator",
    security(("BearerToken" = []))
)]
#[put("/operators/{id}")]
pub async fn update_operator(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<OperatorUpdatedBody>> {
    let operator = state
        .ledger
        .update_operator(auth.principal(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(web::Json(OperatorUpdatedBody {
        success: true,
        operator,
    }))
}

/// Check whether an operator may log in right now.
///
/// Unauthenticated by design: the login screen calls this before any
/// bearer token exists.
#[utoipa::path(
    get,
    path = "/api/v1/check-login/{id}",
    params(("id" = Uuid, Path, description = "Operator account id")),
    responses(
        (status = 200, description = "Login eligibility", body = LoginStatus),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["operators"],
    operation_id = "checkLogin",
    security([])
)]
#[get("/check-login/{id}")]
pub async fn check_login(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<LoginStatus>> {
    let status = state.compliance.check_login(path.into_inner()).await?;
    Ok(web::Json(status))
}
