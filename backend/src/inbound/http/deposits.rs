//! Deposit HTTP handlers.
//!
//! ```text
//! GET  /api/v1/deposits
//! POST /api/v1/deposits
//! POST /api/v1/deposits/manual   (owner only)
//! ```

use actix_web::{get, post, web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Deposit, DepositDraft};

use super::auth::Authenticated;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;

/// Response body listing a user's deposits.
#[derive(Debug, Serialize, ToSchema)]
pub struct DepositListBody {
    /// All deposit records for the caller.
    pub deposits: Vec<Deposit>,
}

/// Response body for a successful deposit submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct DepositCreatedBody {
    /// Always true; kept for client compatibility.
    pub success: bool,
    /// The record as written to the ledger.
    pub deposit: Deposit,
}

/// Request body for an owner-asserted manual deposit.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualDepositBody {
    /// Operator whose ledger receives the record.
    pub operator_id: Uuid,
    /// Asserted amount in minor currency units; must be positive.
    pub amount: i64,
    /// Optional note; defaults to an override marker.
    #[serde(default)]
    pub notes: Option<String>,
    /// Business date the owner asserts the money was received.
    pub date: NaiveDate,
}

/// List the caller's deposits.
#[utoipa::path(
    get,
    path = "/api/v1/deposits",
    responses(
        (status = 200, description = "Deposits", body = DepositListBody),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["deposits"],
    operation_id = "listDeposits",
    security(("BearerToken" = []))
)]
#[get("/deposits")]
pub async fn list_deposits(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<DepositListBody>> {
    let deposits = state.ledger.list_deposits(auth.principal().id).await?;
    Ok(web::Json(DepositListBody { deposits }))
}

/// Submit a deposit for the caller's own ledger.
#[utoipa::path(
    post,
    path = "/api/v1/deposits",
    request_body = DepositDraft,
    responses(
        (status = 201, description = "Deposit recorded", body = DepositCreatedBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 409, description = "Marker update lost the race", body = ApiError),
        (status = 500, description = "Partial write", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["deposits"],
    operation_id = "createDeposit",
    security(("BearerToken" = []))
)]
#[post("/deposits")]
pub async fn create_deposit(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<DepositDraft>,
) -> ApiResult<HttpResponse> {
    let deposit = state
        .ledger
        .record_deposit(auth.principal().id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(DepositCreatedBody {
        success: true,
        deposit,
    }))
}

/// Owner-asserted deposit bypassing the normal compliance flow.
#[utoipa::path(
    post,
    path = "/api/v1/deposits/manual",
    request_body = ManualDepositBody,
    responses(
        (status = 201, description = "Override recorded", body = DepositCreatedBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Owner role required", body = ApiError),
        (status = 409, description = "Marker update lost the race", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["deposits"],
    operation_id = "createManualDeposit",
    security(("BearerToken" = []))
)]
#[post("/deposits/manual")]
pub async fn create_manual_deposit(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<ManualDepositBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let deposit = state
        .ledger
        .manual_override(
            auth.principal(),
            body.operator_id,
            body.amount,
            body.notes,
            body.date,
        )
        .await?;
    Ok(HttpResponse::Created().json(DepositCreatedBody {
        success: true,
        deposit,
    }))
}
