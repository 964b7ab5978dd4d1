//! Expense HTTP handlers.
//!
//! ```text
//! GET  /api/v1/expenses
//! POST /api/v1/expenses
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Expense, ExpenseDraft};

use super::auth::Authenticated;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;

/// Response body listing a user's expenses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseListBody {
    /// All expense records for the caller.
    pub expenses: Vec<Expense>,
}

/// Response body for a successful expense submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseCreatedBody {
    /// Always true; kept for client compatibility.
    pub success: bool,
    /// The record as written to the ledger.
    pub expense: Expense,
}

/// List the caller's expenses.
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    responses(
        (status = 200, description = "Expenses", body = ExpenseListBody),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses",
    security(("BearerToken" = []))
)]
#[get("/expenses")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<ExpenseListBody>> {
    let expenses = state.ledger.list_expenses(auth.principal().id).await?;
    Ok(web::Json(ExpenseListBody { expenses }))
}

/// Record an expense against the caller's ledger.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = ExpenseDraft,
    responses(
        (status = 201, description = "Expense recorded", body = ExpenseCreatedBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["expenses"],
    operation_id = "createExpense",
    security(("BearerToken" = []))
)]
#[post("/expenses")]
pub async fn create_expense(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<ExpenseDraft>,
) -> ApiResult<HttpResponse> {
    let expense = state
        .ledger
        .record_expense(auth.principal().id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ExpenseCreatedBody {
        success: true,
        expense,
    }))
}
