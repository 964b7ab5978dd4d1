//! Analytics HTTP handler.
//!
//! ```text
//! GET /api/v1/analytics
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::AnalyticsSnapshot;

use super::auth::Authenticated;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;

/// Response body wrapping the derived snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsBody {
    /// Income/expense metrics recomputed for this request.
    pub analytics: AnalyticsSnapshot,
}

/// Compute income, expense, and break-even metrics for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/analytics",
    responses(
        (status = 200, description = "Analytics snapshot", body = AnalyticsBody),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 503, description = "Storage unavailable", body = ApiError)
    ),
    tags = ["analytics"],
    operation_id = "getAnalytics",
    security(("BearerToken" = []))
)]
#[get("/analytics")]
pub async fn get_analytics(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<AnalyticsBody>> {
    let analytics = state.analytics.analytics(auth.principal().id).await?;
    Ok(web::Json(AnalyticsBody { analytics }))
}
