//! Rental catalogue HTTP handlers.
//!
//! ```text
//! GET  /api/v1/items
//! POST /api/v1/items
//! GET  /api/v1/categories
//! POST /api/v1/categories
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Category, CategoryDraft, RentalItem, RentalItemDraft};

use super::auth::Authenticated;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;

/// Response body listing a user's rental items.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemListBody {
    /// All rental items owned by the caller.
    pub items: Vec<RentalItem>,
}

/// Response body for a created rental item.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemCreatedBody {
    /// Always true; kept for client compatibility.
    pub success: bool,
    /// The record as stored.
    pub item: RentalItem,
}

/// Response body listing a user's categories.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListBody {
    /// All categories owned by the caller.
    pub categories: Vec<Category>,
}

/// Response body for a created category.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryCreatedBody {
    /// Always true; kept for client compatibility.
    pub success: bool,
    /// The record as stored.
    pub category: Category,
}

/// List the caller's rental items.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    responses(
        (status = 200, description = "Rental items", body = ItemListBody),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["rentals"],
    operation_id = "listItems",
    security(("BearerToken" = []))
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<ItemListBody>> {
    let items = state.rentals.list_items(auth.principal().id).await?;
    Ok(web::Json(ItemListBody { items }))
}

/// Add a rental item to the caller's catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = RentalItemDraft,
    responses(
        (status = 201, description = "Item created", body = ItemCreatedBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["rentals"],
    operation_id = "createItem",
    security(("BearerToken" = []))
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<RentalItemDraft>,
) -> ApiResult<HttpResponse> {
    let item = state
        .rentals
        .add_item(auth.principal().id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ItemCreatedBody {
        success: true,
        item,
    }))
}

/// List the caller's categories.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories", body = CategoryListBody),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["rentals"],
    operation_id = "listCategories",
    security(("BearerToken" = []))
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<CategoryListBody>> {
    let categories = state.rentals.list_categories(auth.principal().id).await?;
    Ok(web::Json(CategoryListBody { categories }))
}

/// Add a category for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryDraft,
    responses(
        (status = 201, description = "Category created", body = CategoryCreatedBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["rentals"],
    operation_id = "createCategory",
    security(("BearerToken" = []))
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CategoryDraft>,
) -> ApiResult<HttpResponse> {
    let category = state
        .rentals
        .add_category(auth.principal().id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CategoryCreatedBody {
        success: true,
        category,
    }))
}
