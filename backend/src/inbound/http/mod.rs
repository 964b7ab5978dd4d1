//! Inbound HTTP adapter: request/response mapping over the domain.

pub mod analytics;
pub mod auth;
pub mod deposits;
pub mod error;
pub mod expenses;
pub mod health;
pub mod operators;
pub mod rentals;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;

use actix_web::web;

/// Register every `/api/v1` endpoint on a service config.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(deposits::list_deposits)
        .service(deposits::create_deposit)
        .service(deposits::create_manual_deposit)
        .service(expenses::list_expenses)
        .service(expenses::create_expense)
        .service(analytics::get_analytics)
        .service(operators::list_operators)
        .service(operators::update_operator)
        .service(operators::check_login)
        .service(rentals::list_items)
        .service(rentals::create_item)
        .service(rentals::list_categories)
        .service(rentals::create_category);
}
