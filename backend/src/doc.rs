//! OpenAPI documentation configuration.
//!
//! Generates the specification served by Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Rental back-office API",
        description = "Deposit-gated access ledger: deposits, expenses, \
                       compliance checks, and break-even analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::deposits::list_deposits,
        crate::inbound::http::deposits::create_deposit,
        crate::inbound::http::deposits::create_manual_deposit,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::create_expense,
        crate::inbound::http::analytics::get_analytics,
        crate::inbound::http::operators::list_operators,
        crate::inbound::http::operators::update_operator,
        crate::inbound::http::operators::check_login,
        crate::inbound::http::rentals::list_items,
        crate::inbound::http::rentals::create_item,
        crate::inbound::http::rentals::list_categories,
        crate::inbound::http::rentals::create_category,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Deposit,
        crate::domain::DepositDraft,
        crate::domain::DepositStatus,
        crate::domain::Shift,
        crate::domain::Expense,
        crate::domain::ExpenseDraft,
        crate::domain::Frequency,
        crate::domain::AnalyticsSnapshot,
        crate::domain::OperatorSummary,
        crate::domain::UserRecord,
        crate::domain::LoginStatus,
        crate::domain::RentalItem,
        crate::domain::RentalItemDraft,
        crate::domain::Category,
        crate::domain::CategoryDraft,
        crate::domain::ErrorCode,
        crate::inbound::http::ApiError,
    ))
)]
pub struct ApiDoc;
