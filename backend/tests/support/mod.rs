//! Shared harness for the HTTP integration suites.
//!
//! Builds a fully wired application over the in-memory adapters with a
//! pinned clock, so suites can replay multi-day scenarios by constructing
//! one state per business day over the same store.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use chrono::{NaiveDate, TimeZone, Utc};
use mockable::{Clock, MockClock};
use serde_json::Value;
use uuid::Uuid;

use backend::domain::{CompliancePolicy, Principal, Role};
use backend::inbound::http::{configure_api, HttpState};
use backend::outbound::{MemoryKvStore, StaticTokenVerifier};
use backend::server::{build_state_with_clock, AppConfig};
use backend::Trace;

/// Pre-shared bearer token for the owner account.
pub const OWNER_TOKEN: &str = "owner-token";
/// Pre-shared bearer token for the operator account.
pub const OPERATOR_TOKEN: &str = "operator-token";

/// The two accounts every suite exercises.
pub struct Accounts {
    pub owner: Principal,
    pub operator: Principal,
}

impl Accounts {
    pub fn generate() -> Self {
        Self {
            owner: Principal::new(Uuid::new_v4(), Role::Owner),
            operator: Principal::new(Uuid::new_v4(), Role::Operator),
        }
    }

    fn verifier(&self) -> StaticTokenVerifier {
        StaticTokenVerifier::new()
            .with_token(OWNER_TOKEN, self.owner)
            .with_token(OPERATOR_TOKEN, self.operator)
    }
}

/// A business date in the suite's fixed month.
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, d).expect("valid date")
}

fn clock_at(date: NaiveDate) -> Arc<dyn Clock> {
    let instant = Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).expect("valid time"));
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(instant);
    Arc::new(clock)
}

/// Handler state over a shared store with the clock pinned to `date`.
pub fn state_at(
    kv: &Arc<MemoryKvStore>,
    accounts: &Accounts,
    date: NaiveDate,
    policy: CompliancePolicy,
) -> web::Data<HttpState> {
    let config = AppConfig {
        compliance_policy: policy,
        ..AppConfig::default()
    };
    web::Data::new(build_state_with_clock(
        &config,
        kv.clone(),
        Arc::new(accounts.verifier()),
        clock_at(date),
    ))
}

/// The application under test, identical to production wiring minus TLS
/// and the docs route.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
}

/// GET request with a bearer token.
pub fn get(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
}

/// POST request with a bearer token and a JSON body.
pub fn post_json(uri: &str, token: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
}

/// PUT request with a bearer token and a JSON body.
pub fn put_json(uri: &str, token: &str, body: Value) -> test::TestRequest {
    test::TestRequest::put()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
}
