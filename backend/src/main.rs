//! Backend entry-point: wires storage and identity adapters, REST
//! endpoints, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::domain::{Principal, Role};
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::configure_api;
use backend::outbound::{MemoryKvStore, StaticTokenVerifier};
use backend::server::{build_state, AppConfig};
use backend::Trace;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::parse();
    let bind_addr = config.bind_addr;

    let kv = Arc::new(MemoryKvStore::new());
    let identity = Arc::new(load_static_tokens()?);
    let state = web::Data::new(build_state(&config, kv, identity));

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api))
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Parse `STATIC_TOKENS` of the form `token:uuid:role[,token:uuid:role...]`.
///
/// The in-memory verifier stands in for the hosted identity provider until
/// one is wired; an empty or missing variable rejects every request.
fn load_static_tokens() -> std::io::Result<StaticTokenVerifier> {
    let raw = match env::var("STATIC_TOKENS") {
        Ok(raw) => raw,
        Err(_) => {
            warn!("STATIC_TOKENS not set; all bearer tokens will be rejected");
            return Ok(StaticTokenVerifier::new());
        }
    };

    let mut verifier = StaticTokenVerifier::new();
    for entry in raw.split(',').filter(|entry| !entry.is_empty()) {
        let mut parts = entry.splitn(3, ':');
        let (token, id, role) = (parts.next(), parts.next(), parts.next());
        let (Some(token), Some(id), Some(role)) = (token, id, role) else {
            return Err(std::io::Error::other(format!(
                "malformed STATIC_TOKENS entry: {entry}"
            )));
        };
        let id = id
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid principal id {id}: {e}")))?;
        let role = match role {
            "owner" => Role::Owner,
            "operator" => Role::Operator,
            other => {
                return Err(std::io::Error::other(format!("unknown role: {other}")));
            }
        };
        verifier = verifier.with_token(token, Principal::new(id, role));
    }
    Ok(verifier)
}
