//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers stay focused on request/response mapping; credential checks
//! live here. [`Authenticated`] is an extractor that resolves the
//! `Authorization: Bearer` header through the identity port before the
//! handler body runs.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Principal};

use super::error::ApiError;
use super::state::HttpState;

/// Extractor yielding the verified principal for the current request.
pub struct Authenticated(pub Principal);

impl Authenticated {
    /// The verified principal.
    pub fn principal(&self) -> Principal {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state
                .ok_or_else(|| ApiError::from(Error::internal("HTTP state not configured")))?;
            let token =
                token.ok_or_else(|| ApiError::from(Error::unauthorized("bearer token required")))?;
            let principal = state
                .identity
                .verify(&token)
                .await
                .map_err(Error::from)?
                .ok_or_else(|| Error::unauthorized("invalid or expired token"))?;
            Ok(Self(principal))
        })
    }
}
