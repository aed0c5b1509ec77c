//! The authorization gate: identity extraction from the request.
//!
//! Credentials are issued by the external auth system; this module only
//! resolves them. A handler that takes [`Identity`] is auth-gated: when no
//! valid identity is present the extractor's error answers with a redirect
//! to the login flow, carrying the intended destination in `next`.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::StatusCode, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use gazette_core::ports::TokenService;

/// Cookie the identity token travels in, alongside the Authorization header.
pub const SESSION_COOKIE: &str = "session";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

/// Extractor error: the visitor is sent to the login flow.
#[derive(Debug, thiserror::Error)]
#[error("authentication required")]
pub struct LoginRequired {
    next: String,
}

impl actix_web::ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::Found()
            .insert_header((
                header::LOCATION,
                format!("/auth/login/?next={}", self.next),
            ))
            .finish()
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn cookie_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let login = || LoginRequired {
            next: req.path().to_string(),
        };

        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(login()));
            }
        };

        let token = match bearer_token(req).or_else(|| cookie_token(req)) {
            Some(token) => token,
            None => return ready(Err(login())),
        };

        match token_service.validate_token(&token) {
            Ok(claims) => ready(Ok(Identity {
                user_id: claims.user_id,
                username: claims.username,
            })),
            Err(e) => {
                tracing::debug!("Rejected identity token: {}", e);
                ready(Err(login()))
            }
        }
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity)))),
            Err(_) => ready(Ok(OptionalIdentity(None))),
        }
    }
}
