use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{Claims, TokenService};
use crate::error::AppError;

/// Extracts the bearer credential from an `Authorization` header value.
///
/// The `Bearer ` prefix is stripped when present; a value without it is taken
/// as the token itself. Empty credentials yield `None`.
pub fn bearer_token(header_value: Option<&str>) -> Option<&str> {
    let value = header_value?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Request-time gate in front of task operations.
///
/// Every failure, whether a missing credential or a malformed, forged or
/// expired token, collapses to the same `Unauthorized` error.
pub fn authorize(header_value: Option<&str>, tokens: &TokenService) -> Result<Claims, AppError> {
    let token = bearer_token(header_value).ok_or_else(|| {
        log::debug!("Rejecting request without bearer token");
        AppError::Unauthorized("Unauthorized".into())
    })?;

    tokens.verify_token(token).map_err(|e| {
        log::debug!("Rejecting bearer token: {}", e);
        AppError::from(e)
    })
}

/// Actix middleware applying [`authorize`] to every request in its scope.
///
/// The `TokenService` is looked up from app data, so the middleware itself
/// holds no state. On success the decoded `Claims` are stored in the request
/// extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let tokens = match req.app_data::<web::Data<TokenService>>() {
            Some(tokens) => tokens.clone(),
            None => {
                log::error!("TokenService missing from app data; rejecting request");
                let app_err = AppError::InternalServerError("Authentication unavailable".into());
                return Box::pin(async move { Err(app_err.into()) });
            }
        };

        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match authorize(header_value, &tokens) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}
