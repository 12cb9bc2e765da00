use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    error::ErrorUnauthorized,
    http::{Method, header},
};
use futures_util::future::LocalBoxFuture;
use log::debug;

use crate::utils::jwt::validate_token;

/// Paths that never need a token, whatever the method.
const PUBLIC_PATHS: [&str; 2] = ["/api/auth/login", "/api/auth/init"];

/// Read paths that still need a token.
const PROTECTED_READS: [&str; 1] = ["/api/auth/me"];

/// Bearer-token guard for mutation routes.
///
/// Reads are public so the student site can list documents anonymously;
/// every other method needs a valid JWT. The decoded claims are stored in the
/// request extensions for handlers.
pub struct JwtAuth {
    secret: Rc<str>,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Rc::from(secret),
        }
    }
}

fn needs_token(method: &Method, path: &str) -> bool {
    if PUBLIC_PATHS.iter().any(|p| path.starts_with(p)) {
        return false;
    }
    if PROTECTED_READS.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service,
            secret: self.secret.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: S,
    secret: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
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
        if !needs_token(req.method(), req.path()) {
            return Box::pin(self.service.call(req));
        }

        // Get token from Authorization header
        let auth_header = match req.headers().get(header::AUTHORIZATION) {
            Some(header) => header,
            None => {
                return Box::pin(async move { Err(ErrorUnauthorized("No authorization header")) });
            }
        };

        let auth_header_str = match auth_header.to_str() {
            Ok(header_str) => header_str,
            Err(_) => {
                return Box::pin(
                    async move { Err(ErrorUnauthorized("Invalid authorization header")) },
                );
            }
        };

        let token = match auth_header_str.strip_prefix("Bearer ") {
            Some(token) => token.trim(),
            None => {
                return Box::pin(
                    async move { Err(ErrorUnauthorized("Invalid authorization format")) },
                );
            }
        };

        let claims = match validate_token(&self.secret, token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Rejected token on {} {}: {:#}", req.method(), req.path(), e);
                return Box::pin(async move { Err(ErrorUnauthorized("Invalid token")) });
            }
        };

        req.extensions_mut().insert(claims);

        Box::pin(self.service.call(req))
    }
}
