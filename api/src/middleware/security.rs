//! Security middleware for enforcing HTTPS and security headers.
//!
//! - HTTPS enforcement in production environments
//! - Security headers (HSTS, CSP for the HTML pages, etc.)
//! - Request origin validation

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorForbidden},
    http::header::{self, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use pv_shared::config::Environment;
use std::{
    future::{ready, Ready},
    net::IpAddr,
    rc::Rc,
    task::{Context, Poll},
};

/// Security middleware factory for enforcing HTTPS and security policies
#[derive(Debug, Clone)]
pub struct SecurityMiddleware {
    /// Whether to enforce HTTPS (disabled in development)
    enforce_https: bool,
    /// Whether to add security headers
    add_security_headers: bool,
    /// Peers whose X-Forwarded-Proto header is honoured
    trusted_proxies: Vec<IpAddr>,
}

impl SecurityMiddleware {
    /// Creates a security middleware matching the environment
    pub fn for_environment(environment: Environment, trusted_proxies: &[IpAddr]) -> Self {
        let base = if environment.is_production() {
            Self::production()
        } else {
            Self::development()
        };
        let middleware = trusted_proxies
            .iter()
            .fold(base, |middleware, proxy| middleware.with_trusted_proxy(*proxy));

        log::info!(
            "Security middleware configured: environment={}, enforce_https={}, add_headers={}, trusted_proxies={:?}",
            environment,
            middleware.enforce_https,
            middleware.add_security_headers,
            middleware.trusted_proxies
        );
        middleware
    }

    /// Security headers without HSTS, no HTTPS enforcement
    pub fn development() -> Self {
        Self {
            enforce_https: false,
            add_security_headers: true,
            trusted_proxies: vec![],
        }
    }

    /// Creates a security middleware for production (full security)
    pub fn production() -> Self {
        Self {
            enforce_https: true,
            add_security_headers: true,
            trusted_proxies: vec![],
        }
    }

    /// Adds a trusted proxy to the whitelist
    pub fn with_trusted_proxy(mut self, proxy: IpAddr) -> Self {
        if !self.trusted_proxies.contains(&proxy) {
            self.trusted_proxies.push(proxy);
        }
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            add_security_headers: self.add_security_headers,
            trusted_proxies: self.trusted_proxies.clone(),
        }))
    }
}

/// Security middleware service implementation
pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    add_security_headers: bool,
    trusted_proxies: Vec<IpAddr>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let enforce_https = self.enforce_https;
        let add_security_headers = self.add_security_headers;
        let trusted_proxies = self.trusted_proxies.clone();

        Box::pin(async move {
            if enforce_https && !is_secure_request(&req, &trusted_proxies) {
                log::warn!("Insecure request blocked: {} {}", req.method(), req.path());
                return Err(ErrorForbidden("HTTPS required"));
            }

            if let Some(origin) = req.headers().get(header::ORIGIN) {
                if !is_valid_origin(origin) {
                    log::warn!(
                        "Invalid origin blocked: {:?} for {} {}",
                        origin,
                        req.method(),
                        req.path()
                    );
                    return Err(ErrorBadRequest("Invalid request origin"));
                }
            }

            let mut response = service.call(req).await?;

            if add_security_headers {
                add_security_response_headers(&mut response, enforce_https);
            }

            Ok(response)
        })
    }
}

/// Checks if the request is secure (TLS, HTTPS behind a trusted proxy, or loopback)
///
/// Forwarded headers are only read when the socket peer is a trusted proxy;
/// `ConnectionInfo::scheme` would honour them from any client.
fn is_secure_request(req: &ServiceRequest, trusted_proxies: &[IpAddr]) -> bool {
    if req.app_config().secure() {
        return true;
    }

    let Some(peer) = req.peer_addr() else {
        return false;
    };

    if is_trusted_proxy(&peer.ip(), trusted_proxies) {
        return req
            .headers()
            .get("x-forwarded-proto")
            .and_then(|proto| proto.to_str().ok())
            .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
            .unwrap_or(false);
    }

    peer.ip().is_loopback()
}

/// Checks if the given IP address is in the trusted proxy list
fn is_trusted_proxy(ip: &IpAddr, trusted_proxies: &[IpAddr]) -> bool {
    trusted_proxies.contains(ip)
}

/// Browsers send `null` or an http(s) origin with form posts
fn is_valid_origin(origin: &HeaderValue) -> bool {
    match origin.to_str() {
        Ok(origin) => {
            origin == "null" || origin.starts_with("http://") || origin.starts_with("https://")
        }
        Err(_) => false,
    }
}

/// Adds security headers to the response; HSTS only where HTTPS is enforced
fn add_security_response_headers<B>(response: &mut ServiceResponse<B>, hsts: bool) {
    let headers = response.headers_mut();

    if hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // Pages are plain HTML forms posting back to this origin
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'none'; form-action 'self'; frame-ancestors 'none'; base-uri 'none'",
        ),
    );
    headers.insert(
        header::HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=()"),
    );
}
