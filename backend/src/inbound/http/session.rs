//! Bearer-token session enforcement.
//!
//! [`RequireSession`] wraps protected routes. It reads the `Authorization`
//! header, resolves the token through the [`SessionResolver`] held in
//! [`HttpState`], and only then invokes the handler. Handlers receive the
//! caller through the [`AuthenticatedUser`] extractor.

use std::future::{Ready, ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error};

use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Identity of the caller, placed in request extensions by
/// [`RequireSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().copied();
        ready(user.ok_or_else(|| Error::unauthorized("login required")))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
///
/// # Examples
/// ```
/// use actix_web::http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
/// use food_api::inbound::http::session::bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def"));
/// assert_eq!(bearer_token(&headers).ok(), Some("abc.def"));
/// ```
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(Error::unauthorized("unsupported authorization scheme"));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized("missing bearer token"));
    }
    Ok(token)
}

/// Middleware factory requiring a valid session token.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use food_api::inbound::http::session::RequireSession;
///
/// let app = App::new().service(web::scope("/private").wrap(RequireSession));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireSession;

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service produced by [`RequireSession`].
pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user_id) => {
                    req.extensions_mut().insert(AuthenticatedUser(user_id));
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<UserId, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("session middleware mounted without HttpState");
        return Err(Error::internal("session resolver unavailable"));
    };
    let sessions = state.sessions.clone();
    let token = bearer_token(req.headers()).inspect_err(|err| {
        debug!(path = req.path(), reason = err.message(), "request lacks a usable token");
    })?;
    sessions.resolve(token).await
}
