use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{info, trace, warn};

use crate::api::constants::BEARER_PREFIX;
use crate::api::services::admin::error_from_linktrack;
use crate::config::AdminConfig;
use crate::errors::LinktrackError;
use crate::utils::ip::{extract_client_ip, is_ip_allowed};

/// 认证失败原因
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthFailure {
    IpNotAllowed,
    MissingToken,
    InvalidPassword,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::IpNotAllowed => "IP not allowed",
            AuthFailure::MissingToken => "Missing or invalid authorization header",
            AuthFailure::InvalidPassword => "Invalid password",
        }
    }

    /// IP 不在白名单为 403，其余为 401
    pub fn to_error(&self) -> LinktrackError {
        match self {
            AuthFailure::IpNotAllowed => LinktrackError::forbidden(self.message()),
            AuthFailure::MissingToken | AuthFailure::InvalidPassword => {
                LinktrackError::unauthorized(self.message())
            }
        }
    }

    fn response(&self) -> HttpResponse {
        error_from_linktrack(&self.to_error())
    }
}

/// 先校验客户端 IP，再校验 `Authorization: Bearer <password>`
pub fn check_admin_access(
    client_ip: &str,
    authorization: Option<&str>,
    admin: &AdminConfig,
) -> Result<(), AuthFailure> {
    if !is_ip_allowed(client_ip, &admin.allowed_ips) {
        return Err(AuthFailure::IpNotAllowed);
    }

    let token = authorization
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthFailure::MissingToken)?;

    if bool::from(token.as_bytes().ct_eq(admin.password.as_bytes())) {
        Ok(())
    } else {
        Err(AuthFailure::InvalidPassword)
    }
}

/// Admin authentication middleware
#[derive(Clone)]
pub struct AdminAuth {
    admin: Arc<AdminConfig>,
}

impl AdminAuth {
    pub fn new(admin: Arc<AdminConfig>) -> Self {
        Self { admin }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            admin: self.admin.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    admin: Arc<AdminConfig>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let admin = self.admin.clone();

        Box::pin(async move {
            let client_ip = extract_client_ip(req.request());
            let authorization = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok());

            match check_admin_access(&client_ip, authorization, &admin) {
                Ok(()) => {
                    trace!("Admin authentication successful for {}", client_ip);
                    let res = srv.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(failure) => {
                    match failure {
                        AuthFailure::IpNotAllowed => {
                            warn!("Admin access denied for IP: {}", client_ip)
                        }
                        _ => info!(
                            "Admin authentication failed from {}: {}",
                            client_ip,
                            failure.message()
                        ),
                    }
                    Ok(req.into_response(failure.response().map_into_right_body()))
                }
            }
        })
    }
}
