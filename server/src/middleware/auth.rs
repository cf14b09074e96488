use std::pin::Pin;

use actix_identity::RequestIdentity;
use actix_service::{Service, Transform};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, ServiceRequest, ServiceResponse},
    Error, HttpResponse,
};
use futures_util::future::{ok, Future, Ready};

use auth::{decode_jwt, PrivateClaim};
use errors::{self, ErrorResponse};

/// Rejects requests without a valid token before they reach a handler.
/// Role checks stay in the handlers, which know which role they need.
pub struct Auth;

impl<S, B> Transform<S, ServiceRequest> for Auth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddleware { service })
    }
}

pub struct AuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = RequestIdentity::get_identity(&req).unwrap_or_else(|| "".into());
        let private_claim: Result<PrivateClaim, errors::Error> = decode_jwt(&identity);

        // decode uses default validation to ensure not expired, changed, etc.
        if private_claim.is_ok() {
            let fut = self.service.call(req);
            Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            })
        } else {
            Box::pin(async move {
                Ok(req
                    .into_response(
                        HttpResponse::Unauthorized().json(ErrorResponse::from("Unauthorized")),
                    )
                    .map_into_right_body())
            })
        }
    }
}
