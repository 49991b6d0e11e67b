use crate::middleware::authentication::*;
use crate::services::AdminAuth;

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};

/// Guards a scope: only requests carrying a valid admin token reach the wrapped service.
pub struct Manager {
    auth: AdminAuth,
}

impl Manager {
    pub fn new(auth: AdminAuth) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Manager
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ManagerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ManagerMiddleware {
            service: Rc::new(service),
            auth: self.auth.clone(),
        }))
    }
}
