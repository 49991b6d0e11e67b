use crate::middleware::authentication::method;
use crate::services::AdminAuth;
use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse},
    Error, HttpResponse,
};
use futures::{
    future::{FutureExt, LocalBoxFuture},
    task::{Context, Poll},
};
use std::rc::Rc;

pub struct ManagerMiddleware<S> {
    pub service: Rc<S>,
    pub auth: AdminAuth,
}

impl<S, B> Service<ServiceRequest> for ManagerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let admitted = method::try_jwt(&mut req, &self.auth);

        async move {
            match admitted {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(err) => {
                    let (req, _payload) = req.into_parts();
                    let resp = HttpResponse::from_error(err).map_into_right_body();
                    Ok(ServiceResponse::new(req, resp))
                }
            }
        }
        .boxed_local()
    }
}
