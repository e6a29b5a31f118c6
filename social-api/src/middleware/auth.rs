/// Bearer-token authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` against the stored token
/// digests and injects the principal as `UserId`. Requests without the
/// header pass through unauthenticated; handlers that need a principal
/// take `UserId` as an extractor, which rejects with 401 when absent.
use crate::repository::TokenRepository;
use crate::security::token::token_digest;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, Ready};
use sqlx::PgPool;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use uuid::Uuid;

/// Authenticated principal for the current request
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

pub struct TokenAuth;

impl<S, B> Transform<S, ServiceRequest> for TokenAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = TokenAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct TokenAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TokenAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            if let Some(header) = auth_header {
                let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                    actix_web::error::ErrorUnauthorized("Invalid Authorization header format")
                })?;

                let pool = req
                    .app_data::<web::Data<PgPool>>()
                    .cloned()
                    .ok_or_else(|| {
                        actix_web::error::ErrorInternalServerError("database pool not configured")
                    })?;

                let user_id = TokenRepository::new(pool.get_ref().clone())
                    .resolve(&token_digest(token))
                    .await
                    .map_err(|e| {
                        tracing::error!("token lookup failed: {}", e);
                        actix_web::error::ErrorInternalServerError("authentication lookup failed")
                    })?
                    .ok_or_else(|| actix_web::error::ErrorUnauthorized("Invalid token"))?;

                req.extensions_mut().insert(UserId(user_id));
            }

            service.call(req).await
        })
    }
}

/// FromRequest implementation for UserId
impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "Authentication required",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{error::ResponseError, test, App, HttpResponse};

    async fn whoami(user: UserId) -> HttpResponse {
        HttpResponse::Ok().body(user.0.to_string())
    }

    #[actix_rt::test]
    async fn test_missing_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(TokenAuth)
                .route("/whoami", actix_web::web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(TokenAuth)
                .route("/whoami", actix_web::web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Token abc123"))
            .to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
