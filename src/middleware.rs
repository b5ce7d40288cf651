use actix_web::{
    Error,
    body::EitherBody,
    dev::{self, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

use crate::routes::ApiError;

/// Rewrites plain-text error responses produced by actix itself (unmatched
/// routes, wrong methods, extractor failures) into the JSON error envelope.
pub struct JsonErrors;

impl<S, B> Transform<S, ServiceRequest> for JsonErrors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JsonErrorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JsonErrorsMiddleware { service }))
    }
}

pub struct JsonErrorsMiddleware<S> {
    service: S,
}

fn is_json(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false)
}

impl<S, B> Service<ServiceRequest> for JsonErrorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            if is_json(res.headers().get(header::CONTENT_TYPE)) {
                return Ok(res.map_into_left_body());
            }

            match ApiError::from_status(res.status()) {
                Some(api_error) => {
                    let (req_parts, original) = res.into_parts();
                    let mut envelope = api_error.envelope();
                    // Keep headers such as `Allow`; body headers belong to the envelope.
                    for (name, value) in original.headers() {
                        if *name != header::CONTENT_TYPE && *name != header::CONTENT_LENGTH {
                            envelope.headers_mut().append(name.clone(), value.clone());
                        }
                    }
                    Ok(ServiceResponse::new(req_parts, envelope.map_into_right_body()))
                }
                None => Ok(res.map_into_left_body()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use super::*;

    #[actix_web::test]
    async fn rewrites_plain_errors() {
        let app = test::init_service(
            App::new()
                .wrap(JsonErrors)
                .route(
                    "/plain",
                    web::get().to(|| async {
                        HttpResponse::BadRequest()
                            .insert_header(("X-Request-Id", "r-17"))
                            .body("nope")
                    }),
                )
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") })),
        )
        .await;

        let req = test::TestRequest::get().uri("/plain").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers().get("x-request-id").unwrap(), "r-17");
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 400);
        assert_eq!(body["message"], "bad request");

        let req = test::TestRequest::get().uri("/ok").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(test::read_body(res).await, "fine");
    }

    #[actix_web::test]
    async fn wrong_method_becomes_405_envelope() {
        let app = test::init_service(
            App::new()
                .wrap(JsonErrors)
                .service(
                    web::resource("/only-get")
                        .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
                ),
        )
        .await;

        let req = test::TestRequest::post().uri("/only-get").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "method not allowed");
    }

    #[actix_web::test]
    async fn envelope_keeps_allow_header() {
        let app = test::init_service(App::new().wrap(JsonErrors).route(
            "/menu",
            web::get().to(|| async {
                HttpResponse::MethodNotAllowed()
                    .insert_header((header::ALLOW, "GET"))
                    .finish()
            }),
        ))
        .await;

        let req = test::TestRequest::get().uri("/menu").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers().get(header::ALLOW).unwrap(), "GET");
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], 405);
    }
}
