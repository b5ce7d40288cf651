use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::services::ServiceError;

pub mod drinks;
pub mod environment;

/// Failures answered with the `{"success": false, ...}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable")]
    Unprocessable,
    #[error("something went wrong")]
    Internal,
}

impl ApiError {
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::BAD_REQUEST => Some(ApiError::BadRequest),
            StatusCode::NOT_FOUND => Some(ApiError::NotFound),
            StatusCode::METHOD_NOT_ALLOWED => Some(ApiError::MethodNotAllowed),
            StatusCode::UNPROCESSABLE_ENTITY => Some(ApiError::Unprocessable),
            StatusCode::INTERNAL_SERVER_ERROR => Some(ApiError::Internal),
            _ => None,
        }
    }

    pub fn envelope(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(json!({
            "success": false,
            "error": status.as_u16(),
            "message": self.to_string(),
        }))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.envelope()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::Validation(_) | ServiceError::DuplicateTitle(_) => {
                log::warn!("Rejected drink: {err}");
                ApiError::Unprocessable
            }
        }
    }
}

/// Parse a JSON request body; anything unreadable is unprocessable.
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        log::warn!("Invalid JSON body: {e}");
        ApiError::Unprocessable
    })
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}

/// Register every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _| {
        log::debug!("Unmatched path parameter: {err}");
        ApiError::NotFound.into()
    }))
    .service(
        web::resource("/drinks")
            .route(web::get().to(drinks::get_drinks))
            .route(web::post().to(drinks::create_drink)),
    )
    .service(web::resource("/drinks-detail").route(web::get().to(drinks::get_drinks_detail)))
    .service(
        web::resource("/drinks/{drink_id}")
            .route(web::patch().to(drinks::patch_drink))
            .route(web::delete().to(drinks::delete_drink)),
    )
    .service(
        web::resource("/environment.json").route(web::get().to(environment::get_environment)),
    )
    .default_service(web::to(not_found));
}
