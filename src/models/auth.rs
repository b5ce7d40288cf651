use actix_web::error::ErrorInternalServerError;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web::Data};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::auth::verifier::TokenVerifier;
use crate::auth::{AuthError, bearer_token, check_permission};

/// Caller identified by a verified access token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub sub: String, // subject (Auth0 user id)
    pub permissions: Option<Vec<String>>,
    pub exp: usize, // expiration as timestamp
}

impl AuthenticatedUser {
    pub fn require(&self, permission: &str) -> Result<(), AuthError> {
        check_permission(permission, self.permissions.as_deref()).inspect_err(|_| {
            log::warn!("User {} lacks permission {}", self.sub, permission);
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let verifier = req.app_data::<Data<TokenVerifier>>().cloned();
        let token = bearer_token(req.headers());

        Box::pin(async move {
            let verifier = match verifier {
                Some(verifier) => verifier,
                None => return Err(ErrorInternalServerError("Token verifier not found")),
            };
            let token = token?;
            let user = verifier.verify::<AuthenticatedUser>(&token).await?;
            Ok(user)
        })
    }
}
