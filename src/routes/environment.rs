use actix_web::{HttpResponse, Responder, web};

use crate::models::environment::Environment;

/// Environment record the front end boots with.
pub async fn get_environment(environment: web::Data<Environment>) -> impl Responder {
    HttpResponse::Ok().json(environment.get_ref())
}
