use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::domain::DrinkId;
use crate::forms::drinks::{CreateDrinkForm, PatchDrinkForm};
use crate::models::auth::AuthenticatedUser;
use crate::routes::{ApiError, parse_json};
use crate::services::drinks::DrinkService;

pub async fn get_drinks(service: web::Data<DrinkService>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "drinks": service.list(),
    }))
}

pub async fn get_drinks_detail(
    user: AuthenticatedUser,
    service: web::Data<DrinkService>,
) -> actix_web::Result<HttpResponse> {
    user.require("get:drinks-detail")?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "drinks": service.list_detailed(),
    })))
}

pub async fn create_drink(
    user: AuthenticatedUser,
    service: web::Data<DrinkService>,
    body: web::Bytes,
) -> actix_web::Result<HttpResponse> {
    user.require("post:drinks")?;

    let form: CreateDrinkForm = parse_json(&body)?;
    let drink = service.create(form).map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "drinks": drink,
    })))
}

pub async fn patch_drink(
    drink_id: web::Path<i32>,
    user: AuthenticatedUser,
    service: web::Data<DrinkService>,
    body: web::Bytes,
) -> actix_web::Result<HttpResponse> {
    user.require("patch:drinks")?;
    let id = DrinkId::from(drink_id.into_inner());

    // A missing drink is reported before a malformed body.
    service.get(id).map_err(ApiError::from)?;
    let form: PatchDrinkForm = parse_json(&body)?;
    let drink = service.update(id, form).map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "drinks": [drink],
    })))
}

pub async fn delete_drink(
    drink_id: web::Path<i32>,
    user: AuthenticatedUser,
    service: web::Data<DrinkService>,
) -> actix_web::Result<HttpResponse> {
    user.require("delete:drinks")?;

    let id = service
        .delete(DrinkId::from(drink_id.into_inner()))
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "delete": id.value(),
    })))
}
