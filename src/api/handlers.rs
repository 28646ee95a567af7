use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{AppError, StoreError};
use crate::AppState;

// Response messages carried over from the original wire protocol.
pub const MSG_CREATED: &str = "Creado";
pub const MSG_DELETED: &str = "Eliminado";
pub const MSG_NOT_FOUND: &str = "No encontrado";
pub const MSG_ALREADY_EXISTS: &str = "El plano ya existe";

#[derive(Debug, Deserialize)]
pub struct CreateBlueprintRequest {
    pub author: String,
    pub name: String,
    #[serde(default)]
    pub points: Vec<Value>,
}

/// GET /api/v1/blueprints/{author}
pub async fn list_by_author(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let author = path.into_inner();
    let data = state.store.list_by_author(&author);
    HttpResponse::Ok().json(json!({ "data": data }))
}

/// GET /api/v1/blueprints/{author}/{name}
///
/// A miss answers 200 with a message by default (wire compatibility with
/// the original clients) or a conventional 404 when `api.compat_not_found`
/// is off.
pub async fn get_blueprint(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (author, name) = path.into_inner();
    match state.store.get(&author, &name) {
        Some(bp) => Ok(HttpResponse::Ok().json(json!({ "data": bp }))),
        None if state.config.api.compat_not_found => {
            Ok(HttpResponse::Ok().json(json!({ "message": MSG_NOT_FOUND })))
        }
        None => Err(StoreError::NotFound { author, name }.into()),
    }
}

/// POST /api/v1/blueprints
pub async fn create_blueprint(
    req: web::Json<CreateBlueprintRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let req = req.into_inner();
    match state.store.create(&req.author, &req.name, req.points) {
        Ok(()) => {
            info!("Created blueprint {}/{} over HTTP", req.author, req.name);
            HttpResponse::Created().json(json!({ "message": MSG_CREATED }))
        }
        Err(e) => {
            warn!("Create rejected for {}/{}: {}", req.author, req.name, e);
            HttpResponse::BadRequest().json(json!({ "message": MSG_ALREADY_EXISTS }))
        }
    }
}

/// DELETE /api/v1/blueprints/{author}/{name}
///
/// Always succeeds: deletion is idempotent and a missing key is not an
/// error.
pub async fn delete_blueprint(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let (author, name) = path.into_inner();
    state.store.delete(&author, &name);
    HttpResponse::Ok().json(json!({ "message": MSG_DELETED }))
}
