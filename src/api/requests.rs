use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::models::dto::{CreateRequestDto, JsonObject, RequestQuery, UpdateRequestDto};
use crate::repository::store::RequestStore;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub storage: String,
    pub total_requests: usize,
}

#[get("/requests")]
#[tracing::instrument(skip_all)]
pub async fn get_requests(
    store: web::Data<RequestStore>,
    query: web::Query<RequestQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner().into_filter()?;
    let requests = if filter.is_empty() {
        store.list()?
    } else {
        store.search(&filter)?
    };
    Ok(HttpResponse::Ok().json(requests))
}

#[get("/requests/{id}")]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn get_request_by_id(
    store: web::Data<RequestStore>,
    id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let request = store.get(id.into_inner())?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(request))
}

#[post("/requests")]
#[tracing::instrument(skip_all)]
pub async fn create_request(
    store: web::Data<RequestStore>,
    body: web::Json<JsonObject>,
) -> Result<HttpResponse, ApiError> {
    let new_request = CreateRequestDto::try_from(body.into_inner())
        .map_err(malformed)?
        .validate()
        .inspect_err(|err| warn!(reason = %err, "rejected new request"))?;
    let request = store.create(new_request)?;
    Ok(HttpResponse::Created().json(request))
}

#[put("/requests/{id}")]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn update_request_by_id(
    store: web::Data<RequestStore>,
    id: web::Path<u64>,
    body: web::Json<JsonObject>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    if store.get(id)?.is_none() {
        return Err(ApiError::NotFound);
    }
    let changes = UpdateRequestDto::try_from(body.into_inner())
        .map_err(malformed)?
        .validate()
        .inspect_err(|err| warn!(reason = %err, "rejected update"))?;
    let request = store.update(id, changes)?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(request))
}

#[delete("/requests/{id}")]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn delete_request_by_id(
    store: web::Data<RequestStore>,
    id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let request = store.delete(id.into_inner())?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(request))
}

#[get("/admin/stats")]
#[tracing::instrument(skip_all)]
pub async fn get_stats(store: web::Data<RequestStore>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(store.stats()?))
}

#[get("/health")]
pub async fn health(store: web::Data<RequestStore>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        storage: "in-memory".to_string(),
        total_requests: store.count()?,
    }))
}

fn malformed(err: serde_json::Error) -> ApiError {
    warn!(error = %err, "malformed request body");
    ApiError::MalformedInput
}

// Anything but a JSON object is refused here, before a handler runs.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "malformed request body");
        ApiError::MalformedInput.into()
    })
}

// A non-numeric id can never match a stored request.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| ApiError::NotFound.into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|_err, _req| ApiError::MalformedInput.into())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .service(get_requests)
            .service(get_request_by_id)
            .service(create_request)
            .service(update_request_by_id)
            .service(delete_request_by_id)
            .service(get_stats)
            .service(health),
    );
}
