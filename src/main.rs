use actix_web::{get, web, App, HttpResponse, HttpServer, Responder, Result};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::ErrorBody;
use crate::repository::store::RequestStore;

mod api;
mod config;
mod error;
mod models;
mod repository;
mod telemetry;

#[derive(Serialize)]
pub struct Response {
    pub message: String,
}

#[get("/health")]
async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

async fn not_found() -> Result<HttpResponse> {
    Ok(HttpResponse::NotFound().json(ErrorBody::new("Endpoint not found")))
}

fn setup(config: &Config) -> web::Data<RequestStore> {
    let store = if config.seed_demo_data {
        RequestStore::with_demo_data()
    } else {
        RequestStore::new()
    };
    web::Data::new(store)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init(&config.app_name)?;

    let data = setup(&config);
    info!(host = %config.host, port = config.port, seed_demo_data = config.seed_demo_data, "starting maintenance tracker");

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(api::requests::config)
            .service(healthcheck)
            .default_service(web::route().to(not_found))
            .wrap(actix_web::middleware::Logger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
