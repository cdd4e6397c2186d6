//! Server mode
//!
//! HTTP server assembly: storage + service wiring, CORS, middleware and
//! route registration.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, middleware::Compress, web};
use anyhow::Result;
use tracing::warn;

use crate::api::api_routes;
use crate::api::middleware::RequestIdMiddleware;
use crate::api::types::ErrorBody;
use crate::config::ApiConfig;
use crate::services::StreamerService;
use crate::storage::{StorageFactory, StreamerStore};

/// CORS configuration loaded from the api config section
#[derive(Clone, Debug)]
struct CorsSettings {
    enabled: bool,
    allowed_origins: Vec<String>,
    max_age: u64,
}

impl CorsSettings {
    fn from_config(api: &ApiConfig) -> Self {
        Self {
            enabled: api.cors_enabled,
            allowed_origins: api.cors_allowed_origins.clone(),
            max_age: api.cors_max_age,
        }
    }
}

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsSettings) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsSettings) -> Cors {
    // When CORS is disabled, use browser's default same-origin policy
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_header(actix_web::http::header::CONTENT_TYPE)
        .max_age(cors_config.max_age as usize);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Malformed or incomplete JSON bodies come back as the API's uniform
/// `{"error": ...}` shape instead of actix's plain-text default.
fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let body = ErrorBody {
        error: err.to_string(),
    };
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}

/// Run the HTTP server until it is stopped
pub async fn run_server() -> Result<()> {
    let config = crate::config::get_config();

    let storage = StorageFactory::create().await?;
    let store: Arc<dyn StreamerStore> = storage;
    let service = Arc::new(StreamerService::new(store.clone()));

    let cors_settings = CorsSettings::from_config(&config.api);
    validate_cors_config(&cors_settings);

    let cpu_count = config.server.cpu_count.min(32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_settings);

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(service.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(api_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count)
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
