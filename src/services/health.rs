use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{error, trace};

use crate::storage::StreamerStore;

pub struct HealthService;

impl HealthService {
    /// `GET /api/health` — probe the database with a bounded wait
    pub async fn health_check(store: web::Data<Arc<dyn StreamerStore>>) -> impl Responder {
        trace!("Received health check request");

        let database_ok = match tokio::time::timeout(Duration::from_secs(5), store.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("Health check: database ping failed: {}", e);
                false
            }
            Err(_) => {
                error!("Health check: database ping timeout");
                false
            }
        };

        let now = chrono::Utc::now();

        if database_ok {
            HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(json!({
                    "status": "healthy",
                    "database": "connected",
                    "timestamp": now.to_rfc3339(),
                }))
        } else {
            HttpResponse::InternalServerError()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "timestamp": now.to_rfc3339(),
                }))
        }
    }
}
