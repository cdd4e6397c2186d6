//! API handler tests against an in-memory mock store

use std::sync::{Arc, Mutex};

use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;

use subtrack::api::routes::api_routes;
use subtrack::api::types::StreamerResponse;
use subtrack::errors::{Result, SubtrackError};
use subtrack::services::StreamerService;
use subtrack::stats;
use subtrack::storage::{
    HistoryEntry, HistoryRow, NewStreamer, Platform, Streamer, StreamerStore,
};

// 模拟存储实现用于测试
#[derive(Default)]
struct MockStore {
    data: Mutex<Vec<Streamer>>,
    next_id: Mutex<i64>,
    should_fail_ping: Mutex<bool>,
}

impl MockStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: Mutex::new(1),
            ..Default::default()
        })
    }

    fn set_ping_failure(&self, fail: bool) {
        *self.should_fail_ping.lock().unwrap() = fail;
    }
}

#[async_trait]
impl StreamerStore for MockStore {
    async fn load_all(&self) -> Result<Vec<Streamer>> {
        let mut all = self.data.lock().unwrap().clone();
        all.reverse(); // newest first, like the real backend
        Ok(all)
    }

    async fn get(&self, id: i64) -> Result<Option<Streamer>> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn create(&self, new: NewStreamer) -> Result<Streamer> {
        let mut next_id = self.next_id.lock().unwrap();
        let streamer = Streamer {
            id: *next_id,
            name: new.name,
            platform: new.platform,
            created_at: chrono::Utc::now(),
            history: vec![HistoryEntry {
                count: new.initial_count,
                timestamp: new.timestamp,
            }],
        };
        *next_id += 1;
        self.data.lock().unwrap().push(streamer.clone());
        Ok(streamer)
    }

    async fn update_metadata(&self, id: i64, name: &str, platform: Platform) -> Result<Streamer> {
        let mut data = self.data.lock().unwrap();
        match data.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.name = name.to_string();
                s.platform = platform;
                Ok(s.clone())
            }
            None => Err(SubtrackError::not_found(format!(
                "Streamer not found: {}",
                id
            ))),
        }
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        let before = data.len();
        data.retain(|s| s.id != id);
        if data.len() == before {
            return Err(SubtrackError::not_found(format!(
                "Streamer not found: {}",
                id
            )));
        }
        Ok(())
    }

    async fn append_history(&self, id: i64, count: i64, timestamp: i64) -> Result<HistoryRow> {
        let mut data = self.data.lock().unwrap();
        match data.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.history.push(HistoryEntry { count, timestamp });
                s.history.sort_by_key(|h| h.timestamp);
                Ok(HistoryRow {
                    id: s.history.len() as i64,
                    streamer_id: id,
                    count,
                    timestamp,
                    created_at: chrono::Utc::now(),
                })
            }
            None => Err(SubtrackError::not_found(format!(
                "Streamer not found: {}",
                id
            ))),
        }
    }

    async fn ping(&self) -> Result<()> {
        if *self.should_fail_ping.lock().unwrap() {
            return Err(SubtrackError::database_connection("mock ping failure"));
        }
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

macro_rules! test_app {
    ($store:expr) => {{
        let store: Arc<dyn StreamerStore> = $store.clone();
        let service = Arc::new(StreamerService::new(store.clone()));
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .app_data(web::Data::new(service))
                .service(api_routes()),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_list_streamers_empty() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::get().uri("/api/streamers").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Vec<StreamerResponse> = actix_test::read_body_json(resp).await;
    assert!(body.is_empty());
}

#[actix_web::test]
async fn test_create_streamer_seeds_history() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "YouTube",
            "initialCount": 1000
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let created: StreamerResponse = actix_test::read_body_json(resp).await;
    assert_eq!(created.name, "Ana");
    assert_eq!(created.platform, "YouTube");
    assert_eq!(created.history.len(), 1);
    assert_eq!(created.history[0].count, 1000);

    // The roster now contains exactly that streamer
    let req = actix_test::TestRequest::get().uri("/api/streamers").to_request();
    let body: Vec<StreamerResponse> =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].history[0].count, 1000);
}

#[actix_web::test]
async fn test_create_streamer_missing_fields() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({ "name": "Ana" }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_create_streamer_unknown_platform() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "MySpace",
            "initialCount": 10
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Unknown platform"));
}

#[actix_web::test]
async fn test_create_streamer_negative_count() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "Twitch",
            "initialCount": -5
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_update_streamer_metadata_only() {
    let store = MockStore::new();
    let app = test_app!(store);

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "YouTube",
            "initialCount": 1000
        }))
        .to_request();
    let created: StreamerResponse =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/streamers/{}", created.id))
        .set_json(serde_json::json!({ "name": "Ana Prime", "platform": "Twitch" }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["name"], "Ana Prime");
    assert_eq!(body["platform"], "Twitch");
    // Metadata response carries no history
    assert!(body.get("history").is_none());

    // History untouched by the edit
    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/streamers/{}", created.id))
        .to_request();
    let fetched: StreamerResponse =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;
    assert_eq!(fetched.history.len(), 1);
}

#[actix_web::test]
async fn test_update_unknown_streamer() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::put()
        .uri("/api/streamers/999")
        .set_json(serde_json::json!({ "name": "X", "platform": "Twitch" }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    // Non-numeric ids are unknown streamers too
    let req = actix_test::TestRequest::put()
        .uri("/api/streamers/abc")
        .set_json(serde_json::json!({ "name": "X", "platform": "Twitch" }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_delete_streamer() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "YouTube",
            "initialCount": 10
        }))
        .to_request();
    let created: StreamerResponse =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/streamers/{}", created.id))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/streamers/{}", created.id))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_delete_unknown_streamer() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::delete()
        .uri("/api/streamers/42")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_append_history_and_growth() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "YouTube",
            "initialCount": 1000
        }))
        .to_request();
    let created: StreamerResponse =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;

    let t = chrono::Utc::now().timestamp_millis();
    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/streamers/{}/subscribers", created.id))
        .set_json(serde_json::json!({ "count": 1500, "timestamp": t }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let row: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(row["count"], 1500);
    assert_eq!(row["streamer_id"], created.id);

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/streamers/{}", created.id))
        .to_request();
    let fetched: StreamerResponse =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;

    assert_eq!(stats::latest_count(&fetched.history), 1500);
    // Growth over a window spanning the append equals the delta
    assert_eq!(stats::growth(&fetched.history, t - 1, t + 1), 500);
}

#[actix_web::test]
async fn test_append_history_unknown_streamer() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers/99/subscribers")
        .set_json(serde_json::json!({ "count": 10, "timestamp": 1000 }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_append_history_invalid_timestamp() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "YouTube",
            "initialCount": 10
        }))
        .to_request();
    let created: StreamerResponse =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/streamers/{}/subscribers", created.id))
        .set_json(serde_json::json!({ "count": 10, "timestamp": 0 }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_stats_endpoint() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::post()
        .uri("/api/streamers")
        .set_json(serde_json::json!({
            "name": "Ana",
            "platform": "YouTube",
            "initialCount": 1000
        }))
        .to_request();
    let created: StreamerResponse =
        actix_test::read_body_json(actix_test::call_service(&app, req).await).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/streamers/{}/stats", created.id))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["latestCount"], 1000);
    assert_eq!(body["updateCount"], 1);
    assert_eq!(body["weeklyBuckets"].as_array().unwrap().len(), 8);
}

#[actix_web::test]
async fn test_health_check_connected() {
    let app = test_app!(MockStore::new());

    let req = actix_test::TestRequest::get().uri("/api/health").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["timestamp"].as_str().is_some());
}

#[actix_web::test]
async fn test_health_check_disconnected() {
    let store = MockStore::new();
    store.set_ping_failure(true);
    let app = test_app!(store);

    let req = actix_test::TestRequest::get().uri("/api/health").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "disconnected");
}
