//! API 路由配置

use actix_web::web;

use crate::services::HealthService;

use super::streamers::{
    delete_streamer, get_all_streamers, get_streamer, get_streamer_stats, post_history,
    post_streamer, update_streamer,
};

/// 主播管理路由 `/streamers`
///
/// 包含：
/// - GET  /streamers - 获取所有主播（含历史）
/// - POST /streamers - 创建主播（写入初始订阅数）
/// - GET  /streamers/{id} - 获取单个主播
/// - PUT  /streamers/{id} - 更新主播信息
/// - DELETE /streamers/{id} - 删除主播
/// - POST /streamers/{id}/subscribers - 追加订阅数记录
/// - GET  /streamers/{id}/stats - 派生统计
pub fn streamer_routes() -> actix_web::Scope {
    web::scope("/streamers")
        .route("", web::get().to(get_all_streamers))
        .route("", web::post().to(post_streamer))
        // Sub-resources must be registered before /{id}
        .route("/{id}/subscribers", web::post().to(post_history))
        .route("/{id}/stats", web::get().to(get_streamer_stats))
        .route("/{id}", web::get().to(get_streamer))
        .route("/{id}", web::put().to(update_streamer))
        .route("/{id}", web::delete().to(delete_streamer))
}

/// `/api` 路由：主播管理 + 健康检查
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(streamer_routes())
        .route("/health", web::get().to(HealthService::health_check))
}
