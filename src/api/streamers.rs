//! Streamer CRUD and history handlers

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use tracing::{info, trace, warn};

use crate::errors::SubtrackError;
use crate::services::{CreateStreamerRequest, StreamerService, UpdateStreamerRequest};

use super::helpers::{
    api_result, created_response, error_from_subtrack, error_response, success_response,
};
use super::types::{
    AppendHistoryBody, CreateStreamerBody, DeleteResponse, HistoryRowResponse,
    StreamerMetaResponse, StreamerResponse, UpdateStreamerBody,
};

/// Parse a path id; anything that is not an integer is an unknown streamer
fn parse_id(raw: &str) -> Result<i64, SubtrackError> {
    raw.parse::<i64>()
        .map_err(|_| SubtrackError::not_found(format!("Streamer not found: {}", raw)))
}

/// 获取所有主播（含完整订阅历史）
pub async fn get_all_streamers(
    service: web::Data<Arc<StreamerService>>,
) -> ActixResult<impl Responder> {
    trace!("API: request to list all streamers");

    match service.list().await {
        Ok(streamers) => {
            info!("API: returning {} streamers", streamers.len());
            let body: Vec<StreamerResponse> =
                streamers.into_iter().map(StreamerResponse::from).collect();
            Ok(success_response(body))
        }
        Err(e) => {
            warn!("API: failed to list streamers: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch streamers",
            ))
        }
    }
}

/// 获取单个主播
pub async fn get_streamer(
    id: web::Path<String>,
    service: web::Data<Arc<StreamerService>>,
) -> ActixResult<impl Responder> {
    trace!("API: get streamer request - id: {}", id);

    let result = match parse_id(&id) {
        Ok(id) => service.get(id).await,
        Err(e) => Err(e),
    };

    Ok(api_result(result.map(StreamerResponse::from)))
}

/// 创建主播（同一事务写入初始订阅数）
pub async fn post_streamer(
    body: web::Json<CreateStreamerBody>,
    service: web::Data<Arc<StreamerService>>,
) -> ActixResult<impl Responder> {
    info!(
        "API: create streamer request - name: {}, platform: {}",
        body.name, body.platform
    );

    let req = CreateStreamerRequest {
        name: body.name.clone(),
        platform: body.platform.clone(),
        initial_count: body.initial_count,
    };

    match service.create(req).await {
        Ok(streamer) => Ok(created_response(StreamerResponse::from(streamer))),
        Err(e) => {
            warn!("API: failed to create streamer: {}", e);
            Ok(error_from_subtrack(&e))
        }
    }
}

/// 更新主播信息（仅 name/platform，不触碰历史）
pub async fn update_streamer(
    id: web::Path<String>,
    body: web::Json<UpdateStreamerBody>,
    service: web::Data<Arc<StreamerService>>,
) -> ActixResult<impl Responder> {
    info!("API: update streamer request - id: {}", id);

    let result = match parse_id(&id) {
        Ok(id) => {
            service
                .update(
                    id,
                    UpdateStreamerRequest {
                        name: body.name.clone(),
                        platform: body.platform.clone(),
                    },
                )
                .await
        }
        Err(e) => Err(e),
    };

    Ok(api_result(result.map(StreamerMetaResponse::from)))
}

/// 删除主播（级联删除全部历史）
pub async fn delete_streamer(
    id: web::Path<String>,
    service: web::Data<Arc<StreamerService>>,
) -> ActixResult<impl Responder> {
    info!("API: delete streamer request - id: {}", id);

    let result = match parse_id(&id) {
        Ok(id) => service.delete(id).await,
        Err(e) => Err(e),
    };

    Ok(api_result(result.map(|()| DeleteResponse {
        success: true,
        message: "Streamer deleted successfully".to_string(),
    })))
}

/// 追加一条订阅数记录
pub async fn post_history(
    id: web::Path<String>,
    body: web::Json<AppendHistoryBody>,
    service: web::Data<Arc<StreamerService>>,
) -> ActixResult<impl Responder> {
    info!(
        "API: append history request - id: {}, count: {}",
        id, body.count
    );

    let result = match parse_id(&id) {
        Ok(id) => service.append_history(id, body.count, body.timestamp).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(row) => Ok(created_response(HistoryRowResponse::from(row))),
        Err(e) => Ok(error_from_subtrack(&e)),
    }
}

/// 派生统计（最新值、周增长、收益估算、周分桶）
pub async fn get_streamer_stats(
    id: web::Path<String>,
    service: web::Data<Arc<StreamerService>>,
) -> ActixResult<impl Responder> {
    trace!("API: stats request - id: {}", id);

    let week_count = crate::config::get_config().tracker.weekly_bucket_count;

    let result = match parse_id(&id) {
        Ok(id) => service.stats(id, week_count).await,
        Err(e) => Err(e),
    };

    Ok(api_result(result))
}
