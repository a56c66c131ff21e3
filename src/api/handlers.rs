use crate::db::CycleRepository;
use crate::error::AppError;
use crate::models::{Cycle, NewCycle};
use crate::service::{ForecastService, ForecastUpload};
use axum::{
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 健康检查
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 上传 week1..weekN 与可选 sales_plan, 运行预测
pub async fn run_forecast(
    State(service): State<Arc<ForecastService>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let mut weeks: BTreeMap<usize, Vec<u8>> = BTreeMap::new();
    let mut sales_plan = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let has_file = field.file_name().is_some_and(|f| !f.is_empty());
        if !has_file {
            continue;
        }

        if name == "sales_plan" {
            sales_plan = Some(field.bytes().await?.to_vec());
        } else if let Some(week) = name
            .strip_prefix("week")
            .and_then(|n| n.parse::<usize>().ok())
        {
            weeks.insert(week, field.bytes().await?.to_vec());
        }
    }

    let mut ordered = Vec::with_capacity(service.required_weeks());
    for week in 1..=service.required_weeks() {
        let Some(content) = weeks.remove(&week) else {
            return Err(AppError::BadRequest(format!("Missing file for week{}", week)));
        };
        ordered.push(content);
    }
    if !weeks.is_empty() {
        tracing::warn!("Ignoring {} extra week uploads", weeks.len());
    }

    let upload = ForecastUpload {
        weeks: ordered,
        sales_plan,
    };
    let table = tokio::task::spawn_blocking(move || service.run(upload))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    tracing::info!("Forecast produced {} rows", table.len());
    Ok(Json(table.to_records()))
}

/// 读取最近一次保存的预测结果
pub async fn get_predictions(
    State(service): State<Arc<ForecastService>>,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let records = tokio::task::spawn_blocking(move || service.latest())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    records
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Predictions not available".to_string()))
}

pub async fn create_cycle(
    State(repo): State<Arc<dyn CycleRepository>>,
    Json(body): Json<NewCycle>,
) -> Result<impl IntoResponse, AppError> {
    let cycle = repo.create(body).await?;
    tracing::info!("Created cycle {}", cycle.id);
    Ok((StatusCode::CREATED, Json(cycle)))
}

pub async fn list_cycles(
    State(repo): State<Arc<dyn CycleRepository>>,
) -> Result<Json<Vec<Cycle>>, AppError> {
    Ok(Json(repo.list().await?))
}

pub async fn delete_cycle(
    State(repo): State<Arc<dyn CycleRepository>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("not found".to_string()))
    }
}
