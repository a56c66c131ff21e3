pub mod handlers;

pub use handlers::*;

use crate::db::CycleRepository;
use crate::service::ForecastService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 上传文件总大小上限
const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// 构建路由: 健康检查、库存预测、周期记录
pub fn router(forecast: Arc<ForecastService>, cycles: Arc<dyn CycleRepository>) -> Router {
    let forecast_routes = Router::new()
        .route("/api/run-forecast", post(run_forecast))
        .route("/api/predictions", get(get_predictions))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(forecast);

    let cycle_routes = Router::new()
        .route("/cycles", post(create_cycle).get(list_cycles))
        .route("/cycles/:id", delete(delete_cycle))
        .with_state(cycles);

    Router::new()
        .route("/health", get(health_check))
        .merge(forecast_routes)
        .merge(cycle_routes)
        .layer(ServiceBuilder::new())
}
