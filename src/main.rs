use inventory_forecast::db::{init_schema, CycleRepository, InMemoryCycleRepository, PgCycleRepository};
use inventory_forecast::{api, create_pool, AppConfig, ForecastService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env()?;
    info!("Starting server with config: {:?}", config);

    let forecast = Arc::new(ForecastService::new(&config.forecast)?);
    info!("Forecast data directory: {}", forecast.data_dir().display());

    // 配置了数据库时使用 PostgreSQL, 否则使用内存存储
    let cycles: Arc<dyn CycleRepository> = match &config.database.url {
        Some(url) => {
            let pool = create_pool(url).await?;
            init_schema(&pool).await?;
            info!("Database pool created, cycles stored in PostgreSQL");
            Arc::new(PgCycleRepository::new(pool))
        }
        None => {
            info!("No database configured, cycles kept in memory");
            Arc::new(InMemoryCycleRepository::default())
        }
    };

    let app = api::router(forecast, cycles);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST   /api/run-forecast  - upload weekly snapshots, get order recommendations");
    info!("  GET    /api/predictions   - last saved recommendations");
    info!("  POST   /cycles            - create cycle entry");
    info!("  GET    /cycles            - list cycle entries");
    info!("  DELETE /cycles/:id        - delete cycle entry");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
