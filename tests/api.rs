use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use inventory_forecast::api;
use inventory_forecast::config::ForecastConfig;
use inventory_forecast::db::InMemoryCycleRepository;
use inventory_forecast::ForecastService;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "forecast-test-boundary";

fn app(weeks: usize) -> (TempDir, Router) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let forecast = ForecastService::new(&ForecastConfig {
        data_dir: dir.path().to_path_buf(),
        required_weeks: weeks,
    })
    .expect("create forecast service");
    let router = api::router(Arc::new(forecast), Arc::new(InMemoryCycleRepository::default()));
    (dir, router)
}

fn multipart(files: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (field, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{field}.csv\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(Method::POST)
        .uri("/api/run-forecast")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("build request")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("call router");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    // 提取器拒绝时返回纯文本
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (_dir, router) = app(2);
    let (status, body) = send(&router, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn run_forecast_returns_sorted_records_and_persists_them() {
    let (dir, router) = app(2);

    let (status, body) = send(
        &router,
        multipart(&[
            ("week1", "Item,Quantity,Category,Unit\nFlour,100,Dry,kg\nSugar,10,Dry,kg\n"),
            ("week2", "Item,Quantity,Category,Unit\nSugar,4,Dry,kg\nFlour,60,Dry,kg\n"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().expect("records");
    assert_eq!(records.len(), 2);

    let flour = &records[0];
    assert_eq!(flour["Item"], "Flour");
    assert_eq!(flour["Category"], "Dry");
    assert_eq!(flour["Unit"], "kg");
    assert_eq!(flour["Current_Quantity"], 60.0);
    assert_eq!(flour["Avg_Weekly_Usage"], 40.0);
    assert_eq!(flour["Recommended_Order_Quantity"], 20);
    assert_eq!(flour["Predicted_Quantity"], 20.0);
    assert!(flour.get("Forecasted_Ingredient_Demand").is_none());

    assert_eq!(records[1]["Item"], "Sugar");
    assert_eq!(records[1]["Recommended_Order_Quantity"], 8);

    assert!(dir.path().join("next_week_orders.csv").exists());
    assert!(dir.path().join("week1_inventory.csv").exists());

    let (status, saved) = send(&router, empty_request(Method::GET, "/api/predictions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved, body);
}

#[tokio::test]
async fn missing_week_is_rejected() {
    let (_dir, router) = app(2);
    let (status, body) = send(&router, multipart(&[("week1", "Item,Quantity\nFlour,1\n")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing file for week2");
}

#[tokio::test]
async fn invalid_sales_plan_is_a_bad_request() {
    let (_dir, router) = app(1);
    let (status, body) = send(
        &router,
        multipart(&[
            ("week1", "Item,Quantity\nCarrot,5\n"),
            ("sales_plan", "Dish,Multiplier\nSoup,1\n"),
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "sales plan is missing required column 'Qty'");
}

#[tokio::test]
async fn sales_plan_with_recipes_raises_order() {
    let (dir, router) = app(1);
    std::fs::write(
        dir.path().join("recipes.csv"),
        "Dish,Ingredient,Unit,QtyPerDish\nSoup,Carrot,each,2\n",
    )
    .expect("write recipes");

    let (status, body) = send(
        &router,
        multipart(&[
            ("week1", "Item,Quantity\nCarrot,5\nSalt,3\n"),
            ("sales_plan", "Dish,Qty,Multiplier\nSoup,10,1.0\n"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let carrot = &body[0];
    assert_eq!(carrot["Forecasted_Ingredient_Demand"], 20.0);
    assert_eq!(carrot["Recommended_Order_Quantity"], 15);
    assert_eq!(body[1]["Forecasted_Ingredient_Demand"], 0.0);
}

#[tokio::test]
async fn predictions_missing_before_first_run() {
    let (_dir, router) = app(4);
    let (status, body) = send(&router, empty_request(Method::GET, "/api/predictions")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Predictions not available");
}

#[tokio::test]
async fn cycle_crud_round_trip() {
    let (_dir, router) = app(4);

    let (status, created) = send(
        &router,
        json_request(
            Method::POST,
            "/cycles",
            json!({ "date": "2024-05-01", "symptoms": "cramps" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({ "id": 1, "date": "2024-05-01", "symptoms": "cramps", "notes": null })
    );

    send(&router, json_request(Method::POST, "/cycles", json!({ "date": "2024-05-29" }))).await;

    let (status, listed) = send(&router, empty_request(Method::GET, "/cycles")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = listed
        .as_array()
        .expect("list")
        .iter()
        .map(|c| c["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![2, 1]);

    let (status, _) = send(&router, empty_request(Method::DELETE, "/cycles/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, empty_request(Method::DELETE, "/cycles/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn cycle_without_date_is_rejected() {
    let (_dir, router) = app(4);
    let (status, _) = send(
        &router,
        json_request(Method::POST, "/cycles", json!({ "notes": "no date" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
