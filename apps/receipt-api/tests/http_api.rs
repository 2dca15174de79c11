//! End-to-end tests driving the router over a loopback socket.

use std::net::SocketAddr;

use receipt_api::{build_router, AppState, ReceiptService};
use receipt_db::{Database, DbConfig};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn start_server(config: DbConfig) -> (SocketAddr, Database) {
    let db = Database::new(config).await.expect("open database");
    let app = build_router(AppState::new(ReceiptService::new(db.clone())));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    (addr, db)
}

async fn send_raw(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, body.to_string())
}

async fn process(addr: SocketAddr, receipt: &Value) -> (u16, Value) {
    let (status, body) = send_raw(addr, "POST", "/receipts/process", &receipt.to_string()).await;
    (status, serde_json::from_str(&body).expect("json body"))
}

async fn points(addr: SocketAddr, id: &str) -> (u16, Value) {
    let (status, body) = send_raw(addr, "GET", &format!("/receipts/{id}/points"), "").await;
    (status, serde_json::from_str(&body).expect("json body"))
}

async fn submit_and_score(addr: SocketAddr, receipt: Value) -> i64 {
    let (status, body) = process(addr, &receipt).await;
    assert_eq!(status, 200, "unexpected body {body}");
    let id = body["id"].as_str().expect("id string").to_string();

    let (status, body) = points(addr, &id).await;
    assert_eq!(status, 200, "unexpected body {body}");
    body["points"].as_i64().expect("points integer")
}

fn target_pepsi() -> Value {
    json!({
        "retailer": "Target",
        "purchaseDate": "2022-01-02",
        "purchaseTime": "13:13",
        "total": "1.25",
        "items": [{"shortDescription": "Pepsi - 12-oz", "price": "1.25"}]
    })
}

#[tokio::test]
async fn scores_known_receipts() {
    let (addr, _db) = start_server(DbConfig::in_memory()).await;

    assert_eq!(submit_and_score(addr, target_pepsi()).await, 31);

    let walgreens = json!({
        "retailer": "Walgreens",
        "purchaseDate": "2022-01-02",
        "purchaseTime": "08:13",
        "total": "2.65",
        "items": [
            {"shortDescription": "Pepsi - 12-oz", "price": "1.25"},
            {"shortDescription": "Dasani", "price": "1.40"}
        ]
    });
    assert_eq!(submit_and_score(addr, walgreens).await, 15);

    let target_five = json!({
        "retailer": "Target",
        "purchaseDate": "2022-01-01",
        "purchaseTime": "13:01",
        "items": [
            {"shortDescription": "Mountain Dew 12PK", "price": "6.49"},
            {"shortDescription": "Emils Cheese Pizza", "price": "12.25"},
            {"shortDescription": "Knorr Creamy Chicken", "price": "1.26"},
            {"shortDescription": "Doritos Nacho Cheese", "price": "3.35"},
            {"shortDescription": "   Klarbrunn 12-PK 12 FL OZ  ", "price": "12.00"}
        ],
        "total": "35.35"
    });
    assert_eq!(submit_and_score(addr, target_five).await, 28);

    let corner_market = json!({
        "retailer": "M&M Corner Market",
        "purchaseDate": "2022-03-20",
        "purchaseTime": "14:33",
        "items": [
            {"shortDescription": "Gatorade", "price": "2.25"},
            {"shortDescription": "Gatorade", "price": "2.25"},
            {"shortDescription": "Gatorade", "price": "2.25"},
            {"shortDescription": "Gatorade", "price": "2.25"}
        ],
        "total": "9.00"
    });
    assert_eq!(submit_and_score(addr, corner_market).await, 109);
}

#[tokio::test]
async fn rejects_invalid_receipts() {
    let (addr, db) = start_server(DbConfig::in_memory()).await;
    let invalid = json!({"status_code": 400, "message": "The receipt is invalid"});

    let mut bad_price = target_pepsi();
    bad_price["items"][0]["price"] = json!("1.5");
    assert_eq!(process(addr, &bad_price).await, (400, invalid.clone()));

    let mut no_items = target_pepsi();
    no_items["items"] = json!([]);
    assert_eq!(process(addr, &no_items).await, (400, invalid.clone()));

    let mut bad_retailer = target_pepsi();
    bad_retailer["retailer"] = json!("Target!");
    assert_eq!(process(addr, &bad_retailer).await, (400, invalid.clone()));

    let (status, body) = send_raw(addr, "POST", "/receipts/process", "{not json").await;
    assert_eq!(status, 400);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), invalid);

    let mut missing_field = target_pepsi();
    missing_field.as_object_mut().unwrap().remove("total");
    assert_eq!(process(addr, &missing_field).await, (400, invalid));

    assert_eq!(db.receipts().count().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (addr, _db) = start_server(DbConfig::in_memory()).await;

    assert_eq!(
        points(addr, "nonexistent-id").await,
        (
            404,
            json!({"status_code": 404, "message": "No receipt found for that id"})
        )
    );
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let (addr, _db) = start_server(DbConfig::in_memory()).await;

    let (status, body) = send_raw(addr, "GET", "/receipts/process", "").await;
    assert_eq!(status, 405);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status_code"], 405);
    assert!(body["message"].as_str().unwrap().contains("only accepts POST"));

    let (status, body) = send_raw(addr, "POST", "/receipts/abc/points", "").await;
    assert_eq!(status, 405);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["message"].as_str().unwrap().contains("only accepts GET"));
}

#[tokio::test]
async fn health_follows_database() {
    let (addr, db) = start_server(DbConfig::in_memory()).await;

    let (status, body) = send_raw(addr, "GET", "/health", "").await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");

    db.close().await;
    let (status, _) = send_raw(addr, "GET", "/health", "").await;
    assert_eq!(status, 503);

    let (status, body) = process(addr, &target_pepsi()).await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_all_score() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = DbConfig::new(dir.path().join("receipts.db")).max_connections(4);
    let (addr, db) = start_server(config).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        handles.push(tokio::spawn(async move {
            submit_and_score(addr, target_pepsi()).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.expect("join"), 31);
    }

    assert_eq!(db.receipts().count().await.unwrap(), 8);
}
