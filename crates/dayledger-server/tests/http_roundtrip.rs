//! End-to-end tests: a real listener on an ephemeral port, a JSON calendar
//! file on disk, and raw HTTP over TCP.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dayledger_core::{ProjectMapping, ScheduleConfig};
use dayledger_providers::JsonFileProvider;
use dayledger_server::{
    HttpServer, RequestHandler, ScheduleService, ServerConfig, SignalHandler, make_connection_handler,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const CALENDAR: &str = r#"[
    {
        "id": "1",
        "subject": "Design review",
        "start": "2024-06-03T10:00:00",
        "end": "2024-06-03T11:00:00",
        "organizer": "Ana Lopez",
        "required_attendees": "Ana Lopez; Sam Reed"
    },
    {
        "id": "2",
        "subject": "National Day",
        "start": "2024-06-04T00:00:00",
        "end": "2024-06-05T00:00:00",
        "all_day": true,
        "busy_status": "free"
    },
    {
        "id": "3",
        "subject": "Canceled: Retro",
        "start": "2024-06-05T15:00:00",
        "end": "2024-06-05T16:00:00"
    }
]"#;

struct Response {
    status: u16,
    head: String,
    body: String,
}

impl Response {
    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn start(calendar: &Path) -> (SocketAddr, dayledger_server::ShutdownHandle) {
    let config = ScheduleConfig::default()
        .with_projects(ProjectMapping::new().with_project("Design review", "Atlas"));
    let service =
        ScheduleService::new(config, Arc::new(JsonFileProvider::new(calendar))).unwrap();
    let handler = Arc::new(
        RequestHandler::new(Arc::new(service))
            .with_today(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()),
    );

    let server_config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
        .with_connection_timeout(Duration::from_secs(5));
    let server = HttpServer::bind(server_config).await.unwrap();
    let addr = server.local_addr().unwrap();

    let signals = SignalHandler::new();
    let shutdown = signals.shutdown_handle();
    tokio::spawn(async move {
        server
            .run_until_shutdown(make_connection_handler(handler), signals.shutdown().wait())
            .await
            .unwrap();
    });

    (addr, shutdown)
}

async fn send(addr: SocketAddr, raw: &str) -> Response {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut text = String::new();
    stream.read_to_string(&mut text).await.unwrap();

    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();

    Response {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}

async fn get(addr: SocketAddr, target: &str) -> Response {
    send(
        addr,
        &format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target),
    )
    .await
}

fn write_calendar(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("calendar.json");
    std::fs::write(&path, CALENDAR).unwrap();
    path
}

#[tokio::test]
async fn calendar_week() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start(&write_calendar(&dir)).await;

    let response = get(addr, "/calendar?from=2024-06-03&to=2024-06-05").await;
    assert_eq!(response.status, 200);
    assert!(
        response
            .head
            .contains("Content-Type: application/json; charset=utf-8")
    );
    assert!(response.head.contains("Connection: close"));
    assert!(
        response
            .head
            .contains(&format!("Content-Length: {}", response.body.len()))
    );

    let events = response.json();
    let events = events.as_array().unwrap();

    // Nothing is generated on the holiday, and the canceled retro is gone.
    assert!(
        events
            .iter()
            .all(|e| !e["start"].as_str().unwrap().starts_with("2024-06-04"))
    );
    assert!(events.iter().all(|e| e["subject"] != "Canceled: Retro"));

    let review = events
        .iter()
        .find(|e| e["subject"] == "Design review")
        .unwrap();
    assert_eq!(review["project"], "Atlas");
    assert_eq!(review["required_attendees"][1], "Sam Reed");

    let starts: Vec<_> = events
        .iter()
        .map(|e| e["start"].as_str().unwrap().to_string())
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);

    shutdown.trigger();
}

#[tokio::test]
async fn calendar_body_is_indented_json() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start(&write_calendar(&dir)).await;

    let response = get(addr, "/calendar?from=2024-06-03&to=2024-06-03").await;
    assert!(response.body.starts_with("[\n    {\n        \"subject\": "));

    shutdown.trigger();
}

#[tokio::test]
async fn missing_dates_default_to_today() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start(&write_calendar(&dir)).await;

    let explicit = get(addr, "/calendar?from=2024-06-03&to=2024-06-03").await;
    let defaulted = get(addr, "/calendar").await;
    assert_eq!(defaulted.status, 200);
    assert_eq!(defaulted.body, explicit.body);

    shutdown.trigger();
}

#[tokio::test]
async fn error_responses() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start(&write_calendar(&dir)).await;

    let inverted = get(addr, "/calendar?from=2024-06-07&to=2024-06-03").await;
    assert_eq!(inverted.status, 400);
    insta::assert_snapshot!(
        inverted.body,
        @r#"{"error":"invalid date range: from date 2024-06-07 is after to date 2024-06-03"}"#
    );

    let malformed = get(addr, "/calendar?from=yesterday").await;
    assert_eq!(malformed.status, 400);

    let unknown = get(addr, "/calendar/extra").await;
    assert_eq!(unknown.status, 404);
    assert_eq!(unknown.body, r#"{"error":"Not Found"}"#);

    let post = send(addr, "POST /calendar HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
    assert_eq!(post.status, 405);
    assert!(post.head.contains("Allow: GET"));

    let garbage = send(addr, "HELLO\r\n\r\n").await;
    assert_eq!(garbage.status, 400);

    shutdown.trigger();
}

#[tokio::test]
async fn health() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start(&write_calendar(&dir)).await;

    let response = get(addr, "/health").await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json(), serde_json::json!({"status": "ok"}));

    shutdown.trigger();
}

#[tokio::test]
async fn missing_calendar_file_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start(&dir.path().join("missing.json")).await;

    let response = get(addr, "/calendar?from=2024-06-03&to=2024-06-03").await;
    assert_eq!(response.status, 500);
    assert!(
        response.json()["error"]
            .as_str()
            .unwrap()
            .starts_with("calendar provider unavailable")
    );

    // The server keeps serving after a provider failure.
    std::fs::write(dir.path().join("missing.json"), "[]").unwrap();
    let recovered = get(addr, "/calendar?from=2024-06-03&to=2024-06-03").await;
    assert_eq!(recovered.status, 200);

    shutdown.trigger();
}
