// Command-line health checks against a running server and its database file.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::db::Database;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("could not connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16, body: String },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("database file does not exist: {}", .0.display())]
    MissingDatabase(PathBuf),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            CheckError::Timeout { url }
        } else if source.is_connect() {
            CheckError::Connect { url, source }
        } else if source.is_decode() {
            CheckError::Decode { url, source }
        } else {
            CheckError::Request { url, source }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub response: HealthResponse,
    pub response_time: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusReport {
    pub status: String,
    pub uptime: String,
    pub request_count: u64,
    #[serde(default)]
    pub database_stats: Value,
}

impl StatusReport {
    /// The database error reported by the server, if counting rows failed.
    pub fn database_error(&self) -> Option<&str> {
        self.database_stats.get("error").and_then(Value::as_str)
    }

    pub fn database_count(&self, key: &str) -> i64 {
        self.database_stats
            .get(key)
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }
}

/// Outcome of one endpoint in the smoke test.
#[derive(Debug)]
pub struct EndpointCheck {
    pub name: &'static str,
    pub outcome: Result<String, CheckError>,
}

/// HTTP client bound to one server.
pub struct Checker {
    client: reqwest::Client,
    base_url: String,
}

impl Checker {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CheckError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CheckError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Value, CheckError> {
        let response = request
            .send()
            .await
            .map_err(|e| CheckError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.chars().take(100).collect(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CheckError::from_reqwest(url, e))
    }

    async fn get_json(&self, path: &str) -> Result<Value, CheckError> {
        let url = self.url(path);
        self.send(self.client.get(&url), &url).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, CheckError> {
        let url = self.url(path);
        self.send(self.client.post(&url).json(body), &url).await
    }

    pub async fn health(&self) -> Result<HealthReport, CheckError> {
        let started = Instant::now();
        let url = self.url("/api/health");
        let value = self.get_json("/api/health").await?;
        let response_time = started.elapsed();
        let response =
            serde_json::from_value(value).map_err(|source| CheckError::Payload { url, source })?;
        Ok(HealthReport {
            response,
            response_time,
        })
    }

    pub async fn server_status(&self) -> Result<StatusReport, CheckError> {
        let url = self.url("/api/server/status");
        let value = self.get_json("/api/server/status").await?;
        serde_json::from_value(value).map_err(|source| CheckError::Payload { url, source })
    }

    /// Exercise the robot state and inventory endpoints with sample data.
    pub async fn smoke_test(&self) -> Vec<EndpointCheck> {
        let mut checks = Vec::new();

        checks.push(EndpointCheck {
            name: "GET /api/robot/state",
            outcome: self.get_json("/api/robot/state").await.map(|v| {
                if v.get("status").and_then(Value::as_str) == Some("not_found") {
                    "no robot state recorded yet".to_string()
                } else {
                    format!("robot at ({}, {})", v["x"], v["y"])
                }
            }),
        });

        let robot = json!({
            "x": 100,
            "y": 200,
            "direction": 1,
            "isDigging": false,
            "isJumping": true,
        });
        checks.push(EndpointCheck {
            name: "POST /api/robot/state",
            outcome: self
                .post_json("/api/robot/state", &robot)
                .await
                .map(|v| format!("status {}", v["status"])),
        });

        let item = json!({
            "name": "Test Item",
            "type": "test",
            "prefix": "Shiny",
            "color": "#ff00ff",
            "symbol": "T",
            "rarity": "common",
        });
        checks.push(EndpointCheck {
            name: "POST /api/inventory/add",
            outcome: self
                .post_json("/api/inventory/add", &item)
                .await
                .map(|v| format!("stored with id {}", v["id"])),
        });

        checks.push(EndpointCheck {
            name: "GET /api/inventory/random",
            outcome: self.get_json("/api/inventory/random").await.map(|v| {
                format!(
                    "random item: {}",
                    v.get("name").and_then(Value::as_str).unwrap_or("Unknown")
                )
            }),
        });

        checks
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseFileReport {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
    pub tables: Vec<(String, i64)>,
}

/// File metadata plus per-table row counts. Opens the file read-only.
pub async fn inspect_database_file(path: &Path) -> Result<DatabaseFileReport, CheckError> {
    if !path.exists() {
        return Err(CheckError::MissingDatabase(path.to_path_buf()));
    }
    let metadata = std::fs::metadata(path)?;
    let modified = metadata.modified().ok().map(DateTime::<Local>::from);

    let db = Database::open_read_only(path).await?;
    let tables = db.table_row_counts().await?;
    db.close().await;

    Ok(DatabaseFileReport {
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        modified,
        tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused_is_reported() {
        // Bind then drop to find a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let checker = Checker::new(&format!("http://127.0.0.1:{port}/"), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(checker.base_url(), format!("http://127.0.0.1:{port}"));
        let err = checker.health().await.unwrap_err();
        assert!(matches!(err, CheckError::Connect { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_missing_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect_database_file(&dir.path().join("absent.db"))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::MissingDatabase(_)));
    }

    #[tokio::test]
    async fn test_inspect_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_data.db");
        let url = format!("sqlite:{}?mode=rwc", path.display());
        let db = Database::new(&url).await.unwrap();
        db.add_inventory_item(&Default::default()).await.unwrap();
        db.close().await;

        let report = inspect_database_file(&path).await.unwrap();
        assert!(report.size_bytes > 0);
        assert!(report
            .tables
            .iter()
            .any(|(name, count)| name == "inventory_items" && *count == 1));
    }

    #[test]
    fn test_status_report_database_fields() {
        let report: StatusReport = serde_json::from_value(json!({
            "status": "running",
            "uptime": "0:00:01",
            "request_count": 3,
            "database_stats": { "robot_state_entries": 1, "inventory_items": 4, "item_templates": 0 }
        }))
        .unwrap();
        assert_eq!(report.database_count("inventory_items"), 4);
        assert!(report.database_error().is_none());

        let failed: StatusReport = serde_json::from_value(json!({
            "status": "running",
            "uptime": "0:00:01",
            "request_count": 3,
            "database_stats": { "error": "disk I/O error" }
        }))
        .unwrap();
        assert_eq!(failed.database_error(), Some("disk I/O error"));
    }
}
