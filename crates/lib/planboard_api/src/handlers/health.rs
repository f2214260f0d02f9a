//! Liveness check.

/// `GET /health`: plain-text `OK`.
pub async fn health() -> &'static str {
    "OK"
}
