use std::fmt::Display;

use chrono::TimeZone;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::normalize::normalize_row_in;
use super::types::{CanonicalRow, RawRow};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Feed load error: Failed to fetch")]
    Network(#[source] reqwest::Error),
    #[error("Feed API HTTP {0}")]
    Http(u16),
    #[error("Feed API: invalid response (ok/rows missing)")]
    InvalidPayload,
}

/// Fetches the feed once and normalizes its rows in input order. Local times
/// in the feed are read in the machine's timezone.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Vec<CanonicalRow>, FeedError> {
    fetch_feed_in(client, url, &chrono::Local).await
}

pub async fn fetch_feed_in<Tz>(
    client: &reqwest::Client,
    url: &str,
    tz: &Tz,
) -> Result<Vec<CanonicalRow>, FeedError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    debug!(url, "fetching feed");
    let response = client.get(url).send().await.map_err(|err| {
        error!(error = %err, "feed fetch network error");
        FeedError::Network(err)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body, "feed HTTP error");
        return Err(FeedError::Http(status.as_u16()));
    }

    let body = response.bytes().await.map_err(|err| {
        error!(error = %err, "feed body could not be read");
        FeedError::Network(err)
    })?;
    let rows = parse_envelope(&body)?;
    debug!(rows = rows.len(), "feed payload accepted");

    Ok(rows
        .into_iter()
        .map(|value| normalize_row_in(&RawRow::from_value(value), tz))
        .collect())
}

/// Validates the `{ok: true, rows: [...]}` envelope and returns the raw rows.
pub fn parse_envelope(body: &[u8]) -> Result<Vec<Value>, FeedError> {
    let mut payload: Value = serde_json::from_slice(body).map_err(|err| {
        error!(error = %err, "feed payload is not JSON");
        FeedError::InvalidPayload
    })?;

    let ok = payload.get("ok").and_then(Value::as_bool).unwrap_or(false);
    if !ok || !payload.get("rows").is_some_and(Value::is_array) {
        error!(payload = %payload, "feed API invalid payload");
        return Err(FeedError::InvalidPayload);
    }

    let rows = match payload.get_mut("rows").map(Value::take) {
        Some(Value::Array(rows)) => rows,
        _ => Vec::new(),
    };
    if let Some(count) = payload.get("count").and_then(Value::as_u64) {
        if count != rows.len() as u64 {
            warn!(count, rows = rows.len(), "feed count does not match rows");
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::types::FeedKind;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;

    async fn feed_handler() -> Response {
        let body = serde_json::json!({
            "ok": true,
            "count": 3,
            "rows": [
                {"id": "p1", "type": "News", "title": "Saisonstart", "date": "01.09.2025"},
                {"id": "p2", "type": "Ergebnis", "heim": "Scorpions", "gast": "Tigers",
                 "heimPunkte": 81, "gastPunkte": "77"},
                "kaputt"
            ]
        });
        (
            [(reqwest::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }

    async fn not_ok_handler() -> Response {
        axum::Json(serde_json::json!({"ok": false})).into_response()
    }

    async fn rows_missing_handler() -> Response {
        axum::Json(serde_json::json!({"ok": true, "count": 0})).into_response()
    }

    async fn garbage_handler() -> Response {
        "<html>maintenance</html>".into_response()
    }

    async fn failing_handler() -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "temporary failure").into_response()
    }

    async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/feed", get(feed_handler))
            .route("/not-ok", get(not_ok_handler))
            .route("/rows-missing", get(rows_missing_handler))
            .route("/garbage", get(garbage_handler))
            .route("/failing", get(failing_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        (format!("http://{address}"), join_handle)
    }

    #[tokio::test]
    async fn fetch_feed_normalizes_rows_in_input_order() {
        let (base, server_task) = spawn_test_server().await;
        let client = reqwest::Client::new();

        let rows = fetch_feed_in(&client, &format!("{base}/feed"), &Utc)
            .await
            .expect("feed should load");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, "p1");
        assert_eq!(rows[0].kind, FeedKind::News);
        assert_eq!(rows[0].date_label.as_deref(), Some("01.09.2025 00:00"));
        assert_eq!(rows[1].kind, FeedKind::Result);
        assert_eq!(rows[1].home_score, Some(81.0));
        assert_eq!(rows[1].away_score, Some(77.0));
        assert_eq!(rows[2].id, "(ohne-id)");
        assert_eq!(rows[2].kind, FeedKind::Unknown);

        server_task.abort();
    }

    #[tokio::test]
    async fn fetch_feed_rejects_invalid_envelopes() {
        let (base, server_task) = spawn_test_server().await;
        let client = reqwest::Client::new();

        for path in ["not-ok", "rows-missing", "garbage"] {
            let result = fetch_feed_in(&client, &format!("{base}/{path}"), &Utc).await;
            assert!(
                matches!(result, Err(FeedError::InvalidPayload)),
                "{path} should be an invalid payload"
            );
        }

        server_task.abort();
    }

    #[tokio::test]
    async fn fetch_feed_reports_http_status() {
        let (base, server_task) = spawn_test_server().await;
        let client = reqwest::Client::new();

        let error = fetch_feed_in(&client, &format!("{base}/failing"), &Utc)
            .await
            .expect_err("500 must fail");
        assert!(matches!(error, FeedError::Http(500)));
        assert_eq!(error.to_string(), "Feed API HTTP 500");

        server_task.abort();
    }

    #[tokio::test]
    async fn fetch_feed_reports_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        drop(listener);

        let client = reqwest::Client::new();
        let error = fetch_feed_in(&client, &format!("http://{address}/feed"), &Utc)
            .await
            .expect_err("closed port must fail");
        assert!(matches!(error, FeedError::Network(_)));
        assert_eq!(error.to_string(), "Feed load error: Failed to fetch");
    }

    #[test]
    fn envelope_requires_ok_true_and_row_array() {
        assert!(parse_envelope(br#"{"ok":true,"count":0,"rows":[]}"#).is_ok());
        assert!(matches!(
            parse_envelope(br#"{"ok":"yes","rows":[]}"#),
            Err(FeedError::InvalidPayload)
        ));
        assert!(matches!(
            parse_envelope(br#"{"ok":true,"rows":{}}"#),
            Err(FeedError::InvalidPayload)
        ));
        assert!(matches!(parse_envelope(b"[]"), Err(FeedError::InvalidPayload)));
    }

    #[test]
    fn envelope_tolerates_count_mismatch() {
        let rows = parse_envelope(br#"{"ok":true,"count":5,"rows":[{"id":"p1"}]}"#)
            .expect("count mismatch is not fatal");
        assert_eq!(rows.len(), 1);
    }
}
