use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_ASSET_CACHE_MAX_AGE_SECONDS: u64 = 3_600;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const ASSET_CACHE_MAX_AGE_SECONDS_BOUNDS: (u64, u64) = (0, 365 * 24 * 60 * 60);
const REQUEST_ID_HEADER: &str = "x-request-id";
const HEALTH_PATH: &str = "/healthz";
const CONTENT_DOCUMENT_PATH: &str = "/content/site.json";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct HostConfig {
    port: u16,
    dist_dir: PathBuf,
    asset_cache_max_age_seconds: u64,
    log_level: LogLevel,
}

impl HostConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|value| *value != 0)
            .unwrap_or(DEFAULT_PORT);
        let dist_dir = non_empty(lookup("SITE_DIST_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let asset_cache_max_age_seconds = parse_u64_with_bounds(
            lookup("ASSET_CACHE_MAX_AGE_SECONDS"),
            DEFAULT_ASSET_CACHE_MAX_AGE_SECONDS,
            ASSET_CACHE_MAX_AGE_SECONDS_BOUNDS,
        );
        let log_level = parse_log_level(lookup("LOG_LEVEL"), DEFAULT_LOG_LEVEL);

        Self {
            port,
            dist_dir,
            asset_cache_max_age_seconds,
            log_level,
        }
    }
}

#[derive(Clone)]
struct HostState {
    config: HostConfig,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env();
    let state = HostState {
        config: config.clone(),
    };

    let index_file = config.dist_dir.join("index.html");
    let static_service = ServeDir::new(&config.dist_dir).fallback(ServeFile::new(&index_file));

    let app = Router::new()
        .route(HEALTH_PATH, get(healthz))
        .fallback_service(static_service)
        .layer(middleware::from_fn_with_state(state, host_headers));

    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        &config,
        LogLevel::Info,
        "server_started",
        serde_json::json!({
            "address": format!("http://127.0.0.1:{}", config.port),
            "dist_dir": config.dist_dir.display().to_string(),
            "index_present": index_file.is_file(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn host_headers(State(state): State<HostState>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = resolve_request_id(request.headers());
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let status = response.status();
    let headers = response.headers_mut();

    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            cache_control(&cache_policy(
                &path,
                status,
                state.config.asset_cache_max_age_seconds,
            )),
        );
    }
    if let Ok(request_id_header) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }

    let level = if path == HEALTH_PATH {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    log_event(
        &state.config,
        level,
        "request_served",
        serde_json::json!({
            "request_id": request_id,
            "method": method,
            "path": path,
            "status": status.as_u16(),
            "duration_ms": u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }),
    );

    response
}

/// The page shell and the content document must revalidate so edits show up
/// on the next load; fingerprinted bundle assets can be cached.
fn cache_policy(path: &str, status: StatusCode, max_age_seconds: u64) -> String {
    if !status.is_success() {
        return "no-store".to_string();
    }

    let has_extension = Path::new(path).extension().is_some();
    if path == HEALTH_PATH {
        "no-store".to_string()
    } else if !has_extension || path.ends_with(".html") || path == CONTENT_DOCUMENT_PATH {
        "no-cache".to_string()
    } else {
        format!("public, max-age={max_age_seconds}")
    }
}

fn cache_control(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u64_with_bounds(value: Option<String>, default: u64, bounds: (u64, u64)) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_log_level(value: Option<String>, default: LogLevel) -> LogLevel {
    match non_empty(value)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        _ => default,
    }
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(generate_request_id)
}

fn event_payload(level: LogLevel, event: &str, fields: serde_json::Value) -> serde_json::Value {
    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert("level".to_string(), serde_json::Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    serde_json::Value::Object(payload)
}

fn log_event(config: &HostConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    println!("{}", event_payload(level, event, fields));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> HostConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        HostConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn config_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(
            config,
            HostConfig {
                port: DEFAULT_PORT,
                dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
                asset_cache_max_age_seconds: DEFAULT_ASSET_CACHE_MAX_AGE_SECONDS,
                log_level: LogLevel::Info,
            }
        );
    }

    #[test]
    fn config_reads_trimmed_values() {
        let config = config_from(&[
            ("PORT", " 3000 "),
            ("SITE_DIST_DIR", "public"),
            ("ASSET_CACHE_MAX_AGE_SECONDS", "600"),
            ("LOG_LEVEL", "DEBUG"),
        ]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.dist_dir, PathBuf::from("public"));
        assert_eq!(config.asset_cache_max_age_seconds, 600);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn out_of_range_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("PORT", "0"),
            ("SITE_DIST_DIR", "   "),
            ("ASSET_CACHE_MAX_AGE_SECONDS", "99999999999"),
            ("LOG_LEVEL", "verbose"),
        ]);

        assert_eq!(config, config_from(&[]));
    }

    #[test]
    fn page_shell_and_content_revalidate() {
        for path in ["/", "/index.html", "/projects", CONTENT_DOCUMENT_PATH] {
            assert_eq!(cache_policy(path, StatusCode::OK, 600), "no-cache", "{path}");
        }
    }

    #[test]
    fn bundle_assets_are_cacheable() {
        assert_eq!(
            cache_policy("/portfolio-site-1a2b3c_bg.wasm", StatusCode::OK, 600),
            "public, max-age=600"
        );
        assert_eq!(
            cache_policy("/images/profile.jpg", StatusCode::OK, 0),
            "public, max-age=0"
        );
    }

    #[test]
    fn errors_and_health_are_never_cached() {
        assert_eq!(cache_policy("/missing.js", StatusCode::NOT_FOUND, 600), "no-store");
        assert_eq!(cache_policy(HEALTH_PATH, StatusCode::OK, 600), "no-store");
    }

    #[test]
    fn request_id_is_echoed_when_present() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  abc-123 "));
        assert_eq!(resolve_request_id(&headers), "abc-123");
    }

    #[test]
    fn request_id_is_generated_when_missing_or_blank() {
        let mut headers = HeaderMap::new();
        let first = resolve_request_id(&headers);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        let second = resolve_request_id(&headers);

        assert!(first.starts_with("req-"));
        assert!(second.starts_with("req-"));
        assert_ne!(first, second);
    }

    #[test]
    fn event_payload_merges_fields_after_envelope() {
        let payload = event_payload(
            LogLevel::Info,
            "request_served",
            serde_json::json!({ "status": 200, "path": "/" }),
        );

        assert_eq!(payload["level"], "info");
        assert_eq!(payload["event"], "request_served");
        assert_eq!(payload["status"], 200);
        assert!(payload["ts"].is_u64());
    }

    #[test]
    fn debug_sorts_below_info() {
        assert!(LogLevel::Debug < LogLevel::Info);
    }
}
