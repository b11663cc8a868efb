use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ERROR_BODY: &str = "{\"error\":\"Something went wrong\"}";

/// Static site host plus the `/api/ip` geolocation proxy the page calls at
/// startup. The proxy keeps the upstream endpoint and the visitor's address
/// handling on the server side.
#[derive(Parser, Clone, Debug)]
#[command(name = "app-server")]
struct Args {
    /// Bind address.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Address substituted when the client connects from loopback, so local
    /// development still resolves to a real place.
    #[arg(long, default_value = "8.8.8.8")]
    fallback_ip: String,

    /// Geolocation lookup base URL; `/{ip}.json` is appended.
    #[arg(long, default_value = "https://get.geojs.io/v1/ip/geo")]
    upstream: String,

    /// Directory of built static site files.
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,
}

#[derive(Clone)]
struct AppState {
    args: Arc<Args>,
    http: reqwest::Client,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let addr = args.addr;
    let static_dir = args.static_dir.clone();
    let state = AppState {
        args: Arc::new(args),
        http: reqwest::Client::new(),
    };

    let app = router(state).fallback_service(ServeDir::new(static_dir));

    info!("listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/api/ip", get(get_ip))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Proxy the visitor's IP to the geolocation upstream and return its JSON
/// verbatim. Every failure mode collapses to the same opaque 500 body.
async fn get_ip(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(raw_ip) = client_ip(&headers) else {
        warn!("lookup request without client address header");
        return lookup_error();
    };
    let ip = resolve_lookup_ip(&raw_ip, &state.args.fallback_ip);

    let url = format!("{}/{ip}.json", state.args.upstream.trim_end_matches('/'));
    let resp = match state.http.get(&url).send().await {
        Ok(r) => r,
        Err(err) => {
            warn!("upstream request failed: {err}");
            return lookup_error();
        }
    };
    if !resp.status().is_success() {
        warn!("upstream returned {}", resp.status());
        return lookup_error();
    }
    let body = match resp.text().await {
        Ok(b) => b,
        Err(err) => {
            warn!("upstream body read failed: {err}");
            return lookup_error();
        }
    };
    if serde_json::from_str::<serde_json::Value>(&body).is_err() {
        warn!("upstream body was not JSON");
        return lookup_error();
    }

    (StatusCode::OK, json_headers(), Body::from(body)).into_response()
}

fn lookup_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json_headers(),
        Body::from(ERROR_BODY),
    )
        .into_response()
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// First hop of `x-forwarded-for`, the only trusted client-address source.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

fn resolve_lookup_ip(raw: &str, fallback: &str) -> String {
    match raw.parse::<IpAddr>() {
        Ok(addr) if addr.is_loopback() => fallback.to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn client_ip_missing_header() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn client_ip_plain() {
        assert_eq!(
            client_ip(&headers_with("203.0.113.9")),
            Some("203.0.113.9".to_string())
        );
    }

    #[test]
    fn client_ip_takes_first_hop() {
        assert_eq!(
            client_ip(&headers_with("203.0.113.9, 10.0.0.1, 172.16.0.1")),
            Some("203.0.113.9".to_string())
        );
    }

    #[test]
    fn client_ip_trims_whitespace() {
        assert_eq!(
            client_ip(&headers_with("  203.0.113.9 , 10.0.0.1")),
            Some("203.0.113.9".to_string())
        );
    }

    #[test]
    fn client_ip_empty_value() {
        assert_eq!(client_ip(&headers_with("  ,10.0.0.1")), None);
    }

    #[test]
    fn loopback_v4_uses_fallback() {
        assert_eq!(resolve_lookup_ip("127.0.0.1", "8.8.8.8"), "8.8.8.8");
    }

    #[test]
    fn loopback_v6_uses_fallback() {
        assert_eq!(resolve_lookup_ip("::1", "8.8.8.8"), "8.8.8.8");
    }

    #[test]
    fn public_address_passes_through() {
        assert_eq!(resolve_lookup_ip("203.0.113.9", "8.8.8.8"), "203.0.113.9");
    }

    #[test]
    fn unparsable_address_passes_through() {
        assert_eq!(resolve_lookup_ip("not-an-ip", "8.8.8.8"), "not-an-ip");
    }

    #[test]
    fn error_body_is_json() {
        let v: serde_json::Value = serde_json::from_str(ERROR_BODY).unwrap();
        assert_eq!(v["error"], "Something went wrong");
    }

    #[tokio::test]
    async fn missing_header_returns_500() {
        let state = AppState {
            args: Arc::new(Args::parse_from(["app-server"])),
            http: reqwest::Client::new(),
        };
        let response = router(state)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/ip")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "application/json"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], ERROR_BODY.as_bytes());
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let state = AppState {
            args: Arc::new(Args::parse_from(["app-server"])),
            http: reqwest::Client::new(),
        };
        let response = router(state)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
