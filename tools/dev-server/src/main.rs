//! Development Server for the SQL fiddle
//!
//! Serves the page, the worker script, the wasm bindings and the engine
//! module from one directory with correct MIME types.
//!
//! Environment:
//! - `PORT`: listen port (default 8080)
//! - `FIDDLE_WEB_ROOT`: directory to serve (default `web`)

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
    routing::get_service,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WEB_ROOT: &str = "web";

/// Server settings read from the environment
#[derive(Clone, Debug, PartialEq, Eq)]
struct ServerConfig {
    port: u16,
    web_root: PathBuf,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_vars(
            std::env::var("PORT").ok(),
            std::env::var("FIDDLE_WEB_ROOT").ok(),
        )
    }

    /// Unset, empty or unparsable values fall back to the defaults
    fn from_vars(port: Option<String>, web_root: Option<String>) -> Self {
        Self {
            port: port
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            web_root: web_root
                .filter(|r| !r.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WEB_ROOT)),
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env();
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    let serve_dir = ServeDir::new(&config.web_root).precompressed_gzip();

    let app = Router::new()
        .fallback_service(get_service(serve_dir).handle_error(|_| async {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(add_headers)));

    println!("╔═══════════════════════════════════════════════════╗");
    println!("║            SQL Fiddle Development Server          ║");
    println!("╠═══════════════════════════════════════════════════╣");
    println!("║  URL:  http://localhost:{:<26}║", config.port);
    println!("║  Root: {:<43}║", config.web_root.display());
    println!("║  Press Ctrl+C to stop                             ║");
    println!("╚═══════════════════════════════════════════════════╝");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// MIME type for a request path, when the default guess needs overriding
fn content_type(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "js" | "mjs" => Some("application/javascript; charset=utf-8"),
        "wasm" => Some("application/wasm"),
        "css" => Some("text/css; charset=utf-8"),
        "html" => Some("text/html; charset=utf-8"),
        "json" => Some("application/json; charset=utf-8"),
        _ => None,
    }
}

/// Fix MIME types and disable caching so rebuilt wasm is always picked up
async fn add_headers(request: Request<Body>, next: axum::middleware::Next) -> Response<Body> {
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Some(mime) = content_type(&path) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_vars(None, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.web_root, PathBuf::from("web"));
    }

    #[test]
    fn test_config_overrides() {
        let config = ServerConfig::from_vars(Some("9000".into()), Some("dist".into()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.web_root, PathBuf::from("dist"));

        let config = ServerConfig::from_vars(Some("nope".into()), Some("  ".into()));
        assert_eq!(config, ServerConfig::from_vars(None, None));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type("/fiddle-module.wasm"), Some("application/wasm"));
        assert_eq!(
            content_type("/pkg/fiddle_web.js"),
            Some("application/javascript; charset=utf-8")
        );
        assert_eq!(content_type("/index.html"), Some("text/html; charset=utf-8"));
        assert_eq!(content_type("/"), None);
        assert_eq!(content_type("/favicon.ico"), None);
    }
}
