//! Public-facing web server.
//!
//! Routes:
//!   POST /webhook/{token}  - Telegram updates, acknowledged immediately
//!   GET  /health           - Health check
//!   GET  /apps/{id}/...    - Deployed sites (static files)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{OriginalUri, Path as UrlPath, Request, State},
    http::{StatusCode, Uri},
    middleware::map_request_with_state,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::config::Config;
use crate::core::validation::relative_path;
use crate::deploy::{DeploymentId, INDEX_FILES};
use crate::telegram::{IncomingUpdate, UpdateContext, UpdateOutcome, handle_update};

/// Extensions tried for extension-less paths that do not exist
const FALLBACK_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// Shared state for the web server.
#[derive(Clone)]
struct WebState {
    config: Arc<Config>,
    ctx: UpdateContext,
}

/// Builds the router. Deployments are served from `config.deploy_root`.
pub fn create_router(config: Arc<Config>, ctx: UpdateContext) -> Router {
    let apps = apps_router(config.deploy_root.clone());
    let state = WebState { config, ctx };

    Router::new()
        .route("/webhook/{token}", post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .nest_service("/apps", apps)
        .layer(TraceLayer::new_for_http())
}

/// Start the public web server and run until Ctrl+C.
pub async fn start_web_server(config: Arc<Config>, ctx: UpdateContext) -> anyhow::Result<()> {
    let addr = config.listen_addr();
    let app = create_router(config, ctx);

    tracing::info!("Starting web server on http://{}", addr);
    tracing::info!("  /webhook/<token>  - Telegram webhook");
    tracing::info!("  /apps/<id>/       - Deployed sites");
    tracing::info!("  /health           - Health check");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// POST /webhook/{token}: acknowledges at once, processes in the background.
///
/// The body is parsed on the processing task so a malformed update still
/// gets its `200`.
async fn webhook_handler(UrlPath(token): UrlPath<String>, State(state): State<WebState>, body: Bytes) -> Response {
    if !state.config.token_matches(&token) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let ctx = state.ctx.clone();
    tokio::spawn(async move {
        let update: IncomingUpdate = match serde_json::from_slice(&body) {
            Ok(update) => update,
            Err(e) => {
                tracing::warn!("Ignoring malformed update: {}", e);
                return;
            }
        };
        let update_id = update.update_id;
        match handle_update(&ctx, update).await {
            UpdateOutcome::Aborted(e) => tracing::error!("Update {:?} aborted: {}", update_id, e),
            outcome => tracing::debug!("Update {:?} finished: {:?}", update_id, outcome),
        }
    });

    Json(json!({"ok": true})).into_response()
}

/// GET /health: liveness plus server time in epoch milliseconds.
async fn health_handler() -> impl IntoResponse {
    Json(json!({"ok": true, "ts": chrono::Utc::now().timestamp_millis()}))
}

/// Static serving of `<root>/<id>/...`, with default-document and extension
/// fallbacks layered in front of `ServeDir`.
fn apps_router(root: PathBuf) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(&root))
        .layer(map_request_with_state(Arc::new(root), rewrite_static_request))
}

async fn rewrite_static_request(State(root): State<Arc<PathBuf>>, mut req: Request) -> Result<Request, Response> {
    let uri = req.uri().clone();

    // Only deployment directories are public; staging files are not
    if deployment_segment(uri.path()).is_none() {
        return Err(StatusCode::NOT_FOUND.into_response());
    }

    // ServeDir would redirect relative to the nested path and lose `/apps`
    if is_directory_without_slash(&root, uri.path()).await {
        let original = req
            .extensions()
            .get::<OriginalUri>()
            .map(|o| o.0.clone())
            .unwrap_or_else(|| uri.clone());
        let location = match original.query() {
            Some(query) => format!("{}/?{}", original.path(), query),
            None => format!("{}/", original.path()),
        };
        return Err(Redirect::temporary(&location).into_response());
    }

    let Some(suffix) = static_fallback(&root, uri.path()).await else {
        return Ok(req);
    };

    let rewritten = match uri.query() {
        Some(query) => format!("{}{}?{}", uri.path(), suffix, query),
        None => format!("{}{}", uri.path(), suffix),
    };
    match rewritten.parse::<Uri>() {
        Ok(new_uri) => *req.uri_mut() = new_uri,
        Err(e) => tracing::warn!("Could not rewrite {}: {}", uri, e),
    }
    Ok(req)
}

/// Deployment addressed by the first segment of a path inside `/apps`
fn deployment_segment(request_path: &str) -> Option<DeploymentId> {
    let first = request_path.trim_start_matches('/').split('/').next()?;
    DeploymentId::parse(first)
}

/// Maps a request path onto the root. `None` for undecodable paths and
/// paths that try to leave the root; `ServeDir` rejects those itself.
fn resolve_request_path(root: &Path, request_path: &str) -> Option<(PathBuf, bool)> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let trimmed = decoded.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let relative = relative_path(trimmed).ok()?;
    Some((root.join(relative), decoded.ends_with('/')))
}

async fn is_directory_without_slash(root: &Path, request_path: &str) -> bool {
    match resolve_request_path(root, request_path) {
        Some((target, false)) => tokio::fs::metadata(&target).await.is_ok_and(|m| m.is_dir()),
        _ => false,
    }
}

/// Suffix to append to a request path, when `ServeDir` alone would miss.
///
/// - `dir/` without `index.html` but with `index.htm` → `index.htm`
/// - `page` that does not exist but `page.html` / `page.htm` does → `.html` / `.htm`
pub async fn static_fallback(root: &Path, request_path: &str) -> Option<String> {
    let (target, trailing_slash) = resolve_request_path(root, request_path)?;

    if trailing_slash {
        let [primary, secondary] = INDEX_FILES;
        if is_file(&target.join(primary)).await {
            return None;
        }
        return is_file(&target.join(secondary)).await.then(|| secondary.to_string());
    }

    if tokio::fs::metadata(&target).await.is_ok() {
        return None;
    }
    for ext in FALLBACK_EXTENSIONS {
        let mut candidate = target.clone().into_os_string();
        candidate.push(".");
        candidate.push(ext);
        if is_file(Path::new(&candidate)).await {
            return Some(format!(".{}", ext));
        }
    }
    None
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file())
}
