//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Request, State,
    },
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use trowel_build::{runner, BuildContext};

use crate::reload::{reload_client_script, ReloadHub, ReloadMessage};
use crate::watcher::{classify_path, FileWatcher};

const RELOAD_WS_PATH: &str = "/__reload";
const RELOAD_SCRIPT_PATH: &str = "/__reload.js";
const RELOAD_SCRIPT_TAG: &str = "<script src=\"/__reload.js\"></script>";

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}: {1}")]
    Address(String, String),

    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),

    #[error("File watch error: {0}")]
    Watch(String),
}

/// Shared server state.
struct ServerState {
    ctx: BuildContext,
    hub: ReloadHub,
}

/// Development server over the output directory.
pub struct DevServer {
    ctx: BuildContext,
}

impl DevServer {
    /// Create a new development server for a build context.
    pub fn new(ctx: BuildContext) -> Self {
        Self { ctx }
    }

    /// Start the server and the watch loop. Runs until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let dev = &self.ctx.config.dev;
        let addr: SocketAddr = format!("{}:{}", dev.host, dev.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ServerError::Address(format!("{}:{}", dev.host, dev.port), e.to_string())
            })?;

        let state = Arc::new(ServerState {
            ctx: self.ctx.clone(),
            hub: ReloadHub::new(),
        });

        let watch_paths = vec![
            self.ctx.src_dir().to_path_buf(),
            self.ctx.public_dir().to_path_buf(),
        ];

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::Watch(e.to_string()))?;

        // Spawn the change handler
        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(path) = rx.recv().await {
                handle_change(&state_clone, path).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = Router::new()
            .route(RELOAD_WS_PATH, get(ws_handler))
            .route(RELOAD_SCRIPT_PATH, get(reload_script_handler))
            .fallback_service(ServeDir::new(self.ctx.out_dir()))
            .layer(middleware::from_fn(inject_reload_script))
            .with_state(state);

        tracing::info!("Serving {} at http://{}", self.ctx.out_dir().display(), addr);

        if dev.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        Ok(())
    }
}

/// Re-run the task a changed path belongs to, then tell the browsers.
async fn handle_change(state: &Arc<ServerState>, path: PathBuf) {
    let Some(task) = classify_path(&path, state.ctx.public_dir()) else {
        return;
    };

    tracing::info!(path = %path.display(), task = task.name(), "change detected");

    let ctx = state.ctx.clone();
    match tokio::task::spawn_blocking(move || runner::run(task, &ctx)).await {
        Ok(Ok(_)) => state.hub.send(ReloadMessage::Reload),
        Ok(Err(e)) => {
            // Keep watching; the next save gets another chance.
            tracing::error!(task = task.name(), error = %e, "rebuild failed");
        }
        Err(e) => {
            tracing::error!(task = task.name(), error = %e, "rebuild panicked");
        }
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    // Send connected message
    let msg = serde_json::to_string(&ReloadMessage::Connected).unwrap();
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    // Forward reload messages to the client
    while let Ok(reload) = rx.recv().await {
        let json = serde_json::to_string(&reload).unwrap();
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    let script = reload_client_script(RELOAD_WS_PATH);
    ([(header::CONTENT_TYPE, "application/javascript")], script)
}

/// Append the reload script tag to HTML responses.
///
/// Built pages come from user sources, so the server adds the tag itself
/// instead of requiring every page to reference it.
async fn inject_reload_script(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("text/html"))
        .unwrap_or(false);

    if !is_html {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "failed to buffer HTML response");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let injected = inject_into_html(&String::from_utf8_lossy(&bytes));

    // The body changed size; let the new one carry its own length.
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(injected))
}

fn inject_into_html(html: &str) -> String {
    match html.rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + RELOAD_SCRIPT_TAG.len());
            out.push_str(&html[..idx]);
            out.push_str(RELOAD_SCRIPT_TAG);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{html}{RELOAD_SCRIPT_TAG}"),
    }
}
