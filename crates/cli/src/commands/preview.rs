use super::{build_options, load_site};
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use blog_kit_core::BuildOptions;
use blog_kit_core::config::{PUBLIC_DIR, SITE_TOML, parse_site_toml};
use blog_kit_generator::{generate_html, generator_config_json, html_escape};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

#[derive(Clone)]
struct AppState {
    site_path: PathBuf,
    options: BuildOptions,
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// This command:
/// - Validates and loads site.toml
/// - Renders the site shell (logo, nav bar, social links) on every request
/// - Serves the shell page and public/ under the base path
/// - Watches the site directory and triggers hot reload
///
/// # Arguments
///
/// * `path` - Path to site directory containing site.toml
/// * `port` - Port to serve on (default: 8080)
/// * `base` - Optional deployment base path
pub async fn run(path: PathBuf, port: u16, base: Option<String>) -> Result<()> {
    println!("🌐 Starting preview server...");
    println!("   Site: {}", path.display());

    let options = build_options(base)?;
    let config = load_site(&path)?;

    println!("   ✓ Loaded: {}", config.title);
    println!("   ✓ Nav entries: {}", config.theme.nav.len());

    let base = options.effective_base(&config).to_string();

    // Create broadcast channel for reload events
    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        site_path: path.clone(),
        options,
        reload_tx: reload_tx.clone(),
    };

    let app = router(state, &base);

    // Start file watcher
    let watcher_path = path.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_tx).await {
            eprintln!("File watcher error: {}", e);
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shell page, generator config and `public/` mounted under `base`.
/// The reload stream stays at the root where the page script expects it.
fn router(state: AppState, base: &str) -> Router {
    let site = Router::new()
        .route("/", get(index_handler))
        .route("/config.json", get(config_handler))
        .fallback_service(ServeDir::new(state.site_path.join(PUBLIC_DIR)));

    let app = Router::new().route("/_reload", get(sse_handler));
    let app = if base == "/" {
        app.merge(site)
    } else {
        app.nest_service(base.trim_end_matches('/'), site.with_state(state.clone()))
    };
    app.with_state(state)
}

/// Watch for file changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Shell page rendered from the current site.toml
async fn index_handler(State(state): State<AppState>) -> Response {
    match parse_site_toml(state.site_path.join(SITE_TOML)) {
        Ok(config) => Html(generate_html(&config, &state.options, true)).into_response(),
        Err(e) => error_page(&e.to_string()),
    }
}

/// Generator configuration as it would be written by `build`
async fn config_handler(State(state): State<AppState>) -> Response {
    let config = match parse_site_toml(state.site_path.join(SITE_TOML)) {
        Ok(config) => config,
        Err(e) => return error_page(&e.to_string()),
    };

    match generator_config_json(&config, &state.options) {
        Ok(value) => Json(value).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn error_page(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!(
            r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Configuration Error</h1>
<pre>{}</pre>
<script>new EventSource('/_reload').onmessage = () => location.reload();</script>
</body></html>"#,
            html_escape(message)
        )),
    )
        .into_response()
}
