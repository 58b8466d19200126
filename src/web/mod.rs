use anyhow::{Context, Result};
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::output::render_page;
use crate::pipeline::{PipelineReport, SummaryPipeline};
use crate::SummarizerError;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<SummaryPipeline>,
    /// Held for the length of a summarize request so runs never overlap
    run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pipeline: SummaryPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LinkQuery {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    pub url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/summarize", post(summarize))
        .route("/healthz", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the UI until Ctrl-C
pub async fn serve(pipeline: SummaryPipeline, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!("Web UI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    tracing::info!("Web UI stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Form page; with `?url=` also the thumbnail preview
pub async fn index(State(state): State<AppState>, Query(query): Query<LinkQuery>) -> Html<String> {
    match query.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(link) => {
            let report = state.pipeline.preview(link);
            Html(render_page(Some(&report)))
        }
        None => Html(render_page(None)),
    }
}

/// Fetch-and-summarize trigger
pub async fn summarize(
    State(state): State<AppState>,
    form: Result<Form<LinkForm>, FormRejection>,
) -> Html<String> {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            let error = SummarizerError::InvalidLinkFormat(format!(
                "Could not read the submitted form: {}",
                rejection.body_text()
            ));
            return Html(render_page(Some(&PipelineReport::rejected("", error))));
        }
    };

    let _guard = state.run_lock.lock().await;

    tracing::info!(link = %form.url.trim(), "Summary requested");
    let report = state.pipeline.run(&form.url).await;

    Html(render_page(Some(&report)))
}

async fn health() -> &'static str {
    "ok"
}
