use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use serpbrief_core::compose::OpenAiBriefGenerator;
use serpbrief_core::excerpt::HttpFetcher;
use serpbrief_core::traits::LiveSerpProvider;
use serpbrief_core::{pipeline, Device, QueryParams, RunOptions, SessionConfig};

mod components;
mod templates;

use components::{render_form, render_results, ExcerptView, ResultView};

async fn form_page() -> impl IntoResponse {
    Html(render_form(None))
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    keyword: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    device: String,
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    tone: String,
    #[serde(default)]
    audience: String,
    #[serde(default)]
    notes: String,
    dataforseo_login: String,
    dataforseo_password: String,
    openai_api_key: String,
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn generate(Form(form): Form<GenerateForm>) -> Response {
    let keyword = form.keyword.trim().to_string();
    if keyword.is_empty()
        || form.dataforseo_login.trim().is_empty()
        || form.dataforseo_password.trim().is_empty()
        || form.openai_api_key.trim().is_empty()
    {
        return Html(render_form(Some(
            "A keyword, DataForSEO credentials and an OpenAI API key are required.".to_string(),
        )))
        .into_response();
    }

    // Credentials live in this request scope only.
    let config = SessionConfig {
        dataforseo_login: form.dataforseo_login.trim().to_string(),
        dataforseo_password: form.dataforseo_password.trim().to_string(),
        openai_api_key: form.openai_api_key.trim().to_string(),
    };

    let device = match form.device.trim() {
        "mobile" => Device::Mobile,
        _ => Device::Desktop,
    };

    let params = QueryParams {
        keyword,
        language_name: optional(form.language),
        location_name: optional(form.location),
        device,
        limit: form.depth.unwrap_or(10),
        tone: optional(form.tone),
        audience: optional(form.audience),
        notes: optional(form.notes),
    };

    let serp = LiveSerpProvider::new(
        config.dataforseo_login.clone(),
        config.dataforseo_password.clone(),
    );
    let fetcher = Arc::new(HttpFetcher::new());
    let generator = OpenAiBriefGenerator::new(&config.openai_api_key);
    let options = RunOptions::default();

    match pipeline::run(&serp, fetcher, &generator, &params, &options).await {
        Ok(outcome) => {
            info!(
                results = outcome.results.len(),
                excerpts = outcome.excerpts.iter().filter(|e| e.is_ok()).count(),
                "Brief run complete"
            );

            let results = outcome
                .results
                .iter()
                .map(|r| ResultView {
                    position: r.position,
                    title: r.title.clone(),
                    url: r.url.clone(),
                    snippet: r.snippet.clone(),
                })
                .collect();
            let excerpts = outcome
                .excerpts
                .iter()
                .map(|e| ExcerptView {
                    title: e.title.clone(),
                    url: e.url.clone(),
                    status: e.status.label().to_string(),
                    ok: e.is_ok(),
                })
                .collect();

            let filename = outcome.brief.filename();
            Html(render_results(
                outcome.brief.keyword.clone(),
                results,
                excerpts,
                outcome.brief.markdown,
                filename,
            ))
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Brief run failed");
            Html(render_form(Some(e.user_message()))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct DownloadForm {
    filename: String,
    body: String,
}

/// Hand the generated Markdown back as a file attachment. The brief only
/// ever lives in the page that posts it here; nothing is stored server-side.
async fn download(Form(form): Form<DownloadForm>) -> Response {
    let filename: String = form
        .filename
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    let filename = if filename.is_empty() {
        "seo_brief.md".to_string()
    } else {
        filename
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        form.body,
    )
        .into_response()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("serpbrief=info".parse()?))
        .init();

    let host = std::env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("WEB_PORT").unwrap_or_else(|_| "3000".to_string());

    let app = Router::new()
        .route("/", get(form_page))
        .route("/generate", post(generate))
        .route("/download", post(download))
        .route("/health", get(|| async { "ok" }))
        // Credentials pass through these responses: never cache them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Method + path + status only: no query params, no form bodies
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{host}:{port}");
    info!("serpbrief starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
