//! Web Front End
//!
//! A single form page that lists the catalog, accepts a credential, a service
//! and a version, runs the documentation pipeline and links the results.
//!
//! Routes:
//! - `GET /` form
//! - `POST /` run the pipeline
//! - `GET /download/:doc_type/:api_name` generated file as an attachment
//! - `GET /health` liveness

mod page;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::pipeline::{DocumentationPipeline, GenerationJob};
use crate::render::DocumentKind;
use crate::types::{Result, ScribeError};

pub use page::{PageRenderer, PageView, StatusMessage};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: DocumentationPipeline,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(pipeline: DocumentationPipeline) -> Result<Self> {
        Ok(Self {
            pipeline,
            pages: Arc::new(PageRenderer::new()?),
        })
    }

    fn page(&self, view: PageView) -> Response {
        match self.pages.render(&view) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                warn!("Page render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering page").into_response()
            }
        }
    }
}

/// Form fields posted by the page
#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_name: String,
    #[serde(default)]
    pub api_version: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(generate))
        .route("/download/:doc_type/:api_name", get(download))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let pipeline = DocumentationPipeline::from_config(config)?;
    let router = create_router(AppState::new(pipeline)?);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on http://{}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn index(State(state): State<AppState>) -> Response {
    let view = match state.pipeline.list_services().await {
        Ok(apis) => PageView::with_apis(apis),
        Err(e) => PageView::default().message(StatusMessage::error(e.user_message())),
    };
    state.page(view)
}

async fn generate(State(state): State<AppState>, Form(form): Form<GenerateForm>) -> Response {
    let apis = match state.pipeline.list_services().await {
        Ok(apis) => apis,
        Err(e) => {
            return state
                .page(PageView::default().message(StatusMessage::error(e.user_message())));
        }
    };

    let api_name = form.api_name.trim();
    if api_name.is_empty() {
        return state
            .page(PageView::with_apis(apis).message(StatusMessage::error("Please select an API")));
    }

    let job = GenerationJob::new(api_name, &form.api_key)
        .with_display_version(Some(form.api_version.trim().to_string()));

    let view = match state.pipeline.run_with_catalog(&job, &apis).await {
        Ok(generated) => PageView::with_apis(apis)
            .selected(api_name)
            .message(StatusMessage::success(
                "Documentation generated successfully in both formats!",
            ))
            .downloads(&generated),
        Err(e) => PageView::with_apis(apis)
            .selected(api_name)
            .message(StatusMessage::error(e.user_message())),
    };
    state.page(view)
}

async fn download(
    State(state): State<AppState>,
    Path((doc_type, api_name)): Path<(String, String)>,
) -> Response {
    let kind = DocumentKind::from_download_segment(&doc_type);

    let path = match state.pipeline.layout().download_path(&api_name, kind) {
        Ok(path) => path,
        Err(ScribeError::InvalidServiceName(name)) => {
            warn!("Rejected download for invalid name: {}", name);
            return (StatusCode::BAD_REQUEST, "Invalid API name").into_response();
        }
        Err(e) => {
            warn!("Download error: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error downloading file").into_response();
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let file_name = format!("{}{}", api_name, kind.file_suffix());
            (
                [
                    (header::CONTENT_TYPE, kind.content_type().to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Document not found").into_response()
        }
        Err(e) => {
            warn!("Download error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error downloading file").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::generator::tests::MockProvider;
    use crate::config::GenerationConfig;
    use crate::discovery::DirectoryClient;
    use crate::discovery::client::tests::MockDiscovery;
    use crate::output::OutputLayout;
    use crate::types::ServiceDescriptor;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state(dir: &std::path::Path, discovery: MockDiscovery) -> AppState {
        AppState::new(DocumentationPipeline::new(
            DirectoryClient::new(Arc::new(discovery)),
            Arc::new(MockProvider::failing()),
            OutputLayout::new(dir, false),
            Duration::ZERO,
            GenerationConfig::default(),
        ))
        .unwrap()
    }

    fn catalog() -> MockDiscovery {
        MockDiscovery::new()
            .page(
                None,
                vec![ServiceDescriptor::new("drive", "Google Drive API", "v3")],
                None,
            )
            .description(
                "drive",
                "v3",
                json!({
                    "name": "drive",
                    "version": "v3",
                    "resources": {"files": {"methods": {"list": {"id": "drive.files.list"}}}}
                }),
            )
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn post_form(router: Router, body: &str) -> String {
        let response = router
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_text(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state(temp.path(), catalog()));
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("healthy"));
    }

    #[tokio::test]
    async fn test_index_lists_catalog() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state(temp.path(), catalog()));
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("<option value=\"drive\""));
        assert!(html.contains("Google Drive API"));
    }

    #[tokio::test]
    async fn test_post_without_selection() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state(temp.path(), catalog()));
        let html = post_form(router, "api_key=k&api_name=&api_version=v1").await;
        assert!(html.contains("Please select an API"));
    }

    #[tokio::test]
    async fn test_post_with_catalog_failure() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state(temp.path(), MockDiscovery::new()));
        let html = post_form(router, "api_key=k&api_name=drive&api_version=v3").await;
        assert!(html.contains("Failed to fetch API list"));
    }

    #[tokio::test]
    async fn test_post_unknown_service() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state(temp.path(), catalog()));
        let html = post_form(router, "api_key=k&api_name=calendar&api_version=v3").await;
        assert!(html.contains("Error: API calendar not found"));
    }

    #[tokio::test]
    async fn test_generate_then_download() {
        let temp = TempDir::new().unwrap();
        let state = state(temp.path(), catalog());

        let html = post_form(
            create_router(state.clone()),
            "api_key=&api_name=drive&api_version=v3",
        )
        .await;
        assert!(html.contains("Documentation generated successfully in both formats!"));
        assert!(html.contains("/download/pdf/drive"));
        assert!(html.contains("/download/notebook/drive"));

        let response = create_router(state.clone())
            .oneshot(
                Request::get("/download/pdf/drive")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"drive_documentation.pdf\""
        );

        let response = create_router(state)
            .oneshot(
                Request::get("/download/notebook/drive")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/x-ipynb+json"
        );
        let notebook: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(notebook["nbformat"], 4);
    }

    #[tokio::test]
    async fn test_download_missing_and_invalid() {
        let temp = TempDir::new().unwrap();
        let state = state(temp.path(), catalog());

        let response = create_router(state.clone())
            .oneshot(
                Request::get("/download/pdf/gmail")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = download(
            State(state),
            Path(("pdf".to_string(), "..".to_string())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
