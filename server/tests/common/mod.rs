#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use proforma_server::catalog::{Catalog, CatalogItem};
use proforma_server::http::{create_router, AppState};
use proforma_server::quote::PricingRules;
use proforma_server::render::DocumentRenderer;
use proforma_server::services::{PdfArtifact, PdfError, PdfRenderer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tower::ServiceExt;

pub const STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";
pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n%fake\n%%EOF\n";

/// Records every call instead of launching Chromium.
#[derive(Default)]
pub struct RecordingPdf {
    pub fail: bool,
    calls: AtomicUsize,
    last_html: Mutex<Option<String>>,
}

impl RecordingPdf {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_html(&self) -> Option<String> {
        self.last_html.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for RecordingPdf {
    async fn render(&self, html: &str) -> Result<PdfArtifact, PdfError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_html.lock().unwrap() = Some(html.to_string());

        if self.fail {
            return Err(PdfError::Launch("chromium not available".to_string()));
        }

        Ok(PdfArtifact {
            bytes: FAKE_PDF.to_vec(),
            filename: "proforma.pdf".to_string(),
        })
    }
}

pub fn catalog() -> Catalog {
    Catalog::from_items(vec![
        CatalogItem::new("A1", "Glucosa", "S/ 20.00"),
        CatalogItem::new("B1", "Urea", "S/ 10.00"),
        CatalogItem::new("B2", "Ácido úrico", "S/ 30.00"),
        CatalogItem::new("Z9", "Precio roto", "consultar"),
    ])
    .unwrap()
}

pub fn app_with(pdf: Arc<dyn PdfRenderer>) -> Router {
    let state = AppState {
        catalog: Arc::new(catalog()),
        pricing: PricingRules::DEFAULT,
        documents: Arc::new(DocumentRenderer::new(Some(STYLESHEET.to_string())).unwrap()),
        pdf,
        start_time: SystemTime::now(),
    };
    create_router(state)
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
