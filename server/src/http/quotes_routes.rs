use crate::http::{ApiError, AppState, ExportPdfRequest, QuoteSelectionRequest};
use crate::quote::{compute_quote, QuoteFigures, SelectionSet};
use crate::services::PdfArtifact;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use uuid::Uuid;

fn figures_for(state: &AppState, request: &QuoteSelectionRequest) -> Result<QuoteFigures, ApiError> {
    let selection = SelectionSet::from_codes(&state.catalog, &request.codes)?;
    Ok(compute_quote(&selection, &state.pricing))
}

fn pdf_attachment(artifact: PdfArtifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

pub async fn quote_figures_handler(
    State(state): State<AppState>,
    Json(request): Json<QuoteSelectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let figures = figures_for(&state, &request)?;

    tracing::info!(
        "🧮 Cotización: {} exámenes, total {}",
        figures.item_count(),
        figures.rounded().final_total
    );

    Ok((StatusCode::OK, Json(figures.rounded())))
}

pub async fn quote_html_handler(
    State(state): State<AppState>,
    Json(request): Json<QuoteSelectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let figures = figures_for(&state, &request)?;
    let document = state.documents.render_today(&figures, request.variant)?;

    Ok(Html(document.into_string()))
}

/// Prices the selection, renders the chosen proforma and prints it.
pub async fn quote_pdf_handler(
    State(state): State<AppState>,
    Json(request): Json<QuoteSelectionRequest>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let figures = figures_for(&state, &request)?;

    if figures.is_empty() {
        return Err(ApiError::MissingContent(
            "La selección de exámenes está vacía".to_string(),
        ));
    }

    tracing::info!(
        "📥 Proforma PDF solicitada: request_id={} variant={:?} ({} exámenes)",
        request_id,
        request.variant,
        figures.item_count()
    );

    let document = state.documents.render_today(&figures, request.variant)?;
    let artifact = state.pdf.render(document.as_str()).await.map_err(|e| {
        tracing::error!("❌ request_id={} - {}", request_id, e);
        ApiError::from(e)
    })?;

    Ok(pdf_attachment(artifact))
}

/// `POST /export-pdf`: wraps the caller's markup and prints it. One render
/// attempt per request, no retry.
pub async fn export_pdf_handler(
    State(state): State<AppState>,
    Json(request): Json<ExportPdfRequest>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    tracing::info!(
        "📥 PDF solicitado: request_id={} ({} bytes de HTML)",
        request_id,
        request.html.len()
    );

    let document = state.documents.wrap_fragment(&request.html)?;
    let artifact = state.pdf.render(document.as_str()).await.map_err(|e| {
        tracing::error!("❌ request_id={} - {}", request_id, e);
        ApiError::from(e)
    })?;

    tracing::info!(
        "✅ request_id={} - {} ({} bytes)",
        request_id,
        artifact.filename,
        artifact.bytes.len()
    );

    Ok(pdf_attachment(artifact))
}
