use crate::catalog::CatalogItem;
use crate::render::DocumentVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /export-pdf`: markup already rendered by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPdfRequest {
    #[serde(default)]
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSelectionRequest {
    pub codes: Vec<String>,
    #[serde(default)]
    pub variant: DocumentVariant,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse<'a> {
    pub items: Vec<&'a CatalogItem>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub uptime_seconds: u64,
    pub catalog_items: usize,
    pub timestamp: DateTime<Utc>,
}
