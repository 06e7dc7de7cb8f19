use crate::catalog::Catalog;
use crate::quote::PricingRules;
use crate::render::DocumentRenderer;
use crate::services::PdfRenderer;
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub pricing: PricingRules,
    pub documents: Arc<DocumentRenderer>,
    pub pdf: Arc<dyn PdfRenderer>,
    pub start_time: SystemTime,
}
