use crate::browser::{
    launch_browser, wait_for_network_idle, BrowserSettings, EngineSession, NetworkMonitor,
};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

const CSS_PX_PER_INCH: f64 = 96.0;
const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("No se pudo iniciar Chromium: {0}")]
    Launch(String),

    #[error("No se pudo abrir la página: {0}")]
    Page(String),

    #[error("No se pudo cargar el contenido: {0}")]
    Load(String),

    #[error("Tiempo de espera agotado en la etapa {stage} ({limit_ms} ms)")]
    Timeout { stage: RenderStage, limit_ms: u64 },

    #[error("No se pudo imprimir el PDF: {0}")]
    Print(String),

    #[error("Chromium devolvió una salida que no es PDF ({0} bytes)")]
    InvalidOutput(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Launch,
    Load,
    Print,
}

impl std::fmt::Display for RenderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RenderStage::Launch => "launch",
            RenderStage::Load => "load",
            RenderStage::Print => "print",
        };
        f.write_str(name)
    }
}

/// Paper size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl PaperSize {
    pub const A4: PaperSize = PaperSize {
        width_in: 8.27,
        height_in: 11.69,
    };
}

/// Page margins in CSS pixels (96 per inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub top_px: f64,
    pub bottom_px: f64,
    pub left_px: f64,
    pub right_px: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top_px: 50.0,
            bottom_px: 20.0,
            left_px: 20.0,
            right_px: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfOptions {
    pub paper: PaperSize,
    pub margins: PageMargins,
    /// Without it Chromium drops background colours and table shading.
    pub print_background: bool,
    pub launch_timeout: Duration,
    pub load_timeout: Duration,
    pub print_timeout: Duration,
    /// How long the page must stay quiet before it counts as loaded.
    pub idle_window: Duration,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            margins: PageMargins::default(),
            print_background: true,
            launch_timeout: Duration::from_secs(20),
            load_timeout: Duration::from_secs(30),
            print_timeout: Duration::from_secs(30),
            idle_window: Duration::from_millis(500),
        }
    }
}

impl PdfOptions {
    pub fn print_params(&self) -> PrintToPdfParams {
        PrintToPdfParams {
            print_background: Some(self.print_background),
            paper_width: Some(self.paper.width_in),
            paper_height: Some(self.paper.height_in),
            margin_top: Some(self.margins.top_px / CSS_PX_PER_INCH),
            margin_bottom: Some(self.margins.bottom_px / CSS_PX_PER_INCH),
            margin_left: Some(self.margins.left_px / CSS_PX_PER_INCH),
            margin_right: Some(self.margins.right_px / CSS_PX_PER_INCH),
            prefer_css_page_size: Some(false),
            ..Default::default()
        }
    }
}

/// The rendered PDF, held in memory for one response only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// HTML → PDF conversion seam; the HTTP layer only sees this trait.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<PdfArtifact, PdfError>;
}

/// Chromium-backed renderer. Every call launches its own browser and tears
/// it down before returning, whatever the outcome.
pub struct PdfService {
    browser: BrowserSettings,
    options: PdfOptions,
    filename: String,
}

impl PdfService {
    pub fn new(browser: BrowserSettings, options: PdfOptions, filename: impl Into<String>) -> Self {
        Self {
            browser,
            options,
            filename: filename.into(),
        }
    }

    async fn print_document(&self, session: &EngineSession, html: &str) -> Result<Vec<u8>, PdfError> {
        let page = session
            .new_page()
            .await
            .map_err(|e| PdfError::Page(e.to_string()))?;

        bounded(RenderStage::Load, self.options.load_timeout, async {
            let monitor = NetworkMonitor::attach(&page).await?;
            page.set_content(html).await?;
            wait_for_network_idle(&page, &monitor, self.options.idle_window).await
        })
        .await?
        .map_err(|e| PdfError::Load(e.to_string()))?;

        tracing::debug!("📄 Contenido cargado, imprimiendo...");

        let bytes = bounded(
            RenderStage::Print,
            self.options.print_timeout,
            page.pdf(self.options.print_params()),
        )
        .await?
        .map_err(|e| PdfError::Print(e.to_string()))?;

        if !bytes.starts_with(PDF_SIGNATURE) {
            return Err(PdfError::InvalidOutput(bytes.len()));
        }

        Ok(bytes)
    }
}

#[async_trait]
impl PdfRenderer for PdfService {
    async fn render(&self, html: &str) -> Result<PdfArtifact, PdfError> {
        let started = Instant::now();

        let session = bounded(
            RenderStage::Launch,
            self.options.launch_timeout,
            launch_browser(&self.browser),
        )
        .await?
        .map_err(|e| PdfError::Launch(e.to_string()))?;

        let result = self.print_document(&session, html).await;

        // Teardown en todos los caminos, también cuando la impresión falló
        session.shutdown().await;

        match result {
            Ok(bytes) => {
                tracing::info!(
                    "✅ PDF generado: {} bytes en {} ms",
                    bytes.len(),
                    started.elapsed().as_millis()
                );
                Ok(PdfArtifact {
                    bytes,
                    filename: self.filename.clone(),
                })
            }
            Err(e) => {
                tracing::error!("❌ Render PDF falló: {}", e);
                Err(e)
            }
        }
    }
}

async fn bounded<F, T>(stage: RenderStage, limit: Duration, fut: F) -> Result<T, PdfError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| PdfError::Timeout {
            stage,
            limit_ms: limit.as_millis() as u64,
        })
}
