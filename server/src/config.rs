use crate::browser::BrowserSettings;
use crate::services::pdf::{PageMargins, PaperSize, PdfOptions};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: String,
    pub log_level: String,

    // Catalog
    pub catalog_path: PathBuf,

    // Browser
    pub chrome_path: PathBuf,
    pub headless: bool,
    pub no_sandbox: bool,

    // Timeouts
    pub launch_timeout_ms: u64,
    pub load_timeout_ms: u64,
    pub print_timeout_ms: u64,
    pub idle_window_ms: u64,

    // Document
    pub margins: PageMargins,
    pub stylesheet_url: Option<String>,
    pub pdf_filename: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Config {
            http_addr: env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8099".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            catalog_path: env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "data/catalog.json".to_string())
                .into(),

            chrome_path: resolve_chrome_path(env::var("CHROME_PATH").ok()),
            headless: env_parse("HEADLESS", true),
            no_sandbox: env_parse("CHROME_NO_SANDBOX", true),

            launch_timeout_ms: env_parse("PDF_LAUNCH_TIMEOUT_MS", 20_000),
            load_timeout_ms: env_parse("PDF_LOAD_TIMEOUT_MS", 30_000),
            print_timeout_ms: env_parse("PDF_PRINT_TIMEOUT_MS", 30_000),
            idle_window_ms: env_parse("PDF_IDLE_WINDOW_MS", 500),

            margins: PageMargins {
                top_px: env_parse("PDF_MARGIN_TOP_PX", 50.0),
                bottom_px: env_parse("PDF_MARGIN_BOTTOM_PX", 20.0),
                left_px: env_parse("PDF_MARGIN_LEFT_PX", 20.0),
                right_px: env_parse("PDF_MARGIN_RIGHT_PX", 20.0),
            },
            stylesheet_url: match env::var("PDF_STYLESHEET_URL") {
                Ok(url) if url.trim().is_empty() => None,
                Ok(url) => Some(url),
                Err(_) => Some(DEFAULT_STYLESHEET_URL.to_string()),
            },
            pdf_filename: env::var("PDF_FILENAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "proforma.pdf".to_string()),
        })
    }

    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            chrome_path: self.chrome_path.clone(),
            headless: self.headless,
            no_sandbox: self.no_sandbox,
            launch_timeout: Duration::from_millis(self.launch_timeout_ms),
            request_timeout: Duration::from_millis(self.print_timeout_ms),
        }
    }

    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            paper: PaperSize::A4,
            margins: self.margins,
            print_background: true,
            launch_timeout: Duration::from_millis(self.launch_timeout_ms),
            load_timeout: Duration::from_millis(self.load_timeout_ms),
            print_timeout: Duration::from_millis(self.print_timeout_ms),
            idle_window: Duration::from_millis(self.idle_window_ms),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Explicit path wins; otherwise the usual install location for this OS.
pub fn resolve_chrome_path(explicit: Option<String>) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    if cfg!(target_os = "windows") {
        PathBuf::from("C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome")
    } else {
        PathBuf::from("google-chrome")
    }
}
